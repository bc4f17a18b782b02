use std::{io::Write, path::Path};

use flowcast_config::{Config, ConfigManager};
use flowcast_core::{
    Clock, FixedClock, MonthWindow, ProjectionInput, ProjectionInterval, ProjectionService,
    TracingSink,
};
use flowcast_domain::DateWindow;
use tracing::{info, warn};

use super::{
    args::{Command, CommonArgs, USAGE},
    output,
};
use crate::{
    errors::FlowcastError,
    utils::{
        build_info,
        persistence::{load_snapshot, Snapshot},
    },
};

/// Runs one parsed command, writing its report to `out`.
pub fn execute(
    command: Command,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), FlowcastError> {
    match command {
        Command::Project {
            common,
            interval,
            lowest,
        } => {
            let session = Session::open(&common, clock)?;
            let interval = interval.unwrap_or_else(|| configured_interval(&session.config));
            let lowest_count = lowest.unwrap_or(session.config.lowest_balance_count);
            let report = ProjectionService::project(
                session.input(),
                session.today,
                interval,
                lowest_count,
                &mut TracingSink,
            )?;
            output::write_report(out, &report, &session.config.currency)?;
        }
        Command::Window {
            common,
            month,
            shift,
        } => {
            let session = Session::open(&common, clock)?;
            let mut view = MonthWindow::starting_today(&FixedClock(session.today));
            if let Some(month) = month {
                view.jump_to(month);
            }
            for _ in 0..shift.unsigned_abs() {
                if shift > 0 {
                    view.next();
                } else {
                    view.previous();
                }
            }
            // Balances run from the earlier of today and the view start.
            let range = view.range();
            let span = DateWindow {
                start: session.today.min(range.start),
                end: range.end,
            };
            let mut sink = TracingSink;
            let timeline = ProjectionService::timeline(session.input(), span, &mut sink);
            let groups = view.current(&timeline, &mut sink);
            info!(view = %view.view_month(), days = groups.len(), "window rendered");
            output::write_window(
                out,
                view.view_month(),
                view.range(),
                &groups,
                &session.config.currency,
            )?;
        }
        Command::Version => {
            let meta = build_info::current();
            writeln!(out, "flowcast {}", meta.version)?;
            writeln!(out, "commit: {} ({})", meta.git_hash, meta.git_status)?;
            writeln!(out, "built: {} [{}]", meta.timestamp, meta.profile)?;
            writeln!(out, "target: {}", meta.target)?;
            writeln!(out, "rustc: {}", meta.rustc)?;
        }
        Command::Help => writeln!(out, "{USAGE}")?,
    }
    Ok(())
}

/// Configuration, snapshot and reference date resolved for one command.
struct Session {
    config: Config,
    snapshot: Snapshot,
    today: chrono::NaiveDate,
}

impl Session {
    fn open(common: &CommonArgs, clock: &dyn Clock) -> Result<Self, FlowcastError> {
        let config = load_config(common.config.as_deref())?;
        let path = common
            .snapshot
            .clone()
            .unwrap_or_else(|| config.resolve_snapshot_path());
        let snapshot = load_snapshot(&path)?;
        let today = common.today.unwrap_or_else(|| clock.today());
        Ok(Self {
            config,
            snapshot,
            today,
        })
    }

    fn input(&self) -> ProjectionInput<'_> {
        ProjectionInput {
            transactions: &self.snapshot.transactions,
            rules: &self.snapshot.rules,
            opening_balance: self
                .snapshot
                .opening_balance
                .unwrap_or(self.config.opening_balance),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, FlowcastError> {
    let manager = match path {
        Some(path) => ConfigManager::new(path.to_path_buf()),
        None => ConfigManager::default_location(),
    };
    Ok(manager.load()?)
}

/// Unrecognized settings project one year ahead.
fn configured_interval(config: &Config) -> ProjectionInterval {
    config
        .projection_interval
        .parse()
        .unwrap_or_else(|_| {
            warn!(
                setting = %config.projection_interval,
                "unknown projection interval in config, projecting one year"
            );
            ProjectionInterval::default()
        })
}
