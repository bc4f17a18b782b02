use std::path::PathBuf;

use chrono::NaiveDate;
use flowcast_core::ProjectionInterval;
use flowcast_domain::MonthKey;

use crate::errors::FlowcastError;

pub const USAGE: &str = "Usage: flowcast_cli <command>\n\
Commands:\n  \
project [snapshot.json] [--today YYYY-MM-DD] [--interval <setting>] [--lowest N] [--config <file>]\n  \
window [snapshot.json] [--today YYYY-MM-DD] [--month YYYY-MM] [--shift N] [--config <file>]\n  \
version\n  \
help\n\
Interval settings: daily, weekly, bi-weekly, monthly, quarterly, yearly";

/// Options shared by the projecting commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonArgs {
    pub snapshot: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Project {
        common: CommonArgs,
        interval: Option<ProjectionInterval>,
        lowest: Option<usize>,
    },
    Window {
        common: CommonArgs,
        month: Option<MonthKey>,
        shift: i32,
    },
    Version,
    Help,
}

/// Parses `flowcast_cli` arguments, excluding the program name.
///
/// Flags take a value either as the next argument or inline (`--lowest=5`).
pub fn parse_args<I, S>(args: I) -> Result<Command, FlowcastError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(name) = args.next() else {
        return Ok(Command::Help);
    };

    match name.as_str() {
        "project" => {
            let mut common = CommonArgs::default();
            let mut interval = None;
            let mut lowest = None;
            for (flag, value) in Flags::new(args) {
                match flag.as_deref() {
                    None => set_snapshot(&mut common, value)?,
                    Some("interval") => interval = Some(value.parse::<ProjectionInterval>()?),
                    Some("lowest") => lowest = Some(parse_number(&value, "--lowest")?),
                    Some(other) => {
                        if !apply_common(&mut common, other, &value)? {
                            return Err(unknown_flag(other, "project"));
                        }
                    }
                }
            }
            Ok(Command::Project {
                common,
                interval,
                lowest,
            })
        }
        "window" => {
            let mut common = CommonArgs::default();
            let mut month = None;
            let mut shift = 0;
            for (flag, value) in Flags::new(args) {
                match flag.as_deref() {
                    None => set_snapshot(&mut common, value)?,
                    Some("month") => {
                        month = Some(
                            value
                                .parse::<MonthKey>()
                                .map_err(FlowcastError::InvalidArgument)?,
                        )
                    }
                    Some("shift") => shift = parse_number(&value, "--shift")?,
                    Some(other) => {
                        if !apply_common(&mut common, other, &value)? {
                            return Err(unknown_flag(other, "window"));
                        }
                    }
                }
            }
            Ok(Command::Window {
                common,
                month,
                shift,
            })
        }
        "version" | "--version" | "-V" => Ok(Command::Version),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(FlowcastError::InvalidArgument(format!(
            "unknown command `{other}`; run `flowcast_cli help`"
        ))),
    }
}

/// Splits raw arguments into `(Some(flag), value)` pairs and
/// `(None, positional)` items. A flag missing its value yields an empty one.
struct Flags<I> {
    inner: I,
}

impl<I: Iterator<Item = String>> Flags<I> {
    fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator<Item = String>> Iterator for Flags<I> {
    type Item = (Option<String>, String);

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.inner.next()?;
        let Some(flag) = raw.strip_prefix("--") else {
            return Some((None, raw));
        };
        if let Some((flag, value)) = flag.split_once('=') {
            return Some((Some(flag.to_string()), value.to_string()));
        }
        let value = self.inner.next().unwrap_or_default();
        Some((Some(flag.to_string()), value))
    }
}

fn set_snapshot(common: &mut CommonArgs, value: String) -> Result<(), FlowcastError> {
    if common.snapshot.is_some() {
        return Err(FlowcastError::InvalidArgument(format!(
            "unexpected extra argument `{value}`"
        )));
    }
    common.snapshot = Some(PathBuf::from(value));
    Ok(())
}

/// Applies a shared flag; returns `false` when `flag` is not one.
fn apply_common(common: &mut CommonArgs, flag: &str, value: &str) -> Result<bool, FlowcastError> {
    match flag {
        "today" => {
            let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                FlowcastError::InvalidArgument(format!(
                    "--today expects YYYY-MM-DD, got `{value}`"
                ))
            })?;
            common.today = Some(date);
        }
        "config" => common.config = Some(PathBuf::from(value)),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, FlowcastError> {
    value.trim().parse().map_err(|_| {
        FlowcastError::InvalidArgument(format!("{flag} expects a number, got `{value}`"))
    })
}

fn unknown_flag(flag: &str, command: &str) -> FlowcastError {
    FlowcastError::InvalidArgument(format!("unknown option `--{flag}` for `{command}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse_args(Vec::<String>::new()).unwrap(), Command::Help);
    }

    #[test]
    fn project_flags_in_any_order() {
        let command = parse_args([
            "project",
            "--lowest=5",
            "ledger.json",
            "--interval",
            "bi-weekly",
            "--today",
            "2025-09-01",
        ])
        .unwrap();
        assert_eq!(
            command,
            Command::Project {
                common: CommonArgs {
                    snapshot: Some(PathBuf::from("ledger.json")),
                    config: None,
                    today: NaiveDate::from_ymd_opt(2025, 9, 1),
                },
                interval: Some(ProjectionInterval::BiWeekly),
                lowest: Some(5),
            }
        );
    }

    #[test]
    fn window_accepts_negative_shift() {
        let command = parse_args(["window", "--month", "2025-01", "--shift", "-2"]).unwrap();
        let Command::Window { month, shift, .. } = command else {
            panic!("expected window command");
        };
        assert_eq!(month, MonthKey::new(2025, 1));
        assert_eq!(shift, -2);
    }

    #[test]
    fn unknown_interval_is_rejected() {
        let err = parse_args(["project", "--interval", "fortnightly"]).unwrap_err();
        assert!(err.to_string().contains("fortnightly"));
    }

    #[test]
    fn bad_values_are_invalid_arguments() {
        for args in [
            vec!["project", "--today", "01/09/2025"],
            vec!["project", "--lowest", "many"],
            vec!["window", "--month", "2025-13"],
            vec!["window", "--interval", "daily"],
            vec!["project", "a.json", "b.json"],
            vec!["frobnicate"],
        ] {
            let err = parse_args(args.clone()).unwrap_err();
            assert!(
                matches!(err, FlowcastError::InvalidArgument(_)),
                "{args:?} gave {err}"
            );
        }
    }
}
