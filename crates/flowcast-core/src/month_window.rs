//! Sliding three-month view over a timeline, with a single-slot cache.

use std::sync::Arc;

use flowcast_domain::{DateWindow, DayGroups, MonthKey, TimelineEntry};
use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    time::Clock,
    timeline::{entries_within, group_by_day},
};

/// Number of calendar months shown by the view.
pub const VIEW_MONTHS: i32 = 3;

/// Inclusive date range covered by a view starting at `view_month`.
pub fn window_range(view_month: MonthKey) -> DateWindow {
    DateWindow {
        start: view_month.first_day(),
        end: view_month.shift(VIEW_MONTHS - 1).last_day(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub recomputes: u64,
}

/// Grouped-by-day result for one view month. Not thread-safe; wrap it in a
/// lock when shared.
#[derive(Debug, Default)]
pub struct WindowCache {
    key: Option<MonthKey>,
    retained_from: Option<MonthKey>,
    grouped: Arc<DayGroups>,
    stats: CacheStats,
}

impl WindowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<MonthKey> {
        self.key
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns the grouping for the window starting at `view_month`.
    ///
    /// A non-empty cached grouping under the same key is returned as-is. An
    /// empty recomputation never replaces a non-empty grouping.
    pub fn materialize(
        &mut self,
        timeline: &[TimelineEntry],
        view_month: MonthKey,
        sink: &mut dyn DiagnosticSink,
    ) -> Arc<DayGroups> {
        if self.key == Some(view_month) && !self.grouped.is_empty() {
            self.stats.hits += 1;
            return Arc::clone(&self.grouped);
        }

        self.stats.recomputes += 1;
        let range = window_range(view_month);
        let fresh = group_by_day(&entries_within(timeline, range));

        if fresh.is_empty() && !self.grouped.is_empty() {
            sink.record(Diagnostic::EmptyWindowRetained {
                requested: view_month,
                retained: self.retained_from,
            });
            return Arc::clone(&self.grouped);
        }

        debug!(
            view = %view_month,
            days = fresh.len(),
            "materialized month window"
        );
        self.key = Some(view_month);
        self.retained_from = Some(view_month);
        self.grouped = Arc::new(fresh);
        Arc::clone(&self.grouped)
    }

    /// Forces the next [`materialize`](Self::materialize) call to recompute.
    pub fn invalidate(&mut self) {
        debug!(previous = ?self.key, "invalidated month window cache");
        self.key = None;
    }
}

/// The current view position plus its cache.
#[derive(Debug)]
pub struct MonthWindow {
    view_month: MonthKey,
    cache: WindowCache,
}

impl MonthWindow {
    pub fn new(view_month: MonthKey) -> Self {
        Self {
            view_month,
            cache: WindowCache::new(),
        }
    }

    pub fn starting_today(clock: &dyn Clock) -> Self {
        Self::new(MonthKey::from_date(clock.today()))
    }

    pub fn view_month(&self) -> MonthKey {
        self.view_month
    }

    pub fn range(&self) -> DateWindow {
        window_range(self.view_month)
    }

    pub fn previous(&mut self) {
        self.view_month = self.view_month.pred();
    }

    pub fn next(&mut self) {
        self.view_month = self.view_month.succ();
    }

    pub fn jump_to(&mut self, month: MonthKey) {
        self.view_month = month;
    }

    pub fn today(&mut self, clock: &dyn Clock) {
        self.view_month = MonthKey::from_date(clock.today());
    }

    /// Grouping for the current view.
    pub fn current(
        &mut self,
        timeline: &[TimelineEntry],
        sink: &mut dyn DiagnosticSink,
    ) -> Arc<DayGroups> {
        self.cache.materialize(timeline, self.view_month, sink)
    }

    /// Call whenever the transactions or rules behind the timeline change.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
