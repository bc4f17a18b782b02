//! flowcast-core
//!
//! Recurrence expansion and balance projection for Flowcast.
//! Depends on flowcast-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod diagnostics;
pub mod error;
pub mod month_window;
pub mod occurrence;
pub mod projection_service;
pub mod recurrence;
pub mod summary;
pub mod time;
pub mod timeline;


pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{CoreError, RuleError};
pub use month_window::{window_range, CacheStats, MonthWindow, WindowCache};
pub use occurrence::{expand, expand_all};
pub use projection_service::{ProjectionInput, ProjectionReport, ProjectionService};
pub use recurrence::{occurs_on, projection_horizon_end, validate_rule, ProjectionInterval};
pub use summary::{lowest, DEFAULT_LOWEST_COUNT, TODAY_LABEL};
pub use time::{Clock, FixedClock};
