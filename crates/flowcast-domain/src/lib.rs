//! flowcast-domain
//!
//! Pure domain models (Transaction, RecurrenceRule, timeline values, calendar keys).
//! No I/O, no CLI, no storage. Only data types and calendar helpers.

pub mod calendar;
pub mod rule;
pub mod timeline;
pub mod transaction;

pub use calendar::*;
pub use rule::*;
pub use timeline::*;
pub use transaction::*;
