#![doc(test(attr(deny(warnings))))]

//! Flowcast expands recurring income and expense rules into dated
//! occurrences and projects running balances over a chosen horizon.

pub mod cli;
pub mod errors;
pub mod utils;

pub use flowcast_config as config;
pub use flowcast_core as projection;
pub use flowcast_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Flowcast tracing initialized.");
    });
}
