mod args;
mod commands;
pub mod output;
mod system_clock;

use std::{env, io};

pub use args::{parse_args, Command, CommonArgs, USAGE};
pub use commands::execute;
pub use system_clock::SystemClock;

use crate::errors::FlowcastError;

/// Parses the process arguments and runs the requested command against stdout.
pub fn run_cli() -> Result<(), FlowcastError> {
    let command = parse_args(env::args().skip(1))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(command, &SystemClock, &mut out)
}
