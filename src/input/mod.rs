pub mod commands;

pub use commands::{Command, CommandError, HELP};
