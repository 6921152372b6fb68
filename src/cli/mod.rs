pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RunOptions};
pub use commands::run;
