pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, DetectArgs, OutputFormatArg, SetupArgs};
pub use output::{OutputFormat, OutputFormatter};
