use makeplan::cli::commands::{CliArgs, Commands};
use makeplan::cli::handlers::{handle_detect, handle_setup};
use makeplan::util::{init_logging, LoggingConfig};
use makeplan::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::resolve(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("makeplan v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Setup(setup_args) => handle_setup(setup_args).await,
        Commands::Detect(detect_args) => handle_detect(detect_args),
    };

    std::process::exit(exit_code);
}
