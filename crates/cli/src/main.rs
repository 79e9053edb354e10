//! cold2warm CLI
//!
//! Bulk-restores archival objects of an S3-compatible bucket.

use clap::Parser;
use tokio_util::sync::CancellationToken;

mod commands;
mod exit_code;
mod logging;
mod output;
mod signal;

use commands::restore::RestoreArgs;
use logging::LogArgs;
use output::OutputConfig;

/// Restore every archival object of a bucket
#[derive(Parser, Debug)]
#[command(name = "cold2warm", version, about)]
struct Cli {
    #[command(flatten)]
    restore: RestoreArgs,

    #[command(flatten)]
    log: LogArgs,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the summary
    if let Err(e) = logging::init_logging(&cli.log) {
        eprintln!("{e}");
        std::process::exit(exit_code::ExitCode::GeneralError.code());
    }

    let cancel = CancellationToken::new();
    signal::cancel_on_shutdown(cancel.clone());

    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let code = commands::restore::execute(cli.restore, output_config, cancel).await;
    std::process::exit(code.code());
}
