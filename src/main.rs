//! gocross CLI - Cross-compile Go packages across an OS/arch matrix
//!
//! Entry point for the gocross command-line application.

use std::process::ExitCode;

use clap::Parser;

use gocross::cli::output::display_error;
use gocross::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the progress display
    cli.output_config().init_tracing();

    // Run the command and handle errors
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            display_error(&e);
            ExitCode::FAILURE
        }
    }
}
