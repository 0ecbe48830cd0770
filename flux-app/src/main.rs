use clap::Parser;
use colored::Colorize;
use tracing::debug;

use flux_messages::{msg, MESSAGES};

mod cli;
mod commands;
mod kubectl;
mod terminal;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = flux_logging::init_subscriber(args.debug.then_some("debug"));
    debug!(command = ?args.command, "Starting flux-app-generator");

    if let Err(e) = execute_command(args) {
        eprintln!(
            "{}",
            msg!(MESSAGES.common.error_generic, error = format!("{e:#}")).red()
        );
        std::process::exit(1);
    }
}
