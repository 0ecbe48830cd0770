// Command handlers for flux-app-generator

use anyhow::Result;
use tracing::debug;

use crate::cli::{Args, Command};

pub mod generate;
pub mod init;
pub mod interactive;
pub mod plugins;

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            config,
            output,
            no_cluster,
        } => {
            debug!(?config, output = %output.display(), no_cluster, "Handling generate command");
            generate::handle_generate(config.as_deref(), &output, no_cluster)
        }
        Command::Init { file, no_cluster } => {
            debug!(file = %file.display(), no_cluster, "Handling init command");
            init::handle_init(&file, no_cluster)
        }
        Command::Plugins => {
            debug!("Handling plugins command");
            plugins::handle_plugins()
        }
    }
}
