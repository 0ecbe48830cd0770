// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "flux-app-generator")]
#[command(about = "Generate Flux GitOps manifests for a Helm-deployed application")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate the application directory
    Generate {
        /// Read the application from a YAML file instead of prompting
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory the application directory is created in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Never query the cluster for existing resources
        #[arg(long)]
        no_cluster: bool,
    },
    /// Answer the questions and save them as a config file
    Init {
        /// Config file to write
        #[arg(short, long, default_value = "flux-app.yaml")]
        file: PathBuf,

        /// Never query the cluster for existing resources
        #[arg(long)]
        no_cluster: bool,
    },
    /// List available plugins
    Plugins,
}
