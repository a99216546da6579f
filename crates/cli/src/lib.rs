//! Entitle CLI library, exposed for integration tests

pub mod commands;
pub mod logging;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "entitle")]
#[command(about = "Activate, check and deactivate product licenses", long_about = None)]
#[command(version = entitle_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to entitle.toml (default: search current directory and parents)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "terminal")]
    pub format: OutputFormat,

    /// Show debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize entitle.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Activate a license key on this installation
    Activate {
        /// License key to activate
        key: String,
    },

    /// Release the activation and remove the local license
    Deactivate,

    /// Refresh the license from the server
    Check,

    /// Show the locally cached license (no network)
    Status,

    /// Check whether a newer version is available
    Updates {
        /// Installed version (default: product.version from entitle.toml)
        #[arg(long)]
        current: Option<String>,

        /// Ignore the cached update response
        #[arg(long)]
        refresh: bool,
    },

    /// Open the purchase page in the browser
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
