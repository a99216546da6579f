//! Entitle CLI - license activation for distributed products

use anyhow::Result;
use clap::Parser;

use entitle_cli::commands::{self, Context};
use entitle_cli::{logging, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.format);

    match &cli.command {
        Commands::Init { path } => commands::init::run(path.as_deref()),
        Commands::Activate { key } => commands::activate::run(&context(&cli)?, key),
        Commands::Deactivate => commands::deactivate::run(&context(&cli)?),
        Commands::Check => commands::check::run(&context(&cli)?),
        Commands::Status => commands::status::run(&context(&cli)?),
        Commands::Updates { current, refresh } => {
            commands::updates::run(&context(&cli)?, current.as_deref(), *refresh)
        }
        Commands::Purchase => commands::purchase::run(&context(&cli)?),
    }
}

fn context(cli: &Cli) -> Result<Context> {
    Context::load(cli.config.as_deref(), cli.format)
}
