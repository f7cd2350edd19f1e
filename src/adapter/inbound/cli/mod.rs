//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod products;
pub mod run;
pub mod stats;
pub mod sweep;

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::Config;

pub use command::{Cli, Commands};

/// Load configuration for a command, falling back to defaults when the file
/// does not exist.
///
/// # Errors
/// Returns an error if an existing file cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        return Config::load(path);
    }
    output::hint(&format!(
        "{} not found, using built-in defaults",
        path.display()
    ));
    Config::parse_toml("")
}

/// Dispatch a parsed command line.
///
/// # Errors
/// Returns whatever the selected command fails with.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(command::CheckCommand::Config(args)) => check::execute_config(&args.config),
        Commands::Check(command::CheckCommand::Product(args)) => {
            check::execute_product(&args.config, &args.url).await
        }
        Commands::Products(args) => products::execute(&args.config).await,
        Commands::Stats(args) => stats::execute(&args.config).await,
        Commands::Sweep(args) => sweep::execute(&args.config).await,
    }
}
