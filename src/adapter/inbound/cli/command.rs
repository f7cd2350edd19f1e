//! Command-line interface definitions.
//!
//! Defines the `stockwatch` CLI using `clap`: the long-running `run` command
//! plus a handful of one-shot commands that work against the same store and
//! configuration.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Product stock tracker with Telegram alerts and a web dashboard
#[derive(Parser, Debug)]
#[command(name = "stockwatch")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tracker: scheduler, Telegram bot and dashboard
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// List tracked products and their subscribers
    Products(ConfigPathArg),

    /// Show tracker statistics
    Stats(ConfigPathArg),

    /// Run one full stock check cycle and print its report
    Sweep(ConfigPathArg),
}

/// Subcommands for `stockwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file and print a summary.
    Config(ConfigPathArg),
    /// Query one product page and print what it reports.
    Product(ProductArgs),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `stockwatch check product`.
#[derive(Parser, Debug)]
pub struct ProductArgs {
    /// Product page URL.
    pub url: String,

    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("surface").args(["bot_only", "web_only"])))]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Run only the scheduler and Telegram bot
    #[arg(long)]
    pub bot_only: bool,

    /// Run only the web dashboard
    #[arg(long)]
    pub web_only: bool,

    /// Override the check interval in minutes
    #[arg(long)]
    pub interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["stockwatch", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(!args.bot_only);
        assert!(!args.web_only);
        assert!(!args.json_logs);
        assert_eq!(args.interval, None);
        assert!(!cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "stockwatch",
            "run",
            "-c",
            "/etc/stockwatch.toml",
            "--log-level",
            "debug",
            "--json-logs",
            "--web-only",
            "--interval",
            "3",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("/etc/stockwatch.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
        assert!(args.web_only);
        assert_eq!(args.interval, Some(3));
    }

    #[test]
    fn bot_only_and_web_only_conflict() {
        let result = Cli::try_parse_from(["stockwatch", "run", "--bot-only", "--web-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_check_product() {
        let cli = Cli::try_parse_from([
            "stockwatch",
            "check",
            "product",
            "https://shop.amul.com/en/product/amul-lassi",
        ])
        .unwrap();
        let Commands::Check(CheckCommand::Product(args)) = cli.command else {
            panic!("expected check product");
        };
        assert_eq!(args.url, "https://shop.amul.com/en/product/amul-lassi");
    }

    #[test]
    fn check_product_requires_url() {
        assert!(Cli::try_parse_from(["stockwatch", "check", "product"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stockwatch", "stats", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
