//! Handler for the `run` command.

use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, RunOptions};
use crate::infrastructure::config::Config;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let options = run_options(args);
    if !config.logging.format.eq_ignore_ascii_case("json") {
        print_startup(&config, options);
    }

    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "stockwatch starting");
    bootstrap::run(config, options).await
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".to_string();
    }
    if let Some(minutes) = args.interval {
        config.checker.interval_minutes = minutes;
    }
}

fn run_options(args: &RunArgs) -> RunOptions {
    RunOptions {
        bot: !args.web_only,
        web: !args.bot_only,
    }
}

fn print_startup(config: &Config, options: RunOptions) {
    if output::is_quiet() {
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database);
    output::field("Shop", &config.source.allowed_host);
    output::field(
        "Interval",
        format!("{} min", config.checker.interval_minutes),
    );

    if options.bot {
        let telegram = if config.telegram.enabled {
            "enabled"
        } else {
            "disabled (alerts go to the log)"
        };
        output::field("Telegram", telegram);
    } else {
        output::field("Scheduler", "off (--web-only)");
    }

    if options.web && config.web.enabled {
        output::field("Dashboard", format!("http://{}", config.web.bind));
    } else {
        output::field("Dashboard", "off");
    }
    println!();
}
