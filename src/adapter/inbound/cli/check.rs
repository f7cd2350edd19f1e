//! Handlers for `stockwatch check`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{load_config, output};
use crate::domain::ProductUrl;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::TELEGRAM_TOKEN_VAR;
use crate::infrastructure::config::telegram::DeliveryMode;

/// Validate configuration without starting anything.
pub fn execute_config(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Database", &config.database);
    output::field("Shop", &config.source.allowed_host);
    output::field("Product path", &config.source.product_path);
    output::field("Pincode", &config.source.pincode);
    output::field(
        "Interval",
        format!("{} min", config.checker.interval_minutes),
    );
    output::field(
        "Pacing",
        format!("{} ms", config.checker.pacing_millis),
    );
    match config.checker.check_timeout_secs {
        Some(secs) => output::field("Check timeout", format!("{secs} s")),
        None => output::field("Check timeout", "request timeout only"),
    }

    if config.telegram.enabled {
        let delivery = match config.telegram.delivery {
            DeliveryMode::Direct => "direct messages".to_string(),
            DeliveryMode::Channel => format!(
                "channel {}",
                config.telegram.channel_id.unwrap_or_default()
            ),
        };
        output::success(&format!("Telegram configured ({delivery})"));
    } else {
        output::field("Telegram", "disabled");
        output::hint(&format!(
            "set [telegram] enabled = true and {TELEGRAM_TOKEN_VAR} to send alerts"
        ));
    }

    if config.web.enabled {
        output::field("Dashboard", format!("http://{}", config.web.bind));
    } else {
        output::field("Dashboard", "disabled");
    }

    output::success("Configuration check complete");
    Ok(())
}

/// Query one product page and print the observation.
pub async fn execute_product(config_path: &Path, raw_url: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let url = ProductUrl::parse(raw_url, &config.source.rules())?;
    let source = bootstrap::build_source(&config)?;

    let observation = source.query(&url).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.product",
            "url": url,
            "observation": observation,
        }));
        return Ok(());
    }

    output::section("Product Check");
    output::field("URL", &url);
    output::field(
        "Name",
        if observation.name.is_empty() {
            output::muted("(not found)")
        } else {
            observation.name.clone()
        },
    );
    output::field("Status", observation.status.label());
    if let Some(image) = &observation.image_url {
        output::field("Image", image);
    }
    Ok(())
}
