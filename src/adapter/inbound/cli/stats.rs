//! Handler for `stockwatch stats`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Print tracker statistics.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let store = bootstrap::open_store(&config.database)?;
    let stats = store.stats().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "stats",
            "stats": stats,
        }));
        return Ok(());
    }

    output::section("Tracker Statistics");
    output::field("Products", stats.total_products);
    output::field("Subscribers", stats.total_subscribers);
    output::field("In stock", output::positive(stats.in_stock));
    output::field("Out of stock", output::negative(stats.out_of_stock));
    let unknown = stats
        .total_products
        .saturating_sub(stats.in_stock + stats.out_of_stock);
    output::field("Unknown", output::muted(unknown));
    Ok(())
}
