//! Handler for `stockwatch products`.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{load_config, output};
use crate::application::{ProductSummary, TrackingService};
use crate::domain::StockStatus;
use crate::error::Result;
use crate::infrastructure::bootstrap;

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Subscribers")]
    subscribers: usize,
    #[tabled(rename = "Last Checked")]
    last_checked: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&ProductSummary> for ProductRow {
    fn from(summary: &ProductSummary) -> Self {
        let product = &summary.product;
        Self {
            name: product.name.clone(),
            status: status_cell(product.status),
            subscribers: summary.subscribers.len(),
            last_checked: product
                .last_checked
                .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            url: product.url.to_string(),
        }
    }
}

fn status_cell(status: StockStatus) -> String {
    match status {
        StockStatus::InStock => "in stock",
        StockStatus::OutOfStock => "out of stock",
        StockStatus::Unknown => "unknown",
    }
    .to_string()
}

/// List every tracked product.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let store = bootstrap::open_store(&config.database)?;
    let source = bootstrap::build_source(&config)?;
    let tracking = TrackingService::new(source, store, config.source.rules());

    let summaries = tracking.summaries().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "products",
            "count": summaries.len(),
            "products": summaries,
        }));
        return Ok(());
    }

    output::section("Tracked Products");
    if summaries.is_empty() {
        output::note("No products being tracked.");
        output::hint("send /track <url> to the bot or use the dashboard");
        return Ok(());
    }

    let rows: Vec<ProductRow> = summaries.iter().map(ProductRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    output::note(&format!("{} product(s)", summaries.len()));
    Ok(())
}
