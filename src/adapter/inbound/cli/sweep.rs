//! Handler for `stockwatch sweep`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::Components;

/// Run one check cycle inline, notifying subscribers as the scheduler would.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    config.init_logging();
    let components = Components::build(&config)?;

    let Some(result) = components.orchestrator.run_now().await else {
        output::warning("A stock check is already running");
        return Ok(());
    };
    let report = result?;

    if output::is_json() {
        output::json_output(json!({
            "command": "sweep",
            "checked": report.checked,
            "updated": report.updated,
            "failed": report.failed,
            "transitions": report.transitions,
            "notifications_sent": report.notifications_sent,
            "notifications_failed": report.notifications_failed,
        }));
        return Ok(());
    }

    output::section("Stock Check");
    output::field("Checked", report.checked);
    output::field("Updated", report.updated);
    output::field(
        "Failed",
        if report.failed > 0 {
            output::negative(report.failed)
        } else {
            report.failed.to_string()
        },
    );
    output::field("Transitions", report.transitions);
    output::field("Alerts sent", output::positive(report.notifications_sent));
    if report.notifications_failed > 0 {
        output::warning(&format!(
            "{} alert(s) could not be delivered",
            report.notifications_failed
        ));
    }
    output::success("Stock check complete");
    Ok(())
}
