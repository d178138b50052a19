use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::format_dashboard;
use crate::output::OutputContext;
use devtrack_lib::metrics::dashboard_metrics;

/// Execute the dashboard command for the acting user.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
pub fn execute(cli: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    let store_ctx = config::open_store_with_cli(cli)?;
    let metrics = dashboard_metrics(&store_ctx.store, &store_ctx.actor)?;

    if ctx.is_json() {
        ctx.json(&metrics)?;
    } else {
        println!("Dashboard for {}", store_ctx.actor);
        for row in format_dashboard(&metrics) {
            println!("  {row}");
        }
    }
    Ok(())
}
