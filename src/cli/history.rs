use super::AppContext;
use anyhow::Result;

/// Shows the recorded portfolio totals without fetching anything.
pub async fn run(ctx: &AppContext) -> Result<()> {
    ctx.controller.show_history().await;
    Ok(())
}
