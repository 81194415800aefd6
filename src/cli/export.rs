use super::AppContext;
use super::view::ViewTarget;
use crate::core::LoadOutcome;
use anyhow::Result;
use std::path::Path;

/// Loads the target and writes its holdings as CSV into `output`.
pub async fn run(ctx: &AppContext, target: &ViewTarget, output: &Path) -> Result<()> {
    let params = target.link_params()?;
    match ctx.controller.boot(&params).await {
        Some(LoadOutcome::Loaded { .. }) | None => {}
        Some(_) => return Ok(()),
    }

    if let Some(path) = ctx.controller.export_csv(output).await? {
        println!("Exported holdings to {}", path.display());
    }
    Ok(())
}
