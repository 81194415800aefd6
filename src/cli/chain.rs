use super::{AppContext, ui};
use crate::core::link::LinkParams;
use anyhow::Result;

/// Lists the selectable chains, or switches to `key` and reloads the last
/// viewed address on it.
pub async fn run(ctx: &AppContext, key: Option<&str>) -> Result<()> {
    ctx.controller.restore(&LinkParams::default()).await;

    let Some(key) = key else {
        let current = ctx.controller.current_chain().await;
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Chain"),
            ui::header_cell("Native"),
            ui::header_cell("Price Id"),
        ]);
        for chain in &ctx.config.chains {
            let marker = if chain.key == current.key { " *" } else { "" };
            table.add_row(vec![
                format!("{}{marker}", chain.key),
                chain.native_symbol.clone(),
                chain.native_price_id.clone(),
            ]);
        }
        println!("{table}");
        return Ok(());
    };

    ctx.controller.select_chain(key).await;
    Ok(())
}

/// Prints a link that reopens the current view read-only.
pub async fn share(ctx: &AppContext) -> Result<()> {
    ctx.controller.restore(&LinkParams::default()).await;
    if let Some(url) = ctx.controller.share_link(&ctx.config.share_base_url).await? {
        println!("{url}");
    }
    Ok(())
}
