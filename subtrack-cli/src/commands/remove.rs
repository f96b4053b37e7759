//! Remove command

use anyhow::Result;

use super::Context;
use crate::ui;

pub async fn run(ctx: &Context, id: &str) -> Result<()> {
    match ctx.store.remove_subscription(id).await? {
        Some(sub) => {
            ui::success(&format!("Removed {}", sub.name));
            ui::key_value(
                "New monthly total",
                &format!("${}", ctx.store.total_monthly().to_display_string()),
            );
        }
        None => {
            ui::info(&format!("No subscription with id {}", id));
        }
    }
    Ok(())
}
