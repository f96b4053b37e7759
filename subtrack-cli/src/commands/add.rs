//! Add commands - manual entry and quick-add from presets

use anyhow::{anyhow, Result};
use subtrack_core::{find_preset, NewSubscription, Subscription};

use super::Context;
use crate::ui;

/// Add a subscription from raw form input.
pub async fn run(
    ctx: &Context,
    name: &str,
    price: &str,
    cycle: &str,
    category: &str,
) -> Result<()> {
    let input = NewSubscription::parse(name, price, cycle, category)?;
    tracing::debug!(name = %input.name, price = %input.price, "adding subscription");

    let sub = ctx.store.add_subscription(input).await?;
    report_added(ctx, &sub);
    Ok(())
}

/// Add one of the popular services at its list price.
pub async fn quick_add(ctx: &Context, service: &str) -> Result<()> {
    let preset = find_preset(service).ok_or_else(|| {
        anyhow!(
            "Unknown service '{}'. Run 'subtrack presets' to see what can be quick-added",
            service
        )
    })?;

    let sub = ctx.store.add_subscription(preset.to_new_subscription()).await?;
    report_added(ctx, &sub);
    Ok(())
}

fn report_added(ctx: &Context, sub: &Subscription) {
    ui::success(&format!(
        "Added {} (${} {})",
        sub.name,
        sub.price.to_display_string(),
        sub.billing_cycle
    ));
    ui::key_value("ID", &sub.id);
    ui::key_value("Next payment", &sub.next_payment.to_string());
    ui::key_value(
        "New monthly total",
        &format!("${}", ctx.store.total_monthly().to_display_string()),
    );
    if ctx.ephemeral {
        ui::warning("Ephemeral mode: this subscription will not be saved");
    }
}
