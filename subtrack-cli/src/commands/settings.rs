//! Settings commands

use anyhow::Result;

use super::Context;
use crate::ui;

pub async fn show(ctx: &Context) -> Result<()> {
    let settings = ctx.settings.load().await;

    ui::header("Settings");
    ui::key_value(
        "Payment reminders",
        if settings.payment_reminders { "on" } else { "off" },
    );
    ui::key_value("Reminder window", &format!("{} days", settings.window_days));
    if ctx.ephemeral {
        ui::key_value("Data directory", "(in memory)");
    } else {
        ui::key_value("Data directory", &ctx.data_dir.display().to_string());
    }
    Ok(())
}

pub async fn set(ctx: &Context, reminders: Option<bool>, window_days: Option<u32>) -> Result<()> {
    if reminders.is_none() && window_days.is_none() {
        ui::info("Nothing to change. Pass --reminders and/or --window-days");
        return Ok(());
    }

    let mut settings = ctx.settings.load().await;
    if let Some(enabled) = reminders {
        settings.payment_reminders = enabled;
    }
    if let Some(days) = window_days {
        settings.window_days = days;
    }

    ctx.settings.save(&settings).await?;
    tracing::debug!(?settings, "saved settings");

    ui::success("Settings saved");
    show(ctx).await
}
