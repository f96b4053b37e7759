//! Reminders command - upcoming and overdue payments

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use subtrack_core::reminders_for;

use super::Context;
use crate::ui;

pub async fn run(ctx: &Context, days: Option<u32>, json: bool) -> Result<()> {
    let settings = ctx.settings.load().await;
    let window = days.unwrap_or(settings.window_days);
    let today = Utc::now().date_naive();

    let report = reminders_for(&ctx.store.subscriptions(), today, &settings, days);
    if json {
        return ui::json(&report);
    }

    ui::header("Payment Reminders");
    if !settings.payment_reminders && days.is_none() {
        ui::info("Payment reminders are turned off (subtrack settings set --reminders true)");
        ui::info("Pass --days to look ahead anyway");
        return Ok(());
    }

    if report.is_empty() {
        ui::info(&format!("Nothing due in the next {} days", window));
        return Ok(());
    }

    if !report.upcoming.is_empty() {
        ui::info(&format!("Due in the next {} days:", window));
        for reminder in &report.upcoming {
            println!("  {} {}", "•".cyan(), reminder.message());
        }
    }

    if !report.overdue.is_empty() {
        ui::separator();
        ui::warning("Past due dates:");
        for reminder in &report.overdue {
            println!("  {} {}", "•".yellow(), reminder.message());
        }
    }

    Ok(())
}
