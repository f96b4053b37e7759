//! List command - summary plus every subscription, soonest payment first

use anyhow::Result;
use colored::Colorize;
use subtrack_core::Subscription;

use super::Context;
use crate::ui;

pub async fn run(ctx: &Context) -> Result<()> {
    ui::header("My Subscriptions");

    let store = &ctx.store;
    ui::key_value("Active", &store.len().to_string());
    ui::key_value(
        "Monthly total",
        &format!("${}", store.total_monthly().to_display_string()),
    );
    if let Some(next) = store.next_due() {
        ui::key_value(
            "Next payment",
            &format!("{} on {}", next.name, next.next_payment.format("%b %-d, %Y")),
        );
    }

    let subscriptions = store.sorted_by_next_payment();
    if subscriptions.is_empty() {
        ui::separator();
        ui::info("No subscriptions yet");
        ui::info("Run 'subtrack add <name> <price>' or 'subtrack quick-add <service>' to add one");
        return Ok(());
    }

    ui::separator();
    for sub in &subscriptions {
        print_row(sub, ctx.verbose);
    }

    Ok(())
}

fn print_row(sub: &Subscription, verbose: bool) {
    println!(
        "{} {}  ${}/{}  {}",
        ui::hex_color("●", sub.category.color()),
        sub.name.bold(),
        sub.price.to_display_string(),
        cycle_unit(sub),
        sub.category.title().dimmed(),
    );
    ui::key_value("  Next payment", &sub.next_payment.format("%b %-d, %Y").to_string());
    ui::key_value("  ID", &sub.id);
    if verbose {
        ui::key_value("  Added", &sub.created_at.to_rfc3339());
    }
}

fn cycle_unit(sub: &Subscription) -> &'static str {
    match sub.billing_cycle.months() {
        1 => "mo",
        3 => "qtr",
        _ => "yr",
    }
}
