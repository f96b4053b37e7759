//! Stats command - monthly spend by category

use anyhow::Result;
use serde::Serialize;
use subtrack_core::{most_expensive, Amount, CategoryShare};

use super::Context;
use crate::ui;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    subscription_count: usize,
    total_monthly: Amount,
    /// Total monthly times twelve
    total_yearly: Amount,
    /// Category with the largest monthly spend; null when there is none
    most_expensive: Option<CategoryShare>,
    categories: Vec<CategoryShare>,
}

fn build_report(ctx: &Context) -> StatsReport {
    let total_monthly = ctx.store.total_monthly();
    let categories = ctx.store.subscriptions_by_category();
    StatsReport {
        subscription_count: ctx.store.len(),
        total_monthly,
        total_yearly: total_monthly.multiply(12).unwrap_or(total_monthly),
        most_expensive: most_expensive(&categories).cloned(),
        categories,
    }
}

pub async fn run(ctx: &Context, json: bool) -> Result<()> {
    let report = build_report(ctx);
    if json {
        return ui::json(&report);
    }

    ui::header("Spending Statistics");
    ui::key_value("Subscriptions", &report.subscription_count.to_string());
    ui::key_value(
        "Monthly total",
        &format!("${}", report.total_monthly.to_display_string()),
    );
    ui::key_value(
        "Yearly total",
        &format!("${}", report.total_yearly.to_display_string()),
    );
    match &report.most_expensive {
        Some(top) => ui::key_value(
            "Most expensive",
            &format!("{} ({}%)", top.category.title(), top.percentage),
        ),
        None => ui::key_value("Most expensive", "N/A"),
    }

    if report.categories.is_empty() {
        ui::separator();
        ui::info("Add subscriptions to see your spending breakdown");
        return Ok(());
    }

    ui::separator();
    ui::info("By category:");
    for share in &report.categories {
        println!(
            "  {} {:<12} {} {:>3}%  ${}/mo",
            ui::hex_color("●", share.color),
            share.category.title(),
            ui::hex_color(&ui::bar(share.percentage, 20), share.color),
            share.percentage,
            share.monthly.to_display_string(),
        );
    }

    Ok(())
}
