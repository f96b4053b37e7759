//! Presets command - services available to quick-add

use anyhow::Result;
use colored::Colorize;
use subtrack_core::popular_services;

use super::Context;
use crate::ui;

pub async fn run(ctx: &Context) -> Result<()> {
    ui::header("Popular Services");

    for preset in popular_services() {
        let already = ctx
            .store
            .subscriptions()
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(preset.name));

        let marker = if already { "✓".green().to_string() } else { " ".to_string() };
        println!(
            "{} {} {:<10} ${}/mo  {}",
            marker,
            preset.icon,
            preset.name.bold(),
            preset.price.to_display_string(),
            preset.category.title().dimmed(),
        );
    }

    ui::separator();
    ui::info("Run 'subtrack quick-add <service>' to add one");
    Ok(())
}
