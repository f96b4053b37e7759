//! subtrack CLI
//!
//! Command-line front end for tracking recurring subscriptions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "subtrack - keep an eye on what your subscriptions cost", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory (defaults to the platform's local data dir)
    #[arg(long, global = true, env = "SUBTRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the summary and all subscriptions, soonest payment first
    List,

    /// Add a subscription
    Add {
        /// Service name
        name: String,

        /// Price per billing cycle (e.g. 15.99)
        price: String,

        /// Billing cycle: monthly, yearly or quarterly
        #[arg(short, long, default_value = "monthly")]
        cycle: String,

        /// Category: streaming, music, cloud or other
        #[arg(long, default_value = "other")]
        category: String,
    },

    /// Add a popular service at its list price
    QuickAdd {
        /// Service name (see `subtrack presets`)
        service: String,
    },

    /// Remove a subscription by id
    Remove {
        /// Subscription id
        id: String,
    },

    /// Show monthly spend broken down by category
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show upcoming and overdue payments
    Reminders {
        /// Look-ahead in days (defaults to the saved setting)
        #[arg(short, long)]
        days: Option<u32>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List the services available to quick-add
    Presets,

    /// Show or change reminder settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// Enable or disable payment reminders
        #[arg(long)]
        reminders: Option<bool>,

        /// Reminder look-ahead in days
        #[arg(long)]
        window_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("subtrack=debug,subtrack_core=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("subtrack=info,subtrack_core=warn")
            .init();
    }

    if let Err(e) = run(cli).await {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("subtrack")
    });

    let ctx = commands::Context::open(&data_dir, cli.ephemeral, cli.verbose).await?;

    match cli.command {
        Commands::List => {
            commands::list::run(&ctx).await?;
        }
        Commands::Add {
            name,
            price,
            cycle,
            category,
        } => {
            commands::add::run(&ctx, &name, &price, &cycle, &category).await?;
        }
        Commands::QuickAdd { service } => {
            commands::add::quick_add(&ctx, &service).await?;
        }
        Commands::Remove { id } => {
            commands::remove::run(&ctx, &id).await?;
        }
        Commands::Stats { json } => {
            commands::stats::run(&ctx, json).await?;
        }
        Commands::Reminders { days, json } => {
            commands::reminders::run(&ctx, days, json).await?;
        }
        Commands::Presets => {
            commands::presets::run(&ctx).await?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                commands::settings::show(&ctx).await?;
            }
            SettingsAction::Set {
                reminders,
                window_days,
            } => {
                commands::settings::set(&ctx, reminders, window_days).await?;
            }
        },
    }

    Ok(())
}
