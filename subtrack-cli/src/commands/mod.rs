//! CLI command implementations

pub mod add;
pub mod list;
pub mod presets;
pub mod reminders;
pub mod remove;
pub mod settings;
pub mod stats;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use subtrack_core::{
    FileStorage, InMemoryStorage, KeyValueStorage, LoadOutcome, SettingsStore, SubscriptionStore,
};

use crate::ui;

/// Everything a command needs: the hydrated store and the settings slot,
/// both over the same storage.
pub struct Context {
    pub store: SubscriptionStore,
    pub settings: SettingsStore,
    pub data_dir: PathBuf,
    pub ephemeral: bool,
    pub verbose: bool,
}

impl Context {
    pub async fn open(data_dir: &Path, ephemeral: bool, verbose: bool) -> Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = if ephemeral {
            Arc::new(InMemoryStorage::new())
        } else {
            Arc::new(FileStorage::new(data_dir).with_context(|| {
                format!("Failed to open data directory {}", data_dir.display())
            })?)
        };

        let store = SubscriptionStore::new(storage.clone());
        match store.load_subscriptions().await {
            LoadOutcome::Corrupt => {
                ui::warning(&format!(
                    "Saved subscriptions were damaged and have been set aside as {}; starting from an empty list",
                    store.config().backup_key()
                ));
            }
            LoadOutcome::Unreadable => {
                ui::warning("Saved subscriptions could not be read; changes are disabled for this run");
            }
            outcome => tracing::debug!(?outcome, dir = %data_dir.display(), "store ready"),
        }

        Ok(Self {
            store,
            settings: SettingsStore::new(storage),
            data_dir: data_dir.to_path_buf(),
            ephemeral,
            verbose,
        })
    }
}
