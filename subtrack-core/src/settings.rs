//! Reminder preferences
//!
//! Stored as a JSON object under [`SETTINGS_KEY`], next to the subscription
//! slot in the same key-value storage.

use crate::storage::{KeyValueStorage, KeyValueStorageExt};
use crate::{Result, SubscriptionError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SETTINGS_KEY: &str = "@settings";

/// Longest reminder look-ahead accepted, in days.
pub const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    /// Show upcoming payment reminders.
    pub payment_reminders: bool,
    /// How many days ahead a payment counts as upcoming.
    pub window_days: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            payment_reminders: true,
            window_days: 7,
        }
    }
}

impl ReminderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(SubscriptionError::InvalidArgument(format!(
                "Reminder window cannot exceed {} days",
                MAX_WINDOW_DAYS
            ))
            .into());
        }
        Ok(())
    }
}

pub struct SettingsStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Saved settings, or the defaults when none are saved or the slot is
    /// unreadable.
    pub async fn load(&self) -> ReminderSettings {
        match self.storage.get_json::<ReminderSettings>(SETTINGS_KEY).await {
            Ok(Some(settings)) => settings,
            Ok(None) => ReminderSettings::default(),
            Err(e) => {
                tracing::error!(key = SETTINGS_KEY, error = %e, "Error loading settings");
                ReminderSettings::default()
            }
        }
    }

    pub async fn save(&self, settings: &ReminderSettings) -> Result<()> {
        settings.validate()?;
        self.storage
            .set_json(SETTINGS_KEY, settings)
            .await
            .map_err(SubscriptionError::Storage)?;
        Ok(())
    }
}
