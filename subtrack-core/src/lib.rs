//! # subtrack core
//!
//! State store for recurring subscriptions. A [`SubscriptionStore`] keeps the
//! user's subscriptions in memory, mirrors every change to a single JSON slot
//! in a [`KeyValueStorage`], and derives the figures the screens show:
//! monthly spend, per-category shares and upcoming payment reminders.
//!
//! ## Consistency
//!
//! - Every mutation writes the full collection before the new state becomes
//!   visible; a failed write leaves memory at the previous snapshot
//! - Mutations are serialized behind a single writer gate
//! - Prices use fixed-point decimal arithmetic
//!
//! ## Limitations
//!
//! `next_payment` is computed once at creation and never rolls forward.
//! Subscriptions whose date has passed are reported as overdue by
//! [`reminders::upcoming_reminders`].

pub mod amount;
pub mod presets;
pub mod reminders;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod store;
pub mod subscription;

pub use amount::Amount;
pub use presets::{find_preset, popular_services, ServicePreset};
pub use reminders::{reminders_for, upcoming_reminders, Reminder, ReminderReport};
pub use settings::{ReminderSettings, SettingsStore, SETTINGS_KEY};
pub use stats::{breakdown_by_category, most_expensive, total_monthly, CategoryShare};
pub use storage::{
    FileStorage, InMemoryStorage, KeyValueStorage, KeyValueStorageExt, StorageError,
    StorageErrorCode,
};
pub use store::{LoadOutcome, StoreConfig, SubscriptionStore, SUBSCRIPTIONS_KEY};
pub use subscription::{BillingCycle, Category, NewSubscription, Subscription};

pub type Result<T> = anyhow::Result<T>;

#[derive(thiserror::Error, Debug)]
pub enum SubscriptionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("store has not been loaded from storage yet")]
    NotHydrated,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("arithmetic overflow")]
    Overflow,
}
