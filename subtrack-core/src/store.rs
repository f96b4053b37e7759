//! The subscription store
//!
//! One [`SubscriptionStore`] is constructed at startup, hydrated with an
//! explicit [`SubscriptionStore::load_subscriptions`] call and then shared
//! (usually behind an `Arc`) with every screen.
//!
//! # Consistency
//!
//! Mutations build the next collection, write it to storage, and publish it
//! only once the write succeeded. All mutations queue on one writer gate, so
//! overlapping `add`/`remove` calls apply in turn instead of overwriting each
//! other's result.

use crate::storage::{KeyValueStorage, KeyValueStorageExt};
use crate::{stats, Amount, CategoryShare, NewSubscription, Result, Subscription, SubscriptionError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Storage slot holding the JSON array of subscriptions.
pub const SUBSCRIPTIONS_KEY: &str = "@subscriptions";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage key of the subscription slot.
    pub storage_key: String,
}

impl StoreConfig {
    /// Key that receives the raw text of a slot that failed to decode.
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.storage_key)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: SUBSCRIPTIONS_KEY.to_string(),
        }
    }
}

/// Result of [`SubscriptionStore::load_subscriptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing persisted yet; the store stays empty.
    Missing,
    /// The persisted collection replaced the in-memory one.
    Loaded(usize),
    /// The slot held text that did not decode. The raw text was copied to
    /// [`StoreConfig::backup_key`] and in-memory state was kept.
    Corrupt,
    /// Storage could not be read, or a corrupt slot could not be backed up.
    /// Nothing was changed; a store that was never hydrated stays that way.
    Unreadable,
}

pub struct SubscriptionStore {
    storage: Arc<dyn KeyValueStorage>,
    config: StoreConfig,
    state: watch::Sender<Arc<Vec<Subscription>>>,
    writer: Mutex<()>,
    hydrated: AtomicBool,
}

impl SubscriptionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    pub fn with_config(storage: Arc<dyn KeyValueStorage>, config: StoreConfig) -> Self {
        let (state, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            storage,
            config,
            state,
            writer: Mutex::new(()),
            hydrated: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether the store has been loaded from (or written to) storage.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Hydrate from storage.
    ///
    /// A missing slot leaves the store empty without writing anything.
    /// Problems are logged and reported through [`LoadOutcome`], never as an
    /// error, and in-memory state is left untouched:
    ///
    /// - text that does not decode is copied to the backup key first, then
    ///   the store is hydrated so the next write replaces the slot;
    /// - a failed read (or a failed backup) leaves the hydrated flag as it
    ///   was, so a store that never loaded keeps rejecting mutations.
    ///
    /// Calling this again re-reads the slot.
    pub async fn load_subscriptions(&self) -> LoadOutcome {
        let _guard = self.writer.lock().await;
        let key = self.config.storage_key.as_str();

        let raw = match self.storage.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.hydrated.store(true, Ordering::Release);
                tracing::debug!(key, "no persisted subscriptions");
                return LoadOutcome::Missing;
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Error reading subscriptions");
                return LoadOutcome::Unreadable;
            }
        };

        match serde_json::from_str::<Vec<Subscription>>(&raw) {
            Ok(subscriptions) => {
                let count = subscriptions.len();
                self.state.send_replace(Arc::new(subscriptions));
                self.hydrated.store(true, Ordering::Release);
                tracing::debug!(key, count, "loaded subscriptions");
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Error decoding subscriptions");
                let backup = self.config.backup_key();
                if let Err(e) = self.storage.set_item(&backup, &raw).await {
                    tracing::error!(key = %backup, error = %e, "Error backing up corrupt subscriptions");
                    return LoadOutcome::Unreadable;
                }
                tracing::warn!(key = %backup, "corrupt subscriptions backed up");
                self.hydrated.store(true, Ordering::Release);
                LoadOutcome::Corrupt
            }
        }
    }

    /// Add a subscription created now.
    pub async fn add_subscription(&self, input: NewSubscription) -> Result<Subscription> {
        self.add_subscription_at(input, Utc::now()).await
    }

    /// Add a subscription as if created at `now`.
    ///
    /// The store assigns the id, `created_at` and `next_payment`. On a failed
    /// write the error is returned and the collection is left as it was.
    pub async fn add_subscription_at(
        &self,
        input: NewSubscription,
        now: DateTime<Utc>,
    ) -> Result<Subscription> {
        let _guard = self.writer.lock().await;
        self.ensure_hydrated()?;

        let mut subscription = Subscription::create(input, now)?;
        let current = self.state.borrow().clone();
        while current.iter().any(|s| s.id == subscription.id) {
            subscription.id = uuid::Uuid::new_v4().to_string();
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(subscription.clone());

        self.commit(next).await?;
        tracing::debug!(id = %subscription.id, name = %subscription.name, "added subscription");
        Ok(subscription)
    }

    /// Remove the subscription with `id`.
    ///
    /// Returns the removed entry, or `None` when no entry matched (in which
    /// case nothing is written).
    pub async fn remove_subscription(&self, id: &str) -> Result<Option<Subscription>> {
        let _guard = self.writer.lock().await;
        self.ensure_hydrated()?;

        let current = self.state.borrow().clone();
        let Some(index) = current.iter().position(|s| s.id == id) else {
            tracing::debug!(id, "remove: no matching subscription");
            return Ok(None);
        };

        let mut next = current.to_vec();
        let removed = next.remove(index);

        self.commit(next).await?;
        tracing::debug!(id, name = %removed.name, "removed subscription");
        Ok(Some(removed))
    }

    /// Snapshot of the collection in insertion order.
    pub fn subscriptions(&self) -> Arc<Vec<Subscription>> {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published collection.
    pub fn watch(&self) -> watch::Receiver<Arc<Vec<Subscription>>> {
        self.state.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Subscription> {
        self.state.borrow().iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Sum of every subscription's monthly equivalent.
    pub fn total_monthly(&self) -> Amount {
        stats::total_monthly(&self.state.borrow())
    }

    /// Monthly spend grouped by category.
    pub fn subscriptions_by_category(&self) -> Vec<CategoryShare> {
        stats::breakdown_by_category(&self.state.borrow())
    }

    /// Collection ordered by `next_payment`, earliest first.
    pub fn sorted_by_next_payment(&self) -> Vec<Subscription> {
        let mut sorted = self.state.borrow().to_vec();
        sorted.sort_by_key(|s| s.next_payment);
        sorted
    }

    /// The subscription with the earliest `next_payment`.
    pub fn next_due(&self) -> Option<Subscription> {
        self.state
            .borrow()
            .iter()
            .min_by_key(|s| s.next_payment)
            .cloned()
    }

    fn ensure_hydrated(&self) -> Result<()> {
        if !self.is_hydrated() {
            return Err(SubscriptionError::NotHydrated.into());
        }
        Ok(())
    }

    /// Persist `next`, then publish it. Caller must hold the writer gate.
    async fn commit(&self, next: Vec<Subscription>) -> Result<()> {
        let key = self.config.storage_key.as_str();
        if let Err(e) = self.storage.set_json(key, &next).await {
            tracing::warn!(key, error = %e, "failed to persist subscriptions");
            return Err(SubscriptionError::Storage(e).into());
        }
        self.state.send_replace(Arc::new(next));
        Ok(())
    }
}
