use std::{collections::HashMap, path::PathBuf};

use {tokio::sync::RwLock, tracing::info};

use fanpost_common::Subscriber;

use crate::{error::RegistryError, store};

/// In-memory authoritative subscriber set, write-through to the JSON store.
///
/// Constructed once at startup and injected as an `Arc` into both the
/// chat-command path (mutations) and the notification-intake path
/// (snapshots). Mutations hold the write lock through the disk save, so the
/// on-disk and in-memory registries converge after every operation.
pub struct SubscriptionManager {
    subscribers: RwLock<HashMap<String, Subscriber>>,
    store_path: PathBuf,
}

impl SubscriptionManager {
    /// Load the persisted registry. A missing or corrupt store yields an
    /// empty registry, never an error.
    pub fn load(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let subscribers: HashMap<String, Subscriber> = store::load(&store_path)
            .into_iter()
            .map(|(channel_id, display_name)| {
                let sub = Subscriber::new(channel_id.clone(), display_name);
                (channel_id, sub)
            })
            .collect();
        info!(
            path = %store_path.display(),
            subscribers = subscribers.len(),
            "subscription registry loaded"
        );
        Self {
            subscribers: RwLock::new(subscribers),
            store_path,
        }
    }

    /// Idempotent upsert. The in-memory registry always takes the
    /// subscription; a persistence failure is returned so the caller can
    /// warn the user, but live delivery keeps working.
    pub async fn subscribe(
        &self,
        channel_id: &str,
        display_name: &str,
    ) -> Result<(), RegistryError> {
        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(
            channel_id.to_string(),
            Subscriber::new(channel_id, display_name),
        );
        info!(channel_id, display_name, "channel subscribed");
        self.persist(&subscribers).await
    }

    /// Remove a subscription. `NotSubscribed` if the channel is unknown; the
    /// registry is left untouched in that case.
    pub async fn unsubscribe(&self, channel_id: &str) -> Result<(), RegistryError> {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(channel_id).is_none() {
            return Err(RegistryError::NotSubscribed);
        }
        info!(channel_id, "channel unsubscribed");
        self.persist(&subscribers).await
    }

    /// Point-in-time copy of the subscriber set, sorted by channel id. The
    /// fan-out engine iterates this without ever touching the lock.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        let subscribers = self.subscribers.read().await;
        let mut snapshot: Vec<Subscriber> = subscribers.values().cloned().collect();
        snapshot.sort_by(|a, b| a.channel_id.cmp(&b.channel_id));
        snapshot
    }

    /// Current number of subscribers.
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscribers.read().await.is_empty()
    }

    /// Write-through to disk. File I/O runs on the blocking pool; the caller
    /// holds the write lock across the await, so saves of successive
    /// mutations stay serialized.
    async fn persist(
        &self,
        subscribers: &HashMap<String, Subscriber>,
    ) -> Result<(), RegistryError> {
        let on_disk: HashMap<String, String> = subscribers
            .iter()
            .map(|(id, sub)| (id.clone(), sub.display_name.clone()))
            .collect();
        let path = self.store_path.clone();
        tokio::task::spawn_blocking(move || store::save(&path, &on_disk))
            .await
            .map_err(|e| RegistryError::Persistence(std::io::Error::other(e)))??;
        Ok(())
    }
}
