use std::sync::Arc;

use {tokio::sync::RwLock, tracing::debug};

use {
    fanpost_common::{DeliveryReport, NotificationPayload},
    fanpost_delivery::DeliveryEngine,
    fanpost_registry::SubscriptionManager,
};

use crate::error::ValidationError;

/// A decoded but unvalidated inbound notification.
#[derive(Debug, Clone, Default)]
pub struct RawNotification {
    pub asset_url: Option<String>,
    pub caption: Option<String>,
}

/// Boundary adapter between the webhook and the fan-out engine.
///
/// Accepting a notification is fire-and-forget: validation happens inline,
/// then the fan-out runs as a detached task against a registry snapshot
/// taken at acceptance time. The caller never waits on delivery; a scheduled
/// fan-out runs to completion (or per-attempt timeout) on its own, and
/// process shutdown may abandon it — delivery is best-effort, at most once.
pub struct NotificationIntake {
    manager: Arc<SubscriptionManager>,
    engine: Arc<DeliveryEngine>,
    last_report: RwLock<Option<DeliveryReport>>,
}

impl NotificationIntake {
    pub fn new(manager: Arc<SubscriptionManager>, engine: Arc<DeliveryEngine>) -> Arc<Self> {
        Arc::new(Self {
            manager,
            engine,
            last_report: RwLock::new(None),
        })
    }

    /// Validate the notification and schedule its fan-out. Returns as soon
    /// as the task is spawned, independent of subscriber count or network
    /// latency.
    pub async fn handle(self: &Arc<Self>, raw: RawNotification) -> Result<(), ValidationError> {
        let asset_url = raw
            .asset_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ValidationError::MissingAssetUrl)?;
        let payload = NotificationPayload {
            asset_url,
            caption: raw.caption.unwrap_or_default(),
        };

        let subscribers = self.manager.snapshot().await;
        debug!(
            asset_url = %payload.asset_url,
            subscribers = subscribers.len(),
            "notification accepted, scheduling fan-out"
        );

        let intake = Arc::clone(self);
        tokio::spawn(async move {
            let report = intake.engine.deliver(&payload, subscribers).await;
            *intake.last_report.write().await = Some(report);
        });

        Ok(())
    }

    /// The most recent completed fan-out, if any.
    pub async fn last_report(&self) -> Option<DeliveryReport> {
        self.last_report.read().await.clone()
    }

    pub(crate) fn manager(&self) -> &SubscriptionManager {
        &self.manager
    }
}
