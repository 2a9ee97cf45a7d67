use serde::{Deserialize, Serialize};

/// One destination chat channel registered to receive notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Opaque platform channel identifier. Unique key within the registry.
    pub channel_id: String,
    /// Human-readable label, informational only — never used for routing.
    pub display_name: String,
}

impl Subscriber {
    pub fn new(channel_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One inbound notification event. Constructed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    /// Locator for the binary content to fetch and re-post.
    pub asset_url: String,
    /// Text accompanying the asset. May be empty.
    pub caption: String,
}

/// Result of one subscriber's delivery attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    pub channel_id: String,
    pub success: bool,
    /// Present iff `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn succeeded(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            success: true,
            error_detail: None,
        }
    }

    pub fn failed(channel_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            success: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Aggregate of one fan-out run, kept for logging and the status endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DeliveryReport {
    pub fn new(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self { outcomes }
    }

    /// Number of subscribers that received the notification.
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Number of subscribers whose delivery attempt failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
