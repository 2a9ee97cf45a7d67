use std::{sync::Arc, time::Duration};

use {
    tokio::{sync::Semaphore, time::timeout},
    tracing::{debug, info, warn},
};

use fanpost_common::{DeliveryOutcome, DeliveryReport, NotificationPayload, Subscriber};

use crate::{error::DeliveryError, fetch::AssetFetcher, sink::ChannelSink};

/// Concurrent fan-out of one notification to a subscriber snapshot.
///
/// Each subscriber gets an independent task (its own fetch, its own send);
/// one subscriber's failure never cancels or delays the others. Concurrency
/// is capped so a large registry cannot overwhelm the chat-platform API, and
/// each attempt's fetch and send are individually bounded by a timeout.
pub struct DeliveryEngine {
    fetcher: Arc<dyn AssetFetcher>,
    sink: Arc<dyn ChannelSink>,
    max_in_flight: usize,
    attempt_timeout: Duration,
}

impl DeliveryEngine {
    pub fn new(
        fetcher: Arc<dyn AssetFetcher>,
        sink: Arc<dyn ChannelSink>,
        max_in_flight: usize,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            sink,
            max_in_flight: max_in_flight.max(1),
            attempt_timeout,
        }
    }

    /// Deliver `payload` to every subscriber in the snapshot. The report
    /// always contains exactly one outcome per subscriber.
    pub async fn deliver(
        &self,
        payload: &NotificationPayload,
        subscribers: Vec<Subscriber>,
    ) -> DeliveryReport {
        if subscribers.is_empty() {
            debug!("no subscribers, skipping fan-out");
            return DeliveryReport::default();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = Vec::with_capacity(subscribers.len());

        for subscriber in subscribers {
            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            let semaphore = Arc::clone(&semaphore);
            let payload = payload.clone();
            let attempt_timeout = self.attempt_timeout;
            let channel_id = subscriber.channel_id.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return DeliveryOutcome::failed(
                            &subscriber.channel_id,
                            "delivery slot unavailable",
                        );
                    },
                };
                match attempt(&*fetcher, &*sink, &payload, &subscriber, attempt_timeout).await {
                    Ok(()) => {
                        debug!(channel_id = %subscriber.channel_id, "notification delivered");
                        DeliveryOutcome::succeeded(&subscriber.channel_id)
                    },
                    Err(e) => {
                        warn!(
                            channel_id = %subscriber.channel_id,
                            display_name = %subscriber.display_name,
                            error = %e,
                            "delivery failed"
                        );
                        DeliveryOutcome::failed(&subscriber.channel_id, e.to_string())
                    },
                }
            });
            tasks.push((channel_id, handle));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (channel_id, handle) in tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(channel_id = %channel_id, error = %e, "delivery task aborted");
                    DeliveryOutcome::failed(&channel_id, format!("delivery task aborted: {e}"))
                },
            };
            outcomes.push(outcome);
        }

        let report = DeliveryReport::new(outcomes);
        info!(
            total = report.len(),
            delivered = report.delivered(),
            failed = report.failed(),
            "fan-out complete"
        );
        report
    }
}

/// One subscriber's attempt: fetch, then post, each bounded by the attempt
/// timeout.
async fn attempt(
    fetcher: &dyn AssetFetcher,
    sink: &dyn ChannelSink,
    payload: &NotificationPayload,
    subscriber: &Subscriber,
    attempt_timeout: Duration,
) -> Result<(), DeliveryError> {
    let image = timeout(attempt_timeout, fetcher.fetch(&payload.asset_url))
        .await
        .map_err(|_| DeliveryError::Timeout {
            phase: "fetch",
            timeout: attempt_timeout,
        })?
        .map_err(DeliveryError::Fetch)?;

    timeout(
        attempt_timeout,
        sink.post(&subscriber.channel_id, &payload.caption, image),
    )
    .await
    .map_err(|_| DeliveryError::Timeout {
        phase: "send",
        timeout: attempt_timeout,
    })??;

    Ok(())
}
