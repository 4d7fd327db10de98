//! # Booking Notifier
//!
//! Delivers `appointmentBooked` events to the configured webhook sink.
//!
//! Deliveries run on a background worker fed by a bounded queue, so a slow
//! or failing sink never holds the booking itself hostage. The booking
//! handler waits only for the first attempt (bounded by the attempt timeout)
//! to fill in the advisory `webhookStatus`; retries after that are logged
//! and otherwise invisible to the caller.

use std::time::Duration;

use barberbook_core::models::{
    booking::{BookingEvent, WebhookStatus},
    slot::Slot,
};
use eyre::{Result, WrapErr};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::config::WebhookConfig;

/// Extra time the handler allows beyond one attempt's timeout.
const REPORT_GRACE: Duration = Duration::from_secs(1);

/// A queued booking event.
#[derive(Debug)]
pub struct DeliveryJob {
    event: BookingEvent,
    /// Receives the outcome of the first attempt.
    report: Option<oneshot::Sender<WebhookStatus>>,
}

/// Handle used by request handlers to announce bookings.
#[derive(Debug, Clone)]
pub enum Notifier {
    /// No sink configured; every booking reports `skipped`.
    Disabled,
    Webhook {
        queue: mpsc::Sender<DeliveryJob>,
        report_wait: Duration,
    },
}

impl Notifier {
    pub fn disabled() -> Self {
        Notifier::Disabled
    }

    /// Starts the delivery worker and returns a handle to its queue.
    ///
    /// Must be called from within a Tokio runtime. The worker exits once
    /// every handle has been dropped.
    pub fn spawn(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .wrap_err("Failed to build webhook HTTP client")?;

        let (queue, jobs) = mpsc::channel(config.queue_capacity.max(1));
        let report_wait = config.timeout + REPORT_GRACE;

        info!("Booking notifications enabled for {}", config.url);
        tokio::spawn(WebhookWorker { client, config }.run(jobs));

        Ok(Notifier::Webhook { queue, report_wait })
    }

    /// Queues a notification for a freshly booked slot and reports how the
    /// first delivery attempt went.
    pub async fn appointment_booked(&self, slot: &Slot) -> WebhookStatus {
        let (queue, report_wait) = match self {
            Notifier::Disabled => {
                warn!("WEBHOOK_URL is not configured. Skipping webhook.");
                return WebhookStatus::Skipped;
            }
            Notifier::Webhook { queue, report_wait } => (queue, *report_wait),
        };

        let (report, outcome) = oneshot::channel();
        let job = DeliveryJob {
            event: BookingEvent::appointment_booked(slot.clone()),
            report: Some(report),
        };

        if let Err(e) = queue.try_send(job) {
            error!("Could not queue webhook for slot {}: {}", slot.id, e);
            return WebhookStatus::failed("notification queue unavailable");
        }

        match tokio::time::timeout(report_wait, outcome).await {
            Ok(Ok(status)) => status,
            Ok(Err(_)) => WebhookStatus::failed("notification worker stopped"),
            Err(_) => {
                warn!("Webhook for slot {} did not report in time", slot.id);
                WebhookStatus::failed("timed out")
            }
        }
    }
}

#[derive(Clone)]
struct WebhookWorker {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookWorker {
    /// Makes each job's first attempt in queue order. Retries run on their
    /// own task so a failing sink never delays the next booking's attempt.
    async fn run(self, mut jobs: mpsc::Receiver<DeliveryJob>) {
        while let Some(job) = jobs.recv().await {
            let DeliveryJob { event, report } = job;
            let slot_id = event.appointment.id.clone();

            let status = self.attempt(&event).await;
            if let Some(report) = report {
                // Receiver is gone if the handler already timed out.
                let _ = report.send(status.clone());
            }

            match status {
                WebhookStatus::Success => {
                    info!("Webhook sent successfully for slot {}", slot_id);
                }
                WebhookStatus::Failed(reason) => {
                    self.log_failure(&slot_id, 0, &reason);
                    if self.config.max_retries > 0 {
                        tokio::spawn(self.clone().retry(event));
                    } else {
                        warn!("Giving up on webhook for slot {}", slot_id);
                    }
                }
                WebhookStatus::Skipped => {}
            }
        }
        info!("Webhook worker stopped");
    }

    /// Up to `max_retries` further attempts with linear backoff.
    async fn retry(self, event: BookingEvent) {
        let slot_id = &event.appointment.id;

        for attempt in 1..=self.config.max_retries {
            tokio::time::sleep(self.config.retry_backoff * attempt).await;

            match self.attempt(&event).await {
                WebhookStatus::Failed(reason) => self.log_failure(slot_id, attempt, &reason),
                _ => {
                    info!("Webhook sent successfully for slot {} on retry {}", slot_id, attempt);
                    return;
                }
            }
        }

        warn!("Giving up on webhook for slot {}", slot_id);
    }

    fn log_failure(&self, slot_id: &str, attempt: u32, reason: &str) {
        error!(
            "Failed to send webhook for slot {} (attempt {}/{}): {}",
            slot_id,
            attempt + 1,
            self.config.max_retries + 1,
            reason
        );
    }

    async fn attempt(&self, event: &BookingEvent) -> WebhookStatus {
        match self.client.post(&self.config.url).json(event).send().await {
            Ok(response) if response.status().is_success() => WebhookStatus::Success,
            Ok(response) => {
                let status = response.status();
                let reason = match status.canonical_reason() {
                    Some(text) => format!("{} {}", status.as_u16(), text),
                    None => status.as_u16().to_string(),
                };
                WebhookStatus::failed(reason)
            }
            Err(e) if e.is_timeout() => WebhookStatus::failed("timed out"),
            Err(e) => WebhookStatus::failed(e.to_string()),
        }
    }
}
