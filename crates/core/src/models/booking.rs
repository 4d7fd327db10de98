use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::slot::Slot;

/// Event name sent to the notification sink for a new booking.
pub const APPOINTMENT_BOOKED_EVENT: &str = "appointmentBooked";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSlotRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotResponse {
    pub appointment: Slot,
    pub webhook_status: WebhookStatus,
}

/// Body posted to the notification sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEvent {
    pub event_type: String,
    pub appointment: Slot,
}

impl BookingEvent {
    pub fn appointment_booked(appointment: Slot) -> Self {
        Self {
            event_type: APPOINTMENT_BOOKED_EVENT.to_string(),
            appointment,
        }
    }
}

/// Advisory outcome of the booking notification.
///
/// On the wire this is a plain string: `skipped`, `success`, or
/// `failed: <reason>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookStatus {
    Skipped,
    Success,
    Failed(String),
}

impl WebhookStatus {
    pub fn failed(reason: impl Into<String>) -> Self {
        WebhookStatus::Failed(reason.into())
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookStatus::Skipped => f.write_str("skipped"),
            WebhookStatus::Success => f.write_str("success"),
            WebhookStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

impl From<&str> for WebhookStatus {
    fn from(s: &str) -> Self {
        match s {
            "skipped" => WebhookStatus::Skipped,
            "success" => WebhookStatus::Success,
            other => WebhookStatus::Failed(
                other
                    .strip_prefix("failed: ")
                    .unwrap_or(other)
                    .to_string(),
            ),
        }
    }
}

impl Serialize for WebhookStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WebhookStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(WebhookStatus::from(raw.as_str()))
    }
}
