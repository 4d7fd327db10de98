use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// Booking state of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Booked,
    Blocked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Free => "free",
            SlotStatus::Booked => "booked",
            SlotStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SlotStatus::Free),
            "booked" => Ok(SlotStatus::Booked),
            "blocked" => Ok(SlotStatus::Blocked),
            other => Err(BookingError::Validation(format!(
                "Unknown slot status: {}",
                other
            ))),
        }
    }
}

/// Contact details attached to a booked slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

impl Customer {
    /// Builds a customer from raw request fields.
    ///
    /// Both fields must be present and contain something other than
    /// whitespace. Values are stored as submitted.
    pub fn new(name: Option<String>, email: Option<String>) -> BookingResult<Self> {
        match (name, email) {
            (Some(name), Some(email)) if !name.trim().is_empty() && !email.trim().is_empty() => {
                Ok(Self { name, email })
            }
            _ => Err(BookingError::missing_customer_fields()),
        }
    }
}

/// One bookable hour.
///
/// `customer_name` and `customer_email` are populated exactly when
/// `status` is [`SlotStatus::Booked`]; the transition methods below are the
/// only place that changes status, and they keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Formats the canonical slot id, e.g. `2025-01-06-13`.
pub fn slot_id(date: NaiveDate, hour: u32) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), hour)
}

impl Slot {
    pub fn free(date: NaiveDate, hour: u32) -> Self {
        Self {
            id: slot_id(date, hour),
            date,
            time: format!("{}:00", hour),
            status: SlotStatus::Free,
            customer_name: None,
            customer_email: None,
        }
    }

    /// Hour of day parsed back out of `time`.
    pub fn hour(&self) -> Option<u32> {
        self.time.split(':').next()?.parse().ok()
    }

    pub fn is_free(&self) -> bool {
        self.status == SlotStatus::Free
    }

    /// `free -> booked`. Any other starting status is a conflict and leaves
    /// the slot untouched.
    pub fn book(&mut self, customer: Customer) -> BookingResult<()> {
        if !self.is_free() {
            return Err(BookingError::slot_unavailable());
        }
        self.status = SlotStatus::Booked;
        self.customer_name = Some(customer.name);
        self.customer_email = Some(customer.email);
        Ok(())
    }

    /// Admin cycle: `free -> blocked`, `blocked -> free`, `booked -> free`.
    pub fn toggle(&mut self) -> SlotStatus {
        self.status = match self.status {
            SlotStatus::Free => SlotStatus::Blocked,
            SlotStatus::Blocked | SlotStatus::Booked => SlotStatus::Free,
        };
        self.customer_name = None;
        self.customer_email = None;
        self.status
    }

    /// Whether the customer fields agree with the status.
    pub fn is_consistent(&self) -> bool {
        let has_customer = self.customer_name.is_some() && self.customer_email.is_some();
        let has_any = self.customer_name.is_some() || self.customer_email.is_some();
        match self.status {
            SlotStatus::Booked => has_customer,
            SlotStatus::Free | SlotStatus::Blocked => !has_any,
        }
    }
}
