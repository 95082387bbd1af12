//! Booking ledger model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Booking lifecycle status.
///
/// `pending` and `delivered` are the states the platform acts on; the status
/// PATCH path accepts any string, so this is a newtype rather than a closed
/// enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BookingStatus(String);

impl BookingStatus {
    /// Initial status of every booking created by the reservation engine.
    pub const PENDING: &'static str = "pending";
    /// Status set once a result has been delivered.
    pub const DELIVERED: &'static str = "delivered";

    /// Wrap an arbitrary status string; no value is rejected.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The initial `pending` status.
    pub fn pending() -> Self {
        Self(Self::PENDING.to_owned())
    }

    /// The `delivered` status.
    pub fn delivered() -> Self {
        Self(Self::DELIVERED.to_owned())
    }

    /// Whether the booking still awaits its result.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0 == Self::PENDING
    }

    /// Borrow the underlying status string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::pending()
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed booking: one consumed slot of a catalog test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Stable identifier.
    pub id: Uuid,
    /// The catalog test this booking reserved a slot on.
    pub test_id: Uuid,
    /// Requester email; together with `test_id` this is unique.
    pub email: String,
    /// Test title copied from the request at booking time, kept
    /// denormalised so the admin search can match on it.
    pub title: String,
    /// Appointment date.
    pub date: NaiveDate,
    /// Date the result is expected or was reported.
    pub reporting_date: Option<NaiveDate>,
    /// Lifecycle status, `pending` on creation.
    pub status: BookingStatus,
    /// Free-form fields copied verbatim from the booking request.
    pub detail: Value,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a booking.
///
/// The status is absent on purpose: the reservation engine always commits
/// with `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    /// The catalog test to reserve a slot on.
    pub test_id: Uuid,
    /// Requester email.
    pub email: String,
    /// Test title as submitted.
    pub title: String,
    /// Appointment date.
    pub date: NaiveDate,
    /// Expected reporting date.
    pub reporting_date: Option<NaiveDate>,
    /// Free-form fields copied from the request.
    pub detail: Value,
}

/// Column-projected booking row for the administrative reservations view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// Booking identifier.
    pub id: Uuid,
    /// The reserved catalog test.
    pub test_id: Uuid,
    /// Requester email.
    pub email: String,
    /// Denormalised test title.
    pub title: String,
    /// Appointment date.
    pub date: NaiveDate,
    /// Expected reporting date.
    pub reporting_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert!(BookingStatus::default().is_pending());
    }

    #[test]
    fn arbitrary_status_strings_are_accepted() {
        let status = BookingStatus::new("cancelled");
        assert!(!status.is_pending());
        assert_eq!(status.as_str(), "cancelled");
    }
}
