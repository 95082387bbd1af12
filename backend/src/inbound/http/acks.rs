//! Store acknowledgement payloads.
//!
//! Existing clients consume document-store style write acknowledgements
//! (`matchedCount`, `modifiedCount`, `deletedCount`, `insertedId`); these
//! structs keep that wire contract stable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Acknowledgement for update and upsert operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    /// Rows matched by the update filter.
    pub matched_count: u64,
    /// Rows actually modified.
    pub modified_count: u64,
}

impl UpdateAck {
    /// Build an acknowledgement from an affected-row count. Relational
    /// updates report one count, so matched and modified coincide.
    #[must_use]
    pub fn from_affected(affected: u64) -> Self {
        Self {
            matched_count: affected,
            modified_count: affected,
        }
    }
}

/// Acknowledgement for delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    /// Rows removed.
    pub deleted_count: u64,
}

/// Acknowledgement for the idempotent registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAck {
    /// Human-readable outcome.
    pub message: String,
    /// The new record id, or `null` when the email was already registered.
    pub inserted_id: Option<Uuid>,
}
