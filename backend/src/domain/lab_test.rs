//! Diagnostic test catalog model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A diagnostic test offered by the lab.
///
/// `slots` is the remaining booking capacity. It only ever decreases through
/// the reservation engine's conditional decrement, which refuses to take it
/// below zero; the administrative upsert path may overwrite it wholesale,
/// which races with concurrent bookings and is accepted as an admin-only
/// correction path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabTest {
    /// Stable identifier, referenced by bookings.
    pub id: Uuid,
    /// Test title shown to users and copied onto bookings for search.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Illustration reference.
    pub image_url: Option<String>,
    /// Scheduled date; listings can be restricted to upcoming dates.
    pub date: NaiveDate,
    /// Remaining booking capacity; never negative.
    pub slots: u32,
    /// Price in the platform currency.
    pub price: Option<f64>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LabTestDraft {
    /// Test title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Illustration reference.
    pub image_url: Option<String>,
    /// Scheduled date.
    pub date: NaiveDate,
    /// Booking capacity.
    pub slots: u32,
    /// Price in the platform currency.
    pub price: Option<f64>,
}

/// Sort direction for the featured-tests listing.
///
/// Whether featured tests should surface the fullest or the emptiest tests
/// first is a product decision that has flip-flopped, so the direction is
/// configuration rather than a hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotOrdering {
    /// Fewest remaining slots first: surfaces tests about to fill up.
    #[default]
    FewestFirst,
    /// Most remaining slots first: surfaces tests with the widest choice.
    MostFirst,
}

impl std::str::FromStr for SlotOrdering {
    type Err = InvalidSlotOrdering;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fewest" | "asc" => Ok(Self::FewestFirst),
            "most" | "desc" => Ok(Self::MostFirst),
            other => Err(InvalidSlotOrdering {
                value: other.to_owned(),
            }),
        }
    }
}

/// Error produced when parsing an unknown featured-sort value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slot ordering {value:?}, expected \"fewest\" or \"most\"")]
pub struct InvalidSlotOrdering {
    /// The rejected input.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fewest", SlotOrdering::FewestFirst)]
    #[case("asc", SlotOrdering::FewestFirst)]
    #[case("most", SlotOrdering::MostFirst)]
    #[case("desc", SlotOrdering::MostFirst)]
    fn slot_ordering_parses_known_values(#[case] input: &str, #[case] expected: SlotOrdering) {
        assert_eq!(input.parse::<SlotOrdering>(), Ok(expected));
    }

    #[test]
    fn slot_ordering_rejects_unknown_values() {
        let err = "sideways".parse::<SlotOrdering>().expect_err("rejected");
        assert_eq!(err.value, "sideways");
    }
}
