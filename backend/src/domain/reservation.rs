//! The reservation engine.
//!
//! Booking creation is the one flow in the system with a real invariant: a
//! test's capacity must never be oversold. The engine runs three steps:
//!
//! 1. duplicate pre-check against the ledger,
//! 2. atomic conditional decrement against the catalog,
//! 3. commit of the booking record.
//!
//! Steps 2 and 3 are separate store round trips: if the commit fails after
//! the decrement succeeded, the slot is lost. That gap is logged loudly
//! rather than silently compensated. The
//! duplicate race between steps 1 and 3 is closed by the ledger's
//! storage-level uniqueness constraint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::booking::{Booking, BookingDraft};
use super::error::Error;
use super::ports::{
    BookingRepository, BookingRepositoryError, ReservationCommand, TestCatalogRepository,
};

/// Orchestrates booking creation over the catalog and ledger ports.
#[derive(Clone)]
pub struct ReservationService<C, B> {
    catalog: Arc<C>,
    ledger: Arc<B>,
}

impl<C, B> ReservationService<C, B> {
    /// Create a new engine over the given adapters.
    pub fn new(catalog: Arc<C>, ledger: Arc<B>) -> Self {
        Self { catalog, ledger }
    }
}

impl<C, B> ReservationService<C, B>
where
    C: TestCatalogRepository,
    B: BookingRepository,
{
    /// Reserve one slot and commit the booking.
    ///
    /// # Errors
    ///
    /// - [`Error::conflict`] when a booking for the (test, email) pair
    ///   already exists, whether caught by the pre-check or by the
    ///   constraint on commit.
    /// - [`Error::service_unavailable`] when the test is unknown or its
    ///   capacity is exhausted; callers may retry once slots free up.
    /// - Store failures propagate as 5xx-class errors.
    pub async fn reserve(&self, draft: BookingDraft) -> Result<Booking, Error> {
        let existing = self
            .ledger
            .find_by_test_and_email(draft.test_id, &draft.email)
            .await?;
        if existing.is_some() {
            debug!(test_id = %draft.test_id, email = %draft.email, "duplicate booking rejected");
            return Err(Error::conflict(
                "booking already exists for this test and email",
            ));
        }

        let Some(test) = self.catalog.decrement_slot(draft.test_id).await? else {
            warn!(test_id = %draft.test_id, "no slot available, booking refused");
            return Err(Error::service_unavailable(
                "no slots available for this test",
            ));
        };
        debug!(test_id = %test.id, slots_left = test.slots, "slot reserved");

        match self.ledger.insert(draft).await {
            Ok(booking) => Ok(booking),
            Err(err @ BookingRepositoryError::Duplicate { .. }) => {
                // The pre-check raced a concurrent identical request; the
                // constraint caught it, but the decrement already landed.
                error!(
                    test_id = %test.id,
                    error = %err,
                    "duplicate caught on commit after slot decrement; slot not restored"
                );
                Err(err.into())
            }
            Err(err) => {
                error!(
                    test_id = %test.id,
                    error = %err,
                    "booking commit failed after slot decrement; slot not restored"
                );
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl<C, B> ReservationCommand for ReservationService<C, B>
where
    C: TestCatalogRepository,
    B: BookingRepository,
{
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error> {
        self.reserve(draft).await
    }
}
