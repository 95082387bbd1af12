//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning opaque results.
//!
//! The one operation with a hard atomicity requirement is
//! [`TestCatalogRepository::decrement_slot`]: it must be a single
//! compare-and-decrement round trip against the store, never a read
//! followed by a write.

use async_trait::async_trait;
use thiserror::Error as ThisError;
use uuid::Uuid;

use super::booking::{Booking, BookingDraft, BookingStatus, BookingSummary};
use super::error::Error;
use super::lab_test::{LabTest, LabTestDraft, SlotOrdering};
use super::user::{AccountStatus, NewRegistration, User, UserRole};

/// Errors surfaced by the user store adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum UserRepositoryError {
    /// Store connectivity failures.
    #[error("user store connection failed: {message}")]
    Connection {
        /// Adapter-supplied description.
        message: String,
    },
    /// Query construction or execution failures.
    #[error("user store query failed: {message}")]
    Query {
        /// Adapter-supplied description.
        message: String,
    },
}

impl UserRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the catalog store adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CatalogRepositoryError {
    /// Store connectivity failures.
    #[error("catalog store connection failed: {message}")]
    Connection {
        /// Adapter-supplied description.
        message: String,
    },
    /// Query construction or execution failures.
    #[error("catalog store query failed: {message}")]
    Query {
        /// Adapter-supplied description.
        message: String,
    },
}

impl CatalogRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the booking ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum BookingRepositoryError {
    /// Store connectivity failures.
    #[error("booking ledger connection failed: {message}")]
    Connection {
        /// Adapter-supplied description.
        message: String,
    },
    /// Query construction or execution failures.
    #[error("booking ledger query failed: {message}")]
    Query {
        /// Adapter-supplied description.
        message: String,
    },
    /// The (test, email) pair already holds a booking. Raised by the
    /// storage-level uniqueness constraint, which closes the
    /// check-then-insert race.
    #[error("booking already exists for test {test_id} and {email}")]
    Duplicate {
        /// The reserved catalog test.
        test_id: Uuid,
        /// Requester email.
        email: String,
    },
}

impl BookingRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn duplicate(test_id: Uuid, email: impl Into<String>) -> Self {
        Self::Duplicate {
            test_id,
            email: email.into(),
        }
    }
}

impl From<UserRepositoryError> for Error {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Self::internal(format!("user store error: {message}"))
            }
        }
    }
}

impl From<CatalogRepositoryError> for Error {
    fn from(err: CatalogRepositoryError) -> Self {
        match err {
            CatalogRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("catalog store unavailable: {message}"))
            }
            CatalogRepositoryError::Query { message } => {
                Self::internal(format!("catalog store error: {message}"))
            }
        }
    }
}

impl From<BookingRepositoryError> for Error {
    fn from(err: BookingRepositoryError) -> Self {
        match err {
            BookingRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("booking ledger unavailable: {message}"))
            }
            BookingRepositoryError::Query { message } => {
                Self::internal(format!("booking ledger error: {message}"))
            }
            BookingRepositoryError::Duplicate { test_id, email } => {
                Self::conflict("booking already exists for this test and email").with_details(
                    serde_json::json!({ "testId": test_id, "email": email }),
                )
            }
        }
    }
}

/// User account store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a user, or do nothing when the email is already taken.
    ///
    /// Returns the new record id, or `None` for a duplicate email. The
    /// duplicate case is a success with a signal, not an error.
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<Uuid>, UserRepositoryError>;

    /// List every registered user.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Look up a user by registration email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Overwrite a user's role. Returns the number of affected rows.
    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<u64, UserRepositoryError>;

    /// Overwrite a user's status. Returns the number of affected rows.
    async fn set_status(&self, id: Uuid, status: AccountStatus)
    -> Result<u64, UserRepositoryError>;
}

/// Diagnostic test catalog store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestCatalogRepository: Send + Sync {
    /// Create a catalog entry and return the stored record.
    async fn create(&self, draft: LabTestDraft) -> Result<LabTest, CatalogRepositoryError>;

    /// Insert or fully replace the catalog entry with the given id.
    /// Returns the number of affected rows.
    async fn upsert(&self, id: Uuid, draft: LabTestDraft) -> Result<u64, CatalogRepositoryError>;

    /// List catalog entries by date ascending, optionally restricted to
    /// dates from today onward.
    async fn list(&self, upcoming_only: bool) -> Result<Vec<LabTest>, CatalogRepositoryError>;

    /// The top `limit` upcoming entries ordered by remaining slots.
    async fn featured(
        &self,
        ordering: SlotOrdering,
        limit: i64,
    ) -> Result<Vec<LabTest>, CatalogRepositoryError>;

    /// Look up one catalog entry.
    async fn find(&self, id: Uuid) -> Result<Option<LabTest>, CatalogRepositoryError>;

    /// Delete a catalog entry. Returns the number of affected rows.
    async fn delete(&self, id: Uuid) -> Result<u64, CatalogRepositoryError>;

    /// Atomically decrement `slots` by one, provided at least one slot
    /// remains, and return the post-decrement record.
    ///
    /// `None` means either the test does not exist or its capacity is
    /// exhausted; the two cases are indistinguishable on purpose, mirroring
    /// the conditional-update contract the reservation engine relies on.
    /// Implementations must perform the condition and the decrement in one
    /// store round trip so `slots` can never go negative under concurrency.
    async fn decrement_slot(&self, id: Uuid) -> Result<Option<LabTest>, CatalogRepositoryError>;
}

/// Booking ledger store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking with `pending` status and return the stored record.
    ///
    /// Fails with [`BookingRepositoryError::Duplicate`] when the
    /// (test, email) pair already holds a booking.
    async fn insert(&self, draft: BookingDraft) -> Result<Booking, BookingRepositoryError>;

    /// Look up the booking for a (test, email) pair, if any.
    async fn find_by_test_and_email(
        &self,
        test_id: Uuid,
        email: &str,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// List the whole ledger.
    async fn list(&self) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// A user's bookings excluding delivered ones, date ascending,
    /// optionally restricted to dates from today onward.
    async fn list_for_user(
        &self,
        email: &str,
        future_only: bool,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Administrative search: case-insensitive substring match on title or
    /// email, projected columns, newest first (creation time descending,
    /// id as tiebreaker). `None` returns everything.
    async fn search<'a>(
        &self,
        term: Option<&'a str>,
    ) -> Result<Vec<BookingSummary>, BookingRepositoryError>;

    /// Insert or fully replace the booking with the given id, administrative
    /// correction path. Returns the number of affected rows.
    async fn upsert(
        &self,
        id: Uuid,
        draft: BookingDraft,
        status: BookingStatus,
    ) -> Result<u64, BookingRepositoryError>;

    /// Overwrite a booking's status, scoped by id **and** requester email so
    /// one user cannot flip another's booking by guessing an id. Returns the
    /// number of affected rows; a mismatched email affects zero.
    async fn set_status(
        &self,
        id: Uuid,
        email: &str,
        status: BookingStatus,
    ) -> Result<u64, BookingRepositoryError>;

    /// A user's non-pending bookings, reporting date descending.
    async fn results_for_user(&self, email: &str)
    -> Result<Vec<Booking>, BookingRepositoryError>;
}

/// Driving port for booking creation, implemented by the reservation engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationCommand: Send + Sync {
    /// Run the full reservation flow for one booking request.
    async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, Error>;
}
