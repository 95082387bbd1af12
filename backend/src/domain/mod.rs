//! Domain types, ports, and the reservation engine.
//!
//! Everything in this module is transport and store agnostic. Inbound
//! adapters (HTTP) and outbound adapters (PostgreSQL) depend on these types;
//! nothing here depends on them.

pub mod booking;
pub mod error;
pub mod lab_test;
pub mod ports;
pub mod reservation;
pub mod user;

pub use self::booking::{Booking, BookingDraft, BookingStatus, BookingSummary};
pub use self::error::{Error, ErrorCode};
pub use self::lab_test::{InvalidSlotOrdering, LabTest, LabTestDraft, SlotOrdering};
pub use self::reservation::ReservationService;
pub use self::user::{AccountStatus, NewRegistration, User, UserRole};


/// Convenient result alias for fallible domain operations.
///
/// # Examples
/// ```
/// use diagnostics_backend::domain::{ApiResult, Error};
///
/// fn refuse() -> ApiResult<()> {
///     Err(Error::service_unavailable("no slots"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
