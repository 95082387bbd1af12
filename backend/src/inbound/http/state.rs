//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! domain ports and stay testable without I/O: tests swap in mock or
//! in-memory port implementations.

use std::sync::Arc;

use crate::domain::SlotOrdering;
use crate::domain::ports::{
    BookingRepository, ReservationCommand, TestCatalogRepository, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User account store.
    pub users: Arc<dyn UserRepository>,
    /// Diagnostic test catalog store.
    pub catalog: Arc<dyn TestCatalogRepository>,
    /// Booking ledger store.
    pub bookings: Arc<dyn BookingRepository>,
    /// The reservation engine driving port.
    pub reservation: Arc<dyn ReservationCommand>,
    /// Configured sort direction for the featured-tests listing.
    pub featured_order: SlotOrdering,
}
