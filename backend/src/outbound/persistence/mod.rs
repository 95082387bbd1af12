//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters translating between Diesel rows and domain types; no
//! business logic lives here. Diesel row structs (`models`) and the table
//! definitions (`schema`) are internal implementation details, never exposed
//! to the domain layer. Connections come from one `bb8` pool with native
//! async support through `diesel-async`, and every Diesel failure is mapped
//! onto the port error enums.

pub(crate) mod diesel_helpers;
mod diesel_booking_repository;
mod diesel_catalog_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
