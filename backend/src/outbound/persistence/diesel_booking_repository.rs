//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! The unique index on (`test_id`, `email`) turns the reservation engine's
//! duplicate race into a constraint violation, mapped here to the port's
//! `Duplicate` variant.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{Booking, BookingDraft, BookingStatus, BookingSummary};

use super::diesel_helpers::{StoreFailure, classify};
use super::models::{BookingRow, BookingSummaryRow, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BookingRepositoryError::connection(message)
        }
    }
}

/// Map a Diesel error, attributing unique violations to the given
/// (test, email) pair.
fn map_write_error(
    error: diesel::result::Error,
    test_id: Uuid,
    email: &str,
) -> BookingRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => BookingRepositoryError::connection(message),
        StoreFailure::UniqueViolation => BookingRepositoryError::duplicate(test_id, email),
        StoreFailure::Query(message) => BookingRepositoryError::query(message),
    }
}

fn map_read_error(error: diesel::result::Error) -> BookingRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => BookingRepositoryError::connection(message),
        StoreFailure::UniqueViolation => BookingRepositoryError::query("unique constraint violated"),
        StoreFailure::Query(message) => BookingRepositoryError::query(message),
    }
}

fn row_from_draft(id: Uuid, draft: BookingDraft, status: BookingStatus) -> NewBookingRow {
    NewBookingRow {
        id,
        test_id: draft.test_id,
        email: draft.email,
        title: draft.title,
        date: draft.date,
        reporting_date: draft.reporting_date,
        status: status.as_str().to_owned(),
        detail: draft.detail,
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, draft: BookingDraft) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let test_id = draft.test_id;
        let email = draft.email.clone();
        let row: BookingRow = diesel::insert_into(bookings::table)
            .values(row_from_draft(Uuid::new_v4(), draft, BookingStatus::pending()))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, test_id, &email))?;

        Ok(row.into())
    }

    async fn find_by_test_and_email(
        &self,
        test_id: Uuid,
        email: &str,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BookingRow> = bookings::table
            .filter(bookings::test_id.eq(test_id))
            .filter(bookings::email.eq(email))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        Ok(row.map(Booking::from))
    }

    async fn list(&self) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .select(BookingRow::as_select())
            .order(bookings::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_for_user(
        &self,
        email: &str,
        future_only: bool,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = bookings::table
            .filter(bookings::email.eq(email))
            .filter(bookings::status.ne(BookingStatus::DELIVERED))
            .select(BookingRow::as_select())
            .order(bookings::date.asc())
            .into_boxed();
        if future_only {
            query = query.filter(bookings::date.ge(Utc::now().date_naive()));
        }

        let rows: Vec<BookingRow> = query.load(&mut conn).await.map_err(map_read_error)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn search<'a>(
        &self,
        term: Option<&'a str>,
    ) -> Result<Vec<BookingSummary>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = bookings::table
            .select(BookingSummaryRow::as_select())
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .into_boxed();
        if let Some(term) = term {
            let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
            query = query.filter(
                bookings::title
                    .ilike(pattern.clone())
                    .or(bookings::email.ilike(pattern)),
            );
        }

        let rows: Vec<BookingSummaryRow> = query.load(&mut conn).await.map_err(map_read_error)?;
        Ok(rows.into_iter().map(BookingSummary::from).collect())
    }

    async fn upsert(
        &self,
        id: Uuid,
        draft: BookingDraft,
        status: BookingStatus,
    ) -> Result<u64, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let test_id = draft.test_id;
        let email = draft.email.clone();
        let row = row_from_draft(id, draft, status);
        let affected = diesel::insert_into(bookings::table)
            .values(&row)
            .on_conflict(bookings::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, test_id, &email))?;

        Ok(affected as u64)
    }

    async fn set_status(
        &self,
        id: Uuid,
        email: &str,
        status: BookingStatus,
    ) -> Result<u64, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Scoping by both id and email keeps one user from flipping another
        // user's booking by guessing an id.
        let affected = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id))
                .filter(bookings::email.eq(email)),
        )
        .set(bookings::status.eq(status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_read_error)?;

        Ok(affected as u64)
    }

    async fn results_for_user(
        &self,
        email: &str,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::email.eq(email))
            .filter(bookings::status.ne(BookingStatus::PENDING))
            .select(BookingRow::as_select())
            .order(bookings::reporting_date.desc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
