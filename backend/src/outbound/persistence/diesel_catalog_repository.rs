//! PostgreSQL-backed `TestCatalogRepository` implementation using Diesel ORM.
//!
//! The slot decrement is one conditional `UPDATE … WHERE slots >= 1
//! RETURNING *` statement: the store serialises concurrent bookings against
//! the same test, so `slots` cannot go negative no matter how many requests
//! race. No application-level locking is involved.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CatalogRepositoryError, TestCatalogRepository};
use crate::domain::{LabTest, LabTestDraft, SlotOrdering};

use super::diesel_helpers::{StoreFailure, classify};
use super::models::{LabTestRow, NewLabTestRow, slots_for_db};
use super::pool::{DbPool, PoolError};
use super::schema::lab_tests;

/// Diesel-backed implementation of the `TestCatalogRepository` port.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CatalogRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => CatalogRepositoryError::connection(message),
        StoreFailure::UniqueViolation => {
            CatalogRepositoryError::query("unique constraint violated")
        }
        StoreFailure::Query(message) => CatalogRepositoryError::query(message),
    }
}

fn row_from_draft(id: Uuid, draft: LabTestDraft) -> NewLabTestRow {
    NewLabTestRow {
        id,
        title: draft.title,
        description: draft.description,
        image_url: draft.image_url,
        date: draft.date,
        slots: slots_for_db(draft.slots),
        price: draft.price,
    }
}

#[async_trait]
impl TestCatalogRepository for DieselCatalogRepository {
    async fn create(&self, draft: LabTestDraft) -> Result<LabTest, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: LabTestRow = diesel::insert_into(lab_tests::table)
            .values(row_from_draft(Uuid::new_v4(), draft))
            .returning(LabTestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.into())
    }

    async fn upsert(&self, id: Uuid, draft: LabTestDraft) -> Result<u64, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Full-record replace: administrative correction may overwrite
        // `slots` concurrently with bookings. Accepted consistency gap on
        // this admin-only path.
        let row = row_from_draft(id, draft);
        let affected = diesel::insert_into(lab_tests::table)
            .values(&row)
            .on_conflict(lab_tests::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }

    async fn list(&self, upcoming_only: bool) -> Result<Vec<LabTest>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = lab_tests::table
            .select(LabTestRow::as_select())
            .order(lab_tests::date.asc())
            .into_boxed();
        if upcoming_only {
            query = query.filter(lab_tests::date.ge(Utc::now().date_naive()));
        }

        let rows: Vec<LabTestRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(LabTest::from).collect())
    }

    async fn featured(
        &self,
        ordering: SlotOrdering,
        limit: i64,
    ) -> Result<Vec<LabTest>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let query = lab_tests::table
            .select(LabTestRow::as_select())
            .filter(lab_tests::date.ge(Utc::now().date_naive()))
            .limit(limit)
            .into_boxed();
        let rows: Vec<LabTestRow> = match ordering {
            SlotOrdering::FewestFirst => query.order(lab_tests::slots.asc()),
            SlotOrdering::MostFirst => query.order(lab_tests::slots.desc()),
        }
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(LabTest::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<LabTest>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LabTestRow> = lab_tests::table
            .filter(lab_tests::id.eq(id))
            .select(LabTestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(LabTest::from))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(lab_tests::table.filter(lab_tests::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }

    async fn decrement_slot(&self, id: Uuid) -> Result<Option<LabTest>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Condition and decrement in one statement; no row means the test is
        // unknown or its capacity is exhausted.
        let row: Option<LabTestRow> = diesel::update(
            lab_tests::table
                .filter(lab_tests::id.eq(id))
                .filter(lab_tests::slots.ge(1)),
        )
        .set(lab_tests::slots.eq(lab_tests::slots - 1))
        .returning(LabTestRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(LabTest::from))
    }
}
