//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Registration idempotency is pushed into the store: the insert carries
//! `ON CONFLICT (email) DO NOTHING`, so a duplicate email is a single round
//! trip returning no id rather than a find-then-insert pair.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{AccountStatus, NewRegistration, User, UserRole};

use super::diesel_helpers::{StoreFailure, classify};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify(error) {
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        // No unique index is written through this adapter's update paths;
        // a violation here is an unexpected query failure.
        StoreFailure::UniqueViolation => UserRepositoryError::query("unique constraint violated"),
        StoreFailure::Query(message) => UserRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<Uuid>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: Uuid::new_v4(),
            email: registration.email,
            name: registration.name,
            photo_url: registration.photo_url,
            blood_group: registration.blood_group,
            district: registration.district,
            upazilla: registration.upazilla,
            role: UserRole::USER.to_owned(),
            status: AccountStatus::ACTIVE.to_owned(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::email)
            .do_nothing()
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(User::from))
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(users::table.filter(users::id.eq(id)))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(users::table.filter(users::id.eq(id)))
            .set(users::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }
}
