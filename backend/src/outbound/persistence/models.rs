//! Diesel row structs and their domain conversions.
//!
//! These models are internal to the persistence layer; repositories convert
//! them to and from domain types at the adapter boundary.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    AccountStatus, Booking, BookingStatus, BookingSummary, LabTest, User, UserRole,
};

use super::schema::{bookings, lab_tests, users};

/// Queryable user account row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazilla: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            photo_url: row.photo_url,
            blood_group: row.blood_group,
            district: row.district,
            upazilla: row.upazilla,
            role: UserRole::new(row.role),
            status: AccountStatus::new(row.status),
            created_at: row.created_at,
        }
    }
}

/// Insertable user account row. Role and status are filled by the adapter,
/// not the client.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazilla: Option<String>,
    pub role: String,
    pub status: String,
}

/// Queryable catalog test row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lab_tests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LabTestRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub slots: i32,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<LabTestRow> for LabTest {
    fn from(row: LabTestRow) -> Self {
        #[expect(
            clippy::cast_sign_loss,
            reason = "slots carries a CHECK (slots >= 0) constraint"
        )]
        let slots = row.slots as u32;
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            date: row.date,
            slots,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

/// Insertable catalog test row, also used as the upsert value set.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = lab_tests)]
pub struct NewLabTestRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub slots: i32,
    pub price: Option<f64>,
}

/// Queryable booking row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    pub id: Uuid,
    pub test_id: Uuid,
    pub email: String,
    pub title: String,
    pub date: NaiveDate,
    pub reporting_date: Option<NaiveDate>,
    pub status: String,
    pub detail: Value,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            test_id: row.test_id,
            email: row.email,
            title: row.title,
            date: row.date,
            reporting_date: row.reporting_date,
            status: BookingStatus::new(row.status),
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

/// Insertable booking row, also used as the upsert value set.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub id: Uuid,
    pub test_id: Uuid,
    pub email: String,
    pub title: String,
    pub date: NaiveDate,
    pub reporting_date: Option<NaiveDate>,
    pub status: String,
    pub detail: Value,
}

/// Column-projected booking row for the administrative search.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingSummaryRow {
    pub id: Uuid,
    pub test_id: Uuid,
    pub email: String,
    pub title: String,
    pub date: NaiveDate,
    pub reporting_date: Option<NaiveDate>,
    pub status: String,
}

impl From<BookingSummaryRow> for BookingSummary {
    fn from(row: BookingSummaryRow) -> Self {
        Self {
            id: row.id,
            test_id: row.test_id,
            email: row.email,
            title: row.title,
            date: row.date,
            reporting_date: row.reporting_date,
            status: BookingStatus::new(row.status),
        }
    }
}

/// Cast domain slot counts (u32) to the database representation (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "slot counts are small positive integers in practice"
)]
pub fn slots_for_db(slots: u32) -> i32 {
    slots as i32
}
