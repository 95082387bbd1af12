//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts. `email` carries a unique constraint and is
    /// the natural key for all lookups.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique registration email.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Avatar reference.
        photo_url -> Nullable<Varchar>,
        /// Blood group, free text.
        blood_group -> Nullable<Varchar>,
        /// Home district.
        district -> Nullable<Varchar>,
        /// Home upazilla.
        upazilla -> Nullable<Varchar>,
        /// Role flag; `user` on registration.
        role -> Varchar,
        /// Status flag; `active` on registration.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Diagnostic test catalog. `slots` carries a `CHECK (slots >= 0)`
    /// constraint backing the capacity invariant.
    lab_tests (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Test title.
        title -> Varchar,
        /// Longer description.
        description -> Nullable<Text>,
        /// Illustration reference.
        image_url -> Nullable<Varchar>,
        /// Scheduled date.
        date -> Date,
        /// Remaining booking capacity.
        slots -> Int4,
        /// Price in the platform currency.
        price -> Nullable<Float8>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Booking ledger. A unique index on (`test_id`, `email`) enforces at
    /// most one booking per user per test.
    bookings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The reserved catalog test.
        test_id -> Uuid,
        /// Requester email.
        email -> Varchar,
        /// Test title denormalised for the admin search.
        title -> Varchar,
        /// Appointment date.
        date -> Date,
        /// Expected or actual reporting date.
        reporting_date -> Nullable<Date>,
        /// Lifecycle status; `pending` on creation.
        status -> Varchar,
        /// Free-form request fields.
        detail -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, lab_tests, bookings);
