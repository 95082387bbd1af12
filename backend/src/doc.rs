//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (users, tests,
//!   bookings, health)
//! - **Schemas**: Domain types and request/acknowledgement bodies exposed on
//!   the wire
//!
//! The generated specification is consumed by external tooling; no UI is
//! served by the backend itself.

use utoipa::OpenApi;

use crate::domain::{
    AccountStatus, Booking, BookingStatus, BookingSummary, Error, ErrorCode, LabTest, User,
    UserRole,
};
use crate::inbound::http::acks::{DeleteAck, RegisterAck, UpdateAck};
use crate::inbound::http::bookings::{BookingRequest, BookingStatusBody, UpsertBookingRequest};
use crate::inbound::http::catalog::LabTestBody;
use crate::inbound::http::users::{AdminFlag, BlockedFlag, RegisterRequest, RoleBody, StatusBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Diagnostics booking backend API",
        description = "HTTP interface for user accounts, the lab test catalog, and slot-limited bookings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::admin_flag,
        crate::inbound::http::users::blocked_flag,
        crate::inbound::http::users::set_role,
        crate::inbound::http::users::set_status,
        crate::inbound::http::catalog::create_test,
        crate::inbound::http::catalog::upsert_test,
        crate::inbound::http::catalog::list_tests,
        crate::inbound::http::catalog::featured_tests,
        crate::inbound::http::catalog::get_test,
        crate::inbound::http::catalog::delete_test,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::user_bookings,
        crate::inbound::http::bookings::search_reservations,
        crate::inbound::http::bookings::upsert_reservation,
        crate::inbound::http::bookings::set_booking_status,
        crate::inbound::http::bookings::test_results,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserRole,
        AccountStatus,
        LabTest,
        Booking,
        BookingStatus,
        BookingSummary,
        RegisterRequest,
        RoleBody,
        StatusBody,
        AdminFlag,
        BlockedFlag,
        LabTestBody,
        BookingRequest,
        UpsertBookingRequest,
        BookingStatusBody,
        UpdateAck,
        DeleteAck,
        RegisterAck,
    )),
    tags(
        (name = "users", description = "Account registration, listing, and role flags"),
        (name = "catalog", description = "Lab test catalog management"),
        (name = "bookings", description = "Slot-limited reservations and results"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_lab_test_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let lab_test_schema = schemas.get("LabTest").expect("LabTest schema");

        assert_object_schema_has_field(lab_test_schema, "imageUrl");
        assert_object_schema_has_field(lab_test_schema, "slots");
    }

    #[test]
    fn openapi_lists_every_booking_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/bookings"));
        assert!(paths.contains_key("/api/v1/bookings/{email}/{id}"));
        assert!(paths.contains_key("/api/v1/test-result/{email}"));
    }
}
