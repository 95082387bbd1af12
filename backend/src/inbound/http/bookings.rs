//! Booking API handlers.
//!
//! ```text
//! POST  /api/v1/bookings               create (reservation engine)
//! GET   /api/v1/bookings               list the whole ledger
//! GET   /api/v1/bookings/{email}       a user's open bookings
//! GET   /api/v1/reservations           admin search, projected columns
//! PUT   /api/v1/reservations/{id}      administrative upsert
//! PATCH /api/v1/bookings/{email}/{id}  set status, scoped by both keys
//! GET   /api/v1/test-result/{email}    non-pending bookings, newest report first
//! ```
//!
//! `POST /bookings` is the only write that goes through the reservation
//! engine; everything else is ledger record access.

use actix_web::{get, patch, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Booking, BookingDraft, BookingStatus, BookingSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::acks::UpdateAck;
use crate::inbound::http::state::HttpState;

/// Booking request body.
///
/// `bookingId` names the catalog test to reserve; existing clients already
/// send that field name. Unknown fields are not rejected; they are copied
/// verbatim into the booking's `detail`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// The catalog test to reserve a slot on.
    pub booking_id: Uuid,
    /// Requester email.
    pub email: String,
    /// Test title as shown to the user.
    pub title: String,
    /// Appointment date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Expected reporting date.
    #[serde(default)]
    pub reporting_date: Option<NaiveDate>,
    /// Any remaining request fields, kept as submitted.
    #[serde(flatten)]
    pub detail: Value,
}

impl From<BookingRequest> for BookingDraft {
    fn from(value: BookingRequest) -> Self {
        Self {
            test_id: value.booking_id,
            email: value.email,
            title: value.title,
            date: value.date,
            reporting_date: value.reporting_date,
            detail: value.detail,
        }
    }
}

/// Administrative upsert body: a booking request plus an optional status.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBookingRequest {
    /// The catalog test the booking refers to.
    pub booking_id: Uuid,
    /// Requester email.
    pub email: String,
    /// Test title.
    pub title: String,
    /// Appointment date.
    pub date: NaiveDate,
    /// Expected reporting date.
    #[serde(default)]
    pub reporting_date: Option<NaiveDate>,
    /// Status to store; defaults to `pending` when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// Any remaining request fields.
    #[serde(flatten)]
    pub detail: Value,
}

/// Status overwrite body for `PATCH /bookings/{email}/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BookingStatusBody {
    /// New status value; any string is accepted.
    pub status: String,
}

/// Listing filter for `GET /api/v1/bookings/{email}`.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct UserBookingsQuery {
    /// When true, only bookings dated today or later are returned.
    #[serde(default)]
    pub future: bool,
}

/// Search filter for `GET /api/v1/reservations`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ReservationSearchQuery {
    /// Case-insensitive substring matched against title and email.
    #[serde(default)]
    pub search: Option<String>,
}

/// Create a booking through the reservation engine.
///
/// # Errors
///
/// - `409 Conflict` when a booking for the (test, email) pair exists.
/// - `503 Service Unavailable` when the test is unknown or out of slots;
///   the client may retry once capacity frees up.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Created booking", body = Booking),
        (status = 409, description = "Duplicate booking", body = crate::domain::Error),
        (status = 503, description = "Capacity exhausted", body = crate::domain::Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<BookingRequest>,
) -> ApiResult<web::Json<Booking>> {
    let draft = BookingDraft::from(payload.into_inner());
    let booking = state.reservation.create_booking(draft).await?;
    info!(booking_id = %booking.id, test_id = %booking.test_id, "booking created");
    Ok(web::Json(booking))
}

/// List the whole booking ledger.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses((status = 200, description = "All bookings", body = [Booking])),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Booking>>> {
    Ok(web::Json(state.bookings.list().await?))
}

/// A user's bookings excluding delivered ones, soonest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{email}",
    params(("email" = String, Path, description = "Requester email"), UserBookingsQuery),
    responses((status = 200, description = "Open bookings", body = [Booking])),
    tags = ["bookings"],
    operation_id = "userBookings"
)]
#[get("/bookings/{email}")]
pub async fn user_bookings(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<UserBookingsQuery>,
) -> ApiResult<web::Json<Vec<Booking>>> {
    let email = path.into_inner();
    let bookings = state.bookings.list_for_user(&email, query.future).await?;
    Ok(web::Json(bookings))
}

/// Administrative search across the ledger, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    params(ReservationSearchQuery),
    responses((status = 200, description = "Matching bookings", body = [BookingSummary])),
    tags = ["bookings"],
    operation_id = "searchReservations"
)]
#[get("/reservations")]
pub async fn search_reservations(
    state: web::Data<HttpState>,
    query: web::Query<ReservationSearchQuery>,
) -> ApiResult<web::Json<Vec<BookingSummary>>> {
    let term = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty());
    Ok(web::Json(state.bookings.search(term).await?))
}

/// Insert or fully replace a booking record.
///
/// Administrative correction path; it bypasses the reservation engine and
/// does not touch catalog capacity.
#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    request_body = UpsertBookingRequest,
    responses((status = 200, description = "Upsert acknowledgement", body = UpdateAck)),
    params(("id" = Uuid, Path, description = "Booking id")),
    tags = ["bookings"],
    operation_id = "upsertReservation"
)]
#[put("/reservations/{id}")]
pub async fn upsert_reservation(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpsertBookingRequest>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = path.into_inner();
    let body = payload.into_inner();
    let status = body
        .status
        .clone()
        .map_or_else(BookingStatus::pending, BookingStatus::new);
    let draft = BookingDraft {
        test_id: body.booking_id,
        email: body.email,
        title: body.title,
        date: body.date,
        reporting_date: body.reporting_date,
        detail: body.detail,
    };
    let affected = state.bookings.upsert(id, draft, status).await?;
    info!(booking_id = %id, "booking record replaced");
    Ok(web::Json(UpdateAck::from_affected(affected)))
}

/// Overwrite a booking's status.
///
/// Scoped by id **and** email: a mismatched email matches nothing and the
/// acknowledgement reports zero modified rows.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{email}/{id}",
    request_body = BookingStatusBody,
    responses((status = 200, description = "Update acknowledgement", body = UpdateAck)),
    params(
        ("email" = String, Path, description = "Requester email"),
        ("id" = Uuid, Path, description = "Booking id")
    ),
    tags = ["bookings"],
    operation_id = "setBookingStatus"
)]
#[patch("/bookings/{email}/{id}")]
pub async fn set_booking_status(
    state: web::Data<HttpState>,
    path: web::Path<(String, Uuid)>,
    payload: web::Json<BookingStatusBody>,
) -> ApiResult<web::Json<UpdateAck>> {
    let (email, id) = path.into_inner();
    let status = BookingStatus::new(payload.into_inner().status);
    info!(booking_id = %id, status = %status, "booking status overwrite");
    let affected = state.bookings.set_status(id, &email, status).await?;
    Ok(web::Json(UpdateAck::from_affected(affected)))
}

/// A user's non-pending bookings, most recent report first.
#[utoipa::path(
    get,
    path = "/api/v1/test-result/{email}",
    params(("email" = String, Path, description = "Requester email")),
    responses((status = 200, description = "Delivered or otherwise settled bookings", body = [Booking])),
    tags = ["bookings"],
    operation_id = "testResults"
)]
#[get("/test-result/{email}")]
pub async fn test_results(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Booking>>> {
    let email = path.into_inner();
    Ok(web::Json(state.bookings.results_for_user(&email).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockBookingRepository, MockReservationCommand, MockTestCatalogRepository,
        MockUserRepository,
    };
    use crate::domain::{Error, SlotOrdering};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state_with(
        bookings: MockBookingRepository,
        reservation: MockReservationCommand,
    ) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users: Arc::new(MockUserRepository::new()),
            catalog: Arc::new(MockTestCatalogRepository::new()),
            bookings: Arc::new(bookings),
            reservation: Arc::new(reservation),
            featured_order: SlotOrdering::default(),
        })
    }

    fn stored_booking(draft: &BookingDraft) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            test_id: draft.test_id,
            email: draft.email.clone(),
            title: draft.title.clone(),
            date: draft.date,
            reporting_date: draft.reporting_date,
            status: BookingStatus::pending(),
            detail: draft.detail.clone(),
            created_at: Utc::now(),
        }
    }

    async fn call(
        state: web::Data<HttpState>,
        req: actix_test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new().app_data(state).service(
                web::scope("/api/v1")
                    .service(create_booking)
                    .service(list_bookings)
                    .service(user_bookings)
                    .service(search_reservations)
                    .service(upsert_reservation)
                    .service(set_booking_status)
                    .service(test_results),
            ),
        )
        .await;
        actix_test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn create_booking_copies_extra_fields_into_detail() {
        let mut reservation = MockReservationCommand::new();
        reservation
            .expect_create_booking()
            .times(1)
            .withf(|draft| draft.detail.get("sampleSite").is_some())
            .returning(|draft| Ok(stored_booking(&draft)));

        let res = call(
            state_with(MockBookingRepository::new(), reservation),
            actix_test::TestRequest::post().uri("/api/v1/bookings").set_json(json!({
                "bookingId": Uuid::new_v4(),
                "email": "a@x.com",
                "title": "Complete Blood Count",
                "date": "2026-09-15",
                "sampleSite": "left arm"
            })),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["status"], "pending");
    }

    #[actix_web::test]
    async fn duplicate_booking_maps_to_conflict() {
        let mut reservation = MockReservationCommand::new();
        reservation
            .expect_create_booking()
            .times(1)
            .returning(|_| Err(Error::conflict("booking already exists for this test and email")));

        let res = call(
            state_with(MockBookingRepository::new(), reservation),
            actix_test::TestRequest::post().uri("/api/v1/bookings").set_json(json!({
                "bookingId": Uuid::new_v4(),
                "email": "a@x.com",
                "title": "Complete Blood Count",
                "date": "2026-09-15"
            })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn capacity_exhaustion_maps_to_service_unavailable() {
        let mut reservation = MockReservationCommand::new();
        reservation
            .expect_create_booking()
            .times(1)
            .returning(|_| Err(Error::service_unavailable("no slots available for this test")));

        let res = call(
            state_with(MockBookingRepository::new(), reservation),
            actix_test::TestRequest::post().uri("/api/v1/bookings").set_json(json!({
                "bookingId": Uuid::new_v4(),
                "email": "b@x.com",
                "title": "Complete Blood Count",
                "date": "2026-09-15"
            })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn status_update_with_mismatched_email_modifies_nothing() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_set_status()
            .times(1)
            .withf(|_, email, _| email == "other@x.com")
            .return_once(|_, _, _| Ok(0));

        let res = call(
            state_with(bookings, MockReservationCommand::new()),
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/bookings/other@x.com/{}", Uuid::new_v4()))
                .set_json(json!({ "status": "delivered" })),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["modifiedCount"], 0);
    }

    #[actix_web::test]
    async fn search_trims_and_drops_empty_terms() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_search()
            .times(1)
            .withf(|term| term.is_none())
            .return_once(|_| Ok(Vec::new()));

        let res = call(
            state_with(bookings, MockReservationCommand::new()),
            actix_test::TestRequest::get().uri("/api/v1/reservations?search=%20%20"),
        )
        .await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn user_bookings_forwards_future_flag() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_list_for_user()
            .times(1)
            .withf(|email, future| email == "a@x.com" && *future)
            .return_once(|_, _| Ok(Vec::new()));

        let res = call(
            state_with(bookings, MockReservationCommand::new()),
            actix_test::TestRequest::get().uri("/api/v1/bookings/a@x.com?future=true"),
        )
        .await;
        assert!(res.status().is_success());
    }
}
