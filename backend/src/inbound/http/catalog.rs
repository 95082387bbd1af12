//! Test catalog API handlers.
//!
//! ```text
//! POST   /api/v1/tests            create a catalog entry
//! PUT    /api/v1/tests/{id}       insert or fully replace an entry
//! GET    /api/v1/tests            list, optional ?upcoming=true
//! GET    /api/v1/featured-tests   top 3 upcoming by slot ordering
//! GET    /api/v1/tests/{id}       one entry, or JSON null
//! DELETE /api/v1/tests/{id}       delete an entry
//! ```
//!
//! Plain record access: the only invariant-bearing catalog operation, the
//! conditional slot decrement, is reached through `POST /bookings`.

use actix_web::{delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::{LabTest, LabTestDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::acks::{DeleteAck, UpdateAck};
use crate::inbound::http::state::HttpState;

/// Catalog entry create/replace body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabTestBody {
    /// Test title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Illustration reference.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Scheduled date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Booking capacity.
    pub slots: u32,
    /// Price in the platform currency.
    #[serde(default)]
    pub price: Option<f64>,
}

impl From<LabTestBody> for LabTestDraft {
    fn from(value: LabTestBody) -> Self {
        Self {
            title: value.title,
            description: value.description,
            image_url: value.image_url,
            date: value.date,
            slots: value.slots,
            price: value.price,
        }
    }
}

/// Listing filter for `GET /api/v1/tests`.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct ListTestsQuery {
    /// When true, only tests dated today or later are returned.
    #[serde(default)]
    pub upcoming: bool,
}

/// Create a catalog entry.
#[utoipa::path(
    post,
    path = "/api/v1/tests",
    request_body = LabTestBody,
    responses((status = 200, description = "Created entry", body = LabTest)),
    tags = ["catalog"],
    operation_id = "createTest"
)]
#[post("/tests")]
pub async fn create_test(
    state: web::Data<HttpState>,
    payload: web::Json<LabTestBody>,
) -> ApiResult<web::Json<LabTest>> {
    let created = state.catalog.create(payload.into_inner().into()).await?;
    info!(test_id = %created.id, slots = created.slots, "catalog entry created");
    Ok(web::Json(created))
}

/// Insert or fully replace a catalog entry.
///
/// A replace may overwrite `slots` while bookings are decrementing it; the
/// race is accepted on this admin-only correction path.
#[utoipa::path(
    put,
    path = "/api/v1/tests/{id}",
    request_body = LabTestBody,
    responses((status = 200, description = "Upsert acknowledgement", body = UpdateAck)),
    params(("id" = Uuid, Path, description = "Catalog entry id")),
    tags = ["catalog"],
    operation_id = "upsertTest"
)]
#[put("/tests/{id}")]
pub async fn upsert_test(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<LabTestBody>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = path.into_inner();
    let affected = state
        .catalog
        .upsert(id, payload.into_inner().into())
        .await?;
    info!(test_id = %id, "catalog entry replaced");
    Ok(web::Json(UpdateAck::from_affected(affected)))
}

/// List catalog entries, optionally only upcoming ones.
#[utoipa::path(
    get,
    path = "/api/v1/tests",
    params(ListTestsQuery),
    responses((status = 200, description = "Catalog entries", body = [LabTest])),
    tags = ["catalog"],
    operation_id = "listTests"
)]
#[get("/tests")]
pub async fn list_tests(
    state: web::Data<HttpState>,
    query: web::Query<ListTestsQuery>,
) -> ApiResult<web::Json<Vec<LabTest>>> {
    Ok(web::Json(state.catalog.list(query.upcoming).await?))
}

/// The top three upcoming tests by remaining slots.
///
/// Direction comes from configuration; see `FEATURED_SLOT_ORDER`.
#[utoipa::path(
    get,
    path = "/api/v1/featured-tests",
    responses((status = 200, description = "Up to three entries", body = [LabTest])),
    tags = ["catalog"],
    operation_id = "featuredTests"
)]
#[get("/featured-tests")]
pub async fn featured_tests(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<LabTest>>> {
    let featured = state.catalog.featured(state.featured_order, 3).await?;
    Ok(web::Json(featured))
}

/// Look up one catalog entry.
///
/// An unknown id yields a 200 with JSON `null`; existing clients treat the
/// null body, not the status code, as the not-found signal.
#[utoipa::path(
    get,
    path = "/api/v1/tests/{id}",
    responses((status = 200, description = "Entry or null", body = Option<LabTest>)),
    params(("id" = Uuid, Path, description = "Catalog entry id")),
    tags = ["catalog"],
    operation_id = "getTest"
)]
#[get("/tests/{id}")]
pub async fn get_test(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Option<LabTest>>> {
    Ok(web::Json(state.catalog.find(path.into_inner()).await?))
}

/// Delete a catalog entry.
#[utoipa::path(
    delete,
    path = "/api/v1/tests/{id}",
    responses((status = 200, description = "Delete acknowledgement", body = DeleteAck)),
    params(("id" = Uuid, Path, description = "Catalog entry id")),
    tags = ["catalog"],
    operation_id = "deleteTest"
)]
#[delete("/tests/{id}")]
pub async fn delete_test(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeleteAck>> {
    let id = path.into_inner();
    let deleted_count = state.catalog.delete(id).await?;
    info!(test_id = %id, deleted_count, "catalog entry deleted");
    Ok(web::Json(DeleteAck { deleted_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockBookingRepository, MockReservationCommand, MockTestCatalogRepository,
        MockUserRepository,
    };
    use crate::domain::SlotOrdering;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;

    fn state_with_catalog(catalog: MockTestCatalogRepository) -> web::Data<HttpState> {
        state_with_catalog_and_order(catalog, SlotOrdering::default())
    }

    fn state_with_catalog_and_order(
        catalog: MockTestCatalogRepository,
        featured_order: SlotOrdering,
    ) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users: Arc::new(MockUserRepository::new()),
            catalog: Arc::new(catalog),
            bookings: Arc::new(MockBookingRepository::new()),
            reservation: Arc::new(MockReservationCommand::new()),
            featured_order,
        })
    }

    fn sample_test(slots: u32) -> LabTest {
        LabTest {
            id: Uuid::new_v4(),
            title: "Complete Blood Count".to_owned(),
            description: None,
            image_url: None,
            date: NaiveDate::from_ymd_opt(2026, 9, 15).expect("valid date"),
            slots,
            price: Some(40.0),
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
                    .service(create_test)
                    .service(upsert_test)
                    .service(list_tests)
                    .service(featured_tests)
                    .service(get_test)
                    .service(delete_test),
            ),
        )
        .await;
        actix_test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn list_passes_upcoming_filter_through() {
        let mut catalog = MockTestCatalogRepository::new();
        catalog
            .expect_list()
            .times(1)
            .withf(|upcoming| *upcoming)
            .return_once(|_| Ok(vec![sample_test(5)]));

        let res = call(
            state_with_catalog(catalog),
            actix_test::TestRequest::get().uri("/api/v1/tests?upcoming=true"),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn featured_uses_configured_ordering() {
        let mut catalog = MockTestCatalogRepository::new();
        catalog
            .expect_featured()
            .times(1)
            .withf(|ordering, limit| *ordering == SlotOrdering::MostFirst && *limit == 3)
            .return_once(|_, _| Ok(vec![sample_test(9), sample_test(4)]));

        let res = call(
            state_with_catalog_and_order(catalog, SlotOrdering::MostFirst),
            actix_test::TestRequest::get().uri("/api/v1/featured-tests"),
        )
        .await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn get_unknown_test_returns_json_null() {
        let mut catalog = MockTestCatalogRepository::new();
        catalog.expect_find().times(1).return_once(|_| Ok(None));

        let res = call(
            state_with_catalog(catalog),
            actix_test::TestRequest::get().uri(&format!("/api/v1/tests/{}", Uuid::new_v4())),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, Value::Null);
    }

    #[actix_web::test]
    async fn delete_reports_deleted_count() {
        let mut catalog = MockTestCatalogRepository::new();
        catalog.expect_delete().times(1).return_once(|_| Ok(1));

        let res = call(
            state_with_catalog(catalog),
            actix_test::TestRequest::delete().uri(&format!("/api/v1/tests/{}", Uuid::new_v4())),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["deletedCount"], 1);
    }
}
