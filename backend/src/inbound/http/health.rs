//! Liveness probe.
//!
//! Serves a bare plain-text response at the root so uptime monitors can poll
//! without authentication or JSON parsing.

use actix_web::{HttpResponse, get, http::header};

/// Plain-text liveness probe at the root path.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    responses((status = 200, description = "Server is running", body = String))
)]
#[get("/")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body("Running")
}
