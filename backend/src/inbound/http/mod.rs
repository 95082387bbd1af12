//! Inbound HTTP adapter: actix-web handlers over the domain ports.

pub mod acks;
pub mod bookings;
pub mod catalog;
pub mod error;
pub mod health;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::ApiResult;
pub use state::HttpState;

/// Mount the full API surface onto an actix service config.
///
/// Shared between the real server and in-process tests so both exercise the
/// same routing table. Registration order matters for the PATCH paths:
/// `/users/admin/{id}` must precede `/users/{id}` or the admin route would
/// be shadowed.
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<HttpState>) {
    let api = web::scope("/api/v1")
        .service(users::register)
        .service(users::list_users)
        .service(users::admin_flag)
        .service(users::blocked_flag)
        .service(users::set_role)
        .service(users::set_status)
        .service(catalog::create_test)
        .service(catalog::upsert_test)
        .service(catalog::list_tests)
        .service(catalog::featured_tests)
        .service(catalog::get_test)
        .service(catalog::delete_test)
        .service(bookings::create_booking)
        .service(bookings::list_bookings)
        .service(bookings::search_reservations)
        .service(bookings::upsert_reservation)
        .service(bookings::set_booking_status)
        .service(bookings::user_bookings)
        .service(bookings::test_results);

    cfg.app_data(state).service(api).service(health::live);
}
