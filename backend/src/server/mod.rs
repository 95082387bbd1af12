//! Server assembly: adapters wired to ports, bound to a socket.

pub mod config;

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::domain::ReservationService;
use crate::inbound::http::{self, HttpState};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCatalogRepository, DieselUserRepository, PoolConfig,
};

pub use config::{AppConfig, ConfigError};

/// Build the handler dependency bundle over Diesel-backed adapters.
pub fn build_state(pool: &DbPool, featured_order: crate::domain::SlotOrdering) -> HttpState {
    let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool.clone()));
    let reservation = Arc::new(ReservationService::new(catalog.clone(), bookings.clone()));

    HttpState {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        catalog,
        bookings,
        reservation,
        featured_order,
    }
}

/// Build the pool, wire the adapters, and serve until shutdown.
///
/// # Errors
///
/// Returns an I/O error when the pool cannot be built or the socket cannot
/// be bound.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(io::Error::other)?;
    let state = web::Data::new(build_state(&pool, config.featured_order));

    info!(addr = %config.bind_addr, "binding HTTP server");
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Trace)
            .configure(|cfg| http::configure(cfg, state))
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
