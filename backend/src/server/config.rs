//! Process-environment configuration.
//!
//! Connection parameters and tuning come from the environment, read once at
//! startup and injected into components; no handler reads the environment
//! directly.

use std::net::SocketAddr;

use crate::domain::{InvalidSlotOrdering, SlotOrdering};

/// Environment variable naming the PostgreSQL connection URL.
pub const DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable naming the socket address to bind; defaults to
/// `0.0.0.0:8080`.
pub const BIND_ADDR: &str = "BIND_ADDR";
/// Environment variable selecting the featured-tests sort direction
/// (`fewest` or `most`); defaults to `fewest`.
pub const FEATURED_SLOT_ORDER: &str = "FEATURED_SLOT_ORDER";

/// Errors raised while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is absent.
    #[error("{DATABASE_URL} must be set")]
    MissingDatabaseUrl,
    /// `BIND_ADDR` holds an unparseable socket address.
    #[error("invalid {BIND_ADDR} value {value:?}")]
    InvalidBindAddr {
        /// The rejected input.
        value: String,
    },
    /// `FEATURED_SLOT_ORDER` holds an unknown direction.
    #[error(transparent)]
    InvalidFeaturedOrder(#[from] InvalidSlotOrdering),
}

/// Application configuration resolved from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Sort direction for the featured-tests listing.
    pub featured_order: SlotOrdering,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `DATABASE_URL` is missing or an
    /// optional variable holds an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary lookup, for tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL).ok_or(ConfigError::MissingDatabaseUrl)?;

        let bind_addr = match lookup(BIND_ADDR) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr { value: raw })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let featured_order = match lookup(FEATURED_SLOT_ORDER) {
            Some(raw) => raw.parse::<SlotOrdering>()?,
            None => SlotOrdering::default(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            featured_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = AppConfig::from_lookup(env(&[(DATABASE_URL, "postgres://localhost/diag")]))
            .expect("config resolves");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.featured_order, SlotOrdering::FewestFirst);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(env(&[])).expect_err("missing url");
        assert_eq!(err, ConfigError::MissingDatabaseUrl);
    }

    #[test]
    fn featured_order_is_configurable() {
        let config = AppConfig::from_lookup(env(&[
            (DATABASE_URL, "postgres://localhost/diag"),
            (FEATURED_SLOT_ORDER, "most"),
        ]))
        .expect("config resolves");
        assert_eq!(config.featured_order, SlotOrdering::MostFirst);
    }

    #[test]
    fn invalid_bind_addr_is_reported_with_the_value() {
        let err = AppConfig::from_lookup(env(&[
            (DATABASE_URL, "postgres://localhost/diag"),
            (BIND_ADDR, "not-an-addr"),
        ]))
        .expect_err("invalid addr");
        assert_eq!(
            err,
            ConfigError::InvalidBindAddr {
                value: "not-an-addr".to_owned()
            }
        );
    }
}
