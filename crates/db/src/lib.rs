//! Database layer: a stored-procedure gateway over PostgreSQL.
//!
//! All business logic (validation beyond presence checks, ratio
//! computation, transactional consistency) lives in stored
//! functions/procedures owned by the database. This crate provides:
//! - Pool construction from configuration
//! - One repository per entity family, each method a stored call
//! - Row types mirroring the quoted PascalCase columns the functions return

pub mod procedures;

pub use procedures::{
    BrokerRepository, CorporateActionRepository, CurrencyRepository, StockRepository,
};

use ritefolio_shared::config::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await
}
