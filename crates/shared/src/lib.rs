//! Shared types, errors, and configuration for the Ritefolio back office.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Pagination types for list endpoints
//! - Financial-year epoch helpers

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
