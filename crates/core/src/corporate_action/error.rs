//! Corporate-action validation errors.

use thiserror::Error;

/// Errors raised while validating a corporate-action payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorporateActionError {
    /// A required field was absent or null.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The detail list was absent or empty.
    #[error("at least one corporate action detail is required")]
    EmptyDetails,
}
