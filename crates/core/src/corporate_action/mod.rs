//! Corporate-action domain types and request validation.
//!
//! Creating a corporate action is the one orchestrated flow in the back
//! office: validate the payload, insert the record and its entitlement
//! details through a stored procedure, refresh the derived holdings log,
//! and - for strategic rebrandings - publish an event to the message
//! broker. The pure pieces of that flow live here.

pub mod error;
pub mod types;

pub use error::CorporateActionError;
pub use types::{
    CorporateActionDetailInput, CorporateActionEvent, CreateCorporateActionRequest,
    REBRANDING_ACTION_TYPE_ID, ValidatedCorporateAction, ValidatedDetail,
};
