//! Core domain logic for the Ritefolio back office.
//!
//! This crate contains the pieces of the corporate-action flow that do not
//! touch the database:
//!
//! - `corporate_action` - Request validation and the outbound event payload
//! - `notification` - RabbitMQ publisher for the notification side-channel

pub mod corporate_action;
pub mod notification;
