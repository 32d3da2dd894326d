//! Domain model for the project onboarding wizard.
//!
//! Holds the submission data model, the per-session wizard store, the
//! service-specific branching rules and the request/response contracts the
//! HTTP layer exchanges with the external submission API. Nothing in this
//! crate performs I/O.

pub mod branching;
pub mod contracts;
pub mod error;
pub mod onboarding_state;
pub mod pagination;
pub mod service_data;
pub mod submission;
pub mod types;
