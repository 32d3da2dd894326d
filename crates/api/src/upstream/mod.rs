//! Backends for the external submission API.
//!
//! Handlers only see [`SubmissionBackend`]. Production talks to the real
//! API through [`HttpSubmissionBackend`]; local development and tests use
//! [`InMemorySubmissionBackend`].

mod http;
mod memory;

pub use http::HttpSubmissionBackend;
pub use memory::InMemorySubmissionBackend;

use async_trait::async_trait;
use intake_core::contracts::{
    OnboardingSubmissionCreateRequest, OnboardingSubmissionFilters,
    OnboardingSubmissionListResponse, OnboardingSubmissionUpdateRequest,
};
use intake_core::error::CoreError;
use intake_core::submission::OnboardingSubmission;

/// Errors from a submission backend.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream API returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The configured base URL cannot carry a path.
    #[error("Invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),

    /// The requested submission does not exist upstream.
    #[error("Submission {id} not found upstream")]
    NotFound { id: String },

    /// The backend rejected the payload on domain grounds.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// CRUD operations against wherever submissions are stored.
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    /// Persist a new submission and return it with server-assigned fields.
    async fn create(
        &self,
        request: OnboardingSubmissionCreateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError>;

    async fn get(&self, id: &str) -> Result<OnboardingSubmission, UpstreamError>;

    /// One page of submissions matching every present filter.
    async fn list(
        &self,
        filters: &OnboardingSubmissionFilters,
    ) -> Result<OnboardingSubmissionListResponse, UpstreamError>;

    async fn update(
        &self,
        id: &str,
        request: OnboardingSubmissionUpdateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError>;

    async fn delete(&self, id: &str) -> Result<(), UpstreamError>;

    /// Short name for logs.
    fn kind(&self) -> &'static str;
}
