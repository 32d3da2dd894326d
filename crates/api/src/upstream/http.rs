//! REST client for the external submission API.
//!
//! ```text
//! POST   {base}/onboarding-submissions
//! GET    {base}/onboarding-submissions?serviceType=&status=&...&page=&limit=
//! GET    {base}/onboarding-submissions/{id}
//! PUT    {base}/onboarding-submissions/{id}
//! DELETE {base}/onboarding-submissions/{id}
//! ```
//!
//! Bodies are the bare contract shapes, without an envelope.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::contracts::{
    OnboardingSubmissionCreateRequest, OnboardingSubmissionFilters,
    OnboardingSubmissionListResponse, OnboardingSubmissionUpdateRequest,
};
use intake_core::error::CoreError;
use intake_core::submission::OnboardingSubmission;
use reqwest::{Method, RequestBuilder, StatusCode, Url};

use super::{SubmissionBackend, UpstreamError};
use crate::config::UpstreamConfig;

const COLLECTION: &str = "onboarding-submissions";

/// HTTP client for the external submission API.
pub struct HttpSubmissionBackend {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl std::fmt::Debug for HttpSubmissionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSubmissionBackend")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpSubmissionBackend {
    /// Create a client for `base_url` using the timeout and token from `config`.
    pub fn new(base_url: &str, config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_client(client, base_url, config.api_token.clone())
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_token: Option<String>,
    ) -> Result<Self, UpstreamError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: parsed,
            api_token,
        })
    }

    /// Append `segments` to the base path. Each segment is percent-encoded
    /// on its own, so `/` inside a segment cannot add path levels.
    fn url_with(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self) -> Result<Url, UpstreamError> {
        self.url_with(&[COLLECTION])
    }

    fn item_url(&self, id: &str) -> Result<Url, UpstreamError> {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(UpstreamError::Core(CoreError::Validation(format!(
                "'{id}' is not a valid submission id"
            ))));
        }
        self.url_with(&[COLLECTION, id])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. A 404 on an item URL
    /// becomes [`UpstreamError::NotFound`]; any other failure carries the
    /// status and body text.
    async fn ensure_success(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(UpstreamError::NotFound { id: id.to_string() });
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(UpstreamError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<T, UpstreamError> {
        let response = Self::ensure_success(response, id).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SubmissionBackend for HttpSubmissionBackend {
    async fn create(
        &self,
        request: OnboardingSubmissionCreateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError> {
        let response = self
            .request(Method::POST, self.collection_url()?)
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response, None).await
    }

    async fn get(&self, id: &str) -> Result<OnboardingSubmission, UpstreamError> {
        let response = self.request(Method::GET, self.item_url(id)?).send().await?;
        Self::parse_response(response, Some(id)).await
    }

    async fn list(
        &self,
        filters: &OnboardingSubmissionFilters,
    ) -> Result<OnboardingSubmissionListResponse, UpstreamError> {
        let response = self
            .request(Method::GET, self.collection_url()?)
            .query(&filters.to_query_pairs())
            .send()
            .await?;
        Self::parse_response(response, None).await
    }

    async fn update(
        &self,
        id: &str,
        request: OnboardingSubmissionUpdateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError> {
        let response = self
            .request(Method::PUT, self.item_url(id)?)
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response, Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<(), UpstreamError> {
        let response = self.request(Method::DELETE, self.item_url(id)?).send().await?;
        Self::ensure_success(response, Some(id)).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "http"
    }
}
