//! In-process submission store.
//!
//! Behaves like the external API: assigns ids and timestamps on create,
//! applies filters conjunctively and returns newest submissions first.

use async_trait::async_trait;
use intake_core::contracts::{
    OnboardingSubmissionCreateRequest, OnboardingSubmissionFilters,
    OnboardingSubmissionListResponse, OnboardingSubmissionUpdateRequest,
};
use intake_core::pagination;
use intake_core::submission::OnboardingSubmission;
use tokio::sync::RwLock;

use super::{SubmissionBackend, UpstreamError};

#[derive(Default)]
pub struct InMemorySubmissionBackend {
    submissions: RwLock<Vec<OnboardingSubmission>>,
}

impl InMemorySubmissionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored submissions.
    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }
}

fn not_found(id: &str) -> UpstreamError {
    UpstreamError::NotFound { id: id.to_string() }
}

#[async_trait]
impl SubmissionBackend for InMemorySubmissionBackend {
    async fn create(
        &self,
        request: OnboardingSubmissionCreateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError> {
        request.validate()?;
        let id = uuid::Uuid::now_v7().to_string();
        let submission = request.into_submission(id, chrono::Utc::now());
        self.submissions.write().await.push(submission.clone());
        Ok(submission)
    }

    async fn get(&self, id: &str) -> Result<OnboardingSubmission, UpstreamError> {
        self.submissions
            .read()
            .await
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(
        &self,
        filters: &OnboardingSubmissionFilters,
    ) -> Result<OnboardingSubmissionListResponse, UpstreamError> {
        filters.validate()?;
        let page = filters.effective_page();
        let limit = filters.effective_limit();

        let mut matching: Vec<OnboardingSubmission> = self
            .submissions
            .read()
            .await
            .iter()
            .filter(|s| filters.matches(s))
            .cloned()
            .collect();
        // Newest first; insertion order breaks ties.
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let items = pagination::paginate(&matching, page, limit);
        Ok(OnboardingSubmissionListResponse::from_page(
            items, total, page, limit,
        ))
    }

    async fn update(
        &self,
        id: &str,
        request: OnboardingSubmissionUpdateRequest,
    ) -> Result<OnboardingSubmission, UpstreamError> {
        let mut submissions = self.submissions.write().await;
        let submission = submissions
            .iter_mut()
            .find(|s| s.id.as_deref() == Some(id))
            .ok_or_else(|| not_found(id))?;

        // Apply to a copy so a rejected update leaves the stored row intact.
        let mut updated = submission.clone();
        request.apply_to(&mut updated, chrono::Utc::now())?;
        *submission = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), UpstreamError> {
        let mut submissions = self.submissions.write().await;
        let before = submissions.len();
        submissions.retain(|s| s.id.as_deref() != Some(id));
        if submissions.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "in-memory"
    }
}
