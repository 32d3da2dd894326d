//! Request and response contracts for the submission CRUD surface.
//!
//! The HTTP layer accepts these shapes from the wizard and the admin panel
//! and forwards them to the external submission API unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::pagination;
use crate::service_data::ServiceSpecificData;
use crate::submission::{
    ContactMethod, OnboardingSubmission, Priority, ServiceType, SubmissionStatus,
};
use crate::types::{SubmissionId, Timestamp};

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(field: &str, value: &str) -> Result<(), CoreError> {
    require_non_blank(field, value)?;
    if !value.validate_email() {
        return Err(CoreError::Validation(format!(
            "{field} '{value}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Decode a clearable field: absent stays `None` (via `serde(default)`),
/// explicit `null` becomes `Some(None)`.
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Payload for creating a submission.
///
/// Mirrors [`OnboardingSubmission`] minus the server-assigned fields (id,
/// workflow status, priority, assignee, notes, timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmissionCreateRequest {
    #[serde(default)]
    pub project_name: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub project_description: Option<String>,

    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub preferred_contact: Option<ContactMethod>,

    pub service_type: ServiceType,

    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub urgency: Option<String>,

    pub additional_requirements: Option<String>,
    pub inspiration: Option<String>,
    #[serde(default)]
    pub selected_addons: BTreeSet<String>,

    pub service_specific_data: Option<ServiceSpecificData>,
}

impl OnboardingSubmissionCreateRequest {
    /// Check required fields and service payload agreement.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("projectName", &self.project_name)?;
        require_non_blank("contactName", &self.contact_name)?;
        require_email("contactEmail", &self.contact_email)?;
        if let Some(data) = &self.service_specific_data {
            data.ensure_matches(self.service_type)?;
        }
        Ok(())
    }

    /// Materialize a freshly persisted submission with server-side defaults.
    pub fn into_submission(self, id: SubmissionId, now: Timestamp) -> OnboardingSubmission {
        OnboardingSubmission {
            id: Some(id),
            project_name: self.project_name,
            company_name: self.company_name,
            industry: self.industry,
            project_description: self.project_description,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            preferred_contact: self.preferred_contact,
            service_type: self.service_type,
            budget: self.budget,
            timeline: self.timeline,
            urgency: self.urgency,
            additional_requirements: self.additional_requirements,
            inspiration: self.inspiration,
            selected_addons: self.selected_addons,
            status: SubmissionStatus::Pending,
            priority: None,
            assigned_to: None,
            internal_notes: None,
            client_notes: None,
            created_at: Some(now),
            updated_at: Some(now),
            completed_at: None,
            service_specific_data: self.service_specific_data,
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Partial update of a submission, including the workflow fields.
///
/// There is no `serviceType` field: the service is fixed at creation and
/// an update naming one is rejected at decode time.
///
/// Absent fields are left alone. The workflow fields `priority`,
/// `assignedTo`, `internalNotes` and `clientNotes` can also be cleared by
/// sending an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OnboardingSubmissionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<ContactMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_addons: Option<BTreeSet<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_specific_data: Option<ServiceSpecificData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub client_notes: Option<Option<String>>,
}

impl OnboardingSubmissionUpdateRequest {
    /// Check the fields that are present. Absent fields are left alone.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.project_name {
            require_non_blank("projectName", name)?;
        }
        if let Some(name) = &self.contact_name {
            require_non_blank("contactName", name)?;
        }
        if let Some(email) = &self.contact_email {
            require_email("contactEmail", email)?;
        }
        Ok(())
    }

    /// Merge the present fields into `submission`.
    ///
    /// Moving into `completed` stamps `completed_at`; moving out of it clears
    /// the stamp. `updated_at` is always set to `now`.
    pub fn apply_to(
        self,
        submission: &mut OnboardingSubmission,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        self.validate()?;
        if let Some(data) = &self.service_specific_data {
            data.ensure_matches(submission.service_type)?;
        }

        if let Some(v) = self.project_name {
            submission.project_name = v;
        }
        if let Some(v) = self.contact_name {
            submission.contact_name = v;
        }
        if let Some(v) = self.contact_email {
            submission.contact_email = v;
        }
        if let Some(v) = self.selected_addons {
            submission.selected_addons = v;
        }

        let optional_fields = [
            (&mut submission.company_name, self.company_name),
            (&mut submission.industry, self.industry),
            (&mut submission.project_description, self.project_description),
            (&mut submission.contact_phone, self.contact_phone),
            (&mut submission.budget, self.budget),
            (&mut submission.timeline, self.timeline),
            (&mut submission.urgency, self.urgency),
            (&mut submission.additional_requirements, self.additional_requirements),
            (&mut submission.inspiration, self.inspiration),
        ];
        for (slot, value) in optional_fields {
            if value.is_some() {
                *slot = value;
            }
        }

        let clearable_fields = [
            (&mut submission.assigned_to, self.assigned_to),
            (&mut submission.internal_notes, self.internal_notes),
            (&mut submission.client_notes, self.client_notes),
        ];
        for (slot, value) in clearable_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if self.preferred_contact.is_some() {
            submission.preferred_contact = self.preferred_contact;
        }
        if let Some(priority) = self.priority {
            submission.priority = priority;
        }
        if self.service_specific_data.is_some() {
            submission.service_specific_data = self.service_specific_data;
        }

        if let Some(status) = self.status {
            let was_completed = submission.status == SubmissionStatus::Completed;
            match (was_completed, status == SubmissionStatus::Completed) {
                (false, true) => submission.completed_at = Some(now),
                (true, false) => submission.completed_at = None,
                _ => {}
            }
            submission.status = status;
        }

        submission.updated_at = Some(now);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// One page of submissions plus offset pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmissionListResponse {
    pub submissions: Vec<OnboardingSubmission>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl OnboardingSubmissionListResponse {
    pub fn from_page(
        submissions: Vec<OnboardingSubmission>,
        total: i64,
        page: i64,
        limit: i64,
    ) -> Self {
        Self {
            submissions,
            total,
            page,
            limit,
            total_pages: pagination::total_pages(total, limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Admin list filters. All present predicates must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmissionFilters {
    pub service_type: Option<ServiceType>,
    pub status: Option<SubmissionStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    /// Inclusive lower bound on `createdAt`.
    pub date_from: Option<Timestamp>,
    /// Inclusive upper bound on `createdAt`.
    pub date_to: Option<Timestamp>,
    /// Case-insensitive substring over project, company and contact fields.
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl OnboardingSubmissionFilters {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::Validation(format!(
                    "dateFrom ({from}) must not be after dateTo ({to})"
                )));
            }
        }
        Ok(())
    }

    /// Page number after clamping.
    pub fn effective_page(&self) -> i64 {
        pagination::clamp_page(self.page)
    }

    /// Page size after clamping.
    pub fn effective_limit(&self) -> i64 {
        pagination::clamp_limit(
            self.limit,
            pagination::DEFAULT_PAGE_LIMIT,
            pagination::MAX_PAGE_LIMIT,
        )
    }

    /// Whether `submission` satisfies every present predicate.
    pub fn matches(&self, submission: &OnboardingSubmission) -> bool {
        if self.service_type.is_some_and(|s| s != submission.service_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != submission.status) {
            return false;
        }
        if self.priority.is_some() && self.priority != submission.priority {
            return false;
        }
        if let Some(assignee) = &self.assigned_to {
            if submission.assigned_to.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(created) = submission.created_at else {
                return false;
            };
            if self.date_from.is_some_and(|from| created < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| created > to) {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            let haystacks = [
                Some(submission.project_name.as_str()),
                submission.company_name.as_deref(),
                Some(submission.contact_name.as_str()),
                Some(submission.contact_email.as_str()),
            ];
            let found = haystacks
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }

    /// Render the present filters as query parameters for the upstream API.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(s) = self.service_type {
            pairs.push(("serviceType", s.as_str().to_string()));
        }
        if let Some(s) = self.status {
            pairs.push(("status", s.as_str().to_string()));
        }
        if let Some(p) = self.priority {
            pairs.push(("priority", p.as_str().to_string()));
        }
        if let Some(a) = &self.assigned_to {
            pairs.push(("assignedTo", a.clone()));
        }
        if let Some(d) = self.date_from {
            pairs.push(("dateFrom", d.to_rfc3339()));
        }
        if let Some(d) = self.date_to {
            pairs.push(("dateTo", d.to_rfc3339()));
        }
        if let Some(s) = &self.search {
            pairs.push(("search", s.clone()));
        }
        pairs.push(("page", self.effective_page().to_string()));
        pairs.push(("limit", self.effective_limit().to_string()));
        pairs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_data::{LandingPageData, WebAppData};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn create_request() -> OnboardingSubmissionCreateRequest {
        serde_json::from_value(json!({
            "projectName": "Harbor Coffee",
            "companyName": "Harbor Coffee Co",
            "contactName": "Jordan Lee",
            "contactEmail": "jordan@harbor.coffee",
            "serviceType": "landing_page",
            "selectedAddons": ["seo", "analytics"]
        }))
        .unwrap()
    }

    fn ts(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn persisted(day: u32) -> OnboardingSubmission {
        create_request().into_submission(format!("sub-{day}"), ts(day))
    }

    // -- create --

    #[test]
    fn create_request_valid() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn create_request_requires_project_name() {
        let mut req = create_request();
        req.project_name = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_missing_fields_decode_then_fail_validation() {
        let req: OnboardingSubmissionCreateRequest =
            serde_json::from_value(json!({ "serviceType": "web_app" })).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("projectName"));
    }

    #[test]
    fn create_request_rejects_bad_email() {
        let mut req = create_request();
        req.contact_email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_rejects_mismatched_service_data() {
        let mut req = create_request();
        req.service_specific_data = Some(ServiceSpecificData::WebApp(WebAppData::default()));
        assert!(req.validate().is_err());

        req.service_specific_data =
            Some(ServiceSpecificData::LandingPage(LandingPageData::default()));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_request_has_no_server_assigned_fields() {
        let value = serde_json::to_value(create_request()).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["id", "status", "priority", "assignedTo", "internalNotes", "createdAt"] {
            assert!(!obj.contains_key(key), "create request must not carry '{key}'");
        }
    }

    #[test]
    fn into_submission_applies_server_defaults() {
        let submission = persisted(1);
        assert_eq!(submission.id.as_deref(), Some("sub-1"));
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.priority, None);
        assert_eq!(submission.created_at, Some(ts(1)));
        assert_eq!(submission.updated_at, Some(ts(1)));
        assert_eq!(submission.completed_at, None);
        assert_eq!(submission.selected_addons.len(), 2);
    }

    // -- update --

    #[test]
    fn update_rejects_service_type() {
        let result = serde_json::from_value::<OnboardingSubmissionUpdateRequest>(json!({
            "serviceType": "mobile_app"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn update_merges_present_fields_only() {
        let mut submission = persisted(1);
        let update: OnboardingSubmissionUpdateRequest = serde_json::from_value(json!({
            "budget": "15k",
            "priority": "high",
            "assignedTo": "alex"
        }))
        .unwrap();

        update.apply_to(&mut submission, ts(2)).unwrap();
        assert_eq!(submission.budget.as_deref(), Some("15k"));
        assert_eq!(submission.priority, Some(Priority::High));
        assert_eq!(submission.assigned_to.as_deref(), Some("alex"));
        assert_eq!(submission.project_name, "Harbor Coffee");
        assert_eq!(submission.company_name.as_deref(), Some("Harbor Coffee Co"));
        assert_eq!(submission.service_type, ServiceType::LandingPage);
        assert_eq!(submission.updated_at, Some(ts(2)));
        assert_eq!(submission.created_at, Some(ts(1)));
    }

    #[test]
    fn completing_stamps_and_reopening_clears_completed_at() {
        let mut submission = persisted(1);
        OnboardingSubmissionUpdateRequest {
            status: Some(SubmissionStatus::Completed),
            ..Default::default()
        }
        .apply_to(&mut submission, ts(3))
        .unwrap();
        assert_eq!(submission.completed_at, Some(ts(3)));

        // Re-saving as completed keeps the original stamp.
        OnboardingSubmissionUpdateRequest {
            status: Some(SubmissionStatus::Completed),
            ..Default::default()
        }
        .apply_to(&mut submission, ts(4))
        .unwrap();
        assert_eq!(submission.completed_at, Some(ts(3)));

        OnboardingSubmissionUpdateRequest {
            status: Some(SubmissionStatus::InProgress),
            ..Default::default()
        }
        .apply_to(&mut submission, ts(5))
        .unwrap();
        assert_eq!(submission.completed_at, None);
        assert_eq!(submission.status, SubmissionStatus::InProgress);
    }

    #[test]
    fn update_rejects_service_data_for_other_service() {
        let mut submission = persisted(1);
        let before = submission.clone();
        let result = OnboardingSubmissionUpdateRequest {
            service_specific_data: Some(ServiceSpecificData::WebApp(WebAppData::default())),
            budget: Some("1k".to_string()),
            ..Default::default()
        }
        .apply_to(&mut submission, ts(2));
        assert!(result.is_err());
        assert_eq!(submission, before);
    }

    #[test]
    fn explicit_null_clears_workflow_fields() {
        let mut submission = persisted(1);
        serde_json::from_value::<OnboardingSubmissionUpdateRequest>(json!({
            "priority": "high",
            "assignedTo": "alex",
            "internalNotes": "call back",
            "clientNotes": "see brief"
        }))
        .unwrap()
        .apply_to(&mut submission, ts(2))
        .unwrap();

        let update: OnboardingSubmissionUpdateRequest = serde_json::from_value(json!({
            "assignedTo": null,
            "priority": null,
            "internalNotes": null
        }))
        .unwrap();
        assert_eq!(update.assigned_to, Some(None));
        assert_eq!(update.client_notes, None);

        update.apply_to(&mut submission, ts(3)).unwrap();
        assert_eq!(submission.assigned_to, None);
        assert_eq!(submission.priority, None);
        assert_eq!(submission.internal_notes, None);
        assert_eq!(submission.client_notes.as_deref(), Some("see brief"));
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = OnboardingSubmissionUpdateRequest {
            budget: Some("2k".to_string()),
            assigned_to: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "budget": "2k", "assignedTo": null })
        );
    }

    #[test]
    fn update_rejects_blank_contact_name() {
        let update = OnboardingSubmissionUpdateRequest {
            contact_name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    // -- list --

    #[test]
    fn list_response_computes_total_pages() {
        let response = OnboardingSubmissionListResponse::from_page(vec![], 51, 2, 25);
        assert_eq!(response.total_pages, 3);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["totalPages"], 3);
    }

    // -- filters --

    #[test]
    fn empty_filters_match_everything() {
        assert!(OnboardingSubmissionFilters::default().matches(&persisted(1)));
    }

    #[test]
    fn filters_are_conjunctive() {
        let mut submission = persisted(10);
        submission.priority = Some(Priority::Urgent);

        let both = OnboardingSubmissionFilters {
            service_type: Some(ServiceType::LandingPage),
            priority: Some(Priority::Urgent),
            ..Default::default()
        };
        assert!(both.matches(&submission));

        let one_wrong = OnboardingSubmissionFilters {
            service_type: Some(ServiceType::LandingPage),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        assert!(!one_wrong.matches(&submission));
    }

    #[test]
    fn date_range_is_inclusive() {
        let submission = persisted(10);
        let filters = OnboardingSubmissionFilters {
            date_from: Some(ts(10)),
            date_to: Some(ts(10)),
            ..Default::default()
        };
        assert!(filters.matches(&submission));

        let later = OnboardingSubmissionFilters {
            date_from: Some(ts(11)),
            ..Default::default()
        };
        assert!(!later.matches(&submission));
    }

    #[test]
    fn date_filter_excludes_unpersisted() {
        let mut submission = persisted(10);
        submission.created_at = None;
        let filters = OnboardingSubmissionFilters {
            date_to: Some(ts(20)),
            ..Default::default()
        };
        assert!(!filters.matches(&submission));
    }

    #[test]
    fn search_is_case_insensitive_over_contact_and_project() {
        let submission = persisted(1);
        for term in ["harbor", "JORDAN", "harbor.coffee", "coffee co"] {
            let filters = OnboardingSubmissionFilters {
                search: Some(term.to_string()),
                ..Default::default()
            };
            assert!(filters.matches(&submission), "expected '{term}' to match");
        }
        let miss = OnboardingSubmissionFilters {
            search: Some("bakery".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&submission));
    }

    #[test]
    fn inverted_date_range_is_invalid() {
        let filters = OnboardingSubmissionFilters {
            date_from: Some(ts(5)),
            date_to: Some(ts(1)),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
    }

    #[test]
    fn query_pairs_include_clamped_pagination() {
        let filters = OnboardingSubmissionFilters {
            status: Some(SubmissionStatus::InProgress),
            limit: Some(500),
            ..Default::default()
        };
        let pairs = filters.to_query_pairs();
        assert!(pairs.contains(&("status", "in-progress".to_string())));
        assert!(pairs.contains(&("page", "1".to_string())));
        assert!(pairs.contains(&("limit", "100".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "serviceType"));
    }
}
