//! Onboarding submission entity and its enumerations.
//!
//! These are the shapes the external submission API stores and returns.
//! Wire field names are camelCase; enum values use the string forms the
//! admin panel filters on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::service_data::ServiceSpecificData;
use crate::types::{SubmissionId, Timestamp};

// ---------------------------------------------------------------------------
// Service type
// ---------------------------------------------------------------------------

/// The offering a prospect is onboarding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    LandingPage,
    WebApp,
    MobileApp,
}

impl ServiceType {
    /// All service types, in the order the marketing site lists them.
    pub const ALL: [ServiceType; 3] = [Self::LandingPage, Self::WebApp, Self::MobileApp];

    /// Parse a service type from its wire string.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "landing_page" => Ok(Self::LandingPage),
            "web_app" => Ok(Self::WebApp),
            "mobile_app" => Ok(Self::MobileApp),
            "" => Err(CoreError::Validation(
                "No service selected. Must be one of: landing_page, web_app, mobile_app"
                    .to_string(),
            )),
            _ => Err(CoreError::Validation(format!(
                "Invalid service type '{s}'. Must be one of: landing_page, web_app, mobile_app"
            ))),
        }
    }

    /// Convert to the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LandingPage => "landing_page",
            Self::WebApp => "web_app",
            Self::MobileApp => "mobile_app",
        }
    }

    /// Human-readable label for the service.
    pub fn label(self) -> &'static str {
        match self {
            Self::LandingPage => "Landing Page",
            Self::WebApp => "Web App",
            Self::MobileApp => "Mobile App",
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow status / priority
// ---------------------------------------------------------------------------

/// Review status of a submission in the admin panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl SubmissionStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid submission status '{s}'. Must be one of: pending, in-progress, completed, rejected"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// How the prospect prefers to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    VideoCall,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// A complete onboarding submission as stored by the external API.
///
/// `id` and the timestamps are server-assigned and absent until the
/// submission has been persisted. `service_type` is fixed at creation:
/// no update contract carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubmissionId>,

    pub project_name: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub project_description: Option<String>,

    pub contact_name: String,
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

    #[serde(default)]
    pub status: SubmissionStatus,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub internal_notes: Option<String>,
    pub client_notes: Option<String>,

    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,

    pub service_specific_data: Option<ServiceSpecificData>,
}

impl OnboardingSubmission {
    /// Check that the stored service payload (if any) matches `service_type`.
    pub fn validate_service_data(&self) -> Result<(), CoreError> {
        match &self.service_specific_data {
            Some(data) => data.ensure_matches(self.service_type),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
