/// Submission identifiers are assigned by the external submission API.
pub type SubmissionId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
