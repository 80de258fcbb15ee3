use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states of a job application (`job_application_status` in Postgres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "job_application_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Interview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub applicant_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplicationRequest {
    pub listing_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}
