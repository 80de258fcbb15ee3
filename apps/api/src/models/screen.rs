use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on a judgment's free-text justification.
pub const MAX_REASON_CHARS: usize = 1000;

/// How well the resume meets one listing qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonStatus {
    HighlyQualified,
    Qualified,
    Meets,
    NotQualified,
}

/// A single qualification judgment, positionally aligned with the listing's
/// qualification list it was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningReason {
    pub status: ReasonStatus,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplicationScreen {
    pub id: Uuid,
    pub application_id: Uuid,
    pub minimum_qualifications: Vec<ScreeningReason>,
    pub preferred_qualifications: Vec<ScreeningReason>,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplicationScreen {
    pub fn empty(application_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id,
            minimum_qualifications: Vec::new(),
            preferred_qualifications: Vec::new(),
            score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenRequest {
    pub application_id: Uuid,
}

/// Manual edit of screening results. Omitted lists are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualScreenUpdate {
    pub minimum_qualifications: Option<Vec<ScreeningReason>>,
    pub preferred_qualifications: Option<Vec<ScreeningReason>>,
}
