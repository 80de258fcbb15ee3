//! Qualification judgment capability.
//!
//! Given a listing's qualifications and a resume's text, produce one
//! `ScreeningReason` per qualification. `AppState` holds an
//! `Arc<dyn QualificationJudge>`; production uses `LlmJudge`, tests swap in
//! fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::json_system_prompt;
use crate::llm_client::LlmClient;
use crate::models::listing::JobListing;
use crate::models::screen::ScreeningReason;
use crate::screening::prompts::{SCREEN_PROMPT_TEMPLATE, SCREEN_ROLE};

// ────────────────────────────────────────────────────────────────────────────
// Input / output
// ────────────────────────────────────────────────────────────────────────────

/// The listing fields a judge sees.
#[derive(Debug, Clone, Serialize)]
pub struct ListingBrief {
    pub title: String,
    pub description: String,
    pub minimum_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
}

impl From<&JobListing> for ListingBrief {
    fn from(listing: &JobListing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone(),
            minimum_qualifications: listing.minimum_qualifications.clone(),
            preferred_qualifications: listing.preferred_qualifications.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreeningInput {
    pub listing: ListingBrief,
    pub resume_text: String,
}

/// Raw judge output. Not yet checked against the listing's qualification counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualificationJudgments {
    pub minimum_qualifications: Vec<ScreeningReason>,
    pub preferred_qualifications: Vec<ScreeningReason>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait QualificationJudge: Send + Sync {
    async fn judge(&self, input: &ScreeningInput) -> Result<QualificationJudgments, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJudge
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJudge(pub LlmClient);

#[async_trait]
impl QualificationJudge for LlmJudge {
    async fn judge(&self, input: &ScreeningInput) -> Result<QualificationJudgments, AppError> {
        let prompt = build_prompt(input)?;
        let system = json_system_prompt(SCREEN_ROLE);

        let judgments = self
            .0
            .complete_json::<QualificationJudgments>(&system, &prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Qualification screening failed: {e}")))?;

        debug!(
            "Judge returned {} minimum / {} preferred judgments",
            judgments.minimum_qualifications.len(),
            judgments.preferred_qualifications.len()
        );
        Ok(judgments)
    }
}

fn build_prompt(input: &ScreeningInput) -> Result<String, AppError> {
    let listing_json = serde_json::to_string_pretty(&input.listing)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(SCREEN_PROMPT_TEMPLATE
        .replace(
            "{minimum_count}",
            &input.listing.minimum_qualifications.len().to_string(),
        )
        .replace(
            "{preferred_count}",
            &input.listing.preferred_qualifications.len().to_string(),
        )
        .replace("{listing_json}", &listing_json)
        .replace("{resume_text}", &input.resume_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::screen::ReasonStatus;

    fn input() -> ScreeningInput {
        ScreeningInput {
            listing: ListingBrief {
                title: "Rust Engineer".into(),
                description: "Own the ingestion pipeline.".into(),
                minimum_qualifications: vec!["3+ years Rust".into(), "SQL".into()],
                preferred_qualifications: vec!["Kubernetes".into()],
            },
            resume_text: "Wrote Rust services for four years.".into(),
        }
    }

    #[test]
    fn test_prompt_embeds_listing_resume_and_counts() {
        let prompt = build_prompt(&input()).unwrap();
        assert!(prompt.contains("3+ years Rust"));
        assert!(prompt.contains("Wrote Rust services for four years."));
        assert!(prompt.contains("must have 2 entries"));
        assert!(prompt.contains("must have 1 entries"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_judgments_deserialize_from_model_output() {
        let raw = r#"{
            "minimum_qualifications": [
                {"status": "HIGHLY_QUALIFIED", "reason": "Four years of Rust."}
            ],
            "preferred_qualifications": [
                {"status": "NOT_QUALIFIED", "reason": "Not mentioned."}
            ]
        }"#;
        let judgments: QualificationJudgments = serde_json::from_str(raw).unwrap();
        assert_eq!(
            judgments.minimum_qualifications[0].status,
            ReasonStatus::HighlyQualified
        );
        assert_eq!(
            judgments.preferred_qualifications[0].status,
            ReasonStatus::NotQualified
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let raw = r#"{
            "minimum_qualifications": [{"status": "MAYBE", "reason": "?"}],
            "preferred_qualifications": []
        }"#;
        assert!(serde_json::from_str::<QualificationJudgments>(raw).is_err());
    }
}
