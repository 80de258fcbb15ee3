//! Listing draft extraction. `AppState` holds an `Arc<dyn ListingExtractor>`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::listings::prompts::{LISTING_EXTRACT_PROMPT_TEMPLATE, LISTING_EXTRACT_ROLE};
use crate::llm_client::prompts::json_system_prompt;
use crate::llm_client::LlmClient;
use crate::models::listing::ListingDraft;

#[async_trait]
pub trait ListingExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ListingDraft, AppError>;
}

pub struct LlmListingExtractor(pub LlmClient);

#[async_trait]
impl ListingExtractor for LlmListingExtractor {
    async fn extract(&self, text: &str) -> Result<ListingDraft, AppError> {
        let prompt = LISTING_EXTRACT_PROMPT_TEMPLATE.replace("{listing_text}", text);
        self.0
            .complete_json::<ListingDraft>(&json_system_prompt(LISTING_EXTRACT_ROLE), &prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Listing extraction failed: {e}")))
    }
}
