//! Seed helpers shared by service and router tests.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::listings::extract::ListingExtractor;
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::file::StoredFile;
use crate::models::listing::{JobListing, JobType, ListingDraft};
use crate::models::resume::Resume;
use crate::models::screen::{ReasonStatus, ScreeningReason};
use crate::screening::judge::{QualificationJudge, QualificationJudgments, ScreeningInput};
use crate::store::{
    ApplicationRepository, FileRepository, ListingRepository, MemoryStore, ResumeRepository,
};

pub fn make_listing(company_id: Uuid, minimum: &[&str], preferred: &[&str]) -> JobListing {
    JobListing {
        id: Uuid::new_v4(),
        company_id,
        title: "Backend Engineer".to_string(),
        description: "Build and operate the hiring platform.".to_string(),
        job_type: JobType::FullTime,
        minimum_qualifications: minimum.iter().map(|s| s.to_string()).collect(),
        preferred_qualifications: preferred.iter().map(|s| s.to_string()).collect(),
        company_name: "Acme".to_string(),
        location: "Berlin".to_string(),
        is_remote: true,
        salary_min: Some(70_000.0),
        salary_max: Some(90_000.0),
        expires_on: None,
        is_active: true,
        posted_on: Utc::now(),
    }
}

pub async fn seed_listing(
    store: &MemoryStore,
    company_id: Uuid,
    minimum: &[&str],
    preferred: &[&str],
) -> JobListing {
    let listing = make_listing(company_id, minimum, preferred);
    store.insert_listing(&listing).await.unwrap();
    listing
}

pub async fn seed_resume(store: &MemoryStore, user_id: Uuid, text: &str) -> Resume {
    let now = Utc::now();
    let file_id = Uuid::new_v4();
    let file = StoredFile {
        id: file_id,
        owner_id: user_id,
        filename: "resume.txt".to_string(),
        content_type: "text/plain".to_string(),
        size_bytes: text.len() as i64,
        storage_key: file_id.to_string(),
        created_at: now,
        updated_at: now,
    };
    store.insert_file(&file).await.unwrap();

    let resume = Resume {
        id: Uuid::new_v4(),
        user_id,
        file_id,
        text_content: text.to_string(),
        created_at: now,
        updated_at: now,
    };
    store.insert_resume(&resume).await.unwrap();
    resume
}

pub async fn seed_application(
    store: &MemoryStore,
    listing: &JobListing,
    applicant_id: Uuid,
    resume_id: Option<Uuid>,
    status: ApplicationStatus,
) -> JobApplication {
    let now = Utc::now();
    let application = JobApplication {
        id: Uuid::new_v4(),
        listing_id: listing.id,
        applicant_id,
        resume_id,
        cover_letter: None,
        status,
        created_at: now,
        updated_at: now,
    };
    store.insert_application(&application).await.unwrap();
    application
}

/// Judge that always returns the same judgments.
pub struct FixedJudge(pub QualificationJudgments);

#[async_trait]
impl QualificationJudge for FixedJudge {
    async fn judge(&self, _input: &ScreeningInput) -> Result<QualificationJudgments, AppError> {
        Ok(self.0.clone())
    }
}

/// Extractor that echoes the first line of the text as the title.
pub struct FirstLineExtractor;

#[async_trait]
impl ListingExtractor for FirstLineExtractor {
    async fn extract(&self, text: &str) -> Result<ListingDraft, AppError> {
        Ok(ListingDraft {
            title: text.lines().next().map(str::to_string),
            ..ListingDraft::default()
        })
    }
}

pub fn judgments(minimum: &[ReasonStatus], preferred: &[ReasonStatus]) -> QualificationJudgments {
    let reasons = |statuses: &[ReasonStatus]| -> Vec<ScreeningReason> {
        statuses
            .iter()
            .map(|&status| ScreeningReason {
                status,
                reason: format!("judged {status:?}"),
            })
            .collect()
    };
    QualificationJudgments {
        minimum_qualifications: reasons(minimum),
        preferred_qualifications: reasons(preferred),
    }
}
