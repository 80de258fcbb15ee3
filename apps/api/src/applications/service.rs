//! Application submission, visibility and status workflow.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::applications::status::{plan_transition, plan_withdrawal, StatusChange};
use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, JobApplication, SubmitApplicationRequest};
use crate::models::listing::JobListing;
use crate::models::user::{Requester, UserRole};
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Shared lookups (also used by screening)
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn find_application(
    store: &dyn Store,
    id: Uuid,
) -> Result<JobApplication, AppError> {
    store
        .find_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

pub(crate) async fn find_listing(store: &dyn Store, id: Uuid) -> Result<JobListing, AppError> {
    store
        .find_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))
}

/// Loads an application together with the listing it was submitted to.
pub(crate) async fn find_application_with_listing(
    store: &dyn Store,
    id: Uuid,
) -> Result<(JobApplication, JobListing), AppError> {
    let application = find_application(store, id).await?;
    let listing = find_listing(store, application.listing_id).await?;
    Ok((application, listing))
}

pub(crate) fn owns_listing(requester: &Requester, listing: &JobListing) -> bool {
    requester.user_id == listing.company_id
}

/// Admin, the applicant who submitted, or the company that owns the listing.
pub(crate) fn can_view(
    requester: &Requester,
    application: &JobApplication,
    listing: &JobListing,
) -> bool {
    requester.is_admin_or(application.applicant_id) || owns_listing(requester, listing)
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn submit_application(
    store: &dyn Store,
    requester: &Requester,
    request: SubmitApplicationRequest,
) -> Result<JobApplication, AppError> {
    if requester.role != UserRole::Applicant && !requester.is_admin {
        return Err(AppError::Forbidden(
            "Only applicants can submit applications".to_string(),
        ));
    }

    let listing = find_listing(store, request.listing_id).await?;
    if !listing.is_active {
        return Err(AppError::Validation(format!(
            "Listing {} is no longer accepting applications",
            listing.id
        )));
    }

    if let Some(resume_id) = request.resume_id {
        let resume = store
            .find_resume(resume_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
        if !requester.is_admin_or(resume.user_id) {
            return Err(AppError::Forbidden(
                "Resume belongs to another user".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let application = JobApplication {
        id: Uuid::new_v4(),
        listing_id: listing.id,
        applicant_id: requester.user_id,
        resume_id: request.resume_id,
        cover_letter: request.cover_letter.filter(|c| !c.trim().is_empty()),
        status: ApplicationStatus::Submitted,
        created_at: now,
        updated_at: now,
    };
    store.insert_application(&application).await?;

    info!(
        "Application {} submitted to listing {} by {}",
        application.id, listing.id, requester.user_id
    );
    Ok(application)
}

pub async fn list_applications(
    store: &dyn Store,
    requester: &Requester,
) -> Result<Vec<JobApplication>, AppError> {
    Ok(store.list_applications(requester.visibility()).await?)
}

pub async fn get_application(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
) -> Result<JobApplication, AppError> {
    let (application, listing) = find_application_with_listing(store, id).await?;
    if !can_view(requester, &application, &listing) {
        return Err(AppError::Forbidden(format!(
            "Not allowed to view application {id}"
        )));
    }
    Ok(application)
}

/// General status update by the listing's company (or an admin).
pub async fn update_application_status(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
    target: ApplicationStatus,
) -> Result<JobApplication, AppError> {
    let (application, listing) = find_application_with_listing(store, id).await?;
    if !requester.is_admin && !owns_listing(requester, &listing) {
        return Err(AppError::Forbidden(
            "Only the listing owner can change application status".to_string(),
        ));
    }

    let change = plan_transition(application.status, target)?;
    apply_change(store, application, change).await
}

/// Withdrawal by the applicant (or an admin).
pub async fn withdraw_application(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
) -> Result<JobApplication, AppError> {
    let application = find_application(store, id).await?;
    if !requester.is_admin_or(application.applicant_id) {
        return Err(AppError::Forbidden(
            "Only the applicant can withdraw an application".to_string(),
        ));
    }

    let change = plan_withdrawal(application.status)?;
    apply_change(store, application, change).await
}

async fn apply_change(
    store: &dyn Store,
    application: JobApplication,
    change: StatusChange,
) -> Result<JobApplication, AppError> {
    let StatusChange::Changed { from, to } = change else {
        return Ok(application);
    };

    let updated = store
        .update_application_status(application.id, from, to, Utc::now())
        .await?;

    info!("Application {} moved {from} -> {to}", updated.id);
    Ok(updated)
}
