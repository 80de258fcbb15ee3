//! Screening orchestration: authorization, at-most-one screen per application,
//! the judgment call, and the atomic screen write with its UNDER_REVIEW side
//! effect.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::service::{can_view, find_application_with_listing, owns_listing};
use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::listing::JobListing;
use crate::models::screen::{
    JobApplicationScreen, ManualScreenUpdate, ScreeningReason, MAX_REASON_CHARS,
};
use crate::models::user::{Requester, UserRole};
use crate::screening::judge::{QualificationJudge, ScreeningInput};
use crate::screening::scoring::{compute_score, ScoreBreakdown};
use crate::store::{ScreenCommit, Store};

/// Score breakdown for one application, as returned by the score endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationScore {
    pub application_id: Uuid,
    pub screen_id: Uuid,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// Generates screening results for an application, or returns the existing
/// screen untouched if one was already produced.
pub async fn screen_application(
    store: &dyn Store,
    judge: &dyn QualificationJudge,
    requester: &Requester,
    application_id: Uuid,
) -> Result<JobApplicationScreen, AppError> {
    let (application, listing) = find_application_with_listing(store, application_id).await?;
    if !can_view(requester, &application, &listing) {
        return Err(AppError::Forbidden(
            "Not authorized to screen this application".to_string(),
        ));
    }

    let resume_id = application.resume_id.ok_or_else(|| {
        AppError::Validation("Cannot screen an application without an attached resume".to_string())
    })?;
    let resume = store
        .find_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    if !requester.is_admin
        && requester.role == UserRole::Applicant
        && resume.user_id != requester.user_id
    {
        return Err(AppError::Forbidden(
            "Cannot screen an application using another user's resume".to_string(),
        ));
    }

    if let Some(existing) = store.find_screen_for_application(application.id).await? {
        info!(
            "Application {} already screened ({}), returning existing screen",
            application.id, existing.id
        );
        return Ok(existing);
    }
    ensure_open(&application)?;

    let input = ScreeningInput {
        listing: (&listing).into(),
        resume_text: resume.text_content,
    };
    let judgments = judge.judge(&input).await?;
    check_judgments(&listing, &judgments.minimum_qualifications, &judgments.preferred_qualifications)
        .map_err(|msg| AppError::Llm(format!("Judge returned malformed results: {msg}")))?;

    let now = Utc::now();
    let mut screen = JobApplicationScreen::empty(application.id, now);
    screen.minimum_qualifications = judgments.minimum_qualifications;
    screen.preferred_qualifications = judgments.preferred_qualifications;
    screen.score = compute_score(&screen.minimum_qualifications, &screen.preferred_qualifications)
        .match_percentage;

    commit(store, &screen, true, &application, now).await?;
    info!(
        "Application {} screened: score {:.2}",
        application.id, screen.score
    );
    Ok(screen)
}

/// Overwrites screening results by hand. Only supplied lists are replaced.
pub async fn save_manual_results(
    store: &dyn Store,
    requester: &Requester,
    application_id: Uuid,
    update: ManualScreenUpdate,
) -> Result<JobApplicationScreen, AppError> {
    let (application, listing) = find_application_with_listing(store, application_id).await?;
    if !requester.is_admin && !owns_listing(requester, &listing) {
        return Err(AppError::Forbidden(
            "Not authorized to update this screening result".to_string(),
        ));
    }

    if update.minimum_qualifications.is_none() && update.preferred_qualifications.is_none() {
        return Err(AppError::Validation(
            "No screening results provided".to_string(),
        ));
    }
    check_supplied_lists(&listing, &update).map_err(AppError::Validation)?;
    ensure_open(&application)?;

    let now = Utc::now();
    let existing = store.find_screen_for_application(application.id).await?;
    let is_new = existing.is_none();
    let mut screen = existing.unwrap_or_else(|| JobApplicationScreen::empty(application.id, now));

    if let Some(minimum) = update.minimum_qualifications {
        screen.minimum_qualifications = minimum;
    }
    if let Some(preferred) = update.preferred_qualifications {
        screen.preferred_qualifications = preferred;
    }
    screen.score = compute_score(&screen.minimum_qualifications, &screen.preferred_qualifications)
        .match_percentage;
    screen.updated_at = now;

    commit(store, &screen, is_new, &application, now).await?;
    info!(
        "Screening results for application {} saved manually by {}: score {:.2}",
        application.id, requester.user_id, screen.score
    );
    Ok(screen)
}

pub async fn list_screens(
    store: &dyn Store,
    requester: &Requester,
) -> Result<Vec<JobApplicationScreen>, AppError> {
    Ok(store.list_screens(requester.visibility()).await?)
}

pub async fn get_screen(
    store: &dyn Store,
    requester: &Requester,
    screen_id: Uuid,
) -> Result<JobApplicationScreen, AppError> {
    let screen = store
        .find_screen(screen_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Screen {screen_id} not found")))?;
    let (application, listing) =
        find_application_with_listing(store, screen.application_id).await?;
    if !can_view(requester, &application, &listing) {
        return Err(AppError::Forbidden(
            "Not authorized to access this screening result".to_string(),
        ));
    }
    Ok(screen)
}

/// Recomputes, persists and returns the score of an application's screen.
pub async fn score_application(
    store: &dyn Store,
    requester: &Requester,
    application_id: Uuid,
) -> Result<ApplicationScore, AppError> {
    let (application, listing) = find_application_with_listing(store, application_id).await?;
    if !can_view(requester, &application, &listing) {
        return Err(AppError::Forbidden(
            "Not authorized to score this application".to_string(),
        ));
    }

    let screen = store
        .find_screen_for_application(application.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Application {} has not been screened yet",
                application.id
            ))
        })?;

    let breakdown = compute_score(&screen.minimum_qualifications, &screen.preferred_qualifications);
    store
        .update_screen_score(screen.id, breakdown.match_percentage, Utc::now())
        .await?;

    Ok(ApplicationScore {
        application_id: application.id,
        screen_id: screen.id,
        breakdown,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn commit(
    store: &dyn Store,
    screen: &JobApplicationScreen,
    is_new: bool,
    application: &JobApplication,
    at: DateTime<Utc>,
) -> Result<(), AppError> {
    store
        .commit_screen(ScreenCommit {
            screen,
            is_new,
            expected_status: application.status,
            application_status: (application.status != ApplicationStatus::UnderReview)
                .then_some(ApplicationStatus::UnderReview),
            at,
        })
        .await?;
    Ok(())
}

/// New screening results put an application (back) under review, which a
/// decided application cannot take.
fn ensure_open(application: &JobApplication) -> Result<(), AppError> {
    if application.status.is_terminal() {
        return Err(AppError::InvalidTransition {
            from: application.status,
            to: ApplicationStatus::UnderReview,
        });
    }
    Ok(())
}

/// Both lists must align one-to-one with the listing's qualifications.
fn check_judgments(
    listing: &JobListing,
    minimum: &[ScreeningReason],
    preferred: &[ScreeningReason],
) -> Result<(), String> {
    check_list("minimum", minimum, listing.minimum_qualifications.len())?;
    check_list("preferred", preferred, listing.preferred_qualifications.len())
}

/// Like `check_judgments`, but lists left out of the update are not checked.
fn check_supplied_lists(listing: &JobListing, update: &ManualScreenUpdate) -> Result<(), String> {
    if let Some(minimum) = &update.minimum_qualifications {
        check_list("minimum", minimum, listing.minimum_qualifications.len())?;
    }
    if let Some(preferred) = &update.preferred_qualifications {
        check_list("preferred", preferred, listing.preferred_qualifications.len())?;
    }
    Ok(())
}

fn check_list(label: &str, reasons: &[ScreeningReason], expected: usize) -> Result<(), String> {
    if reasons.len() != expected {
        return Err(format!(
            "expected {expected} {label} qualification judgment(s), got {}",
            reasons.len()
        ));
    }
    if let Some(index) = reasons
        .iter()
        .position(|r| r.reason.chars().count() > MAX_REASON_CHARS)
    {
        return Err(format!(
            "{label} qualification judgment {index} exceeds {MAX_REASON_CHARS} characters"
        ));
    }
    Ok(())
}
