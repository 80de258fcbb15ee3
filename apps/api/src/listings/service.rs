use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::upload::Upload;
use crate::listings::extract::ListingExtractor;
use crate::models::listing::{JobListing, ListingDraft, NewListing};
use crate::models::user::{Requester, UserRole};
use crate::parsers::ParserRegistry;
use crate::store::Store;

const MAX_TITLE_CHARS: usize = 255;
const MAX_COMPANY_NAME_CHARS: usize = 100;
const MAX_LOCATION_CHARS: usize = 150;

fn ensure_company(requester: &Requester) -> Result<(), AppError> {
    if requester.role == UserRole::Company || requester.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only companies can manage job listings".to_string(),
        ))
    }
}

fn validate_new_listing(listing: &NewListing) -> Result<(), AppError> {
    let required = [
        ("title", &listing.title, MAX_TITLE_CHARS),
        ("company_name", &listing.company_name, MAX_COMPANY_NAME_CHARS),
        ("location", &listing.location, MAX_LOCATION_CHARS),
    ];
    for (field, value, max) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} must not be empty")));
        }
        if value.chars().count() > max {
            return Err(AppError::Validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }

    for (field, salary) in [
        ("salary_min", listing.salary_min),
        ("salary_max", listing.salary_max),
    ] {
        if matches!(salary, Some(s) if !s.is_finite() || s < 0.0) {
            return Err(AppError::Validation(format!(
                "{field} must be a non-negative number"
            )));
        }
    }
    if let (Some(min), Some(max)) = (listing.salary_min, listing.salary_max) {
        if min > max {
            return Err(AppError::Validation(
                "salary_min must not exceed salary_max".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn create_listing(
    store: &dyn Store,
    requester: &Requester,
    new: NewListing,
) -> Result<JobListing, AppError> {
    ensure_company(requester)?;
    validate_new_listing(&new)?;

    let clean = |items: Vec<String>| -> Vec<String> {
        items
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect()
    };

    let listing = JobListing {
        id: Uuid::new_v4(),
        company_id: requester.user_id,
        title: new.title.trim().to_string(),
        description: new.description,
        job_type: new.job_type,
        minimum_qualifications: clean(new.minimum_qualifications),
        preferred_qualifications: clean(new.preferred_qualifications),
        company_name: new.company_name.trim().to_string(),
        location: new.location.trim().to_string(),
        is_remote: new.is_remote,
        salary_min: new.salary_min,
        salary_max: new.salary_max,
        expires_on: new.expires_on,
        is_active: new.is_active,
        posted_on: Utc::now(),
    };
    store.insert_listing(&listing).await?;

    info!(
        "Listing {} '{}' created by company {}",
        listing.id, listing.title, listing.company_id
    );
    Ok(listing)
}

pub async fn list_listings(
    store: &dyn Store,
    requester: &Requester,
) -> Result<Vec<JobListing>, AppError> {
    Ok(store.list_listings(requester.visibility()).await?)
}

/// Inactive listings are visible only to their company and admins.
pub async fn get_listing(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
) -> Result<JobListing, AppError> {
    let listing = store
        .find_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found")))?;
    if !listing.is_active && !requester.is_admin_or(listing.company_id) {
        return Err(AppError::NotFound(format!("Listing {id} not found")));
    }
    Ok(listing)
}

pub async fn parse_listing_text(
    extractor: &dyn ListingExtractor,
    requester: &Requester,
    text: &str,
) -> Result<ListingDraft, AppError> {
    ensure_company(requester)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Listing text must not be empty".to_string(),
        ));
    }
    extractor.extract(text).await
}

pub async fn parse_listing_file(
    extractor: &dyn ListingExtractor,
    parsers: &ParserRegistry,
    requester: &Requester,
    upload: &Upload,
) -> Result<ListingDraft, AppError> {
    ensure_company(requester)?;
    let text = parsers.extract_text(
        &upload.filename,
        upload.content_type.as_deref(),
        &upload.data,
    )?;
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Uploaded document did not contain any parseable text".to_string(),
        ));
    }
    extractor.extract(&text).await
}
