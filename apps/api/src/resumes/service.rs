//! Resume upload and management. Text is extracted once at upload and stored
//! alongside the file reference; screening reads only the stored text.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::service::{remove_blob, upload_file};
use crate::files::upload::Upload;
use crate::models::resume::Resume;
use crate::models::user::Requester;
use crate::parsers::ParserRegistry;
use crate::storage::BlobStorage;
use crate::store::Store;

pub async fn upload_resume(
    store: &dyn Store,
    storage: &dyn BlobStorage,
    parsers: &ParserRegistry,
    owner: &Requester,
    upload: &Upload,
) -> Result<Resume, AppError> {
    let text = parsers.extract_text(
        &upload.filename,
        upload.content_type.as_deref(),
        &upload.data,
    )?;
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Uploaded resume did not contain any parseable text".to_string(),
        ));
    }

    let file = upload_file(store, storage, owner, upload).await?;

    let now = Utc::now();
    let resume = Resume {
        id: Uuid::new_v4(),
        user_id: owner.user_id,
        file_id: file.id,
        text_content: text,
        created_at: now,
        updated_at: now,
    };

    if let Err(err) = store.insert_resume(&resume).await {
        match store.delete_file(file.id).await {
            Ok(_) => remove_blob(storage, &file.storage_key).await,
            Err(cleanup) => error!(
                "Failed to remove file {} after resume insert failed: {cleanup}",
                file.id
            ),
        }
        return Err(err.into());
    }

    info!(
        "Resume {} uploaded by {} ({} chars of text)",
        resume.id,
        owner.user_id,
        resume.text_content.chars().count()
    );
    Ok(resume)
}

pub async fn list_resumes(
    store: &dyn Store,
    requester: &Requester,
) -> Result<Vec<Resume>, AppError> {
    let owner = (!requester.is_admin).then_some(requester.user_id);
    Ok(store.list_resumes(owner).await?)
}

pub async fn get_resume(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
) -> Result<Resume, AppError> {
    let resume = store
        .find_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    if !requester.is_admin_or(resume.user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to access this resume".to_string(),
        ));
    }
    Ok(resume)
}

/// Deletes the resume, then its stored file best-effort.
pub async fn delete_resume(
    store: &dyn Store,
    storage: &dyn BlobStorage,
    requester: &Requester,
    id: Uuid,
) -> Result<(), AppError> {
    let resume = get_resume(store, requester, id).await?;
    if !store.delete_resume(resume.id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }

    match store.find_file(resume.file_id).await {
        Ok(Some(file)) => match store.delete_file(file.id).await {
            Ok(_) => remove_blob(storage, &file.storage_key).await,
            Err(e) => error!("Failed to delete file {} of resume {id}: {e}", file.id),
        },
        Ok(None) => {}
        Err(e) => error!("Failed to look up file {} of resume {id}: {e}", resume.file_id),
    }

    info!("Deleted resume {id}");
    Ok(())
}
