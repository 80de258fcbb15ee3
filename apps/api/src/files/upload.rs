use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Multipart form field that carries the document.
pub const FILE_FIELD: &str = "file";

// Column widths of stored_files.filename and stored_files.content_type.
const MAX_FILENAME_CHARS: usize = 255;
const MAX_CONTENT_TYPE_CHARS: usize = 100;

/// A document received over multipart, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// Content type to record, defaulting to an opaque binary type.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

/// Reads the `file` field from a multipart body. Other fields are ignored.
pub async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field.content_type().map(str::to_string);
        check_metadata(&filename, content_type.as_deref())?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        if data.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "Uploaded file exceeds the {max_bytes} byte limit"
            )));
        }

        return Ok(Upload {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

fn check_metadata(filename: &str, content_type: Option<&str>) -> Result<(), AppError> {
    if filename.chars().count() > MAX_FILENAME_CHARS {
        return Err(AppError::Validation(format!(
            "Filename must be at most {MAX_FILENAME_CHARS} characters"
        )));
    }
    if content_type.is_some_and(|ct| ct.chars().count() > MAX_CONTENT_TYPE_CHARS) {
        return Err(AppError::Validation(format!(
            "Content type must be at most {MAX_CONTENT_TYPE_CHARS} characters"
        )));
    }
    Ok(())
}
