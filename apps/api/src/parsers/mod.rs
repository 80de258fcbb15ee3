//! Document text extraction.
//!
//! `ParserRegistry` maps a format identifier to a parser: the file extension
//! is tried first, then the MIME type. Both tables are built explicitly in
//! `ParserRegistry::new`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::errors::AppError;

pub mod docx;
pub mod markdown;
pub mod pdf;
pub mod text;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unsupported document type; no parser for extension {extension:?} or content type {content_type:?}")]
    Unsupported {
        extension: Option<String>,
        content_type: Option<String>,
    },

    #[error("Failed to extract text from {format} document: {message}")]
    Extraction {
        format: &'static str,
        message: String,
    },
}

impl From<ParserError> for AppError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::Empty | ParserError::Unsupported { .. } => {
                AppError::Validation(err.to_string())
            }
            ParserError::Extraction { .. } => AppError::UnprocessableEntity(err.to_string()),
        }
    }
}

pub trait DocumentParser: Send + Sync {
    /// Short format name used in errors and logs.
    fn format(&self) -> &'static str;

    fn parse(&self, data: &[u8]) -> Result<String, ParserError>;
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Parser strategies keyed by extension and by MIME type.
pub struct ParserRegistry {
    by_extension: HashMap<&'static str, Arc<dyn DocumentParser>>,
    mime_to_extension: HashMap<&'static str, &'static str>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let pdf: Arc<dyn DocumentParser> = Arc::new(pdf::PdfParser);
        let text: Arc<dyn DocumentParser> = Arc::new(text::TextParser);
        let markdown: Arc<dyn DocumentParser> = Arc::new(markdown::MarkdownParser);
        let docx: Arc<dyn DocumentParser> = Arc::new(docx::DocxParser);

        let by_extension = HashMap::from([
            ("pdf", pdf),
            ("txt", text),
            ("md", markdown.clone()),
            ("markdown", markdown),
            ("docx", docx),
        ]);
        let mime_to_extension = HashMap::from([
            ("application/pdf", "pdf"),
            ("text/plain", "txt"),
            ("text/markdown", "md"),
            ("text/x-markdown", "md"),
            (DOCX_MIME, "docx"),
        ]);

        Self {
            by_extension,
            mime_to_extension,
        }
    }

    /// Resolves a parser from the filename's extension, falling back to the
    /// content type (parameters such as `; charset=utf-8` are ignored).
    pub fn resolve(
        &self,
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<&dyn DocumentParser, ParserError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let mime = content_type.map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        });

        let by_extension = extension
            .as_deref()
            .and_then(|ext| self.by_extension.get(ext));
        let by_mime = || {
            mime.as_deref()
                .and_then(|m| self.mime_to_extension.get(m))
                .and_then(|ext| self.by_extension.get(ext))
        };

        by_extension
            .or_else(by_mime)
            .map(|parser| parser.as_ref())
            .ok_or_else(|| ParserError::Unsupported {
                extension,
                content_type: content_type.map(str::to_string),
            })
    }

    /// Extracts text from an uploaded document. Empty uploads are rejected
    /// before any parser runs.
    pub fn extract_text(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String, ParserError> {
        if data.is_empty() {
            return Err(ParserError::Empty);
        }
        let parser = self.resolve(filename, content_type)?;
        Ok(parser.parse(data)?.trim().to_string())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
