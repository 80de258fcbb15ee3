// Resumes: an uploaded document plus the text extracted from it at upload time.

pub mod handlers;
pub mod service;
