// Stored files: blob in the storage backend plus a metadata row.

pub mod handlers;
pub mod service;
pub mod upload;
