// Job applications: submission, visibility, and the status workflow.

pub mod handlers;
pub mod service;
pub mod status;
