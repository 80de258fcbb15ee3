// Job listings: creation, role-scoped visibility, and LLM extraction of
// listing drafts from free text or uploaded documents.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod service;
