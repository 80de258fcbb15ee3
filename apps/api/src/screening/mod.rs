// Qualification screening: LLM judgments per listing qualification, weighted
// scoring, and the orchestration that ties them to an application.

pub mod handlers;
pub mod judge;
pub mod prompts;
pub mod scoring;
pub mod service;
