// Prompt text for listing extraction.

pub const LISTING_EXTRACT_ROLE: &str = "You are an expert recruiting coordinator. \
    You turn raw job postings into structured listing records.";

/// Listing extraction prompt template. Replace `{listing_text}` before sending.
pub const LISTING_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract a structured job listing from the text below.

JOB POSTING:
{listing_text}

Return a JSON object with this EXACT schema (no extra fields). Use null for anything the text does not state:
{
  "title": "Senior Backend Engineer",
  "description": "One or two paragraph summary of the role and responsibilities.",
  "job_type": "FT",
  "minimum_qualifications": ["5+ years building backend services"],
  "preferred_qualifications": ["Experience with Kubernetes"],
  "company_name": "Acme Corp",
  "location": "Berlin, Germany",
  "is_remote": false,
  "salary_min": 80000,
  "salary_max": 100000,
  "expires_on": "2025-12-31"
}

Rules:
- "job_type" is one of "FT" (full-time), "PT" (part-time), "CO" (contract), "IN" (internship), "TE" (temporary).
- MINIMUM qualifications are stated requirements: "required", "must have", minimum years.
- PREFERRED qualifications are nice-to-haves: "preferred", "bonus", "a plus".
- Keep each qualification as one short phrase, in the order it appears.
- Salaries are plain yearly numbers without currency symbols.
- "expires_on" is an ISO date (YYYY-MM-DD)."#;
