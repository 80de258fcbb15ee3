// Prompt text for qualification screening.

/// Role half of the screening system prompt; the JSON-only rule is appended.
pub const SCREEN_ROLE: &str = "You are an experienced technical recruiter. \
    You assess how well a candidate's resume satisfies each qualification of a job listing, \
    judging only from evidence present in the resume text.";

/// Screening prompt template. Replace `{listing_json}` and `{resume_text}` before sending.
pub const SCREEN_PROMPT_TEMPLATE: &str = r#"Assess the resume below against every qualification of the job listing.

JOB LISTING:
{listing_json}

RESUME:
{resume_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "minimum_qualifications": [
    {"status": "QUALIFIED", "reason": "Five years of production Rust at two employers."}
  ],
  "preferred_qualifications": [
    {"status": "NOT_QUALIFIED", "reason": "No Kubernetes experience is mentioned."}
  ]
}

Rules:
- Produce exactly one entry per qualification, in the same order as the listing.
  "minimum_qualifications" must have {minimum_count} entries and
  "preferred_qualifications" must have {preferred_count} entries.
- "status" is one of: "HIGHLY_QUALIFIED" (clearly exceeds), "QUALIFIED" (fully satisfies),
  "MEETS" (partially or arguably satisfies), "NOT_QUALIFIED" (no supporting evidence).
- "reason" cites the resume evidence in one or two sentences, at most 1000 characters.
- Do NOT infer experience the resume does not state."#;
