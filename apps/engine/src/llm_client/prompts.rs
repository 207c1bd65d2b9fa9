//! Prompt constants and builders for the extraction assistant.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds the extraction prompt for one job posting. The response schema
/// mirrors the requirements-profile fields so the orchestrator can merge
/// the candidate field by field.
pub fn build_extraction_prompt(
    jd_text: &str,
    title: Option<&str>,
    company: Option<&str>,
) -> String {
    let title = title.unwrap_or("(not provided)");
    let company = company.unwrap_or("(not provided)");
    format!(
        r#"Analyze this job posting and extract a structured requirements profile.

Job title: {title}
Company: {company}

Job description:
---
{jd_text}
---

Return a JSON object with exactly these fields:
{{
  "keywords": ["<technical skill>", ...],
  "must_have_keywords": ["<skill explicitly required>", ...],
  "nice_to_have_keywords": ["<skill listed as bonus/preferred>", ...],
  "years_required": <integer or null>,
  "degree_required": "<degree level, optionally with field>" or null,
  "certifications": ["<certification name>", ...],
  "role_family": one of "testing", "ai", "fullstack", "backend", "frontend", "devops", "data", "mobile", or "other",
  "seniority": one of "graduate", "junior", "mid", "senior", "staff", "lead", "manager", "architect", "principal", or "unknown",
  "posted_date": "YYYY-MM-DD" or null,
  "summary": "<one-sentence summary of the role>"
}}

Rules:
- must_have_keywords and nice_to_have_keywords must be disjoint.
- Only include genuinely technical skills as keywords; no soft skills.
- Use "other"/"unknown" when the posting gives no clear signal."#
    )
}
