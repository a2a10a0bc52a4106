// src/extraction/prompts.rs
//! Prompt templates sent to model-backed extractors

use crate::types::Profile;

/// Placeholder a custom prompt may use to position the pasted text
pub const PARTIAL_DATA_PLACEHOLDER: &str = "{partial_data}";

pub const PROFILE_EXTRACTION_PROMPT: &str = r#"You extract employee profile updates from free text.
Return ONLY a JSON object. Include a key only when the text states it; omit everything else.

Keys:
- "email", "phone", "location": strings
- "status": "ON_BENCH" or "ON_CLIENT"
- "bandwidth": integer percentage 0-100 of free capacity
- "work_mode": "REMOTE", "OFFICE" or "HYBRID"
- "experience": total years of professional experience (number)
- "career_summary": only when the text explicitly provides a summary
- "search_phrase": short searchable description
- "tech_stack": [{"tech": string, "experience_years": number, "level": "Beginner"|"Intermediate"|"Advanced"|"Expert"}]
- "work_history": [{"company": string, "role": string, "project": string?, "description": string?, "start_date": string?, "end_date": string?}]
- "education": [{"institution": string, "degree": string?, "field_of_study": string?, "graduation_year": integer?}]"#;

pub const JOB_DESCRIPTION_PROMPT: &str = r#"You analyse job descriptions for staffing.
Return ONLY a JSON object with:
- "required_skills": list of technologies or skills the role requires
- "minimum_experience_years": number or null
- "keywords": other important words (domain, seniority, location)"#;

pub const SUMMARY_PROMPT: &str = r#"Write a professional career summary of two or three sentences
for the employee below. Mention seniority, main technologies and recent roles.
Return plain text only, no headings and no JSON."#;

/// Build the user message for profile extraction.
///
/// A custom prompt containing `{partial_data}` gets the text substituted in
/// place; any other custom prompt, or the built-in one, gets the text appended.
pub fn render_profile_prompt(custom_prompt: Option<&str>, text: &str) -> String {
    match custom_prompt.filter(|p| !p.trim().is_empty()) {
        Some(prompt) if prompt.contains(PARTIAL_DATA_PLACEHOLDER) => {
            prompt.replace(PARTIAL_DATA_PLACEHOLDER, text)
        }
        Some(prompt) => append_user_input(prompt, text),
        None => append_user_input(PROFILE_EXTRACTION_PROMPT, text),
    }
}

pub fn render_job_description_prompt(text: &str) -> String {
    format!("{}\n\nJob Description:\n{}", JOB_DESCRIPTION_PROMPT, text)
}

pub fn render_summary_prompt(profile: &Profile) -> String {
    let facts = serde_json::json!({
        "name": profile.name,
        "location": profile.location,
        "experience_years": profile.experience_years,
        "tech": profile.tech_names().collect::<Vec<_>>(),
        "work_history": profile
            .work_history
            .iter()
            .map(|w| format!("{} at {}", w.role, w.company))
            .collect::<Vec<_>>(),
        "education": profile
            .education
            .iter()
            .map(|e| e.institution.as_str())
            .collect::<Vec<_>>(),
    });
    format!("{}\n\nEmployee:\n{}", SUMMARY_PROMPT, facts)
}

fn append_user_input(prompt: &str, text: &str) -> String {
    format!("{}\n\nUser Input:\n{}", prompt, text)
}
