// src/types/extraction.rs
//! Structured output of the text-extraction collaborator and of job description parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::profile::{EducationEntry, EmployeeStatus, TechEntry, WorkHistoryEntry, WorkMode};

// ===== Extraction Result =====

/// Partial profile fields found in pasted text. A `None` field means nothing
/// new was found, never "clear the existing value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_enum")]
    pub status: Option<EmployeeStatus>,
    #[serde(default, deserialize_with = "lenient::optional_percent")]
    pub bandwidth: Option<u8>,
    #[serde(default, deserialize_with = "lenient::optional_enum")]
    pub work_mode: Option<WorkMode>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub career_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub search_phrase: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<Vec<TechEntry>>,
    #[serde(default)]
    pub work_history: Option<Vec<WorkHistoryEntry>>,
    #[serde(default)]
    pub education: Option<Vec<EducationEntry>>,
}

impl ExtractionResult {
    /// Parse a model response; tolerates Markdown code fences and prose around the object
    pub fn from_model_output(raw: &str) -> Result<Self> {
        let json = extract_json_object(raw)
            .with_context(|| format!("No JSON object found in model output: {}", raw))?;
        let result: ExtractionResult =
            serde_json::from_str(json).context("Model output does not match the extraction shape")?;
        result.validate()?;
        Ok(result)
    }

    /// True when the extraction carries no information at all
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.bandwidth.is_none()
            && self.work_mode.is_none()
            && self.experience.is_none()
            && self.career_summary.is_none()
            && self.search_phrase.is_none()
            && self.tech_stack.as_ref().map_or(true, Vec::is_empty)
            && self.work_history.as_ref().map_or(true, Vec::is_empty)
            && self.education.as_ref().map_or(true, Vec::is_empty)
    }

    /// Reject values the merge must never see
    pub fn validate(&self) -> Result<()> {
        if let Some(experience) = self.experience {
            if !experience.is_finite() || experience < 0.0 {
                anyhow::bail!("Extracted experience must be a non-negative number, got {}", experience);
            }
        }
        for entry in self.tech_stack.iter().flatten() {
            if entry.tech.trim().is_empty() {
                anyhow::bail!("Extracted tech entry has an empty name");
            }
        }
        for entry in self.work_history.iter().flatten() {
            if entry.company.trim().is_empty() {
                anyhow::bail!("Extracted work history entry has an empty company");
            }
        }
        for entry in self.education.iter().flatten() {
            if entry.institution.trim().is_empty() {
                anyhow::bail!("Extracted education entry has an empty institution");
            }
        }
        Ok(())
    }
}

// ===== Parsed Job Description =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub minimum_experience_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub keywords: Vec<String>,
}

impl ParsedJobDescription {
    pub fn new(required_skills: &[&str], minimum_experience_years: Option<f64>, keywords: &[&str]) -> Self {
        Self {
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
            minimum_experience_years,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_model_output(raw: &str) -> Result<Self> {
        let json = extract_json_object(raw)
            .with_context(|| format!("No JSON object found in model output: {}", raw))?;
        serde_json::from_str(json).context("Model output does not match the job description shape")
    }
}

/// Slice from the first `{` to the last `}`, which also drops ```json fences
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_and_missing_keys_mean_no_information() {
        let result =
            ExtractionResult::from_model_output(r#"{"name": "Ignored", "favourite_colour": "blue"}"#)
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parses_fenced_model_output() {
        let raw = "Here you go:\n```json\n{\"phone\": \"9999999999\", \"status\": \"ON_BENCH\", \
                   \"bandwidth\": 80, \"work_mode\": \"remote\", \"experience\": 7.0, \
                   \"tech_stack\": [{\"tech\": \"React\", \"experience_years\": 2, \"level\": \"Intermediate\"}]}\n```";
        let result = ExtractionResult::from_model_output(raw).unwrap();
        assert_eq!(result.phone.as_deref(), Some("9999999999"));
        assert_eq!(result.status, Some(EmployeeStatus::OnBench));
        assert_eq!(result.bandwidth, Some(80));
        assert_eq!(result.work_mode, Some(WorkMode::Remote));
        assert_eq!(result.experience, Some(7.0));
        assert_eq!(result.tech_stack.unwrap()[0].tech, "React");
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let result = ExtractionResult::from_model_output(
            r#"{"email": "", "status": "", "career_summary": "   ", "tech_stack": []}"#,
        )
        .unwrap();
        assert_eq!(result.email, None);
        assert_eq!(result.status, None);
        assert_eq!(result.career_summary, None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_output_is_rejected() {
        assert!(ExtractionResult::from_model_output(r#"{"experience": "lots"}"#).is_err());
        assert!(ExtractionResult::from_model_output(r#"{"tech_stack": "Python"}"#).is_err());
        assert!(ExtractionResult::from_model_output(r#"{"status": "ON_HOLIDAY"}"#).is_err());
        assert!(ExtractionResult::from_model_output("no json here").is_err());
    }

    #[test]
    fn test_job_description_with_nulls() {
        let parsed = ParsedJobDescription::from_model_output(
            r#"{"required_skills": ["Rust"], "minimum_experience_years": null, "keywords": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.required_skills, vec!["Rust".to_string()]);
        assert_eq!(parsed.minimum_experience_years, None);
        assert!(parsed.keywords.is_empty());
    }
}
