// src/merge/mod.rs
//! Non-destructive merge of extracted fields into an existing profile

pub mod dedup;

pub use dedup::{DedupIndex, DedupKey};

use serde::Serialize;

use crate::types::{ExtractionResult, Profile};

/// Merged profile plus what the merge changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub profile: Profile,
    pub updated_fields: Vec<&'static str>,
    pub added_tech: usize,
    pub added_work_history: usize,
    pub added_education: usize,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.updated_fields.is_empty()
            && self.added_tech == 0
            && self.added_work_history == 0
            && self.added_education == 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMerger;

impl FieldMerger {
    pub fn merge(&self, current: &Profile, extraction: &ExtractionResult) -> Profile {
        self.merge_detailed(current, extraction).profile
    }

    pub fn merge_detailed(&self, current: &Profile, extraction: &ExtractionResult) -> MergeOutcome {
        let mut profile = current.clone();
        let mut updated_fields = Vec::new();

        if let Some(email) = present(&extraction.email) {
            overwrite(&mut profile.email, email, "email", &mut updated_fields);
        }
        if let Some(phone) = present(&extraction.phone) {
            overwrite(&mut profile.phone, phone, "phone", &mut updated_fields);
        }
        if let Some(location) = present(&extraction.location) {
            overwrite(&mut profile.location, location, "location", &mut updated_fields);
        }
        if let Some(summary) = present(&extraction.career_summary) {
            overwrite(&mut profile.career_summary, summary, "career_summary", &mut updated_fields);
        }
        if let Some(phrase) = present(&extraction.search_phrase) {
            overwrite(&mut profile.search_phrase, phrase, "search_phrase", &mut updated_fields);
        }

        if let Some(status) = extraction.status {
            if profile.status != status {
                profile.status = status;
                updated_fields.push("status");
            }
        }
        if let Some(work_mode) = extraction.work_mode {
            if profile.work_mode != work_mode {
                profile.work_mode = work_mode;
                updated_fields.push("work_mode");
            }
        }
        if let Some(bandwidth) = extraction.bandwidth {
            if profile.bandwidth != bandwidth {
                profile.bandwidth = bandwidth;
                updated_fields.push("bandwidth");
            }
        }
        if let Some(experience) = extraction.experience {
            if profile.experience_years != experience {
                profile.experience_years = experience;
                updated_fields.push("experience_years");
            }
        }

        let (tech, added_tech) = append_new(&profile.tech, extraction.tech_stack.as_deref());
        let (work_history, added_work_history) =
            append_new(&profile.work_history, extraction.work_history.as_deref());
        let (education, added_education) =
            append_new(&profile.education, extraction.education.as_deref());

        profile.tech = tech;
        profile.work_history = work_history;
        profile.education = education;

        MergeOutcome {
            profile,
            updated_fields,
            added_tech,
            added_work_history,
            added_education,
        }
    }
}

/// Present means non-null and not blank
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn overwrite(
    target: &mut Option<String>,
    value: &str,
    field: &'static str,
    updated: &mut Vec<&'static str>,
) {
    if target.as_deref() != Some(value) {
        *target = Some(value.to_string());
        updated.push(field);
    }
}

fn append_new<T: DedupKey + Clone>(existing: &[T], incoming: Option<&[T]>) -> (Vec<T>, usize) {
    match incoming {
        Some(incoming) if !incoming.is_empty() => {
            let mut index = DedupIndex::from_existing(existing);
            let added = index.extend(incoming);
            (index.into_entries(), added)
        }
        _ => (existing.to_vec(), 0),
    }
}
