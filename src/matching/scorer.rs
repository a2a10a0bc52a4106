// src/matching/scorer.rs
//! Composite match score of a profile against a parsed job description

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{MatchResult, ParsedJobDescription, Profile, ScoreBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skill: f64,
    pub experience: f64,
    pub bandwidth: f64,
    pub project_activity: f64,
    pub client_load: f64,
    /// Work history entries beyond this count earn nothing more
    pub project_cap: usize,
    /// Clients at or beyond this count zero the client-load component
    pub client_cap: usize,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill: 0.40,
            experience: 0.20,
            bandwidth: 0.20,
            project_activity: 0.10,
            client_load: 0.10,
            project_cap: 5,
            client_cap: 5,
        }
    }
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.experience + self.bandwidth + self.project_activity + self.client_load
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: MatchWeights,
}

impl MatchScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn score(&self, profile: &Profile, jd: &ParsedJobDescription) -> MatchResult {
        let (skill, matched_skills) = self.score_skills(profile, jd);
        let breakdown = ScoreBreakdown {
            skill,
            experience: self.score_experience(profile, jd),
            bandwidth: self.score_bandwidth(profile),
            project_activity: self.score_project_activity(profile),
            client_load: self.score_client_load(profile),
        };

        let match_score = round_one_decimal(breakdown.total() * 100.0).clamp(0.0, 100.0);

        MatchResult {
            match_score,
            matched_skills,
            breakdown,
        }
    }

    fn score_skills(&self, profile: &Profile, jd: &ParsedJobDescription) -> (f64, Vec<String>) {
        let required = dedup_case_insensitive(&jd.required_skills);

        if !required.is_empty() {
            let tech: HashSet<String> = profile.tech_names().map(|t| t.to_lowercase()).collect();
            let matched: Vec<String> = required
                .iter()
                .filter(|skill| tech.contains(&skill.to_lowercase()))
                .cloned()
                .collect();
            let ratio = matched.len() as f64 / required.len() as f64;
            return (ratio * self.weights.skill, matched);
        }

        let keywords = dedup_case_insensitive(&jd.keywords);
        if keywords.is_empty() {
            // No skill constraint at all: nothing to fail
            return (self.weights.skill, Vec::new());
        }

        let haystack = format!(
            "{} {}",
            profile.career_summary_text(),
            profile.search_phrase_text()
        )
        .to_lowercase();
        let found = keywords
            .iter()
            .filter(|kw| haystack.contains(&kw.to_lowercase()))
            .count();

        (found as f64 / keywords.len() as f64 * self.weights.skill, Vec::new())
    }

    fn score_experience(&self, profile: &Profile, jd: &ParsedJobDescription) -> f64 {
        match jd.minimum_experience_years {
            Some(minimum) if minimum > 0.0 => {
                if profile.experience_years >= minimum {
                    self.weights.experience
                } else {
                    profile.experience_years.max(0.0) / minimum * self.weights.experience
                }
            }
            _ => self.weights.experience,
        }
    }

    fn score_bandwidth(&self, profile: &Profile) -> f64 {
        if profile.bandwidth > 0 {
            self.weights.bandwidth
        } else {
            0.0
        }
    }

    fn score_project_activity(&self, profile: &Profile) -> f64 {
        let cap = self.weights.project_cap.max(1);
        let projects = profile.work_history.len().min(cap);
        projects as f64 / cap as f64 * self.weights.project_activity
    }

    fn score_client_load(&self, profile: &Profile) -> f64 {
        let cap = self.weights.client_cap.max(1);
        let headroom = cap.saturating_sub(profile.clients.len());
        headroom as f64 / cap as f64 * self.weights.client_load
    }
}

/// Keeps the first spelling of each case-insensitive value, skipping blanks
fn dedup_case_insensitive(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
