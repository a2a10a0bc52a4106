// src/types/response.rs
use serde::{Deserialize, Serialize};

use crate::types::profile::Profile;

// ===== Matching Results =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Weighted contribution of each component, before scaling to 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub experience: f64,
    pub bandwidth: f64,
    pub project_activity: f64,
    pub client_load: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skill + self.experience + self.bandwidth + self.project_activity + self.client_load
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_tier: Option<u8>,
}

impl SearchHit {
    pub fn unranked(profile: Profile) -> Self {
        Self {
            profile,
            match_result: None,
            query_tier: None,
        }
    }

    pub fn match_score(&self) -> Option<f64> {
        self.match_result.as_ref().map(|m| m.match_score)
    }
}

// ===== Dashboard =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_employees: i64,
    pub on_bench: i64,
    pub billable: i64,
    pub bench_percentage: f64,
}

impl DashboardMetrics {
    pub fn from_counts(total_employees: i64, on_bench: i64, billable: i64) -> Self {
        let bench_percentage = if total_employees > 0 {
            on_bench as f64 / total_employees as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_employees,
            on_bench,
            billable,
            bench_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_percentage() {
        let metrics = DashboardMetrics::from_counts(4, 1, 3);
        assert_eq!(metrics.bench_percentage, 25.0);
        assert_eq!(metrics.billable, 3);
    }

    #[test]
    fn test_empty_store_has_zero_bench_percentage() {
        let metrics = DashboardMetrics::from_counts(0, 0, 0);
        assert_eq!(metrics.bench_percentage, 0.0);
    }
}
