// src/search/mod.rs
//! Filter, then score against a job description or rank against a query

pub mod store;

pub use store::{InMemoryProfileStore, ProfileStore};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::app_log;
use crate::extraction::ProfileExtractor;
use crate::matching::{MatchScorer, QueryRanker};
use crate::types::{EmployeeStatus, ParsedJobDescription, Profile, SearchHit};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring of the name
    #[serde(default)]
    pub name: Option<String>,
    /// Case-insensitive equality with any tech entry
    #[serde(default)]
    pub tech: Option<String>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub min_bandwidth: Option<u8>,
    #[serde(default)]
    pub min_experience: Option<f64>,
}

impl SearchFilters {
    pub fn name_filter(&self) -> Option<String> {
        non_blank(&self.name).map(str::to_lowercase)
    }

    pub fn tech_filter(&self) -> Option<String> {
        non_blank(&self.tech).map(str::to_lowercase)
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(name) = self.name_filter() {
            if !profile.name.to_lowercase().contains(&name) {
                return false;
            }
        }
        if let Some(tech) = self.tech_filter() {
            if !profile.tech_names().any(|t| t.trim().to_lowercase() == tech) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if profile.status != status {
                return false;
            }
        }
        if let Some(min_bandwidth) = self.min_bandwidth {
            if profile.bandwidth < min_bandwidth {
                return false;
            }
        }
        if let Some(min_experience) = self.min_experience {
            if profile.experience_years < min_experience {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl SearchRequest {
    pub fn with_query(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            ..Self::default()
        }
    }

    pub fn with_job_description(job_description: &str) -> Self {
        Self {
            job_description: Some(job_description.to_string()),
            ..Self::default()
        }
    }
}

pub struct SearchPipeline {
    scorer: MatchScorer,
    ranker: QueryRanker,
}

impl SearchPipeline {
    pub fn new(scorer: MatchScorer) -> Self {
        Self {
            scorer,
            ranker: QueryRanker,
        }
    }

    /// Fetch, then order by job description score, query tier, or not at all.
    /// A job description takes precedence over a query.
    pub async fn search(
        &self,
        store: &dyn ProfileStore,
        extractor: &dyn ProfileExtractor,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>> {
        let candidates = store.fetch_candidates(&request.filters).await?;
        app_log!(debug, "Search fetched {} candidates", candidates.len());

        if let Some(jd) = non_blank(&request.job_description) {
            let parsed = extractor.parse_job_description(jd).await?;
            app_log!(
                info,
                "Ranking {} candidates against job description ({} required skills)",
                candidates.len(),
                parsed.required_skills.len()
            );
            return Ok(self.rank_by_job_description(candidates, &parsed));
        }

        if let Some(query) = non_blank(&request.query) {
            return Ok(self.rank_by_query(candidates, query));
        }

        Ok(candidates.into_iter().map(SearchHit::unranked).collect())
    }

    /// Score every candidate; highest first, ties keep store order
    pub fn rank_by_job_description(
        &self,
        candidates: Vec<Profile>,
        jd: &ParsedJobDescription,
    ) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .map(|profile| {
                let result = self.scorer.score(&profile, jd);
                SearchHit {
                    profile,
                    match_result: Some(result),
                    query_tier: None,
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            let a = a.match_score().unwrap_or(0.0);
            let b = b.match_score().unwrap_or(0.0);
            b.total_cmp(&a)
        });
        hits
    }

    /// Tier every candidate; highest first, ties keep store order
    pub fn rank_by_query(&self, candidates: Vec<Profile>, query: &str) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .map(|profile| {
                let tier = self.ranker.rank(&profile, query);
                SearchHit {
                    profile,
                    match_result: None,
                    query_tier: Some(tier),
                }
            })
            .collect();

        hits.sort_by_key(|hit| std::cmp::Reverse(hit.query_tier.unwrap_or(0)));
        hits
    }
}

impl Default for SearchPipeline {
    fn default() -> Self {
        Self::new(MatchScorer::default())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::MockExtractor;
    use crate::types::{TechEntry, TechLevel};

    fn profile(emp_id: &str, name: &str, tech: &[&str], bandwidth: u8, experience: f64) -> Profile {
        let mut profile = Profile::new(emp_id, name);
        profile.tech = tech
            .iter()
            .map(|t| TechEntry::new(t, 1.0, TechLevel::Intermediate))
            .collect();
        profile.bandwidth = bandwidth;
        profile.experience_years = experience;
        profile
    }

    fn roster() -> Vec<Profile> {
        vec![
            profile("E1", "Alice", &["Python", "Django"], 100, 6.0),
            profile("E2", "Bob", &["Java", "Spring"], 50, 10.0),
            profile("E3", "Charlie", &["Python", "FastAPI", "React"], 100, 4.0),
        ]
    }

    #[test]
    fn test_filters_are_independent() {
        let filters = SearchFilters {
            tech: Some("python".to_string()),
            min_experience: Some(5.0),
            ..Default::default()
        };
        let matched: Vec<String> = roster()
            .into_iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.name)
            .collect();
        assert_eq!(matched, vec!["Alice"]);
    }

    #[test]
    fn test_tech_filter_is_equality_and_name_is_substring() {
        let by_tech = SearchFilters {
            tech: Some("Py".to_string()),
            ..Default::default()
        };
        assert!(roster().iter().all(|p| !by_tech.matches(p)));

        let by_name = SearchFilters {
            name: Some("LI".to_string()),
            ..Default::default()
        };
        let names: Vec<String> = roster()
            .into_iter()
            .filter(|p| by_name.matches(p))
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alice", "Charlie"]);
    }

    #[test]
    fn test_status_and_bandwidth_filters() {
        let mut profiles = roster();
        profiles[1].status = EmployeeStatus::OnClient;
        let filters = SearchFilters {
            status: Some(EmployeeStatus::OnBench),
            min_bandwidth: Some(60),
            ..Default::default()
        };
        let ids: Vec<String> = profiles
            .into_iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.emp_id)
            .collect();
        assert_eq!(ids, vec!["E1", "E3"]);
    }

    #[test]
    fn test_query_ranking_is_stable() {
        let hits = SearchPipeline::default().rank_by_query(roster(), "python");
        let names: Vec<&str> = hits.iter().map(|h| h.profile.name.as_str()).collect();
        // both Python profiles tie on the tech tier; Bob matches nothing
        assert_eq!(names, vec!["Alice", "Charlie", "Bob"]);
        assert_eq!(hits[0].query_tier, Some(40));
        assert_eq!(hits[2].query_tier, Some(0));
    }

    #[test]
    fn test_job_description_ranking() {
        let jd = ParsedJobDescription::new(&["Python", "FastAPI", "React"], None, &[]);
        let hits = SearchPipeline::default().rank_by_job_description(roster(), &jd);
        let names: Vec<&str> = hits.iter().map(|h| h.profile.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Alice", "Bob"]);
        assert!(hits.windows(2).all(|w| w[0].match_score() >= w[1].match_score()));
    }

    #[tokio::test]
    async fn test_search_without_ranking_keeps_store_order() {
        let store = InMemoryProfileStore::new(roster());
        let request = SearchRequest {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        let hits = SearchPipeline::default()
            .search(&store, &MockExtractor, &request)
            .await
            .unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.profile.emp_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2", "E3"]);
        assert!(hits.iter().all(|h| h.match_result.is_none() && h.query_tier.is_none()));
    }

    #[tokio::test]
    async fn test_job_description_wins_over_query() {
        let store = InMemoryProfileStore::new(roster());
        let request = SearchRequest {
            query: Some("Bob".to_string()),
            job_description: Some("Python and React engineer".to_string()),
            ..Default::default()
        };
        let hits = SearchPipeline::default()
            .search(&store, &MockExtractor, &request)
            .await
            .unwrap();
        assert_eq!(hits[0].profile.name, "Charlie");
        assert!(hits.iter().all(|h| h.query_tier.is_none()));
    }
}
