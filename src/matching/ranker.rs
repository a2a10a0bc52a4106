// src/matching/ranker.rs
//! Relevance tiers for free-text queries when no job description is given

use crate::types::Profile;

pub const TIER_EXACT: u8 = 100;
pub const TIER_NAME: u8 = 80;
pub const TIER_SEARCH_PHRASE: u8 = 60;
pub const TIER_TECH: u8 = 40;
pub const TIER_NONE: u8 = 0;

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryRanker;

impl QueryRanker {
    /// First matching rule wins, tiers are never summed
    pub fn rank(&self, profile: &Profile, query: &str) -> u8 {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return TIER_NONE;
        }

        let name = profile.name.to_lowercase();
        if name == query || profile.emp_id.to_lowercase() == query {
            return TIER_EXACT;
        }
        if name.contains(&query) {
            return TIER_NAME;
        }
        if profile.search_phrase_text().to_lowercase().contains(&query) {
            return TIER_SEARCH_PHRASE;
        }

        let tech = profile.tech_names().collect::<Vec<_>>().join(", ").to_lowercase();
        if tech.contains(&query) {
            return TIER_TECH;
        }

        TIER_NONE
    }
}
