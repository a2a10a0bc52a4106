// src/search/store.rs
//! Candidate sources for the search pipeline

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::RwLock;

use super::SearchFilters;
use crate::types::Profile;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profiles satisfying every set filter, in store order
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Profile>>;
}

/// Profiles held in memory, in insertion order
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Load a JSON array of profiles
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read profiles from {}", path.display()))?;
        let profiles: Vec<Profile> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid profile JSON in {}", path.display()))?;

        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self::new(profiles))
    }

    /// Insert or replace by `emp_id`, keeping the existing position on replace
    pub async fn upsert(&self, profile: Profile) {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.emp_id == profile.emp_id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .iter()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_upsert_keeps_position() {
        let store = InMemoryProfileStore::new(vec![
            Profile::new("E1", "Alice"),
            Profile::new("E2", "Bob"),
        ]);
        let mut renamed = Profile::new("E1", "Alice Smith");
        renamed.bandwidth = 50;
        store.upsert(renamed).await;
        store.upsert(Profile::new("E3", "Charlie")).await;

        let all = store.fetch_candidates(&SearchFilters::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Smith", "Bob", "Charlie"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_from_json_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"emp_id": "E1", "name": "Alice", "bandwidth": 150}}]"#).unwrap();
        assert!(InMemoryProfileStore::from_json_file(file.path()).await.is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"emp_id": "E1", "name": "Alice", "bandwidth": 50}}]"#).unwrap();
        let store = InMemoryProfileStore::from_json_file(file.path()).await.unwrap();
        assert!(!store.is_empty().await);
    }
}
