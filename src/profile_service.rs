// src/profile_service.rs
//! Profile workflows tying storage, extraction, merging and search together

use anyhow::Result;

use crate::app_log;
use crate::core::{Database, ProfileRepository};
use crate::extraction::ProfileExtractor;
use crate::matching::{MatchScorer, MatchWeights};
use crate::merge::{FieldMerger, MergeOutcome};
use crate::search::{SearchPipeline, SearchRequest};
use crate::search_phrase;
use crate::types::{Profile, SearchHit};

pub struct ProfileService<'a> {
    repository: ProfileRepository<'a>,
    extractor: Box<dyn ProfileExtractor>,
    merger: FieldMerger,
    pipeline: SearchPipeline,
}

impl<'a> ProfileService<'a> {
    pub fn new(db: &'a Database, extractor: Box<dyn ProfileExtractor>, weights: MatchWeights) -> Self {
        Self {
            repository: db.profiles(),
            extractor,
            merger: FieldMerger,
            pipeline: SearchPipeline::new(MatchScorer::new(weights)),
        }
    }

    pub fn repository(&self) -> &ProfileRepository<'a> {
        &self.repository
    }

    pub fn extractor(&self) -> &dyn ProfileExtractor {
        self.extractor.as_ref()
    }

    /// Store profiles, filling in a search phrase where none was given
    pub async fn import(&self, profiles: Vec<Profile>) -> Result<usize> {
        let profiles: Vec<Profile> = profiles
            .into_iter()
            .map(|mut profile| {
                if profile.search_phrase_text().trim().is_empty() {
                    profile.search_phrase = Some(search_phrase::generate(&profile));
                }
                profile
            })
            .collect();

        self.repository.upsert_many(&profiles).await
    }

    /// Extract fields from pasted text and merge them into the stored profile
    pub async fn autofill(&self, emp_id: &str, text: &str) -> Result<MergeOutcome> {
        if text.trim().is_empty() {
            anyhow::bail!("No text to extract profile fields from");
        }

        let current = self.repository.require(emp_id).await?;
        let extraction = self.extractor.extract_profile_fields(text).await?;
        let mut outcome = self.merger.merge_detailed(&current, &extraction);

        if outcome.is_unchanged() {
            app_log!(info, "Autofill found nothing new for {}", emp_id);
            return Ok(outcome);
        }

        app_log!(
            info,
            "Autofill for {}: updated {:?}, +{} tech, +{} history, +{} education",
            emp_id,
            outcome.updated_fields,
            outcome.added_tech,
            outcome.added_work_history,
            outcome.added_education
        );
        outcome.profile = self.repository.upsert(&outcome.profile).await?;
        Ok(outcome)
    }

    pub async fn generate_summary(&self, emp_id: &str) -> Result<Profile> {
        let mut profile = self.repository.require(emp_id).await?;
        let summary = self.extractor.summarize(&profile).await?;

        app_log!(info, "Generated summary for {} via {}", emp_id, self.extractor.provider());
        profile.career_summary = Some(summary);
        self.repository.upsert(&profile).await
    }

    pub async fn refresh_search_phrase(&self, emp_id: &str) -> Result<Profile> {
        let mut profile = self.repository.require(emp_id).await?;
        profile.search_phrase = Some(search_phrase::generate(&profile));
        self.repository.upsert(&profile).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.pipeline
            .search(&self.repository, self.extractor.as_ref(), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::MockExtractor;
    use crate::types::{EmployeeStatus, TechEntry, TechLevel, WorkMode};

    async fn service(db: &Database) -> ProfileService<'_> {
        let service = ProfileService::new(db, Box::new(MockExtractor), MatchWeights::default());
        let mut jane = Profile::new("EMP007", "Jane Doe");
        jane.tech = vec![TechEntry::new("Python", 5.0, TechLevel::Expert)];
        jane.bandwidth = 100;
        service.import(vec![jane]).await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_import_fills_search_phrase() {
        let db = Database::in_memory().await.unwrap();
        let service = service(&db).await;
        let jane = service.repository().require("EMP007").await.unwrap();
        assert!(jane.search_phrase_text().starts_with("Jane Doe (EMP007)"));
    }

    #[tokio::test]
    async fn test_autofill_merges_and_persists() {
        let db = Database::in_memory().await.unwrap();
        let service = service(&db).await;

        let outcome = service
            .autofill("EMP007", "Now working remote, 60% bandwidth. Picked up python and Kafka")
            .await
            .unwrap();
        assert_eq!(outcome.profile.bandwidth, 60);
        assert_eq!(outcome.profile.work_mode, WorkMode::Remote);
        assert_eq!(outcome.added_tech, 1);

        let stored = service.repository().require("EMP007").await.unwrap();
        let tech: Vec<&str> = stored.tech_names().collect();
        assert_eq!(tech, vec!["Python", "Kafka"]);
        assert_eq!(stored.status, EmployeeStatus::OnBench);

        let again = service
            .autofill("EMP007", "Now working remote, 60% bandwidth. Picked up python and Kafka")
            .await
            .unwrap();
        assert!(again.is_unchanged());
    }

    #[tokio::test]
    async fn test_autofill_rejects_unknown_profile_and_blank_text() {
        let db = Database::in_memory().await.unwrap();
        let service = service(&db).await;
        assert!(service.autofill("EMP404", "I know Rust").await.is_err());
        assert!(service.autofill("EMP007", "   ").await.is_err());
    }

    #[tokio::test]
    async fn test_summary_and_search_phrase_refresh() {
        let db = Database::in_memory().await.unwrap();
        let service = service(&db).await;

        let summarized = service.generate_summary("EMP007").await.unwrap();
        assert!(summarized.career_summary_text().contains("skilled in Python"));

        let mut jane = summarized.clone();
        jane.location = Some("Lisbon".to_string());
        service.repository().upsert(&jane).await.unwrap();

        let refreshed = service.refresh_search_phrase("EMP007").await.unwrap();
        assert!(refreshed.search_phrase_text().contains("| Lisbon |"));
    }
}
