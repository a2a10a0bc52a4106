use bench_matcher::extraction::MockExtractor;
use bench_matcher::types::{
    ClientEngagement, ClientStatus, EmployeeStatus, ParsedJobDescription, Profile, TechEntry,
    TechLevel, WorkHistoryEntry,
};
use bench_matcher::{
    Database, InMemoryProfileStore, MatchWeights, ProfileService, SearchFilters, SearchPipeline,
    SearchRequest,
};

fn employee(emp_id: &str, name: &str, tech: &[&str], search_phrase: &str) -> Profile {
    let mut profile = Profile::new(emp_id, name);
    profile.tech = tech
        .iter()
        .map(|t| TechEntry::new(t, 3.0, TechLevel::Intermediate))
        .collect();
    profile.bandwidth = 100;
    profile.experience_years = 5.0;
    profile.search_phrase = Some(search_phrase.to_string());
    profile
}

fn roster() -> Vec<Profile> {
    let mut alice = employee("E1", "Alice", &["Python", "Django"], "Python developer");
    alice.career_summary = Some("Experienced backend developer".to_string());
    alice.work_history = vec![WorkHistoryEntry::new("Alpha", "Backend Dev")];

    let mut bob = employee("E2", "Bob", &["Java", "Spring"], "Java developer");
    bob.career_summary = Some("Enterprise Java developer".to_string());
    bob.work_history = vec![WorkHistoryEntry::new("Beta", "Java Dev")];

    let mut charlie = employee("E3", "Charlie", &["Python", "FastAPI", "React"], "Full stack developer");
    charlie.career_summary = Some("Full stack engineer".to_string());
    charlie.work_history = vec![WorkHistoryEntry::new("Gamma", "Full Stack Dev")];

    vec![alice, bob, charlie]
}

fn names(hits: &[bench_matcher::types::SearchHit]) -> Vec<&str> {
    hits.iter().map(|h| h.profile.name.as_str()).collect()
}

#[tokio::test]
async fn test_job_description_orders_by_fit() {
    let db = Database::in_memory().await.unwrap();
    let service = ProfileService::new(&db, Box::new(MockExtractor), MatchWeights::default());
    service.import(roster()).await.unwrap();

    let request = SearchRequest::with_job_description(
        "Looking for a Python developer with FastAPI and React experience.",
    );
    let hits = service.search(&request).await.unwrap();

    assert_eq!(names(&hits), vec!["Charlie", "Alice", "Bob"]);
    let charlie = hits[0].match_result.as_ref().unwrap();
    assert_eq!(charlie.matched_skills, vec!["Python", "FastAPI", "React"]);
    for hit in &hits {
        let score = hit.match_score().unwrap();
        assert!((0.0..=100.0).contains(&score));
    }
}

#[tokio::test]
async fn test_filters_apply_before_ranking() {
    let db = Database::in_memory().await.unwrap();
    let service = ProfileService::new(&db, Box::new(MockExtractor), MatchWeights::default());
    service.import(roster()).await.unwrap();

    let request = SearchRequest {
        filters: SearchFilters {
            tech: Some("python".to_string()),
            ..Default::default()
        },
        job_description: Some("React engineer".to_string()),
        ..Default::default()
    };
    let hits = service.search(&request).await.unwrap();
    assert_eq!(names(&hits), vec!["Charlie", "Alice"]);
}

#[tokio::test]
async fn test_query_ranking_tiers() {
    let db = Database::in_memory().await.unwrap();
    let service = ProfileService::new(&db, Box::new(MockExtractor), MatchWeights::default());
    service.import(roster()).await.unwrap();

    // only Bob mentions Java, and only in his search phrase
    let hits = service.search(&SearchRequest::with_query("java")).await.unwrap();
    assert_eq!(hits[0].profile.name, "Bob");
    assert_eq!(hits[0].query_tier, Some(60));

    let hits = service.search(&SearchRequest::with_query("charlie")).await.unwrap();
    assert_eq!(hits[0].query_tier, Some(100));

    let hits = service.search(&SearchRequest::with_query("react")).await.unwrap();
    assert_eq!(names(&hits), vec!["Charlie", "Alice", "Bob"]);
    assert_eq!(hits[0].query_tier, Some(40));
}

#[tokio::test]
async fn test_in_memory_store_matches_sqlite_store() {
    let db = Database::in_memory().await.unwrap();
    let service = ProfileService::new(&db, Box::new(MockExtractor), MatchWeights::default());
    service.import(roster()).await.unwrap();

    let memory = InMemoryProfileStore::new(service.repository().list().await.unwrap());
    let pipeline = SearchPipeline::default();
    let request = SearchRequest {
        filters: SearchFilters {
            min_experience: Some(4.0),
            status: Some(EmployeeStatus::OnBench),
            ..Default::default()
        },
        job_description: Some("Django and Python, 3+ years".to_string()),
        ..Default::default()
    };

    let from_memory = pipeline.search(&memory, &MockExtractor, &request).await.unwrap();
    let from_sqlite = service.search(&request).await.unwrap();
    assert_eq!(names(&from_memory), names(&from_sqlite));
    assert_eq!(from_memory[0].profile.name, "Alice");
}

#[test]
fn test_reference_scores() {
    let mut john = Profile::new("EMP001", "John Doe");
    john.tech = vec![
        TechEntry::new("Python", 5.0, TechLevel::Expert),
        TechEntry::new("React", 3.0, TechLevel::Advanced),
    ];
    john.experience_years = 8.0;
    john.bandwidth = 100;
    john.work_history = vec![
        WorkHistoryEntry::new("A", "Dev"),
        WorkHistoryEntry::new("B", "Dev"),
        WorkHistoryEntry::new("C", "Dev"),
    ];
    john.clients = vec![ClientEngagement {
        client_name: "Umbrella".to_string(),
        client_status: ClientStatus::Active,
        description: String::new(),
    }];

    let pipeline = SearchPipeline::default();
    let jd = ParsedJobDescription::new(&["Python", "React"], Some(5.0), &[]);
    let hits = pipeline.rank_by_job_description(vec![john.clone()], &jd);
    assert_eq!(hits[0].match_score(), Some(94.0));

    let jd = ParsedJobDescription::new(&["Python", "Java"], Some(10.0), &[]);
    let hits = pipeline.rank_by_job_description(vec![john.clone()], &jd);
    assert_eq!(hits[0].match_score(), Some(70.0));

    john.bandwidth = 0;
    let jd = ParsedJobDescription::new(&["Python", "React"], Some(5.0), &[]);
    let hits = pipeline.rank_by_job_description(vec![john], &jd);
    assert_eq!(hits[0].match_score(), Some(74.0));
}
