// src/types/mod.rs
pub mod extraction;
pub mod lenient;
pub mod profile;
pub mod response;

pub use extraction::{ExtractionResult, ParsedJobDescription};
pub use profile::{
    ClientEngagement, ClientStatus, EducationEntry, EmployeeStatus, Profile, TechEntry, TechLevel,
    WorkHistoryEntry, WorkMode,
};
pub use response::{DashboardMetrics, MatchResult, ScoreBreakdown, SearchHit};
