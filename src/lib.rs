// src/lib.rs
//! Bench staffing engine: profile storage, job description matching, query
//! ranking and non-destructive profile autofill

pub mod core;
pub mod extraction;
pub mod matching;
pub mod merge;
pub mod profile_service;
pub mod search;
pub mod search_phrase;
pub mod staff_cli;
pub mod types;

pub use crate::core::{ConfigManager, Database, ProfileRepository};
pub use extraction::{build_extractor, ProfileExtractor};
pub use matching::{MatchScorer, MatchWeights, QueryRanker};
pub use merge::{FieldMerger, MergeOutcome};
pub use profile_service::ProfileService;
pub use search::{InMemoryProfileStore, ProfileStore, SearchFilters, SearchPipeline, SearchRequest};

/// Log through `tracing` at the given level: `app_log!(info, "Stored {}", id)`
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_app_log_expands_for_each_level() {
        let emp_id = "EMP001";
        app_log!(info, "Stored {}", emp_id);
        app_log!(warn, "Slow extractor for {}: {}ms", emp_id, 1200);
    }
}
