// src/matching/mod.rs
//! Tokenization, job-description scoring and query ranking

pub mod ranker;
pub mod scorer;
pub mod tokenizer;

pub use ranker::QueryRanker;
pub use scorer::{MatchScorer, MatchWeights};
pub use tokenizer::tokenize;
