// src/core/mod.rs
//! Core services: configuration, storage, file system and model HTTP client

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::{ConfigManager, ExtractorConfig};
pub use database::{Database, ProfileRepository};
pub use fs_ops::FsOps;
pub use service_client::ServiceClient;
