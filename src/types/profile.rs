// src/types/profile.rs
//! Employee profile structures shared by the matching engine, the merger and storage

use super::lenient;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest client engagement description accepted, in words
pub const MAX_CLIENT_DESCRIPTION_WORDS: usize = 150;

// ===== Profile =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub emp_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tech: Vec<TechEntry>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub bandwidth: u8,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub work_mode: WorkMode,
    #[serde(default)]
    pub career_summary: Option<String>,
    #[serde(default)]
    pub search_phrase: Option<String>,
    #[serde(default)]
    pub work_history: Vec<WorkHistoryEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub clients: Vec<ClientEngagement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(emp_id: &str, name: &str) -> Self {
        Self {
            emp_id: emp_id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            location: None,
            tech: Vec::new(),
            experience_years: 0.0,
            bandwidth: 0,
            status: EmployeeStatus::default(),
            work_mode: WorkMode::default(),
            career_summary: None,
            search_phrase: None,
            work_history: Vec::new(),
            education: Vec::new(),
            clients: Vec::new(),
            last_updated: None,
        }
    }

    /// Tech names in insertion order
    pub fn tech_names(&self) -> impl Iterator<Item = &str> {
        self.tech.iter().map(|t| t.tech.as_str())
    }

    pub fn career_summary_text(&self) -> &str {
        self.career_summary.as_deref().unwrap_or("")
    }

    pub fn search_phrase_text(&self) -> &str {
        self.search_phrase.as_deref().unwrap_or("")
    }

    /// Reject values the storage layer must never hold
    pub fn validate(&self) -> Result<()> {
        if self.emp_id.trim().is_empty() {
            anyhow::bail!("Profile is missing an employee id");
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("Profile {} is missing a name", self.emp_id);
        }
        if self.bandwidth > 100 {
            anyhow::bail!(
                "Bandwidth for {} must be between 0 and 100, got {}",
                self.emp_id,
                self.bandwidth
            );
        }
        if !self.experience_years.is_finite() || self.experience_years < 0.0 {
            anyhow::bail!(
                "Experience for {} must be a non-negative number",
                self.emp_id
            );
        }
        for client in &self.clients {
            let words = client.description.split_whitespace().count();
            if words > MAX_CLIENT_DESCRIPTION_WORDS {
                anyhow::bail!(
                    "Client description for {} has {} words (max {})",
                    client.client_name,
                    words,
                    MAX_CLIENT_DESCRIPTION_WORDS
                );
            }
        }
        Ok(())
    }
}

// ===== List entries =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechEntry {
    pub tech: String,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub experience_years: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub level: TechLevel,
}

impl TechEntry {
    pub fn new(tech: &str, experience_years: f64, level: TechLevel) -> Self {
        Self {
            tech: tech.to_string(),
            experience_years,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHistoryEntry {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>, // None means current
}

impl WorkHistoryEntry {
    pub fn new(company: &str, role: &str) -> Self {
        Self {
            company: company.to_string(),
            role: role.to_string(),
            project: None,
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_year")]
    pub graduation_year: Option<i32>,
}

impl EducationEntry {
    pub fn new(institution: &str, degree: Option<&str>) -> Self {
        Self {
            institution: institution.to_string(),
            degree: degree.map(str::to_string),
            field_of_study: None,
            graduation_year: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEngagement {
    pub client_name: String,
    #[serde(default)]
    pub client_status: ClientStatus,
    #[serde(default)]
    pub description: String,
}

// ===== Enumerations =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TechLevel {
    #[default]
    #[serde(alias = "beginner", alias = "BEGINNER")]
    Beginner,
    #[serde(alias = "intermediate", alias = "INTERMEDIATE")]
    Intermediate,
    #[serde(alias = "advanced", alias = "ADVANCED")]
    Advanced,
    #[serde(alias = "expert", alias = "EXPERT")]
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    #[default]
    OnBench,
    OnClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkMode {
    Remote,
    #[default]
    Office,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Completed,
    Pipeline,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::OnBench => "ON_BENCH",
            EmployeeStatus::OnClient => "ON_CLIENT",
        }
    }
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "REMOTE",
            WorkMode::Office => "OFFICE",
            WorkMode::Hybrid => "HYBRID",
        }
    }
}

impl TechLevel {
    /// Level implied by years of hands-on use
    pub fn from_years(years: f64) -> Self {
        match years {
            y if y >= 8.0 => TechLevel::Expert,
            y if y >= 5.0 => TechLevel::Advanced,
            y if y >= 2.0 => TechLevel::Intermediate,
            _ => TechLevel::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TechLevel::Beginner => "Beginner",
            TechLevel::Intermediate => "Intermediate",
            TechLevel::Advanced => "Advanced",
            TechLevel::Expert => "Expert",
        }
    }
}

/// Uppercase and fold spaces/dashes so "on bench", "On-Bench" and "ON_BENCH" compare equal
fn enum_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for EmployeeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match enum_token(s).as_str() {
            "ON_BENCH" | "BENCH" => Ok(EmployeeStatus::OnBench),
            "ON_CLIENT" | "CLIENT" | "BILLABLE" => Ok(EmployeeStatus::OnClient),
            _ => anyhow::bail!("Unknown employee status: {}", s),
        }
    }
}

impl FromStr for WorkMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match enum_token(s).as_str() {
            "REMOTE" => Ok(WorkMode::Remote),
            "OFFICE" | "ONSITE" | "ON_SITE" => Ok(WorkMode::Office),
            "HYBRID" => Ok(WorkMode::Hybrid),
            _ => anyhow::bail!("Unknown work mode: {}", s),
        }
    }
}

impl FromStr for TechLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match enum_token(s).as_str() {
            "BEGINNER" => Ok(TechLevel::Beginner),
            "INTERMEDIATE" => Ok(TechLevel::Intermediate),
            "ADVANCED" => Ok(TechLevel::Advanced),
            "EXPERT" => Ok(TechLevel::Expert),
            _ => anyhow::bail!("Unknown tech level: {}", s),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_from_minimal_json() {
        let profile: Profile =
            serde_json::from_str(r#"{"emp_id": "EMP001", "name": "Jane Doe"}"#).unwrap();
        assert_eq!(profile.bandwidth, 0);
        assert_eq!(profile.experience_years, 0.0);
        assert_eq!(profile.status, EmployeeStatus::OnBench);
        assert!(profile.tech.is_empty());
        assert!(profile.clients.is_empty());
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&EmployeeStatus::OnClient).unwrap();
        assert_eq!(json, "\"ON_CLIENT\"");
        let mode: WorkMode = serde_json::from_str("\"HYBRID\"").unwrap();
        assert_eq!(mode, WorkMode::Hybrid);
        let level: TechLevel = serde_json::from_str("\"expert\"").unwrap();
        assert_eq!(level, TechLevel::Expert);
    }

    #[test]
    fn test_enum_from_str_is_lenient_on_case() {
        assert_eq!("on bench".parse::<EmployeeStatus>().unwrap(), EmployeeStatus::OnBench);
        assert_eq!("Remote".parse::<WorkMode>().unwrap(), WorkMode::Remote);
        assert!("sometimes".parse::<WorkMode>().is_err());
    }

    #[test]
    fn test_level_from_years() {
        assert_eq!(TechLevel::from_years(0.5), TechLevel::Beginner);
        assert_eq!(TechLevel::from_years(2.0), TechLevel::Intermediate);
        assert_eq!(TechLevel::from_years(5.0), TechLevel::Advanced);
        assert_eq!(TechLevel::from_years(12.0), TechLevel::Expert);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut profile = Profile::new("EMP001", "Jane");
        assert!(profile.validate().is_ok());

        profile.bandwidth = 120;
        assert!(profile.validate().is_err());

        profile.bandwidth = 50;
        profile.clients.push(ClientEngagement {
            client_name: "Acme".to_string(),
            client_status: ClientStatus::Active,
            description: "word ".repeat(151),
        });
        assert!(profile.validate().is_err());
    }
}
