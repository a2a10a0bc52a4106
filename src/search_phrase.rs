// src/search_phrase.rs
//! Deterministic one-line search phrase built from a profile

use crate::types::Profile;

const SECTION_SEPARATOR: &str = " | ";

/// `"{name} ({emp_id}) | {location} | {status} | {work_mode} | {bandwidth}% available | {exp} yrs | Tech: ... | History: ... | Clients: ..."`;
/// sections with nothing to say are left out
pub fn generate(profile: &Profile) -> String {
    let mut sections = vec![format!("{} ({})", profile.name.trim(), profile.emp_id.trim())];

    if let Some(location) = profile.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        sections.push(location.to_string());
    }
    sections.push(profile.status.to_string());
    sections.push(profile.work_mode.to_string());
    sections.push(format!("{}% available", profile.bandwidth));
    sections.push(format!("{} yrs", format_years(profile.experience_years)));

    let tech: Vec<&str> = profile
        .tech_names()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if !tech.is_empty() {
        sections.push(format!("Tech: {}", tech.join(", ")));
    }

    let history: Vec<String> = profile
        .work_history
        .iter()
        .map(|w| format!("{} ({})", w.company.trim(), w.role.trim()))
        .collect();
    if !history.is_empty() {
        sections.push(format!("History: {}", history.join(", ")));
    }

    let clients: Vec<String> = profile
        .clients
        .iter()
        .map(|c| match c.description.trim() {
            "" => c.client_name.trim().to_string(),
            description => format!("{} [{}]", c.client_name.trim(), description),
        })
        .collect();
    if !clients.is_empty() {
        sections.push(format!("Clients: {}", clients.join(", ")));
    }

    sections.join(SECTION_SEPARATOR)
}

/// Whole years without a decimal point, otherwise one decimal
pub fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{:.0}", years)
    } else {
        format!("{:.1}", years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ClientEngagement, ClientStatus, EmployeeStatus, TechEntry, TechLevel, WorkHistoryEntry,
        WorkMode,
    };

    fn alice() -> Profile {
        let mut profile = Profile::new("EMP001", "Alice Smith");
        profile.location = Some("Remote".to_string());
        profile.bandwidth = 100;
        profile.status = EmployeeStatus::OnBench;
        profile.work_mode = WorkMode::Remote;
        profile.experience_years = 8.0;
        profile.tech = vec![
            TechEntry::new("Python", 0.0, TechLevel::Beginner),
            TechEntry::new("FastAPI", 0.0, TechLevel::Beginner),
        ];
        profile.work_history = vec![
            WorkHistoryEntry::new("TechCorp", "Senior Dev"),
            WorkHistoryEntry::new("StartUp", "Lead"),
        ];
        profile.clients = vec![ClientEngagement {
            client_name: "Client A".to_string(),
            client_status: ClientStatus::Active,
            description: "Big bank project".to_string(),
        }];
        profile
    }

    #[test]
    fn test_full_phrase() {
        assert_eq!(
            generate(&alice()),
            "Alice Smith (EMP001) | Remote | ON_BENCH | REMOTE | 100% available | 8 yrs | \
             Tech: Python, FastAPI | History: TechCorp (Senior Dev), StartUp (Lead) | \
             Clients: Client A [Big bank project]"
        );
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut profile = Profile::new("E9", "Bob");
        profile.experience_years = 2.5;
        assert_eq!(
            generate(&profile),
            "Bob (E9) | ON_BENCH | OFFICE | 0% available | 2.5 yrs"
        );
    }

    #[test]
    fn test_client_without_description() {
        let mut profile = alice();
        profile.clients[0].description = String::new();
        assert!(generate(&profile).ends_with("Clients: Client A"));
    }

    #[test]
    fn test_format_years() {
        assert_eq!(format_years(8.0), "8");
        assert_eq!(format_years(3.5), "3.5");
        assert_eq!(format_years(0.0), "0");
    }
}
