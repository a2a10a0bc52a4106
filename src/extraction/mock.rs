// src/extraction/mock.rs
//! Offline extractor: deterministic pattern matching, no model required

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{ExtractorProvider, ProfileExtractor};
use crate::matching::tokenize;
use crate::search_phrase::format_years;
use crate::types::{
    EducationEntry, EmployeeStatus, ExtractionResult, ParsedJobDescription, Profile, TechEntry,
    TechLevel, WorkHistoryEntry, WorkMode,
};

/// Technologies recognised in free text, in their canonical spelling
const KNOWN_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "React", "Angular", "Vue", "Node.js",
    "Django", "Flask", "FastAPI", "Spring", "Kotlin", "Swift", "Golang", "Rust", "C#", ".NET",
    "C++", "Ruby", "Rails", "PHP", "Laravel", "Scala", "Elixir", "Flutter", "SQL",
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Kafka", "Spark", "Hadoop", "GraphQL", "Docker",
    "Kubernetes", "Terraform", "AWS", "Azure", "GCP", "Linux", "TensorFlow", "PyTorch",
];

/// Words too common in job descriptions to be useful keywords
const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "you", "your", "our", "are", "will", "who", "have", "has",
    "this", "that", "from", "looking", "years", "year", "experience", "must", "plus", "nice",
    "strong", "good", "role", "job", "team", "work", "skills", "knowledge", "required",
];

static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    KNOWN_SKILLS
        .iter()
        .filter_map(|skill| {
            let pattern = format!(
                r"(?i)(?:^|[^a-z0-9+#.]){}(?:$|[^a-z0-9+#])",
                regex::escape(skill)
            );
            Regex::new(&pattern).ok().map(|re| (*skill, re))
        })
        .collect()
});

static CLAUSE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;\n]|\.(?:\s+|$)").unwrap());
static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b").unwrap());
static TOTAL_EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:total\s+|overall\s+|professional\s+|industry\s+)?experience",
    )
    .unwrap()
});
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:phone|mobile|cell|tel|contact)\D{0,15}?(\+?\d[\d\s().-]{6,}\d)").unwrap()
});
static BANDWIDTH_BEFORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:bandwidth|availab\w*|capacity)\D{0,20}?(\d{1,3})\s*%").unwrap()
});
static BANDWIDTH_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,3})\s*%\s*(?:bandwidth|availab\w*|free|capacity)").unwrap()
});
static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(on (?:the )?bench|on_bench|benched|on (?:a )?client|on_client|billable|allocated to|deployed (?:at|to))\b")
        .unwrap()
});
static WORK_MODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hybrid|remote(?:ly)?|work from home|wfh|on-?site|office)\b").unwrap()
});
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[Bb]ased in|[Ll]ocated in|[Ll]ocation:?|[Rr]elocated to)\s+([A-Z][A-Za-z'-]*(?:,? [A-Z][A-Za-z'-]*)*)",
    )
    .unwrap()
});
static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)(?:career\s+)?summary\s*:\s*(.+)$").unwrap());
static WORK_HISTORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[Ww]orked|[Ww]orking|[Ww]ork) (?:at|for) ([A-Z][\w&-]*(?: [A-Z][\w&-]*)*) as (?:an? |the )?([A-Za-z][A-Za-z-]*(?: [A-Z][A-Za-z-]*){0,3})",
    )
    .unwrap()
});
static EDUCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[Gg]raduated from|[Ss]tudied at|[Dd]egree from) ((?:the )?[A-Z][\w&-]*(?: (?:of |the |for )?[A-Z][\w&-]*)*)",
    )
    .unwrap()
});
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(B\.?Sc|M\.?Sc|B\.?Tech|M\.?Tech|MBA|Ph\.?D|Bachelor(?:'s)?|Master(?:'s)?)\b")
        .unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct MockExtractor;

impl MockExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of `extract_profile_fields`
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let clauses = split_clauses(text);

        ExtractionResult {
            email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
            phone: capture(&PHONE_RE, text).map(|p| p.trim().to_string()),
            location: capture(&LOCATION_RE, text),
            status: detect_status(text),
            bandwidth: detect_bandwidth(text),
            work_mode: detect_work_mode(text),
            experience: detect_total_experience(&clauses),
            career_summary: SUMMARY_RE
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            search_phrase: None,
            tech_stack: non_empty(detect_tech(&clauses)),
            work_history: non_empty(detect_work_history(text)),
            education: non_empty(detect_education(&clauses)),
        }
    }

    pub fn parse(&self, text: &str) -> ParsedJobDescription {
        let required_skills: Vec<String> = skills_in_order(text)
            .into_iter()
            .map(str::to_string)
            .collect();

        let minimum_experience_years = YEARS_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        let skill_tokens: HashSet<String> = required_skills.iter().map(|s| s.to_lowercase()).collect();
        let keywords = tokenize(text)
            .into_iter()
            .filter(|t| !STOPWORDS.contains(&t.as_str()) && !skill_tokens.contains(t))
            .collect();

        ParsedJobDescription {
            required_skills,
            minimum_experience_years,
            keywords,
        }
    }

    pub fn summary(&self, profile: &Profile) -> String {
        let mut summary = format!(
            "{} is a professional with {} years of experience",
            profile.name,
            format_years(profile.experience_years)
        );

        let top_tech: Vec<&str> = profile.tech_names().take(3).collect();
        if !top_tech.is_empty() {
            summary.push_str(&format!(", skilled in {}", top_tech.join(", ")));
        }
        if let Some(location) = profile.location.as_deref().filter(|l| !l.trim().is_empty()) {
            summary.push_str(&format!(", based in {}", location));
        }
        summary.push('.');

        if let Some(latest) = profile.work_history.last() {
            summary.push_str(&format!(
                " Most recently worked as {} at {}.",
                latest.role, latest.company
            ));
        }

        match profile.status {
            EmployeeStatus::OnBench => summary.push_str(&format!(
                " Currently on the bench with {}% bandwidth available.",
                profile.bandwidth
            )),
            EmployeeStatus::OnClient => summary.push_str(" Currently engaged with a client."),
        }
        summary
    }
}

#[async_trait]
impl ProfileExtractor for MockExtractor {
    fn provider(&self) -> ExtractorProvider {
        ExtractorProvider::Mock
    }

    async fn extract_profile_fields(&self, text: &str) -> Result<ExtractionResult> {
        Ok(self.extract(text))
    }

    async fn summarize(&self, profile: &Profile) -> Result<String> {
        Ok(self.summary(profile))
    }

    async fn parse_job_description(&self, text: &str) -> Result<ParsedJobDescription> {
        Ok(self.parse(text))
    }
}

fn split_clauses(text: &str) -> Vec<&str> {
    CLAUSE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .filter(|s| !s.trim().is_empty())
}

fn non_empty<T>(entries: Vec<T>) -> Option<Vec<T>> {
    (!entries.is_empty()).then_some(entries)
}

/// Known skills in order of first appearance
fn skills_in_order(text: &str) -> Vec<&'static str> {
    let mut found: Vec<(usize, &'static str)> = SKILL_PATTERNS
        .iter()
        .filter_map(|(skill, re)| re.find(text).map(|m| (m.start(), *skill)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, skill)| skill).collect()
}

fn first_years(clause: &str) -> Option<f64> {
    YEARS_RE
        .captures(clause)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Skills take the years figure stated in the same clause, if any
fn detect_tech(clauses: &[&str]) -> Vec<TechEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for clause in clauses {
        let years = first_years(clause).unwrap_or(0.0);
        for skill in skills_in_order(clause) {
            if seen.insert(skill) {
                entries.push(TechEntry::new(skill, years, TechLevel::from_years(years)));
            }
        }
    }
    entries
}

/// Years of experience stated in a clause that names no particular skill
fn detect_total_experience(clauses: &[&str]) -> Option<f64> {
    clauses
        .iter()
        .filter(|clause| skills_in_order(clause).is_empty())
        .filter_map(|clause| {
            TOTAL_EXPERIENCE_RE
                .captures(clause)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .reduce(f64::max)
}

fn detect_bandwidth(text: &str) -> Option<u8> {
    capture(&BANDWIDTH_BEFORE_RE, text)
        .or_else(|| capture(&BANDWIDTH_AFTER_RE, text))
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|v| *v <= 100)
}

/// The last status phrase in the text wins
fn detect_status(text: &str) -> Option<EmployeeStatus> {
    STATUS_RE.find_iter(text).last().map(|m| {
        let phrase = m.as_str().to_lowercase();
        if phrase.contains("bench") {
            EmployeeStatus::OnBench
        } else {
            EmployeeStatus::OnClient
        }
    })
}

fn detect_work_mode(text: &str) -> Option<WorkMode> {
    WORK_MODE_RE.find_iter(text).last().map(|m| {
        match m.as_str().to_lowercase().as_str() {
            "hybrid" => WorkMode::Hybrid,
            "remote" | "remotely" | "work from home" | "wfh" => WorkMode::Remote,
            _ => WorkMode::Office,
        }
    })
}

fn detect_work_history(text: &str) -> Vec<WorkHistoryEntry> {
    WORK_HISTORY_RE
        .captures_iter(text)
        .filter_map(|c| {
            let company = c.get(1)?.as_str().trim();
            let role = c.get(2)?.as_str().trim();
            Some(WorkHistoryEntry::new(company, role))
        })
        .collect()
}

fn detect_education(clauses: &[&str]) -> Vec<EducationEntry> {
    clauses
        .iter()
        .filter_map(|clause| {
            let institution = capture(&EDUCATION_RE, clause)?;
            let degree = DEGREE_RE.find(clause).map(|m| m.as_str());
            Some(EducationEntry::new(&institution, degree))
        })
        .collect()
}
