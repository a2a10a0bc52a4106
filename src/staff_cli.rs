// src/staff_cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::core::{ConfigManager, Database, ExtractorConfig, FsOps};
use crate::extraction::{available_models, build_extractor, ExtractorProvider};
use crate::profile_service::ProfileService;
use crate::search::{SearchFilters, SearchRequest};
use crate::types::{EmployeeStatus, Profile, SearchHit, TechEntry, TechLevel, WorkMode};

#[derive(Parser)]
#[command(name = "benchmatch")]
#[command(about = "Search bench employees, rank them against job descriptions and autofill profiles")]
pub struct StaffCli {
    #[command(subcommand)]
    pub command: StaffCommand,

    /// Overrides the configured database location
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,

    /// Overrides the configured extractor provider (mock, ollama, openai)
    #[arg(long, global = true)]
    pub provider: Option<ExtractorProvider>,

    /// Overrides the configured model name
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum StaffCommand {
    /// Initialize the database
    Init,
    /// Import profiles from a JSON array or a CSV file
    Import { file: PathBuf },
    /// List all profiles
    List,
    /// Show one profile as JSON
    Show { emp_id: String },
    /// Most recently updated profiles
    Recent {
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
    /// Filter profiles, then rank by free-text query or job description
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tech: Option<String>,
        #[arg(long)]
        status: Option<EmployeeStatus>,
        #[arg(long)]
        min_bandwidth: Option<u8>,
        #[arg(long)]
        min_experience: Option<f64>,
        #[arg(long, short)]
        query: Option<String>,
        /// File holding the job description text
        #[arg(long)]
        jd_file: Option<PathBuf>,
        /// Write the ranked hits as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge fields extracted from a text file into a profile
    Autofill { emp_id: String, text_file: PathBuf },
    /// Generate and store a career summary
    Summary { emp_id: String },
    /// Regenerate the stored search phrase
    SearchPhrase { emp_id: String },
    /// Delete a profile
    Delete { emp_id: String },
    /// Bench and billable counts
    Metrics,
    /// Models offered by the configured provider
    Models,
}

pub async fn handle_staff_command(cli: StaffCli, mut config: ConfigManager) -> Result<()> {
    if let Some(path) = cli.database_path {
        config.environment.database_path = path;
    }
    if let Some(provider) = cli.provider {
        config.extractor = ExtractorConfig {
            system_prompt: config.extractor.system_prompt.take(),
            ..ExtractorConfig::for_provider(provider, &config.extractor.model_name)
        };
    }
    if let Some(model) = cli.model {
        config.extractor.model_name = model;
    }

    let db = Database::new(&config.environment.database_path).await?;
    let extractor = build_extractor(&config.extractor)?;
    let service = ProfileService::new(&db, extractor, config.weights);

    match cli.command {
        StaffCommand::Init => {
            db.health_check().await?;
            println!(
                "✅ Database initialized at: {}",
                config.environment.database_path.display()
            );
        }

        StaffCommand::Import { file } => {
            let profiles = load_profiles(&file).await?;
            let count = service.import(profiles).await?;
            println!("✅ Imported {} profiles from {}", count, file.display());
        }

        StaffCommand::List => print_profiles(&service.repository().list().await?),

        StaffCommand::Show { emp_id } => {
            let profile = service.repository().require(&emp_id).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        StaffCommand::Recent { limit } => print_profiles(&service.repository().recent(limit).await?),

        StaffCommand::Search {
            name,
            tech,
            status,
            min_bandwidth,
            min_experience,
            query,
            jd_file,
            output,
        } => {
            let job_description = match jd_file {
                Some(path) => Some(FsOps::read_file_safe(&path).await?),
                None => None,
            };
            let request = SearchRequest {
                filters: SearchFilters {
                    name,
                    tech,
                    status,
                    min_bandwidth,
                    min_experience,
                },
                query,
                job_description,
            };

            let hits = service.search(&request).await?;
            print_hits(&hits);

            if let Some(path) = output {
                FsOps::write_file_safe(&path, &serde_json::to_string_pretty(&hits)?).await?;
                println!("Results written to {}", path.display());
            }
        }

        StaffCommand::Autofill { emp_id, text_file } => {
            let text = FsOps::read_file_safe(&text_file).await?;
            let outcome = service.autofill(&emp_id, &text).await?;

            if outcome.is_unchanged() {
                println!("No new information found for {}", emp_id);
            } else {
                println!("✅ Updated {}", emp_id);
                if !outcome.updated_fields.is_empty() {
                    println!("   Fields: {}", outcome.updated_fields.join(", "));
                }
                println!(
                    "   Added: {} tech, {} work history, {} education",
                    outcome.added_tech, outcome.added_work_history, outcome.added_education
                );
            }
        }

        StaffCommand::Summary { emp_id } => {
            let profile = service.generate_summary(&emp_id).await?;
            println!("{}", profile.career_summary_text());
        }

        StaffCommand::SearchPhrase { emp_id } => {
            let profile = service.refresh_search_phrase(&emp_id).await?;
            println!("{}", profile.search_phrase_text());
        }

        StaffCommand::Delete { emp_id } => {
            if service.repository().delete(&emp_id).await? {
                println!("✅ Deleted {}", emp_id);
            } else {
                println!("❌ No profile found for {}", emp_id);
            }
        }

        StaffCommand::Metrics => {
            let metrics = service.repository().metrics().await?;
            println!("Total employees: {}", metrics.total_employees);
            println!("On bench:        {}", metrics.on_bench);
            println!("Billable:        {}", metrics.billable);
            println!("Bench:           {:.1}%", metrics.bench_percentage);
        }

        StaffCommand::Models => {
            println!("Provider: {}", config.extractor.provider);
            for model in available_models(&config.extractor).await {
                println!("  {}", model);
            }
        }
    }

    Ok(())
}

fn print_profiles(profiles: &[Profile]) {
    if profiles.is_empty() {
        println!("No profiles found.");
        return;
    }

    println!(
        "{:<10} {:<22} {:<10} {:<8} {:>5} {:>6}  {}",
        "ID", "Name", "Status", "Mode", "BW%", "Yrs", "Tech"
    );
    println!("{}", "-".repeat(90));
    for p in profiles {
        println!(
            "{:<10} {:<22} {:<10} {:<8} {:>5} {:>6.1}  {}",
            p.emp_id,
            p.name,
            p.status,
            p.work_mode,
            p.bandwidth,
            p.experience_years,
            p.tech_names().collect::<Vec<_>>().join(", ")
        );
    }
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matching profiles.");
        return;
    }

    for (i, hit) in hits.iter().enumerate() {
        let rank = match (&hit.match_result, hit.query_tier) {
            (Some(result), _) => format!("score {:>5.1}", result.match_score),
            (None, Some(tier)) => format!("tier {:>3}", tier),
            (None, None) => String::new(),
        };
        println!(
            "{:>3}. {:<10} {:<22} {}",
            i + 1,
            hit.profile.emp_id,
            hit.profile.name,
            rank
        );
        if let Some(result) = &hit.match_result {
            if !result.matched_skills.is_empty() {
                println!("     matched: {}", result.matched_skills.join(", "));
            }
        }
    }
}

// ===== Import =====

/// Flat CSV layout; `tech` is `Name[:years]` entries separated by `;`
#[derive(Debug, Deserialize)]
struct CsvProfileRow {
    emp_id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tech: Option<String>,
    #[serde(default)]
    experience_years: Option<f64>,
    #[serde(default)]
    bandwidth: Option<u8>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    work_mode: Option<String>,
    #[serde(default)]
    career_summary: Option<String>,
}

impl CsvProfileRow {
    fn into_profile(self) -> Result<Profile> {
        let mut profile = Profile::new(self.emp_id.trim(), self.name.trim());
        profile.email = self.email.filter(|s| !s.trim().is_empty());
        profile.phone = self.phone.filter(|s| !s.trim().is_empty());
        profile.location = self.location.filter(|s| !s.trim().is_empty());
        profile.career_summary = self.career_summary.filter(|s| !s.trim().is_empty());
        profile.experience_years = self.experience_years.unwrap_or(0.0);
        profile.bandwidth = self.bandwidth.unwrap_or(0);

        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            profile.status = status.parse()?;
        }
        if let Some(mode) = self.work_mode.as_deref().filter(|s| !s.trim().is_empty()) {
            profile.work_mode = mode.parse::<WorkMode>()?;
        }
        if let Some(tech) = self.tech.as_deref() {
            profile.tech = parse_tech_list(tech)?;
        }

        profile.validate()?;
        Ok(profile)
    }
}

fn parse_tech_list(raw: &str) -> Result<Vec<TechEntry>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((name, years)) => {
                let years: f64 = years
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid years in tech entry '{}'", entry))?;
                Ok(TechEntry::new(name.trim(), years, TechLevel::from_years(years)))
            }
            None => Ok(TechEntry::new(entry, 0.0, TechLevel::default())),
        })
        .collect()
}

pub fn parse_csv_profiles(content: &str) -> Result<Vec<Profile>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut profiles = Vec::new();
    for (line, result) in reader.deserialize::<CsvProfileRow>().enumerate() {
        let row = result.with_context(|| format!("CSV parsing error in record {}", line + 1))?;
        let profile = row
            .into_profile()
            .with_context(|| format!("Invalid profile in record {}", line + 1))?;
        profiles.push(profile);
    }
    Ok(profiles)
}

/// `.csv` files are read as CSV, anything else as a JSON array
pub async fn load_profiles(path: &Path) -> Result<Vec<Profile>> {
    let content = FsOps::read_file_safe(path).await?;

    let profiles = match FsOps::get_extension(path).as_deref() {
        Some("csv") => parse_csv_profiles(&content)?,
        _ => {
            let profiles: Vec<Profile> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid profile JSON in {}", path.display()))?;
            for profile in &profiles {
                profile.validate()?;
            }
            profiles
        }
    };

    app_log!(info, "Loaded {} profiles from {}", profiles.len(), path.display());
    Ok(profiles)
}
