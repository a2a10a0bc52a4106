// src/core/database.rs
//! SQLite storage for employee profiles

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;

use crate::app_log;
use crate::core::FsOps;
use crate::search::{ProfileStore, SearchFilters};
use crate::types::{DashboardMetrics, EmployeeStatus, Profile};

// ===== Core Database Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database; a single connection that never expires keeps the data alive
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn profiles(&self) -> ProfileRepository<'_> {
        ProfileRepository::new(&self.pool)
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                emp_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                location TEXT,
                tech TEXT NOT NULL DEFAULT '[]',
                experience_years REAL NOT NULL DEFAULT 0,
                bandwidth INTEGER NOT NULL DEFAULT 0 CHECK (bandwidth BETWEEN 0 AND 100),
                status TEXT NOT NULL DEFAULT 'ON_BENCH',
                work_mode TEXT NOT NULL DEFAULT 'OFFICE',
                career_summary TEXT,
                search_phrase TEXT,
                work_history TEXT NOT NULL DEFAULT '[]',
                education TEXT NOT NULL DEFAULT '[]',
                clients TEXT NOT NULL DEFAULT '[]',
                last_updated TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_status ON profiles(status);")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_last_updated ON profiles(last_updated);")
            .execute(&self.pool)
            .await?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Profile Rows =====

/// List fields are stored as JSON text
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    emp_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    tech: String,
    experience_years: f64,
    bandwidth: i64,
    status: String,
    work_mode: String,
    career_summary: Option<String>,
    search_phrase: Option<String>,
    work_history: String,
    education: String,
    clients: String,
    last_updated: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        let context = |field: &str| format!("Corrupt {} column for {}", field, row.emp_id);

        Ok(Profile {
            tech: serde_json::from_str(&row.tech).with_context(|| context("tech"))?,
            work_history: serde_json::from_str(&row.work_history)
                .with_context(|| context("work_history"))?,
            education: serde_json::from_str(&row.education).with_context(|| context("education"))?,
            clients: serde_json::from_str(&row.clients).with_context(|| context("clients"))?,
            bandwidth: u8::try_from(row.bandwidth).with_context(|| context("bandwidth"))?,
            status: row.status.parse().with_context(|| context("status"))?,
            work_mode: row.work_mode.parse().with_context(|| context("work_mode"))?,
            experience_years: row.experience_years,
            last_updated: Some(row.last_updated),
            emp_id: row.emp_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            location: row.location,
            career_summary: row.career_summary,
            search_phrase: row.search_phrase,
        })
    }
}

fn rows_to_profiles(rows: Vec<ProfileRow>) -> Result<Vec<Profile>> {
    rows.into_iter().map(Profile::try_from).collect()
}

const SELECT_PROFILES: &str = r#"
    SELECT emp_id, name, email, phone, location, tech, experience_years, bandwidth, status,
           work_mode, career_summary, search_phrase, work_history, education, clients, last_updated
    FROM profiles
"#;

// ===== Profile Repository =====

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a profile, stamping `last_updated`
    pub async fn upsert(&self, profile: &Profile) -> Result<Profile> {
        profile.validate()?;
        let mut stored = profile.clone();
        stored.last_updated = Some(Utc::now());

        upsert_row(self.pool, &stored).await?;
        app_log!(debug, "Stored profile {}", stored.emp_id);
        Ok(stored)
    }

    /// Store many profiles atomically; nothing is written if any is invalid
    pub async fn upsert_many(&self, profiles: &[Profile]) -> Result<usize> {
        for profile in profiles {
            profile.validate()?;
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        for profile in profiles {
            let mut stored = profile.clone();
            stored.last_updated = Some(now);
            upsert_row(&mut *tx, &stored).await?;
        }
        tx.commit().await?;

        app_log!(info, "Imported {} profiles", profiles.len());
        Ok(profiles.len())
    }

    pub async fn get(&self, emp_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!("{} WHERE emp_id = ?", SELECT_PROFILES))
            .bind(emp_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Profile::try_from).transpose()
    }

    /// Like `get`, but a missing profile is an error
    pub async fn require(&self, emp_id: &str) -> Result<Profile> {
        self.get(emp_id)
            .await?
            .with_context(|| format!("Profile not found: {}", emp_id))
    }

    /// All profiles in insertion order
    pub async fn list(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!("{} ORDER BY rowid", SELECT_PROFILES))
            .fetch_all(self.pool)
            .await?;
        rows_to_profiles(rows)
    }

    /// Most recently updated first
    pub async fn recent(&self, limit: u32) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "{} ORDER BY last_updated DESC, rowid DESC LIMIT ?",
            SELECT_PROFILES
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;
        rows_to_profiles(rows)
    }

    pub async fn delete(&self, emp_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE emp_id = ?")
            .bind(emp_id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted profile {}", emp_id);
        }
        Ok(deleted)
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics> {
        let (total, on_bench, billable): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
            FROM profiles
            "#,
        )
        .bind(EmployeeStatus::OnBench.as_str())
        .bind(EmployeeStatus::OnClient.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardMetrics::from_counts(total, on_bench, billable))
    }

    /// Status and minimums are filtered in SQL; name and tech need Unicode
    /// case folding, so they are checked on the decoded profiles. Insertion order.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Profile>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_PROFILES);
        builder.push(" WHERE 1 = 1");

        if let Some(status) = filters.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(min_bandwidth) = filters.min_bandwidth {
            builder.push(" AND bandwidth >= ").push_bind(i64::from(min_bandwidth));
        }
        if let Some(min_experience) = filters.min_experience {
            builder.push(" AND experience_years >= ").push_bind(min_experience);
        }
        builder.push(" ORDER BY rowid");

        let rows = builder
            .build_query_as::<ProfileRow>()
            .fetch_all(self.pool)
            .await?;

        let mut profiles = rows_to_profiles(rows)?;
        profiles.retain(|profile| filters.matches(profile));
        Ok(profiles)
    }
}

#[async_trait]
impl<'a> ProfileStore for ProfileRepository<'a> {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Profile>> {
        self.search(filters).await
    }
}

async fn upsert_row<'e, E>(executor: E, profile: &Profile) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO profiles (
            emp_id, name, email, phone, location, tech, experience_years, bandwidth, status,
            work_mode, career_summary, search_phrase, work_history, education, clients, last_updated
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(emp_id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            phone = excluded.phone,
            location = excluded.location,
            tech = excluded.tech,
            experience_years = excluded.experience_years,
            bandwidth = excluded.bandwidth,
            status = excluded.status,
            work_mode = excluded.work_mode,
            career_summary = excluded.career_summary,
            search_phrase = excluded.search_phrase,
            work_history = excluded.work_history,
            education = excluded.education,
            clients = excluded.clients,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(&profile.emp_id)
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.location)
    .bind(serde_json::to_string(&profile.tech)?)
    .bind(profile.experience_years)
    .bind(i64::from(profile.bandwidth))
    .bind(profile.status.as_str())
    .bind(profile.work_mode.as_str())
    .bind(&profile.career_summary)
    .bind(&profile.search_phrase)
    .bind(serde_json::to_string(&profile.work_history)?)
    .bind(serde_json::to_string(&profile.education)?)
    .bind(serde_json::to_string(&profile.clients)?)
    .bind(profile.last_updated.unwrap_or_else(Utc::now))
    .execute(executor)
    .await
    .with_context(|| format!("Failed to store profile {}", profile.emp_id))?;

    Ok(())
}
