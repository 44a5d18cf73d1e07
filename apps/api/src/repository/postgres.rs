use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::career::{
    CareerContent, CareerRecord, CareerSummary, ExpertExperience, FreeCourse, FutureScope,
    GrowthChart, NewCareer, RelatedJob,
};
use crate::models::suggestion::{CareerSuggestion, HistoryEntry, NewHistoryEntry};
use crate::repository::{ContentRepository, RepositoryError};

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CareerRow {
    id: Uuid,
    sector: String,
    title: String,
    description: String,
    category: String,
    difficulty: String,
    job_growth: String,
    study_guidance: Json<Vec<String>>,
    future_scope: Json<FutureScope>,
    expert_experiences: Json<Vec<ExpertExperience>>,
    free_courses: Json<Vec<FreeCourse>>,
    related_jobs: Json<Vec<RelatedJob>>,
    growth_chart: Json<GrowthChart>,
    created_at: DateTime<Utc>,
}

impl From<CareerRow> for CareerRecord {
    fn from(row: CareerRow) -> Self {
        CareerRecord {
            id: row.id,
            sector: row.sector,
            content: CareerContent {
                title: row.title,
                description: row.description,
                category: row.category,
                difficulty: row.difficulty,
                job_growth: row.job_growth,
                study_guidance: row.study_guidance.0,
                future_scope: row.future_scope.0,
                expert_experiences: row.expert_experiences.0,
                free_courses: row.free_courses.0,
                related_jobs: row.related_jobs.0,
                growth_chart: row.growth_chart.0,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    sector: String,
    title: String,
    category: String,
    difficulty: String,
    job_growth: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: Uuid,
    skills: Vec<String>,
    interests: Vec<String>,
    suggestions: Json<Vec<CareerSuggestion>>,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: row.id,
            user_id: row.user_id,
            skills: row.skills,
            interests: row.interests,
            suggestions: row.suggestions.0,
            timestamp: row.created_at,
        }
    }
}

#[async_trait]
impl ContentRepository for PgRepository {
    async fn find_by_sector(&self, sector: &str) -> Result<Option<CareerRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CareerRow>("SELECT * FROM careers WHERE sector = $1")
            .bind(sector)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CareerRecord::from))
    }

    async fn create(&self, career: NewCareer) -> Result<CareerRecord, RepositoryError> {
        let NewCareer { sector, content } = career;
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, CareerRow>(
            r#"
            INSERT INTO careers
                (id, sector, title, description, category, difficulty, job_growth,
                 study_guidance, future_scope, expert_experiences, free_courses,
                 related_jobs, growth_chart)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&sector)
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.category)
        .bind(&content.difficulty)
        .bind(&content.job_growth)
        .bind(Json(&content.study_guidance))
        .bind(Json(&content.future_scope))
        .bind(Json(&content.expert_experiences))
        .bind(Json(&content.free_courses))
        .bind(Json(&content.related_jobs))
        .bind(Json(&content.growth_chart))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::DuplicateKey(format!("career for sector '{sector}'"))
            }
            other => RepositoryError::Database(other),
        })?;

        info!("Inserted career {id} for sector '{sector}'");
        Ok(row.into())
    }

    async fn list_careers(&self, limit: i64) -> Result<Vec<CareerSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT sector, title, category, difficulty, job_growth, created_at
            FROM careers
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CareerSummary {
                sector: r.sector,
                title: r.title,
                category: r.category,
                difficulty: r.difficulty,
                job_growth: r.job_growth,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn append_history(
        &self,
        user_id: Uuid,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, RepositoryError> {
        let id = Uuid::new_v4();

        // Append-only INSERT guarded by the user's existence in the same statement.
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            INSERT INTO career_suggestions (id, user_id, skills, interests, suggestions, created_at)
            SELECT $1, u.id, $3, $4, $5, $6
            FROM users u
            WHERE u.id = $2
            RETURNING id, user_id, skills, interests, suggestions, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&entry.skills)
        .bind(&entry.interests)
        .bind(Json(&entry.suggestions))
        .bind(entry.timestamp)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| RepositoryError::NotFound(format!("User {user_id}")))?;
        info!("Appended suggestion history {id} for user {user_id}");
        Ok(row.into())
    }

    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, user_id, skills, interests, suggestions, created_at
            FROM career_suggestions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}
