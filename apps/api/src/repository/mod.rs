//! Content Repository — persistence for career pages and suggestion history.
//!
//! `AppState` holds an `Arc<dyn ContentRepository>`; production uses `PgRepository`,
//! tests use `memory::InMemoryRepository`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::career::{CareerRecord, CareerSummary, NewCareer};
use crate::models::suggestion::{HistoryEntry, NewHistoryEntry};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_sector(&self, sector: &str) -> Result<Option<CareerRecord>, RepositoryError>;

    /// Inserts a new career page. Fails with `DuplicateKey` if the sector already exists.
    async fn create(&self, career: NewCareer) -> Result<CareerRecord, RepositoryError>;

    /// Most recently created careers first.
    async fn list_careers(&self, limit: i64) -> Result<Vec<CareerSummary>, RepositoryError>;

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepositoryError>;

    /// Appends one history entry. Fails with `NotFound` if the user does not exist.
    async fn append_history(
        &self,
        user_id: Uuid,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, RepositoryError>;

    /// Newest entries first.
    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<HistoryEntry>, RepositoryError>;
}
