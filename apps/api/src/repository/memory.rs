use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::career::{CareerRecord, CareerSummary, NewCareer};
use crate::models::suggestion::{HistoryEntry, NewHistoryEntry};
use crate::repository::{ContentRepository, RepositoryError};

/// Map-backed repository with the same uniqueness and existence rules as Postgres.
#[derive(Default)]
pub struct InMemoryRepository {
    careers: Mutex<Vec<CareerRecord>>,
    users: Mutex<HashSet<Uuid>>,
    history: Mutex<HashMap<Uuid, Vec<HistoryEntry>>>,
    writes: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user_id: Uuid) {
        self.users.lock().unwrap().insert(user_id);
    }

    /// Stores a record directly, bypassing the write counter.
    pub fn seed_career(&self, record: CareerRecord) {
        self.careers.lock().unwrap().push(record);
    }

    /// Number of successful `create` and `append_history` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn career_count(&self) -> usize {
        self.careers.lock().unwrap().len()
    }

    pub fn history_len(&self, user_id: Uuid) -> usize {
        self.history
            .lock()
            .unwrap()
            .get(&user_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn find_by_sector(&self, sector: &str) -> Result<Option<CareerRecord>, RepositoryError> {
        Ok(self
            .careers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.sector == sector)
            .cloned())
    }

    async fn create(&self, career: NewCareer) -> Result<CareerRecord, RepositoryError> {
        let mut careers = self.careers.lock().unwrap();
        if careers.iter().any(|c| c.sector == career.sector) {
            return Err(RepositoryError::DuplicateKey(format!(
                "career for sector '{}'",
                career.sector
            )));
        }
        let record = CareerRecord {
            id: Uuid::new_v4(),
            sector: career.sector,
            content: career.content,
            created_at: Utc::now(),
        };
        careers.push(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn list_careers(&self, limit: i64) -> Result<Vec<CareerSummary>, RepositoryError> {
        let careers = self.careers.lock().unwrap();
        let mut summaries: Vec<CareerSummary> = careers.iter().map(CareerRecord::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.truncate(limit.max(0) as usize);
        Ok(summaries)
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.users.lock().unwrap().contains(&user_id))
    }

    async fn append_history(
        &self,
        user_id: Uuid,
        entry: NewHistoryEntry,
    ) -> Result<HistoryEntry, RepositoryError> {
        if !self.users.lock().unwrap().contains(&user_id) {
            return Err(RepositoryError::NotFound(format!("User {user_id}")));
        }
        let stored = HistoryEntry {
            id: Uuid::new_v4(),
            user_id,
            skills: entry.skills,
            interests: entry.interests,
            suggestions: entry.suggestions,
            timestamp: entry.timestamp,
        };
        self.history
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let history = self.history.lock().unwrap();
        let mut entries = history.get(&user_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}
