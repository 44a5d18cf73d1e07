//! Career page generation — serve from the repository, generate on a miss.
//!
//! Flow: validate sector → lookup → (miss) per-sector lock → re-check →
//!       generate → validate → persist → return.

use tracing::{debug, info, warn};

use crate::careers::locks::SectorLocks;
use crate::careers::validation::validate_sector;
use crate::errors::AppError;
use crate::generator::{invoke_typed, Generator, GeneratorError, Script};
use crate::models::career::{CareerContent, CareerRecord, NewCareer};
use crate::repository::{ContentRepository, RepositoryError};

const CONTENT_FAILURE: &str = "Failed to generate career content";

/// Whether the returned page was already stored or produced by this call.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOutcome {
    Existing(CareerRecord),
    Created(CareerRecord),
}

impl ContentOutcome {
    pub fn record(&self) -> &CareerRecord {
        match self {
            ContentOutcome::Existing(record) | ContentOutcome::Created(record) => record,
        }
    }

    pub fn into_record(self) -> CareerRecord {
        match self {
            ContentOutcome::Existing(record) | ContentOutcome::Created(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ContentOutcome::Created(_))
    }
}

/// Returns the stored career page for `sector`, generating and persisting it first
/// if none exists. Stored pages are never regenerated or modified.
pub async fn generate_career_content(
    repository: &dyn ContentRepository,
    generator: &dyn Generator,
    locks: &SectorLocks,
    sector: &str,
) -> Result<ContentOutcome, AppError> {
    let sector = validate_sector(sector)?;

    if let Some(existing) = repository.find_by_sector(&sector).await? {
        debug!("Career for sector '{sector}' served from store");
        return Ok(ContentOutcome::Existing(existing));
    }

    let _guard = locks.acquire(&sector).await;

    // Another request may have generated the sector while we waited for the lock.
    if let Some(existing) = repository.find_by_sector(&sector).await? {
        debug!("Career for sector '{sector}' generated by a concurrent request");
        return Ok(ContentOutcome::Existing(existing));
    }

    info!("No stored career for sector '{sector}', invoking content generator");
    let content: CareerContent =
        invoke_typed(generator, Script::CareerContent, &[sector.clone()])
            .await
            .map_err(|e| AppError::generation(CONTENT_FAILURE, e))?;
    content
        .validate()
        .map_err(|reason| AppError::generation(CONTENT_FAILURE, GeneratorError::Invalid(reason)))?;

    let created = repository
        .create(NewCareer {
            sector: sector.clone(),
            content,
        })
        .await;

    match created {
        Ok(record) => {
            info!("Created career {} for sector '{sector}'", record.id);
            Ok(ContentOutcome::Created(record))
        }
        // Another instance won the insert; its record is authoritative.
        Err(RepositoryError::DuplicateKey(what)) => {
            warn!("Sector '{sector}' was stored concurrently by another instance");
            repository
                .find_by_sector(&sector)
                .await?
                .map(ContentOutcome::Existing)
                .ok_or_else(|| AppError::Conflict(format!("{what} already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::generator::stub::{StubGenerator, StubReply};
    use crate::models::career::fixtures::nursing_content_json;
    use crate::models::career::CareerSummary;
    use crate::models::suggestion::{HistoryEntry, NewHistoryEntry};
    use crate::repository::memory::InMemoryRepository;

    fn nursing_generator() -> StubGenerator {
        StubGenerator::new().with_json(Script::CareerContent, nursing_content_json())
    }

    fn stored_nursing() -> CareerRecord {
        CareerRecord {
            id: Uuid::new_v4(),
            sector: "nursing".to_string(),
            content: serde_json::from_value(nursing_content_json()).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_existing_sector_returned_without_write_or_generation() {
        let repo = InMemoryRepository::new();
        let stored = stored_nursing();
        repo.seed_career(stored.clone());
        let generator = nursing_generator();

        let outcome = generate_career_content(&repo, &generator, &SectorLocks::new(), "nursing")
            .await
            .unwrap();

        assert_eq!(outcome, ContentOutcome::Existing(stored));
        assert_eq!(repo.write_count(), 0);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_miss_generates_and_persists_verbatim() {
        let repo = InMemoryRepository::new();
        let generator = nursing_generator();

        let outcome = generate_career_content(&repo, &generator, &SectorLocks::new(), " nursing ")
            .await
            .unwrap();

        assert!(outcome.is_created());
        let record = outcome.record();
        assert_eq!(record.sector, "nursing");
        assert_eq!(serde_json::to_value(&record.content).unwrap(), nursing_content_json());
        assert_eq!(repo.career_count(), 1);
        assert_eq!(
            generator.calls(),
            vec![(Script::CareerContent, vec!["nursing".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_store() {
        let repo = InMemoryRepository::new();
        let generator = nursing_generator();
        let locks = SectorLocks::new();

        let first = generate_career_content(&repo, &generator, &locks, "nursing")
            .await
            .unwrap();
        let second = generate_career_content(&repo, &generator, &locks, "nursing")
            .await
            .unwrap();

        assert!(first.is_created());
        assert_eq!(second, ContentOutcome::Existing(first.into_record()));
        assert_eq!(generator.call_count(Script::CareerContent), 1);
    }

    #[tokio::test]
    async fn test_error_marker_persists_nothing() {
        let repo = InMemoryRepository::new();
        let generator = StubGenerator::new().reply(
            Script::CareerContent,
            StubReply::Marker("model unavailable".to_string()),
        );

        let err = generate_career_content(&repo, &generator, &SectorLocks::new(), "nursing")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Generation { .. }));
        assert_eq!(repo.career_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_persists_nothing() {
        let repo = InMemoryRepository::new();
        let generator =
            StubGenerator::new().with_json(Script::CareerContent, serde_json::json!({}));

        let err = generate_career_content(&repo, &generator, &SectorLocks::new(), "nursing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation { source: GeneratorError::Empty, .. }
        ));
        assert_eq!(repo.career_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_content_persists_nothing() {
        let mut raw = nursing_content_json();
        raw["title"] = "".into();
        let repo = InMemoryRepository::new();
        let generator = StubGenerator::new().with_json(Script::CareerContent, raw);

        let err = generate_career_content(&repo, &generator, &SectorLocks::new(), "nursing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation { source: GeneratorError::Invalid(_), .. }
        ));
        assert_eq!(repo.career_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_sector_never_reaches_generator() {
        let repo = InMemoryRepository::new();
        let generator = nursing_generator();

        let err = generate_career_content(&repo, &generator, &SectorLocks::new(), "  ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_misses_generate_once() {
        let repo = InMemoryRepository::new();
        let generator = nursing_generator().with_delay(Duration::from_millis(50));
        let locks = SectorLocks::new();

        let (a, b, c) = tokio::join!(
            generate_career_content(&repo, &generator, &locks, "nursing"),
            generate_career_content(&repo, &generator, &locks, "nursing"),
            generate_career_content(&repo, &generator, &locks, "nursing"),
        );
        let outcomes = [a.unwrap(), b.unwrap(), c.unwrap()];

        assert_eq!(outcomes.iter().filter(|o| o.is_created()).count(), 1);
        assert_eq!(generator.call_count(Script::CareerContent), 1);
        assert_eq!(repo.career_count(), 1);
        let id = outcomes[0].record().id;
        assert!(outcomes.iter().all(|o| o.record().id == id));
    }

    /// Reports a miss for the first `blind_lookups` lookups, as if another instance
    /// inserted the sector between our read and our write.
    struct RacingRepository {
        inner: InMemoryRepository,
        blind_lookups: AtomicUsize,
    }

    #[async_trait]
    impl ContentRepository for RacingRepository {
        async fn find_by_sector(&self, sector: &str) -> Result<Option<CareerRecord>, RepositoryError> {
            let remaining = self.blind_lookups.load(Ordering::SeqCst);
            if remaining > 0 {
                self.blind_lookups.store(remaining - 1, Ordering::SeqCst);
                return Ok(None);
            }
            self.inner.find_by_sector(sector).await
        }

        async fn create(&self, career: NewCareer) -> Result<CareerRecord, RepositoryError> {
            self.inner.create(career).await
        }

        async fn list_careers(&self, limit: i64) -> Result<Vec<CareerSummary>, RepositoryError> {
            self.inner.list_careers(limit).await
        }

        async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
            self.inner.user_exists(user_id).await
        }

        async fn append_history(
            &self,
            user_id: Uuid,
            entry: NewHistoryEntry,
        ) -> Result<HistoryEntry, RepositoryError> {
            self.inner.append_history(user_id, entry).await
        }

        async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<HistoryEntry>, RepositoryError> {
            self.inner.history(user_id, limit).await
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_returns_winning_record() {
        let inner = InMemoryRepository::new();
        let winner = stored_nursing();
        inner.seed_career(winner.clone());
        let repo = RacingRepository {
            inner,
            blind_lookups: AtomicUsize::new(2),
        };
        let generator = nursing_generator();

        let outcome = generate_career_content(&repo, &generator, &SectorLocks::new(), "nursing")
            .await
            .unwrap();

        assert_eq!(outcome, ContentOutcome::Existing(winner));
        assert_eq!(generator.call_count(Script::CareerContent), 1);
        assert_eq!(repo.inner.career_count(), 1);
    }
}
