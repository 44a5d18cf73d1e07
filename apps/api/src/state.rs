use std::sync::Arc;

use crate::careers::locks::SectorLocks;
use crate::generator::Generator;
use crate::repository::ContentRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgRepository.
    pub repository: Arc<dyn ContentRepository>,
    /// Pluggable generator runner. Default: ScriptGenerator.
    pub generator: Arc<dyn Generator>,
    /// Serializes cache misses per sector within this process.
    pub sector_locks: SectorLocks,
}

impl AppState {
    pub fn new(repository: Arc<dyn ContentRepository>, generator: Arc<dyn Generator>) -> Self {
        Self {
            repository,
            generator,
            sector_locks: SectorLocks::new(),
        }
    }
}
