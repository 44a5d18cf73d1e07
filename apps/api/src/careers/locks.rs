//! Per-sector mutual exclusion so a cold sector is generated at most once per process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// Table of async locks keyed by sector. Entries are removed once nobody holds or
/// waits on them, so the table only grows with in-flight sectors.
#[derive(Clone, Default)]
pub struct SectorLocks {
    table: Arc<LockTable>,
}

/// Held while a sector is being checked and generated. Releases on drop.
pub struct SectorGuard {
    table: Arc<LockTable>,
    sector: String,
    _guard: OwnedMutexGuard<()>,
}

impl SectorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, sector: &str) -> SectorGuard {
        let lock = self
            .table
            .entry(sector.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        SectorGuard {
            table: Arc::clone(&self.table),
            sector: sector.to_string(),
            _guard: guard,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.table.len()
    }
}

impl Drop for SectorGuard {
    fn drop(&mut self) {
        // One reference lives in the table and one in our guard; any more are waiters.
        self.table
            .remove_if(&self.sector, |_, lock| Arc::strong_count(lock) <= 2);
    }
}
