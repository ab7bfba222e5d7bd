//! Bounded history of finalized results.
//!
//! [`ResultHistory`] keeps at most [`HISTORY_CAPACITY`] entries, oldest first,
//! evicting from the front. Storage failures never reach the caller: they are
//! logged and surface as `false` or an empty history.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use moneymaker_types::{ResultRecord, StoredResult};
use moneymaker_utils::{atomic_write, recover_bak_file, remove_if_exists};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};

pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse history at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write history at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Backing storage for the history array.
pub trait HistoryStore {
    /// Stored entries, oldest first. A store that was never written is empty.
    fn load(&self) -> Result<Vec<StoredResult>, HistoryError>;
    fn save(&mut self, entries: &[StoredResult]) -> Result<(), HistoryError>;
    fn clear(&mut self) -> Result<(), HistoryError>;
}

// ============================================================================
// Stores
// ============================================================================

/// JSON array on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<StoredResult>, HistoryError> {
        recover_bak_file(&self.path);
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(&self.path).map_err(|source| HistoryError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| HistoryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, entries: &[StoredResult]) -> Result<(), HistoryError> {
        let json = serde_json::to_vec_pretty(entries).map_err(HistoryError::Serialize)?;
        atomic_write(&self.path, &json).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        remove_if_exists(&self.path).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-process store for tests and one-shot sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<StoredResult>,
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<StoredResult>, HistoryError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[StoredResult]) -> Result<(), HistoryError> {
        self.entries = entries.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        Ok(())
    }
}

// ============================================================================
// ResultHistory
// ============================================================================

pub struct ResultHistory<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: HistoryStore> ResultHistory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: HistoryStore, C: Clock> ResultHistory<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Append a result, evicting the oldest entries past capacity.
    ///
    /// Returns `false` if the store could not be written. An unreadable store
    /// is treated as empty and overwritten.
    pub fn store_result(&mut self, result: ResultRecord) -> bool {
        let mut entries: VecDeque<StoredResult> = self.history().into();
        entries.push_back(StoredResult {
            result,
            stored_at: self.clock.now(),
        });
        while entries.len() > HISTORY_CAPACITY {
            if let Some(evicted) = entries.pop_front() {
                debug!(stored_at = %evicted.stored_at, "Evicted oldest result");
            }
        }

        match self.store.save(entries.make_contiguous()) {
            Ok(()) => {
                info!(entries = entries.len(), "Stored result");
                true
            }
            Err(e) => {
                warn!("Could not store result: {e}");
                false
            }
        }
    }

    /// Stored entries, oldest first. Empty if the store cannot be read.
    pub fn history(&self) -> Vec<StoredResult> {
        match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not load result history: {e}");
                Vec::new()
            }
        }
    }

    /// Highest tier wins; within a tier, strictly higher overall. On a full tie
    /// the earlier entry is kept.
    pub fn best_result(&self) -> Option<StoredResult> {
        best_of(self.history())
    }

    pub fn clear(&mut self) -> bool {
        match self.store.clear() {
            Ok(()) => {
                info!("Cleared result history");
                true
            }
            Err(e) => {
                warn!("Could not clear result history: {e}");
                false
            }
        }
    }
}

/// Best entry under the history ranking. See [`ResultHistory::best_result`].
pub fn best_of(entries: impl IntoIterator<Item = StoredResult>) -> Option<StoredResult> {
    entries.into_iter().reduce(|best, current| {
        let (best_rank, current_rank) = (best.result.tier().rank(), current.result.tier().rank());
        if current_rank > best_rank
            || (current_rank == best_rank && current.result.overall() > best.result.overall())
        {
            current
        } else {
            best
        }
    })
}
