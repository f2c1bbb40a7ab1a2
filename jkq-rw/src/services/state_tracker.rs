//! Processed-report state tracking
//!
//! The idempotency ledger: a bounded, insertion-ordered set of message
//! identifiers. Membership at the start of a run is the sole guard against
//! handling a report twice.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use jkq_common::Result;
use serde::{Deserialize, Serialize};

/// Retention bound; the oldest identifiers fall out first.
pub const MAX_TRACKED_IDS: usize = 5000;

/// Bounded FIFO set of processed message identifiers.
#[derive(Debug, Default, Clone)]
pub struct ProcessedState {
    order: VecDeque<String>,
    index: HashSet<String>,
}

impl ProcessedState {
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in insertion order, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Insert an identifier, evicting the oldest entries beyond the cap.
    /// Re-inserting a known identifier is a no-op; it keeps its original
    /// slot in the eviction order.
    pub fn insert(&mut self, id: &str) {
        if !self.index.insert(id.to_string()) {
            return;
        }
        self.order.push_back(id.to_string());
        while self.order.len() > MAX_TRACKED_IDS {
            if let Some(evicted) = self.order.pop_front() {
                self.index.remove(&evicted);
            }
        }
    }

    fn from_ids(ids: Vec<String>) -> Self {
        let mut state = Self::default();
        for id in ids {
            state.insert(&id);
        }
        state
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    processed_message_ids: Vec<String>,
}

/// Loads and saves `ProcessedState` as a single JSON object, rewritten in
/// full on every save.
pub struct StateTracker {
    path: PathBuf,
}

impl StateTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empty state when no prior file exists.
    pub fn load(&self) -> Result<ProcessedState> {
        if !self.path.exists() {
            return Ok(ProcessedState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let file: StateFile = serde_json::from_str(&content)?;
        Ok(ProcessedState::from_ids(file.processed_message_ids))
    }

    pub fn save(&self, state: &ProcessedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StateFile {
            processed_message_ids: state.ids().map(str::to_string).collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
