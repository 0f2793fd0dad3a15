//! Title-derived identifiers and the table mapping them back to detail pages.
//!
//! Identifiers are the first 8 hex characters of the SHA-256 digest of the
//! title. Distinct anime sharing a title collide; the later registration wins.

use crate::error::{Result, ScrapeError};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Length of a generated identifier in hex characters
pub const ID_LEN: usize = 8;

/// Derive the short identifier for a title
pub fn generate_id(title: &str) -> String {
    let mut id = format!("{:x}", Sha256::digest(title.as_bytes()));
    id.truncate(ID_LEN);
    id
}

#[derive(Debug)]
struct Entry {
    detail_url: String,
    registered_at: Instant,
    /// Insertion sequence; stale queue slots carry an older value
    seq: u64,
}

#[derive(Debug, Default)]
struct TableState {
    entries: HashMap<String, Entry>,
    /// Registration order, oldest first; may hold stale slots for
    /// identifiers re-registered since
    order: VecDeque<(String, u64)>,
    next_seq: u64,
}

/// Process-wide map from identifier to detail URL
///
/// Bounded by `capacity` (oldest registration evicted first) and optionally
/// by a time-to-live, after which entries read as absent.
#[derive(Debug)]
pub struct IdentifierTable {
    state: Mutex<TableState>,
    capacity: usize,
    ttl: Option<Duration>,
}

impl IdentifierTable {
    /// Create a table holding at most `capacity` identifiers
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // Writers never panic mid-update, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `id -> detail_url`, overwriting any previous mapping
    pub fn insert(&self, id: &str, detail_url: &str) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let previous = state.entries.insert(
            id.to_string(),
            Entry {
                detail_url: detail_url.to_string(),
                registered_at: Instant::now(),
                seq,
            },
        );
        if let Some(previous) = previous {
            if previous.detail_url != detail_url {
                debug!(id = id, old = %previous.detail_url, new = %detail_url, "Identifier remapped");
            }
        }
        state.order.push_back((id.to_string(), seq));

        while state.entries.len() > self.capacity {
            let Some((oldest, oldest_seq)) = state.order.pop_front() else {
                break;
            };
            let current = state.entries.get(&oldest).map(|e| e.seq);
            if current == Some(oldest_seq) {
                state.entries.remove(&oldest);
                debug!(id = %oldest, "Identifier evicted");
            }
        }

        if state.order.len() > self.capacity * 2 {
            Self::compact(&mut state);
        }
    }

    /// Drop queue slots that no longer point at a live entry
    fn compact(state: &mut TableState) {
        let TableState { entries, order, .. } = state;
        order.retain(|(id, seq)| entries.get(id).map(|e| e.seq) == Some(*seq));
    }

    /// Resolve an identifier to its detail URL
    pub fn lookup(&self, id: &str) -> Result<String> {
        let mut state = self.lock();

        let expired = match state.entries.get(id) {
            None => true,
            Some(entry) => self
                .ttl
                .is_some_and(|ttl| entry.registered_at.elapsed() >= ttl),
        };

        if expired {
            if state.entries.remove(id).is_some() {
                debug!(id = id, "Identifier expired");
            }
            return Err(ScrapeError::NotFound { id: id.to_string() });
        }

        state
            .entries
            .get(id)
            .map(|entry| entry.detail_url.clone())
            .ok_or_else(|| ScrapeError::NotFound { id: id.to_string() })
    }

    /// Number of identifiers currently held (expired ones included until read)
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
