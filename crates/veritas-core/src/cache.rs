//! Result cache
//!
//! Verdicts are cached by a content hash of the whitespace-normalized input.
//! Entries expire `ttl` after insertion. When the cache is full, expired
//! entries are purged first and then the least recently used entry is evicted.
//!
//! Storage is an [`IndexMap`] kept in recency order: the front is the least
//! recently used entry, the back the most recent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::CacheConfig;
use crate::verdict::OverallVerdict;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Hex SHA-256 of `text` with whitespace runs collapsed and ends trimmed.
pub fn cache_key(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Time source for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_entries: usize,
    pub ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
}

struct CacheEntry {
    value: OverallVerdict,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: IndexMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Bounded TTL + LRU cache of passage verdicts.
pub struct ResultCache {
    max_entries: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_entries: config.max_entries.max(1),
            ttl: config.ttl(),
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Look up a verdict, refreshing its recency on a hit.
    pub fn get(&self, key: &str) -> Option<OverallVerdict> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        match state.entries.get(key).map(|e| e.expires_at <= now) {
            None => {
                state.misses += 1;
                return None;
            }
            Some(true) => {
                state.entries.shift_remove(key);
                state.misses += 1;
                return None;
            }
            Some(false) => {}
        }

        let idx = state.entries.get_index_of(key)?;
        let last = state.entries.len() - 1;
        state.entries.move_index(idx, last);
        state.hits += 1;
        state.entries.get(key).map(|e| e.value.clone())
    }

    /// Insert or replace a verdict, evicting if the cache is full.
    pub fn put(&self, key: impl Into<String>, value: OverallVerdict) {
        let key = key.into();
        let now = self.clock.now();
        let mut state = self.state.lock();

        state.entries.shift_remove(&key);
        if state.entries.len() >= self.max_entries {
            let before = state.entries.len();
            state.entries.retain(|_, e| e.expires_at > now);
            if before != state.entries.len() {
                debug!("Purged {} expired cache entries", before - state.entries.len());
            }
        }
        while state.entries.len() >= self.max_entries {
            match state.entries.shift_remove_index(0) {
                Some((evicted, _)) => debug!("Evicted least recently used cache entry {}", evicted),
                None => break,
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            size: state.entries.len(),
            max_entries: self.max_entries,
            ttl_secs: self.ttl.as_secs(),
            hits: state.hits,
            misses: state.misses,
        }
    }
}
