//! The AST correlation cache.
//!
//! A bounded, least-recently-used map from file to its last
//! [`ParsedScript`]. Entries are keyed by file and validated by text: a hit
//! requires the stored text to equal the requested one exactly, so any edit
//! replaces the whole entry.
//!
//! # Locking
//!
//! One mutex guards the map and the recency ticks. Materialization runs
//! outside it; if another thread stored a script for the same text while
//! this one was building, the stored script is returned instead, so callers
//! asking for the same text always observe the same `Arc`.

use std::sync::Arc;

use jactl_ir::FileId;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{CacheConfig, IdeError, ParsedScript};

struct Entry {
    script: Arc<ParsedScript>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: FxHashMap<FileId, Entry>,
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn touch(&mut self, file: FileId, text: Option<&str>) -> Option<Arc<ParsedScript>> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(&file)?;
        if text.is_some_and(|text| entry.script.text() != text) {
            return None;
        }
        entry.last_used = tick;
        Some(Arc::clone(&entry.script))
    }

    fn insert(&mut self, file: FileId, script: Arc<ParsedScript>, capacity: usize) {
        let last_used = self.next_tick();
        self.entries.insert(file, Entry { script, last_used });
        while self.entries.len() > capacity {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(&file, _)| file)
            else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(?oldest, "evicted");
        }
    }
}

/// Per-file cache of materialized scripts.
pub struct AstCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl AstCache {
    pub fn new(config: CacheConfig) -> Self {
        AstCache {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The cached script for `file`, whatever its text.
    pub fn get(&self, file: FileId) -> Option<Arc<ParsedScript>> {
        self.state.lock().touch(file, None)
    }

    /// The cached script for `file` if it was built from `text`.
    pub fn get_matching(&self, file: FileId, text: &str) -> Option<Arc<ParsedScript>> {
        self.state.lock().touch(file, Some(text))
    }

    /// Return the script cached for `(file, text)` or build, store and
    /// return a new one.
    ///
    /// `build` runs without the lock held. Its error is returned as is and
    /// nothing is stored.
    pub fn get_or_build(
        &self,
        file: FileId,
        text: &str,
        build: impl FnOnce() -> Result<ParsedScript, IdeError>,
    ) -> Result<Arc<ParsedScript>, IdeError> {
        if let Some(hit) = self.get_matching(file, text) {
            trace!(?file, "cache hit");
            return Ok(hit);
        }
        debug!(?file, "cache miss");

        let script = Arc::new(build()?);
        if self.config.is_uncached(text) {
            trace!(?file, "completion copy not cached");
            return Ok(script);
        }

        let mut state = self.state.lock();
        if let Some(winner) = state.touch(file, Some(text)) {
            trace!(?file, "concurrent build won");
            return Ok(winner);
        }
        state.insert(file, Arc::clone(&script), self.config.capacity);
        Ok(script)
    }

    /// Drop the entry for `file`.
    pub fn invalidate(&self, file: FileId) -> bool {
        self.state.lock().entries.remove(&file).is_some()
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    pub fn contains(&self, file: FileId) -> bool {
        self.state.lock().entries.contains_key(&file)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Cached files, least recently used first.
    pub fn files_by_recency(&self) -> Vec<FileId> {
        let state = self.state.lock();
        let mut files: Vec<_> = state
            .entries
            .iter()
            .map(|(&file, entry)| (entry.last_used, file))
            .collect();
        files.sort_unstable();
        files.into_iter().map(|(_, file)| file).collect()
    }
}

impl Default for AstCache {
    fn default() -> Self {
        AstCache::new(CacheConfig::default())
    }
}
