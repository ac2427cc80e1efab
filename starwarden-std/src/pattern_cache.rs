//! Memoized regular expressions.
//!
//! Patterns come from configuration, so the set is bounded by the size of the
//! configuration rather than by event volume. Entries are never evicted.

use regex::Regex;
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};
use thiserror::Error;

/// A pattern from configuration could not be compiled.
#[derive(Error, Debug)]
#[error("invalid pattern `{pattern}`: {source}")]
pub struct PatternCompileError {
    pattern: String,
    #[source]
    source: regex::Error,
}

impl PatternCompileError {
    /// The offending pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A process-lifetime cache of compiled patterns keyed by source string.
///
/// Compiling the same source twice returns the same `Arc`. Concurrent first
/// compilations of one pattern may both build a `Regex`, but only the first
/// one stored is ever handed out.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by everything in this process.
    pub fn global() -> Arc<PatternCache> {
        static GLOBAL: OnceLock<Arc<PatternCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(PatternCache::new())))
    }

    /// Return the compiled form of `pattern`, compiling it on first use.
    pub fn compile(&self, pattern: &str) -> Result<Arc<Regex>, PatternCompileError> {
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(Arc::clone(found));
        }

        let compiled = Regex::new(pattern).map_err(|source| PatternCompileError {
            pattern: pattern.to_owned(),
            source,
        })?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry(pattern.to_owned())
            .or_insert_with(|| Arc::new(compiled));
        Ok(Arc::clone(entry))
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
