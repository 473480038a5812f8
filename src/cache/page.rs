//! File-backed page cache with mtime-based expiry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::observability::metrics;

const CACHE_EXTENSION: &str = "cache";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors raised by the page cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache key `{0}`: only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directory of cached pages, one file per key.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    default_ttl: Duration,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>, default_ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            default_ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Cached contents for `key` if they are younger than `ttl`.
    pub fn get(&self, key: &str, ttl: Duration) -> Result<Option<String>, CacheError> {
        let file = self.file_for(key)?;

        let modified = match fs::metadata(&file) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                metrics::record_cache_lookup(false);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // A file stamped in the future counts as fresh.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age >= ttl {
            tracing::trace!(key = %key, age = ?age, ttl = ?ttl, "Cache entry expired");
            metrics::record_cache_lookup(false);
            return Ok(None);
        }

        match fs::read_to_string(&file) {
            Ok(contents) => {
                metrics::record_cache_lookup(true);
                Ok(Some(contents))
            }
            // Removed between stat and read.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                metrics::record_cache_lookup(false);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write `contents` under `key`, replacing any previous entry.
    pub fn store(&self, key: &str, contents: &str) -> Result<(), CacheError> {
        let file = self.file_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            key,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&temp, contents)?;
        if let Err(e) = fs::rename(&temp, &file) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        tracing::debug!(key = %key, bytes = contents.len(), "Cache entry stored");
        Ok(())
    }

    /// Return the fresh entry for `key`, or render, store and return it.
    pub fn fetch_or_store<F>(
        &self,
        key: &str,
        ttl: Duration,
        render: F,
    ) -> Result<String, CacheError>
    where
        F: FnOnce() -> String,
    {
        if let Some(cached) = self.get(key, ttl)? {
            return Ok(cached);
        }
        let rendered = render();
        self.store(key, &rendered)?;
        Ok(rendered)
    }

    /// Delete the entry for `key`. Missing entries are not an error.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        let file = self.file_for(key)?;
        match fs::remove_file(file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn file_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, CACHE_EXTENSION)))
    }
}
