//! Search result cache keyed by trip query
//!
//! A straight write-through map from `CacheKey` to `OfferSet`: no eviction and
//! no expiry. Entries that can't be read back are treated as misses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::{CacheError, KeyValueStore};
use crate::key::CacheKey;
use crate::offers::OfferSet;

/// Wrapper stored for each cached search
///
/// `cached_at` is kept for diagnostics only and never expires an entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Maps trip query keys to previously retrieved offer sets
#[derive(Debug, Clone)]
pub struct ResultCache<S> {
    store: S,
}

impl<S: KeyValueStore> ResultCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up the offers cached for a key
    ///
    /// Returns `None` if the key is unknown or the stored entry is corrupt.
    pub fn get(&self, key: &CacheKey) -> Option<OfferSet> {
        let raw = self.store.get(key.as_str())?;
        match serde_json::from_str::<CacheEntry<OfferSet>>(&raw) {
            Ok(entry) => {
                tracing::debug!(key = %key, cached_at = %entry.cached_at, "cache entry found");
                Some(entry.data)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Stores offers under a key, replacing any previous entry
    pub fn put(&self, key: &CacheKey, offers: &OfferSet) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: offers,
            cached_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(key.as_str(), &json)
    }
}
