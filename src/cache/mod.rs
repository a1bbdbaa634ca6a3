//! Cache module for storing search results between runs
//!
//! Search results are kept in a key-value store under a key derived from the
//! trip query, so repeating a search is answered without calling the provider.
//! Failures in this layer never fail a search: unreadable entries count as
//! misses, and failed writes only mean the result isn't cached for next time.

mod results;
mod store;

pub use results::ResultCache;
pub use store::{CacheError, FileStore, KeyValueStore, MemoryStore};
