//! Search orchestration: validation, cache lookup, fetch and cache write
//!
//! A submission moves through an explicit state machine:
//!
//! ```text
//! Idle -> Validating -> Invalid
//!                    -> CacheLookup -> Done                      (hit)
//!                                   -> Fetching -> CacheWrite -> Done
//!                                               -> Failed
//! ```
//!
//! `transition` is a pure function over `SearchState` and `SearchEvent`;
//! `SearchOrchestrator` performs the side effects each state calls for and
//! feeds their outcome back in. Each submission takes a sequence number, and a
//! fetch that resolves after a newer submission was made is discarded.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::cache::{KeyValueStore, ResultCache};
use crate::client::{NetworkError, OfferSearchClient};
use crate::key::CacheKey;
use crate::offers::OfferSet;
use crate::query::{TripForm, TripQuery, ValidationError};

/// Where a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Cache,
    Network,
}

/// State of the most recent submission
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// Waiting for a submission
    #[default]
    Idle,
    /// Checking the submitted form
    Validating(TripForm),
    /// The form was rejected; no I/O happened
    Invalid(ValidationError),
    /// Looking for a cached result
    CacheLookup { query: TripQuery, key: CacheKey },
    /// Waiting on the offer provider
    Fetching { query: TripQuery, key: CacheKey },
    /// Storing freshly fetched offers
    CacheWrite { key: CacheKey, offers: OfferSet },
    /// Offers are ready
    Done { offers: OfferSet, source: ResultSource },
    /// The provider call failed
    Failed(NetworkError),
}

impl SearchState {
    /// True for states that end a submission
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Invalid(_) | SearchState::Done { .. } | SearchState::Failed(_)
        )
    }
}

/// Input that moves a submission to its next state
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Submitted(TripForm),
    Validated(Result<TripQuery, ValidationError>),
    CacheHit(OfferSet),
    CacheMiss,
    Fetched(Result<OfferSet, NetworkError>),
    /// The cache write finished; its outcome doesn't affect the search
    CacheWritten,
}

/// Computes the next state
///
/// `Submitted` restarts from any state. Any other event that doesn't apply to
/// the current state leaves it unchanged.
pub fn transition(state: SearchState, event: SearchEvent) -> SearchState {
    match (state, event) {
        (_, SearchEvent::Submitted(form)) => SearchState::Validating(form),
        (SearchState::Validating(_), SearchEvent::Validated(Ok(query))) => {
            let key = CacheKey::encode(&query);
            SearchState::CacheLookup { query, key }
        }
        (SearchState::Validating(_), SearchEvent::Validated(Err(e))) => SearchState::Invalid(e),
        (SearchState::CacheLookup { .. }, SearchEvent::CacheHit(offers)) => SearchState::Done {
            offers,
            source: ResultSource::Cache,
        },
        (SearchState::CacheLookup { query, key }, SearchEvent::CacheMiss) => {
            SearchState::Fetching { query, key }
        }
        (SearchState::Fetching { key, .. }, SearchEvent::Fetched(Ok(offers))) => {
            SearchState::CacheWrite { key, offers }
        }
        (SearchState::Fetching { .. }, SearchEvent::Fetched(Err(e))) => SearchState::Failed(e),
        (SearchState::CacheWrite { offers, .. }, SearchEvent::CacheWritten) => SearchState::Done {
            offers,
            source: ResultSource::Network,
        },
        (state, _) => state,
    }
}

/// Offers returned by a completed search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub offers: OfferSet,
    pub source: ResultSource,
}

/// Why an accepted submission produced no result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The offer provider call failed
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A newer submission was made before this one finished
    #[error("Search was superseded by a newer submission")]
    Superseded,
}

/// Runs searches against a result cache and an offer provider
///
/// Owns the state of the latest submission; presentation code reads it
/// through `state()`.
pub struct SearchOrchestrator<C, S> {
    client: C,
    cache: ResultCache<S>,
    latest: AtomicU64,
    state: Mutex<SearchState>,
}

impl<C, S> SearchOrchestrator<C, S>
where
    C: OfferSearchClient,
    S: KeyValueStore,
{
    pub fn new(client: C, cache: ResultCache<S>) -> Self {
        Self {
            client,
            cache,
            latest: AtomicU64::new(0),
            state: Mutex::new(SearchState::Idle),
        }
    }

    /// Snapshot of the latest submission's state
    pub fn state(&self) -> SearchState {
        self.lock_state().clone()
    }

    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Submits a search form
    ///
    /// Validation happens here, before any I/O: an invalid form returns
    /// `Err` immediately. A valid form returns a future that completes the
    /// search. Every call supersedes the submissions made before it, so an
    /// older future still in flight resolves to `SearchError::Superseded`
    /// without touching the cache. Dropping the future at any point is safe.
    pub fn submit(
        &self,
        form: &TripForm,
    ) -> Result<impl Future<Output = Result<SearchResult, SearchError>> + '_, ValidationError> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let state = transition(SearchState::Idle, SearchEvent::Submitted(form.clone()));
        self.publish(seq, &state);

        let validated = form.validate();
        let state = transition(state, SearchEvent::Validated(validated.clone()));
        self.publish(seq, &state);

        match validated {
            Ok(query) => {
                let key = CacheKey::encode(&query);
                Ok(self.run(seq, query, key))
            }
            Err(e) => {
                tracing::info!(seq, error = %e, "search rejected");
                Err(e)
            }
        }
    }

    /// Drives a validated submission from `CacheLookup` to a terminal state
    async fn run(&self, seq: u64, query: TripQuery, key: CacheKey) -> Result<SearchResult, SearchError> {
        let state = SearchState::CacheLookup {
            query: query.clone(),
            key: key.clone(),
        };

        if let Some(offers) = self.cache.get(&key) {
            tracing::info!(seq, key = %key, "cache hit");
            self.advance(seq, state, SearchEvent::CacheHit(offers.clone()))?;
            return Ok(SearchResult {
                offers,
                source: ResultSource::Cache,
            });
        }
        tracing::info!(seq, key = %key, "cache miss");
        let state = self.advance(seq, state, SearchEvent::CacheMiss)?;

        let fetched = self.client.search(&query).await;
        if !self.is_latest(seq) {
            tracing::info!(seq, "discarding result of superseded search");
            return Err(SearchError::Superseded);
        }
        let offers = match fetched {
            Ok(offers) => offers,
            Err(e) => {
                tracing::warn!(seq, error = %e, "search failed");
                self.advance(seq, state, SearchEvent::Fetched(Err(e.clone())))?;
                return Err(SearchError::Network(e));
            }
        };
        let state = self.advance(seq, state, SearchEvent::Fetched(Ok(offers.clone())))?;

        if let Err(e) = self.cache.put(&key, &offers) {
            tracing::warn!(seq, key = %key, error = %e, "failed to cache search result");
        }
        self.advance(seq, state, SearchEvent::CacheWritten)?;

        Ok(SearchResult {
            offers,
            source: ResultSource::Network,
        })
    }

    /// Applies `event` and publishes the new state
    ///
    /// Fails with `Superseded` once a newer submission has been made, so
    /// nothing after that point runs for this one.
    fn advance(&self, seq: u64, state: SearchState, event: SearchEvent) -> Result<SearchState, SearchError> {
        let next = transition(state, event);
        if self.publish(seq, &next) {
            Ok(next)
        } else {
            Err(SearchError::Superseded)
        }
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// Records the state of submission `seq` if it is still the latest
    ///
    /// Returns false when a newer submission has been made.
    fn publish(&self, seq: u64, state: &SearchState) -> bool {
        let mut current = self.lock_state();
        if !self.is_latest(seq) {
            return false;
        }
        *current = state.clone();
        true
    }

    fn lock_state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
