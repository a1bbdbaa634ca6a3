//! Cache key derivation for trip searches

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::TripQuery;

/// Separator between the encoded query fields
///
/// Dates, IATA codes, currency codes and the passenger count never contain it.
pub const KEY_DELIMITER: &str = "_";

/// Deterministic lookup key for a `TripQuery`
///
/// Fields appear in the order departure date, return date, origin,
/// destination, adults, currency, e.g. `2025-06-01_2025-06-10_JFK_LAX_2_USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Encodes every field of the query into a key
    pub fn encode(query: &TripQuery) -> Self {
        let fields = [
            query.departure_date().format("%Y-%m-%d").to_string(),
            query.return_date().format("%Y-%m-%d").to_string(),
            query.origin().to_string(),
            query.destination().to_string(),
            query.adults().to_string(),
            query.currency().to_string(),
        ];
        Self(fields.join(KEY_DELIMITER))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
