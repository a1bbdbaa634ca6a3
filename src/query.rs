//! Trip search parameters and their validation
//!
//! A `TripForm` holds the six fields exactly as the user typed them. Calling
//! `TripForm::validate` turns it into an immutable `TripQuery` or reports the
//! first problem found, without touching the network or the cache.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format accepted for departure and return dates
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while validating a trip form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Origin and destination are the same airport
    #[error("Departure and return airport cannot be the same ({0})")]
    SameAirport(String),

    /// A date field is not a valid YYYY-MM-DD date
    #[error("Invalid {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    /// Return date falls before the departure date
    #[error("Return date {return_date} cannot be before departure date {departure_date}")]
    InvalidDateRange {
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },

    /// Passenger count is not a positive integer
    #[error("Invalid passenger count: '{0}' (expected a whole number of at least 1)")]
    InvalidPassengerCount(String),
}

/// Raw, unvalidated search form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripForm {
    pub departure_date: String,
    pub return_date: String,
    pub origin: String,
    pub destination: String,
    pub adults: String,
    pub currency: String,
}

/// A validated round-trip search
///
/// Only constructed through `TripForm::validate`, so every instance satisfies
/// `origin != destination` and `return_date >= departure_date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripQuery {
    departure_date: NaiveDate,
    return_date: NaiveDate,
    origin: String,
    destination: String,
    adults: u32,
    currency: String,
}

impl TripForm {
    /// Validates the form and builds a `TripQuery`
    ///
    /// Checks run in this order: every field present, distinct airports,
    /// parseable dates in order, positive passenger count. The first failure
    /// is returned.
    pub fn validate(&self) -> Result<TripQuery, ValidationError> {
        let departure = required("departure date", &self.departure_date)?;
        let return_date = required("return date", &self.return_date)?;
        let origin = required("origin", &self.origin)?.to_ascii_uppercase();
        let destination = required("destination", &self.destination)?.to_ascii_uppercase();
        let adults = required("adults", &self.adults)?;
        let currency = required("currency", &self.currency)?.to_ascii_uppercase();

        if origin == destination {
            return Err(ValidationError::SameAirport(origin));
        }

        let departure_date = parse_date("departure date", departure)?;
        let return_date = parse_date("return date", return_date)?;
        if return_date < departure_date {
            return Err(ValidationError::InvalidDateRange {
                departure_date,
                return_date,
            });
        }

        let adults = match adults.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(ValidationError::InvalidPassengerCount(adults.to_string())),
        };

        Ok(TripQuery {
            departure_date,
            return_date,
            origin,
            destination,
            adults,
            currency,
        })
    }
}

impl TripQuery {
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    /// IATA code of the departure airport
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// IATA code of the arrival airport
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Number of adult passengers, always at least 1
    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
