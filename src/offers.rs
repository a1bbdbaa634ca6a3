//! Flight offer response models
//!
//! These mirror the provider's JSON response:
//! `{ meta: { count }, data: [...], dictionaries: { carriers, aircraft, currencies, locations } }`.
//! The cache and orchestrator treat an `OfferSet` as an opaque value; only the
//! renderer looks inside. Fields the models don't name are kept in `extra` so a
//! cached copy carries everything the provider sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A provider response for one search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferSet {
    /// Required: a body without `meta` is not an offer response
    pub meta: OfferMeta,
    /// Required, may be empty
    pub data: Vec<FlightOffer>,
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// Response metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferMeta {
    /// Number of offers reported by the provider
    #[serde(default)]
    pub count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single bookable round-trip offer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default)]
    pub id: String,
    /// Outbound and return itineraries, in that order
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
    #[serde(default)]
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_bookable_seats: Option<u32>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One direction of travel, made of one or more segments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// ISO-8601 duration, e.g. `PT5H30M`
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A single flight leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub departure: FlightEndpoint,
    #[serde(default)]
    pub arrival: FlightEndpoint,
    #[serde(default)]
    pub carrier_code: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub aircraft: AircraftRef,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub number_of_stops: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where and when a segment departs or arrives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    #[serde(default)]
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Local date-time as sent by the provider, e.g. `2025-06-01T08:00:00`
    #[serde(default)]
    pub at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftRef {
    #[serde(default)]
    pub code: String,
}

/// Fare totals for an offer
///
/// Amounts stay as the provider's decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Code lookup tables shipped alongside the offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionaries {
    /// Carrier code to airline name
    #[serde(default)]
    pub carriers: BTreeMap<String, String>,
    /// Aircraft code to model name
    #[serde(default)]
    pub aircraft: BTreeMap<String, String>,
    #[serde(default)]
    pub currencies: BTreeMap<String, String>,
    /// Location code to city/country details
    #[serde(default)]
    pub locations: BTreeMap<String, Value>,
}

impl OfferSet {
    /// Airline name for a carrier code, falling back to the code itself
    pub fn carrier_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.dictionaries
            .carriers
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }

    /// Aircraft model for an aircraft code, falling back to the code itself
    pub fn aircraft_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.dictionaries
            .aircraft
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::SAMPLE_RESPONSE;
    use super::*;

    #[test]
    fn test_parse_provider_response() {
        let offers: OfferSet = serde_json::from_str(SAMPLE_RESPONSE).expect("should parse");

        assert_eq!(offers.meta.count, 1);
        assert_eq!(offers.data.len(), 1);

        let offer = &offers.data[0];
        assert_eq!(offer.id, "1");
        assert_eq!(offer.number_of_bookable_seats, Some(9));
        assert_eq!(offer.itineraries.len(), 2);
        assert_eq!(offer.itineraries[0].segments[0].departure.iata_code, "JFK");
        assert_eq!(offer.itineraries[1].segments[0].arrival.iata_code, "JFK");
        assert_eq!(offer.price.total, "642.40");
        assert_eq!(offer.price.grand_total.as_deref(), Some("642.40"));
        assert_eq!(offer.validating_airline_codes, vec!["DL".to_string()]);
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let offers: OfferSet = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let json = serde_json::to_value(&offers).unwrap();

        assert_eq!(json["data"][0]["source"], "GDS");
        assert_eq!(json["data"][0]["price"]["base"], "540.00");
        assert_eq!(json["meta"]["links"]["self"], "https://example.test");
        assert_eq!(json["dictionaries"]["locations"]["JFK"]["cityCode"], "NYC");
    }

    #[test]
    fn test_missing_dictionaries_default() {
        let offers: OfferSet = serde_json::from_str(r#"{"meta":{},"data":[]}"#).unwrap();
        assert_eq!(offers.meta.count, 0);
        assert!(offers.data.is_empty());
        assert!(offers.dictionaries.carriers.is_empty());
    }

    #[test]
    fn test_meta_and_data_are_required() {
        assert!(serde_json::from_str::<OfferSet>("{}").is_err());
        assert!(serde_json::from_str::<OfferSet>(r#"{"meta":{"count":0}}"#).is_err());
        assert!(serde_json::from_str::<OfferSet>(r#"{"data":[]}"#).is_err());
    }

    #[test]
    fn test_dictionary_lookups_fall_back_to_code() {
        let offers: OfferSet = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(offers.carrier_name("DL"), "DELTA AIR LINES");
        assert_eq!(offers.carrier_name("ZZ"), "ZZ");
        assert_eq!(offers.aircraft_name("321"), "AIRBUS A321");
        assert_eq!(offers.aircraft_name("777"), "777");
    }
}
