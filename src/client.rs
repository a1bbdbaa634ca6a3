//! Flight offer provider client
//!
//! Sends a trip query to the offer provider as a JSON POST and parses the
//! response into an `OfferSet`. One request per search: no retries and no
//! client-side timeout.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::offers::OfferSet;
use crate::query::TripQuery;

/// Default provider endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5133";

/// Longest slice of an error response body kept in a `NetworkError`
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur while fetching offers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request could not be sent or the response could not be read
    #[error("Request to offer provider failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("Offer provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a valid offer response
    #[error("Failed to parse offer response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        NetworkError::Transport(e.to_string())
    }
}

/// Something that can look up offers for a trip query
pub trait OfferSearchClient: Send + Sync {
    fn search<'a>(&'a self, query: &'a TripQuery) -> BoxFuture<'a, Result<OfferSet, NetworkError>>;
}

/// Request body expected by the provider
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    departure_date: String,
    return_date: String,
    origin_location_code: &'a str,
    destination_location_code: &'a str,
    /// Sent as a string, the way the search form submits it
    adults: String,
    currency_code: &'a str,
}

impl<'a> From<&'a TripQuery> for SearchRequest<'a> {
    fn from(query: &'a TripQuery) -> Self {
        Self {
            departure_date: query.departure_date().format("%Y-%m-%d").to_string(),
            return_date: query.return_date().format("%Y-%m-%d").to_string(),
            origin_location_code: query.origin(),
            destination_location_code: query.destination(),
            adults: query.adults().to_string(),
            currency_code: query.currency(),
        }
    }
}

/// Client for the HTTP offer provider
#[derive(Debug, Clone)]
pub struct HttpOfferClient {
    client: Client,
    endpoint: String,
}

impl Default for HttpOfferClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpOfferClient {
    /// Create a client for the default endpoint
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client for a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch offers for the given query
    ///
    /// # Returns
    /// * `Ok(OfferSet)` - Parsed provider response
    /// * `Err(NetworkError)` - Connection failure, non-2xx status, or unparseable body
    pub async fn fetch_offers(&self, query: &TripQuery) -> Result<OfferSet, NetworkError> {
        tracing::debug!(endpoint = %self.endpoint, "requesting flight offers");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SearchRequest::from(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The status is the useful part; an unreadable body is dropped
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let text = response.text().await?;

        parse_offers(&text)
    }
}

impl OfferSearchClient for HttpOfferClient {
    fn search<'a>(&'a self, query: &'a TripQuery) -> BoxFuture<'a, Result<OfferSet, NetworkError>> {
        self.fetch_offers(query).boxed()
    }
}

/// Parse a provider response body into an `OfferSet`
///
/// The body must be a JSON object carrying `meta` and `data`; anything else,
/// including a provider error object, is a `Decode` error.
pub fn parse_offers(body: &str) -> Result<OfferSet, NetworkError> {
    let value: Value = serde_json::from_str(body).map_err(|e| NetworkError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(NetworkError::Decode("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| NetworkError::Decode(e.to_string()))
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{serve_once, serve_raw_once};
    use super::*;
    use crate::offers::fixtures::SAMPLE_RESPONSE;
    use crate::query::TripForm;
    use tokio::net::TcpListener;

    /// Error object the provider sends with a 200 when it rejects a query
    const PROVIDER_ERROR_BODY: &str =
        r#"{"errors":[{"status":400,"code":477,"title":"INVALID DATE","detail":"Date/Time is in the past"}]}"#;

    fn sample_query() -> TripQuery {
        TripForm {
            departure_date: "2025-06-01".to_string(),
            return_date: "2025-06-10".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            adults: "2".to_string(),
            currency: "USD".to_string(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_request_body_uses_provider_field_names() {
        let query = sample_query();
        let json = serde_json::to_value(SearchRequest::from(&query)).unwrap();

        assert_eq!(json["departureDate"], "2025-06-01");
        assert_eq!(json["returnDate"], "2025-06-10");
        assert_eq!(json["originLocationCode"], "JFK");
        assert_eq!(json["destinationLocationCode"], "LAX");
        assert_eq!(json["adults"], "2");
        assert_eq!(json["currencyCode"], "USD");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_parse_offers_rejects_invalid_body() {
        let err = parse_offers("<html>oops</html>").unwrap_err();
        assert!(matches!(err, NetworkError::Decode(_)));
    }

    #[test]
    fn test_parse_offers_rejects_bodies_without_offers() {
        for body in ["{}", "[]", "null", PROVIDER_ERROR_BODY, r#"[{"count":1},[]]"#] {
            let err = parse_offers(body).unwrap_err();
            assert!(
                matches!(err, NetworkError::Decode(_)),
                "body {} should be a decode error, got {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_parse_offers_accepts_empty_result() {
        let offers = parse_offers(r#"{"meta":{"count":0},"data":[]}"#).unwrap();
        assert!(offers.data.is_empty());
    }

    #[test]
    fn test_truncate_long_body() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[tokio::test]
    async fn test_fetch_offers_posts_query_and_parses_response() {
        let (url, server) = serve_once("200 OK", SAMPLE_RESPONSE).await;
        let client = HttpOfferClient::with_endpoint(url);

        let offers = client.fetch_offers(&sample_query()).await.expect("fetch should succeed");
        assert_eq!(offers.meta.count, 1);
        assert_eq!(offers.data[0].price.total, "642.40");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains("\"originLocationCode\":\"JFK\""));
        assert!(request.contains("\"adults\":\"2\""));
    }

    #[tokio::test]
    async fn test_fetch_offers_server_error_is_status_error() {
        let (url, _server) = serve_once("500 Internal Server Error", "{\"error\":\"boom\"}").await;
        let client = HttpOfferClient::with_endpoint(url);

        let err = client.fetch_offers(&sample_query()).await.unwrap_err();
        assert_eq!(
            err,
            NetworkError::Status {
                status: 500,
                body: "{\"error\":\"boom\"}".to_string(),
            }
        );
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_fetch_offers_unparseable_body_is_decode_error() {
        let (url, _server) = serve_once("200 OK", "not json").await;
        let client = HttpOfferClient::with_endpoint(url);

        let err = client.search(&sample_query()).await.unwrap_err();
        assert!(matches!(err, NetworkError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_offers_error_object_is_decode_error() {
        let (url, _server) = serve_once("200 OK", PROVIDER_ERROR_BODY).await;
        let client = HttpOfferClient::with_endpoint(url);

        let err = client.fetch_offers(&sample_query()).await.unwrap_err();
        assert!(matches!(err, NetworkError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_offers_keeps_status_when_error_body_is_truncated() {
        // Promises more body than it sends, so reading the body fails
        let (url, _server) = serve_raw_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort".to_string(),
        )
        .await;
        let client = HttpOfferClient::with_endpoint(url);

        let err = client.fetch_offers(&sample_query()).await.unwrap_err();
        assert_eq!(
            err,
            NetworkError::Status {
                status: 503,
                body: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_offers_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpOfferClient::with_endpoint(url);
        let err = client.fetch_offers(&sample_query()).await.unwrap_err();
        assert!(matches!(err, NetworkError::Transport(_)));
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(HttpOfferClient::new().endpoint(), DEFAULT_ENDPOINT);
    }
}
