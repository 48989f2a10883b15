use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocodingSettings;
use crate::models::GeoPoint;

/// Errors that can occur when calling the geocoding service
#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoder returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Address fields sent to the geocoder
#[derive(Debug, Clone)]
pub struct AddressQuery<'a> {
    pub street: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub postal_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lon: String,
    lat: String,
}

/// Nominatim-compatible geocoding client
pub struct GeocodingClient {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(base_url: String, user_agent: String, timeout: Duration) -> Result<Self, GeocodingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            user_agent,
            client,
        })
    }

    pub fn from_settings(settings: &GeocodingSettings) -> Result<Self, GeocodingError> {
        Self::new(
            settings.endpoint.clone(),
            settings.user_agent.clone(),
            Duration::from_secs(settings.timeout_secs.unwrap_or(10)),
        )
    }

    fn search_url(&self, address: &AddressQuery<'_>) -> String {
        format!(
            "{}/search?street={}&city={}&country={}&postalcode={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address.street),
            urlencoding::encode(address.city),
            urlencoding::encode(address.country),
            urlencoding::encode(address.postal_code),
        )
    }

    /// Look up the coordinates of an address
    ///
    /// Returns `Ok(None)` when the geocoder has no match.
    pub async fn geocode(&self, address: &AddressQuery<'_>) -> Result<Option<GeoPoint>, GeocodingError> {
        let url = self.search_url(address);
        tracing::debug!("Geocoding address: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodingError::ApiError(format!(
                "Failed to geocode address: {}",
                response.status()
            )));
        }

        let results: Vec<SearchResult> = response.json().await?;

        let Some(first) = results.first() else {
            return Ok(None);
        };

        let longitude = first
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodingError::InvalidResponse(format!("Invalid lon: {}", first.lon)))?;
        let latitude = first
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodingError::InvalidResponse(format!("Invalid lat: {}", first.lat)))?;

        let point = GeoPoint::new(longitude, latitude);
        if !point.is_valid() {
            return Err(GeocodingError::InvalidResponse(format!(
                "Coordinates out of range: lon={}, lat={}",
                longitude, latitude
            )));
        }

        Ok(Some(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressQuery<'static> {
        AddressQuery {
            street: "1 Beacon St",
            city: "Boston",
            country: "USA",
            postal_code: "02108",
        }
    }

    #[test]
    fn test_search_url_encodes_fields() {
        let client = GeocodingClient::new(
            "https://geocoder.test/".to_string(),
            "test-agent".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            client.search_url(&address()),
            "https://geocoder.test/search?street=1%20Beacon%20St&city=Boston&country=USA&postalcode=02108&format=json&limit=1"
        );
    }

    #[tokio::test]
    async fn test_geocode_parses_first_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .match_header("user-agent", "test-agent")
            .with_header("content-type", "application/json")
            .with_body(r#"[{"lon": "-71.0589", "lat": "42.3601", "display_name": "Boston"}]"#)
            .create_async()
            .await;

        let client = GeocodingClient::new(server.url(), "test-agent".to_string(), Duration::from_secs(5)).unwrap();
        let point = client.geocode(&address()).await.unwrap();

        assert_eq!(point, Some(GeoPoint::new(-71.0589, 42.3601)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_no_match_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let client = GeocodingClient::new(server.url(), "test-agent".to_string(), Duration::from_secs(5)).unwrap();

        assert_eq!(client.geocode(&address()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = GeocodingClient::new(server.url(), "test-agent".to_string(), Duration::from_secs(5)).unwrap();

        assert!(matches!(
            client.geocode(&address()).await,
            Err(GeocodingError::ApiError(_))
        ));
    }
}
