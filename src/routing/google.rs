//! Google Directions API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{RouteMetrics, RouteProvider, RoutingError};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const DIRECTIONS_PATH: &str = "maps/api/directions/json";
const USER_AGENT: &str = concat!("vrachttarief/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    distance: Option<ValueField>,
    #[serde(default)]
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: u64,
}

/// Directions client. One request per lookup, bounded by the client timeout.
#[derive(Clone)]
pub struct GoogleDirections {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl GoogleDirections {
    pub fn new(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self, RoutingError> {
        let base_url = Url::parse(base_url).map_err(|e| RoutingError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        let http = Client::builder().user_agent(USER_AGENT).timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn url(&self, origin: &str, destination: &str, key: &str) -> Result<Url, RoutingError> {
        let mut url = self
            .base_url
            .join(DIRECTIONS_PATH)
            .map_err(|e| RoutingError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut()
            .append_pair("origin", origin)
            .append_pair("destination", destination)
            .append_pair("units", "metric")
            .append_pair("language", "nl")
            .append_pair("key", key);
        Ok(url)
    }
}

#[async_trait]
impl RouteProvider for GoogleDirections {
    async fn route_metrics(&self, origin: &str, destination: &str) -> Result<RouteMetrics, RoutingError> {
        let key = self.api_key.as_deref().ok_or(RoutingError::MissingApiKey)?;
        let url = self.url(origin, destination, key)?;

        tracing::debug!("Requesting directions {} -> {}", origin, destination);

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RoutingError::Timeout
            } else {
                RoutingError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let payload: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| RoutingError::Payload(e.to_string()))?;

        metrics_from_payload(payload)
    }
}

fn metrics_from_payload(payload: DirectionsResponse) -> Result<RouteMetrics, RoutingError> {
    if payload.status != "OK" {
        let detail = match payload.error_message {
            Some(message) => format!("{}: {}", payload.status, message),
            None => payload.status,
        };
        return Err(RoutingError::NoRoute(detail));
    }

    let legs = payload
        .routes
        .into_iter()
        .next()
        .map(|route| route.legs)
        .filter(|legs| !legs.is_empty())
        .ok_or_else(|| RoutingError::NoRoute("geen route".to_string()))?;

    let meters = legs
        .iter()
        .filter_map(|leg| leg.distance.as_ref())
        .fold(0u64, |sum, d| sum.saturating_add(d.value));
    let seconds = legs
        .iter()
        .filter_map(|leg| leg.duration.as_ref())
        .fold(0u64, |sum, d| sum.saturating_add(d.value));

    Ok(RouteMetrics::from_totals(meters, seconds))
}
