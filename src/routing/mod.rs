//! Distance and travel-time lookup.
//!
//! The rate engine only needs `RouteMetrics`; where they come from is behind
//! the `RouteProvider` trait.

pub mod google;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

pub use google::GoogleDirections;

const SECONDS_PER_HOUR: i64 = 3600;

/// Routing failures. None of these are retried.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("GOOGLE_MAPS_API_KEY is not configured")]
    MissingApiKey,
    #[error("invalid directions base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("directions request timed out")]
    Timeout,
    #[error("directions request failed: {0}")]
    Http(String),
    #[error("directions API returned HTTP {0}")]
    Status(u16),
    #[error("malformed directions payload: {0}")]
    Payload(String),
    #[error("no route found ({0})")]
    NoRoute(String),
}

/// Distance and duration of the best route between two places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMetrics {
    /// Whole kilometres, never below 1.
    pub distance_km: u32,
    pub duration_hours: Decimal,
}

impl RouteMetrics {
    /// Build metrics from summed leg totals: metres rounded to whole km
    /// (floored at 1 km), seconds converted to hours.
    pub fn from_totals(meters: u64, seconds: u64) -> Self {
        let km = (meters.saturating_add(500) / 1000).max(1);
        Self {
            distance_km: u32::try_from(km).unwrap_or(u32::MAX),
            duration_hours: Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR),
        }
    }
}

/// Source of route metrics
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route_metrics(&self, origin: &str, destination: &str) -> Result<RouteMetrics, RoutingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_totals_rounds_to_whole_km() {
        assert_eq!(RouteMetrics::from_totals(40_499, 0).distance_km, 40);
        assert_eq!(RouteMetrics::from_totals(40_500, 0).distance_km, 41);
        assert_eq!(RouteMetrics::from_totals(123_456, 0).distance_km, 123);
    }

    #[test]
    fn test_from_totals_floors_at_one_km() {
        assert_eq!(RouteMetrics::from_totals(0, 0).distance_km, 1);
        assert_eq!(RouteMetrics::from_totals(420, 60).distance_km, 1);
    }

    #[test]
    fn test_from_totals_converts_seconds_to_hours() {
        assert_eq!(RouteMetrics::from_totals(1000, 5400).duration_hours, dec!(1.5));
        assert_eq!(RouteMetrics::from_totals(1000, 900).duration_hours, dec!(0.25));
    }
}
