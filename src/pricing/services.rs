//! Pricing service functions with routing access.
//!
//! These functions resolve route metrics (cache first, then the provider)
//! and hand them to the pure rate engine.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cache::AppCache;
use crate::routing::{RouteMetrics, RouteProvider, RoutingError};

use super::engine::{calculate_quote, validate_input, QuoteResult};
use super::models::{PricingConfig, QuoteInput};

/// Pricing calculation error types
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Validation error: {message}")]
    Validation { message: String, fields: Vec<String> },

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

/// Look up route metrics for a lane, serving repeated lanes from the cache.
///
/// Provider failures propagate immediately; nothing is retried or cached.
pub async fn lookup_route(
    provider: &dyn RouteProvider,
    cache: &AppCache,
    origin: &str,
    destination: &str,
) -> Result<RouteMetrics, RoutingError> {
    let cache_key = AppCache::route_key(origin, destination);

    if let Some(cached) = cache.routes.get(&cache_key).await {
        tracing::debug!("Cache HIT for route: {}", cache_key);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for route: {}", cache_key);
    let metrics = provider.route_metrics(origin, destination).await?;
    cache.routes.insert(cache_key, metrics).await;
    Ok(metrics)
}

/// Calculate a quote end to end.
///
/// # Arguments
/// * `provider` - Routing collaborator
/// * `cache` - Application cache (route lookups)
/// * `config` - Tariff snapshot for this request
/// * `depot` - Optional depot address; when set the depot-to-origin travel
///   time is measured and used as approach time (never below the floor)
/// * `input` - Normalized request
///
/// # Returns
/// `QuoteResult` with the full breakdown
pub async fn calculate_quote_for_lane(
    provider: &dyn RouteProvider,
    cache: &AppCache,
    config: &PricingConfig,
    depot: Option<&str>,
    mut input: QuoteInput,
) -> Result<QuoteResult, PricingError> {
    // Reject before spending a routing call
    validate_input(&input)?;

    let route = lookup_route(provider, cache, &input.origin, &input.destination).await?;

    if let Some(depot) = depot.filter(|d| !d.trim().is_empty()) {
        input.measured_approach_hours = measure_approach(provider, cache, depot, &input.origin).await;
    }

    let quote = calculate_quote(&input, config, &route)?;

    tracing::info!(
        origin = %input.origin,
        destination = %input.destination,
        distance_km = route.distance_km,
        path = quote.derived.path.as_str(),
        total = %quote.total,
        "Quote calculated"
    );

    Ok(quote)
}

/// Depot approach is an optional refinement: when it cannot be measured the
/// configured approach floor applies.
async fn measure_approach(
    provider: &dyn RouteProvider,
    cache: &AppCache,
    depot: &str,
    origin: &str,
) -> Option<Decimal> {
    match lookup_route(provider, cache, depot, origin).await {
        Ok(metrics) => Some(metrics.duration_hours),
        Err(e) => {
            tracing::warn!("Depot approach lookup failed, using approach floor: {}", e);
            None
        }
    }
}
