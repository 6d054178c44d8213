//! Freight quote service.
//!
//! Looks up the distance between two places and prices the shipment with a
//! configurable tariff: linehaul, handling, surcharges, fuel, zone fees,
//! discounts and a minimum fee.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod routing;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::AppCache;
use crate::pricing::responses::HealthResponse;
use crate::pricing::PricingConfig;
use crate::routing::RouteProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tariff snapshot, loaded once at startup
    pub pricing: Arc<PricingConfig>,
    pub routes: Arc<dyn RouteProvider>,
    pub cache: AppCache,
    /// Depot address used to measure approach time
    pub depot: Option<Arc<str>>,
}

/// Build the HTTP application
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        route_cache: state.cache.stats(),
    })
}
