//! HTTP handlers for the pricing API.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::AppState;

use super::calculators::round_money;
use super::engine::QuoteResult;
use super::requests::QuoteRequest;
use super::responses::{PricingOptionsResponse, QuoteResponse, QuoteSummaryResponse, SummaryRowResponse};
use super::services::calculate_quote_for_lane;
use super::summary::customer_rows;

/// Pricing routes, mounted by `crate::app`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quote", post(quote))
        .route("/api/quote/summary", post(quote_summary))
        .route("/api/pricing/options", get(pricing_options))
}

fn parse(payload: std::result::Result<Json<QuoteRequest>, JsonRejection>) -> Result<QuoteRequest> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

async fn run_quote(state: &AppState, request: &QuoteRequest) -> Result<QuoteResult> {
    let quote = calculate_quote_for_lane(
        state.routes.as_ref(),
        &state.cache,
        &state.pricing,
        state.depot.as_deref(),
        request.to_input(),
    )
    .await?;
    Ok(quote)
}

/// Full quote with every line item
async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let request = parse(payload)?;
    let quote = run_quote(&state, &request).await?;
    Ok(Json(QuoteResponse::new(request, &quote, &state.pricing.currency)))
}

/// Customer-facing rows only
async fn quote_summary(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteSummaryResponse>> {
    let request = parse(payload)?;
    let quote = run_quote(&state, &request).await?;

    Ok(Json(QuoteSummaryResponse {
        rows: customer_rows(&quote).iter().map(SummaryRowResponse::from).collect(),
        distance_km: quote.derived.distance_km,
        handling_total_hours: round_money(quote.derived.handling.hours.total, 2),
        total: round_money(quote.total, 2),
        currency: state.pricing.currency.clone(),
    }))
}

/// Trailers, load grades and zones for form clients
async fn pricing_options(State(state): State<AppState>) -> Json<PricingOptionsResponse> {
    Json(PricingOptionsResponse::from(state.pricing.as_ref()))
}
