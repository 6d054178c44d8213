//! Response DTOs for pricing API endpoints.
//!
//! This is where amounts get rounded: money and hours to two places,
//! ratios and multipliers to four.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::round_money;
use super::engine::{Breakdown, QuoteResult};
use super::models::{LoadUnloadLocation, PricingConfig};
use super::requests::QuoteRequest;
use super::summary::SummaryRow;
use crate::cache::CacheStats;

fn money(amount: Decimal) -> Decimal {
    round_money(amount, 2)
}

fn factor(amount: Decimal) -> Decimal {
    round_money(amount, 4)
}

/// Response for quote calculation
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub inputs: QuoteRequest,
    pub derived: DerivedResponse,
    pub breakdown: BreakdownResponse,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub currency: String,
}

impl QuoteResponse {
    pub fn new(inputs: QuoteRequest, quote: &QuoteResult, currency: &str) -> Self {
        Self {
            inputs,
            derived: DerivedResponse::from(quote),
            breakdown: BreakdownResponse::from(&quote.breakdown),
            total: money(quote.total),
            currency: currency.to_string(),
        }
    }
}

/// Derived quantities shown next to the breakdown
#[derive(Debug, Serialize)]
pub struct DerivedResponse {
    pub distance_km: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub duration_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub load_ratio: Decimal,
    pub trailer_type: String,
    pub trailer_label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub trailer_multiplier: Decimal,
    pub pricing_path: &'static str,
    pub load_unload_location: LoadUnloadLocation,
    #[serde(with = "rust_decimal::serde::float")]
    pub approach_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub depart_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub load_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unload_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_total_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_rate_per_hour: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl From<&QuoteResult> for DerivedResponse {
    fn from(quote: &QuoteResult) -> Self {
        let derived = &quote.derived;
        let hours = derived.handling.hours;
        Self {
            distance_km: derived.distance_km,
            duration_hours: money(derived.duration_hours),
            load_ratio: factor(derived.load_ratio),
            trailer_type: derived.trailer_type.clone(),
            trailer_label: derived.trailer_label.clone(),
            trailer_multiplier: factor(derived.trailer_multiplier),
            pricing_path: derived.path.as_str(),
            load_unload_location: derived.location,
            approach_hours: money(hours.approach),
            depart_hours: money(hours.depart),
            load_hours: money(hours.load),
            unload_hours: money(hours.unload),
            handling_total_hours: money(hours.total),
            handling_rate_per_hour: money(derived.handling.rate_per_hour),
            subtotal: money(derived.subtotal),
        }
    }
}

/// Every line item, always present
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub base: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub one_pallet: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub linehaul: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_approach: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_depart: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_load: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_unload: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub km_levy: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub accessorials: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fuel: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub zone_flat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
}

impl From<&Breakdown> for BreakdownResponse {
    fn from(b: &Breakdown) -> Self {
        Self {
            base: money(b.base),
            one_pallet: money(b.one_pallet),
            linehaul: money(b.linehaul),
            handling_approach: money(b.handling_approach),
            handling_depart: money(b.handling_depart),
            handling_load: money(b.handling_load),
            handling_unload: money(b.handling_unload),
            km_levy: money(b.km_levy),
            accessorials: money(b.accessorials),
            fuel: money(b.fuel),
            zone_flat: money(b.zone_flat),
            discount: money(b.discount),
        }
    }
}

/// One customer-facing summary line
#[derive(Debug, Serialize)]
pub struct SummaryRowResponse {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&SummaryRow> for SummaryRowResponse {
    fn from(row: &SummaryRow) -> Self {
        Self {
            key: row.key,
            label: row.label,
            amount: money(row.amount),
        }
    }
}

/// Response for the customer summary
#[derive(Debug, Serialize)]
pub struct QuoteSummaryResponse {
    pub rows: Vec<SummaryRowResponse>,
    pub distance_km: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub handling_total_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub currency: String,
}

/// Trailer choice for form clients
#[derive(Debug, Serialize)]
pub struct TrailerOptionResponse {
    pub key: String,
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
}

/// Load grade choice for form clients
#[derive(Debug, Serialize)]
pub struct LoadGradeResponse {
    pub key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub ratio: Decimal,
}

/// Response for the pricing options listing
#[derive(Debug, Serialize)]
pub struct PricingOptionsResponse {
    pub default_trailer: String,
    pub trailers: Vec<TrailerOptionResponse>,
    pub load_grades: Vec<LoadGradeResponse>,
    pub zones: Vec<String>,
    pub currency: String,
}

impl From<&PricingConfig> for PricingOptionsResponse {
    fn from(config: &PricingConfig) -> Self {
        let mut load_grades: Vec<LoadGradeResponse> = config
            .load_grades
            .iter()
            .map(|(key, ratio)| LoadGradeResponse {
                key: key.clone(),
                ratio: *ratio,
            })
            .collect();
        load_grades.sort_by(|a, b| a.ratio.cmp(&b.ratio));

        Self {
            default_trailer: config.default_trailer.clone(),
            trailers: config
                .trailers
                .iter()
                .map(|(key, spec)| TrailerOptionResponse {
                    key: key.clone(),
                    label: if spec.label.is_empty() {
                        key.clone()
                    } else {
                        spec.label.clone()
                    },
                    multiplier: spec.multiplier,
                })
                .collect(),
            load_grades,
            zones: config.zones.keys().cloned().collect(),
            currency: config.currency.clone(),
        }
    }
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub route_cache: CacheStats,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}
