//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::{LoadSize, LoadUnloadLocation, QuoteInput, QuoteOptions};

/// Request to calculate a quote
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub trailer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_fraction: Option<f64>,
    #[serde(default)]
    pub options: QuoteOptionsRequest,
}

/// Option flags as sent by form clients
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteOptionsRequest {
    pub city_delivery: bool,
    #[serde(alias = "autolaad_kraan")]
    pub crane: bool,
    pub combined: bool,
    pub km_levy: bool,
    pub adr: bool,
    pub toll: bool,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub waiting_hours: Option<Decimal>,
    pub load: bool,
    pub unload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_unload_location: Option<LoadUnloadLocation>,
    #[serde(skip_serializing)]
    pub load_unload_internal: bool,
    #[serde(skip_serializing)]
    pub load_unload_external: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_fraction: Option<f64>,
}

impl QuoteOptionsRequest {
    /// Merge the location enum with the legacy booleans. The most specific
    /// scenario set anywhere wins: external, then internal, then none.
    pub fn location(&self) -> LoadUnloadLocation {
        let requested = self.load_unload_location.unwrap_or(LoadUnloadLocation::None);
        LoadUnloadLocation::from_flags(
            self.load_unload_internal || requested == LoadUnloadLocation::Internal,
            self.load_unload_external || requested == LoadUnloadLocation::External,
        )
    }
}

impl QuoteRequest {
    /// Top-level load fields win over the copies inside `options`.
    pub fn load_size(&self) -> LoadSize {
        LoadSize {
            grade: self
                .load_grade
                .clone()
                .or_else(|| self.options.load_grade.clone())
                .filter(|g| !g.trim().is_empty()),
            fraction: self.load_fraction.or(self.options.load_fraction),
        }
    }

    /// Normalize into the engine's input.
    pub fn to_input(&self) -> QuoteInput {
        let options = &self.options;
        QuoteInput {
            origin: self.from.clone().unwrap_or_default().trim().to_string(),
            destination: self.to.clone().unwrap_or_default().trim().to_string(),
            trailer_type: self.trailer_type.clone().filter(|t| !t.trim().is_empty()),
            load: self.load_size(),
            options: QuoteOptions {
                city_delivery: options.city_delivery,
                crane: options.crane,
                combined: options.combined,
                km_levy: options.km_levy,
                adr: options.adr,
                toll: options.toll,
                waiting_hours: options.waiting_hours,
                load: options.load,
                unload: options.unload,
                location: options.location(),
                zone: options.zone.clone().filter(|z| !z.trim().is_empty()),
            },
            measured_approach_hours: None,
        }
    }
}
