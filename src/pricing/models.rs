//! Pricing configuration and domain input models.
//!
//! `PricingConfig` is supplied from outside the engine (see `crate::config`)
//! and is never mutated while quotes are computed against it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How `min_fee` enters the quote on the standard path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseFeeMode {
    /// `min_fee` is booked as a `base` line in the subtotal and also floors the total.
    #[default]
    AddedToSubtotal,
    /// `min_fee` only floors the total; the `base` line stays zero.
    FloorOnly,
}

/// Hour budgets and the hourly rate for approach, departure, loading and unloading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlingRates {
    pub approach_min_hours: Decimal,
    pub depart_min_hours: Decimal,
    pub full_trailer_load_unload_hours: Decimal,
    pub rate_per_hour: Decimal,
    pub internal_load_unload_hours: Decimal,
    pub external_load_unload_hours: Decimal,
}

impl Default for HandlingRates {
    fn default() -> Self {
        Self {
            approach_min_hours: dec!(0.5),
            depart_min_hours: dec!(0.5),
            full_trailer_load_unload_hours: dec!(1.5),
            rate_per_hour: dec!(92.5),
            internal_load_unload_hours: dec!(1.0),
            external_load_unload_hours: dec!(1.5),
        }
    }
}

/// Trailer table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailerSpec {
    #[serde(default)]
    pub label: String,
    #[serde(default = "one")]
    pub multiplier: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_m3: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_kg: Option<u32>,
}

fn one() -> Decimal {
    Decimal::ONE
}

/// One distance band of the flat tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatTier {
    pub max_km: u32,
    pub price: Decimal,
}

/// Which regular components are folded into a flat-rate quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeFlags {
    pub min_fee: bool,
    pub handling: bool,
    pub fuel: bool,
    pub km_levy: bool,
    pub city_delivery: bool,
}

impl Default for IncludeFlags {
    fn default() -> Self {
        Self {
            min_fee: true,
            handling: false,
            fuel: false,
            km_levy: false,
            city_delivery: false,
        }
    }
}

/// Distance-banded flat pricing for single-pallet shipments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnePalletPricing {
    /// Grade label that selects the flat path.
    pub grade: String,
    /// An explicit fraction at or below this value also selects the flat path.
    pub max_fraction: Decimal,
    /// Ascending by `max_km`; first match wins.
    pub tiers: Vec<FlatTier>,
    pub price_above: Decimal,
    pub include: IncludeFlags,
}

impl Default for OnePalletPricing {
    fn default() -> Self {
        Self {
            grade: "one_pallet".to_string(),
            max_fraction: dec!(0.06),
            tiers: vec![
                FlatTier { max_km: 25, price: dec!(85) },
                FlatTier { max_km: 50, price: dec!(110) },
                FlatTier { max_km: 75, price: dec!(145) },
                FlatTier { max_km: 100, price: dec!(175) },
            ],
            price_above: dec!(225),
            include: IncludeFlags::default(),
        }
    }
}

impl OnePalletPricing {
    /// Flat price for a distance: the first tier whose `max_km` covers it,
    /// otherwise `price_above`.
    pub fn price_for(&self, distance_km: u32) -> Decimal {
        self.tiers
            .iter()
            .find(|tier| tier.max_km >= distance_km)
            .map(|tier| tier.price)
            .unwrap_or(self.price_above)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneFee {
    pub flat: Decimal,
}

/// Flat and per-unit surcharges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessorials {
    pub city_delivery: Decimal,
    pub adr: Decimal,
    pub waiting_per_hour: Decimal,
    pub toll_per_km: Decimal,
}

/// Complete tariff consumed by the rate engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: String,
    pub min_fee: Decimal,
    pub base_fee_mode: BaseFeeMode,
    #[serde(alias = "eur_per_km_base")]
    pub distance_rate: Decimal,
    pub fuel_pct: Decimal,
    pub handling: HandlingRates,
    pub crane_multiplier: Decimal,
    pub km_levy_rate: Decimal,
    pub combined_discount_pct: Decimal,
    #[serde(alias = "beladingsgraad")]
    pub load_grades: BTreeMap<String, Decimal>,
    pub default_trailer: String,
    pub trailers: BTreeMap<String, TrailerSpec>,
    pub one_pallet: OnePalletPricing,
    pub default_zone: String,
    pub zones: BTreeMap<String, ZoneFee>,
    pub accessorials: Accessorials,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let load_grades = [
            ("one_pallet", dec!(0.05)),
            ("quarter", dec!(0.25)),
            ("half", dec!(0.5)),
            ("three_quarter", dec!(0.75)),
            ("full", dec!(1.0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let trailers = [
            ("tautliner", "Tautliner", dec!(1.0)),
            ("vlakke", "Vlakke trailer", dec!(1.0)),
            ("uitschuif", "Uitschuif trailer", dec!(1.1)),
            ("dieplader", "Dieplader", dec!(1.25)),
        ]
        .into_iter()
        .map(|(key, label, multiplier)| {
            (
                key.to_string(),
                TrailerSpec {
                    label: label.to_string(),
                    multiplier,
                    volume_m3: None,
                    payload_kg: None,
                },
            )
        })
        .collect();

        let zones = ["NL", "BE", "DE"]
            .into_iter()
            .map(|code| (code.to_string(), ZoneFee::default()))
            .collect();

        Self {
            currency: "EUR".to_string(),
            min_fee: dec!(110),
            base_fee_mode: BaseFeeMode::default(),
            distance_rate: dec!(0.8),
            fuel_pct: dec!(0.18),
            handling: HandlingRates::default(),
            crane_multiplier: dec!(1.25),
            km_levy_rate: dec!(0.12),
            combined_discount_pct: dec!(0.20),
            load_grades,
            default_trailer: "tautliner".to_string(),
            trailers,
            one_pallet: OnePalletPricing::default(),
            default_zone: "NL".to_string(),
            zones,
            accessorials: Accessorials::default(),
        }
    }
}

impl PricingConfig {
    /// Trailer for a requested type, falling back to the default trailer and
    /// finally to a neutral multiplier of 1.
    pub fn trailer(&self, trailer_type: Option<&str>) -> (String, TrailerSpec) {
        if let Some(spec) = trailer_type.and_then(|t| self.trailers.get(t)) {
            return (trailer_type.unwrap_or_default().to_string(), spec.clone());
        }
        match self.trailers.get(&self.default_trailer) {
            Some(spec) => (self.default_trailer.clone(), spec.clone()),
            None => (
                self.default_trailer.clone(),
                TrailerSpec {
                    label: self.default_trailer.clone(),
                    multiplier: Decimal::ONE,
                    volume_m3: None,
                    payload_kg: None,
                },
            ),
        }
    }

    /// Flat fee for a zone code (or the default zone); unknown zones cost nothing.
    pub fn zone_flat(&self, zone: Option<&str>) -> Decimal {
        let code = zone.unwrap_or(&self.default_zone);
        self.zones.get(code).map(|z| z.flat).unwrap_or(Decimal::ZERO)
    }

    /// Check every invariant and report all violations together.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let rates = [
            ("min_fee", self.min_fee),
            ("distance_rate", self.distance_rate),
            ("fuel_pct", self.fuel_pct),
            ("crane_multiplier", self.crane_multiplier),
            ("km_levy_rate", self.km_levy_rate),
            ("combined_discount_pct", self.combined_discount_pct),
            ("handling.approach_min_hours", self.handling.approach_min_hours),
            ("handling.depart_min_hours", self.handling.depart_min_hours),
            (
                "handling.full_trailer_load_unload_hours",
                self.handling.full_trailer_load_unload_hours,
            ),
            ("handling.rate_per_hour", self.handling.rate_per_hour),
            (
                "handling.internal_load_unload_hours",
                self.handling.internal_load_unload_hours,
            ),
            (
                "handling.external_load_unload_hours",
                self.handling.external_load_unload_hours,
            ),
            ("one_pallet.price_above", self.one_pallet.price_above),
            ("accessorials.city_delivery", self.accessorials.city_delivery),
            ("accessorials.adr", self.accessorials.adr),
            ("accessorials.waiting_per_hour", self.accessorials.waiting_per_hour),
            ("accessorials.toll_per_km", self.accessorials.toll_per_km),
        ];
        for (name, value) in rates {
            if value < Decimal::ZERO {
                errors.push(format!("{} must not be negative (got {})", name, value));
            }
        }

        if self.combined_discount_pct > Decimal::ONE {
            errors.push("combined_discount_pct must be at most 1".to_string());
        }

        for (grade, ratio) in &self.load_grades {
            if *ratio < Decimal::ZERO || *ratio > Decimal::ONE {
                errors.push(format!("load_grades.{} must be within [0, 1] (got {})", grade, ratio));
            }
        }

        for (key, trailer) in &self.trailers {
            if trailer.multiplier < Decimal::ZERO {
                errors.push(format!("trailers.{}.multiplier must not be negative", key));
            }
        }
        if !self.trailers.contains_key(&self.default_trailer) {
            errors.push(format!(
                "default_trailer '{}' is not in the trailer table",
                self.default_trailer
            ));
        }

        for pair in self.one_pallet.tiers.windows(2) {
            if pair[0].max_km > pair[1].max_km {
                errors.push(format!(
                    "one_pallet.tiers must be ascending by max_km ({} before {})",
                    pair[0].max_km, pair[1].max_km
                ));
            }
        }
        for tier in &self.one_pallet.tiers {
            if tier.price < Decimal::ZERO {
                errors.push(format!("one_pallet tier up to {} km has a negative price", tier.max_km));
            }
        }

        for (code, zone) in &self.zones {
            if zone.flat < Decimal::ZERO {
                errors.push(format!("zones.{}.flat must not be negative", code));
            }
        }

        errors
    }
}

/// Where loading and unloading happen. Internal jobs have no departure leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadUnloadLocation {
    #[default]
    None,
    Internal,
    External,
}

impl LoadUnloadLocation {
    /// Collapse the two legacy booleans; external wins when both are set.
    pub fn from_flags(internal: bool, external: bool) -> Self {
        if external {
            Self::External
        } else if internal {
            Self::Internal
        } else {
            Self::None
        }
    }
}

/// Shipment size as given by the caller. A finite fraction wins over a grade.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadSize {
    pub grade: Option<String>,
    pub fraction: Option<f64>,
}

/// Normalized options the engine prices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteOptions {
    pub city_delivery: bool,
    pub crane: bool,
    pub combined: bool,
    pub km_levy: bool,
    pub adr: bool,
    pub toll: bool,
    pub waiting_hours: Option<Decimal>,
    pub load: bool,
    pub unload: bool,
    pub location: LoadUnloadLocation,
    pub zone: Option<String>,
}

/// Validated-at-boundary quote input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteInput {
    pub origin: String,
    pub destination: String,
    pub trailer_type: Option<String>,
    pub load: LoadSize,
    pub options: QuoteOptions,
    /// Measured depot-to-origin travel time, when a depot is configured.
    pub measured_approach_hours: Option<Decimal>,
}
