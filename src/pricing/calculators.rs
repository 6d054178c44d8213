//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no I/O. The rate engine in
//! `pricing::engine` composes these into a full quote.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{HandlingRates, LoadSize, LoadUnloadLocation, PricingConfig, QuoteOptions};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
/// Only applied at the response boundary; engine arithmetic stays exact.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use vrachttarief::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Resolve the load ratio (beladingsgraad) in [0, 1].
///
/// A finite `fraction` is clamped and wins; otherwise a known `grade` maps
/// through `config.load_grades`; anything else resolves to zero.
pub fn resolve_load_ratio(load: &LoadSize, config: &PricingConfig) -> Decimal {
    if let Some(ratio) = clamped_fraction(load) {
        return ratio;
    }

    load.grade
        .as_deref()
        .and_then(|grade| config.load_grades.get(grade))
        .map(|ratio| (*ratio).clamp(Decimal::ZERO, Decimal::ONE))
        .unwrap_or(Decimal::ZERO)
}

fn clamped_fraction(load: &LoadSize) -> Option<Decimal> {
    let fraction = load.fraction.filter(|f| f.is_finite())?;
    let clamped = fraction.clamp(0.0, 1.0);
    Some(Decimal::from_f64(clamped).unwrap_or(Decimal::ZERO))
}

/// Whether the shipment takes the flat single-pallet path.
///
/// An explicit finite fraction decides on its own (`<= max_fraction`);
/// without one, only the configured one-pallet grade qualifies.
pub fn is_minimal_load(load: &LoadSize, config: &PricingConfig) -> bool {
    match clamped_fraction(load) {
        Some(ratio) => ratio <= config.one_pallet.max_fraction,
        None => load.grade.as_deref() == Some(config.one_pallet.grade.as_str()),
    }
}

/// Handling hours per component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandlingHours {
    pub approach: Decimal,
    pub depart: Decimal,
    pub load: Decimal,
    pub unload: Decimal,
    pub total: Decimal,
}

/// Handling costs per component (hours times the effective rate).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandlingCosts {
    pub approach: Decimal,
    pub depart: Decimal,
    pub load: Decimal,
    pub unload: Decimal,
    pub total: Decimal,
}

/// Result of the handling calculation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Handling {
    pub location: LoadUnloadLocation,
    pub rate_per_hour: Decimal,
    pub hours: HandlingHours,
    pub costs: HandlingCosts,
}

/// Compute approach, departure, loading and unloading time and cost.
///
/// * internal: fixed load/unload hours, no departure leg
/// * external: fixed load/unload hours plus the departure floor
/// * none: load/unload scale with `ratio` and are gated by the
///   `load`/`unload` options
///
/// Approach is never below `approach_min_hours`; a measured depot approach
/// only raises it.
pub fn compute_handling(
    config: &PricingConfig,
    options: &QuoteOptions,
    measured_approach_hours: Option<Decimal>,
    ratio: Decimal,
) -> Handling {
    let rates: &HandlingRates = &config.handling;

    let rate_per_hour = if options.crane {
        rates.rate_per_hour * config.crane_multiplier
    } else {
        rates.rate_per_hour
    };

    let approach = match measured_approach_hours {
        Some(measured) => measured.max(rates.approach_min_hours),
        None => rates.approach_min_hours,
    };

    let (depart, load, unload) = match options.location {
        LoadUnloadLocation::Internal => (
            Decimal::ZERO,
            rates.internal_load_unload_hours,
            rates.internal_load_unload_hours,
        ),
        LoadUnloadLocation::External => (
            rates.depart_min_hours,
            rates.external_load_unload_hours,
            rates.external_load_unload_hours,
        ),
        LoadUnloadLocation::None => {
            let per_op = rates.full_trailer_load_unload_hours * ratio;
            (
                rates.depart_min_hours,
                if options.load { per_op } else { Decimal::ZERO },
                if options.unload { per_op } else { Decimal::ZERO },
            )
        }
    };

    let hours = HandlingHours {
        approach,
        depart,
        load,
        unload,
        total: approach + depart + load + unload,
    };

    let costs = HandlingCosts {
        approach: approach * rate_per_hour,
        depart: depart * rate_per_hour,
        load: load * rate_per_hour,
        unload: unload * rate_per_hour,
        total: hours.total * rate_per_hour,
    };

    Handling {
        location: options.location,
        rate_per_hour,
        hours,
        costs,
    }
}
