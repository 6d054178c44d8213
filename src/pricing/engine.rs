//! Rate engine: turns route metrics, a normalized request and a tariff into
//! a full breakdown and total.
//!
//! Stateless and synchronous. Every line item is always computed and
//! returned; hiding lines is left to presentation code.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculators::{compute_handling, is_minimal_load, resolve_load_ratio, Handling};
use super::models::{BaseFeeMode, LoadUnloadLocation, PricingConfig, QuoteInput, QuoteOptions};
use super::services::PricingError;
use crate::routing::RouteMetrics;

/// Which pricing path produced the quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingPath {
    /// Distance x rate x trailer multiplier x load ratio, plus surcharges.
    Standard,
    /// Distance-banded flat price for single-pallet loads.
    FlatRate,
}

impl PricingPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingPath::Standard => "standard",
            PricingPath::FlatRate => "flat_rate",
        }
    }
}

/// Line items of a quote. Every field is always present, possibly zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Breakdown {
    pub base: Decimal,
    pub one_pallet: Decimal,
    pub linehaul: Decimal,
    pub handling_approach: Decimal,
    pub handling_depart: Decimal,
    pub handling_load: Decimal,
    pub handling_unload: Decimal,
    pub km_levy: Decimal,
    pub accessorials: Decimal,
    pub fuel: Decimal,
    pub zone_flat: Decimal,
    pub discount: Decimal,
}

impl Breakdown {
    /// Stable `(key, amount)` pairs in display order.
    pub fn lines(&self) -> [(&'static str, Decimal); 12] {
        [
            ("base", self.base),
            ("one_pallet", self.one_pallet),
            ("linehaul", self.linehaul),
            ("handling_approach", self.handling_approach),
            ("handling_depart", self.handling_depart),
            ("handling_load", self.handling_load),
            ("handling_unload", self.handling_unload),
            ("km_levy", self.km_levy),
            ("accessorials", self.accessorials),
            ("fuel", self.fuel),
            ("zone_flat", self.zone_flat),
            ("discount", self.discount),
        ]
    }

    pub fn handling_total(&self) -> Decimal {
        self.handling_approach + self.handling_depart + self.handling_load + self.handling_unload
    }
}

/// Intermediate values the quote was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub distance_km: u32,
    pub duration_hours: Decimal,
    pub load_ratio: Decimal,
    pub trailer_type: String,
    pub trailer_label: String,
    pub trailer_multiplier: Decimal,
    pub path: PricingPath,
    pub location: LoadUnloadLocation,
    pub handling: Handling,
    pub subtotal: Decimal,
    pub pre_discount_total: Decimal,
}

/// Immutable result of one quote computation
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    pub derived: Derived,
    pub breakdown: Breakdown,
    pub total: Decimal,
}

/// Longest waiting time accepted on a single quote: one year.
pub const MAX_WAITING_HOURS: Decimal = dec!(8760);

/// Reject requests without both endpoints or with an out-of-range waiting
/// time. Runs before any routing call.
pub fn validate_input(input: &QuoteInput) -> Result<(), PricingError> {
    let mut fields = Vec::new();
    let mut problems = Vec::new();

    let missing: Vec<&str> = [("from", &input.origin), ("to", &input.destination)]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        problems.push(format!("{} is required", missing.join(" and ")));
        fields.extend(missing);
    }

    if let Some(hours) = input.options.waiting_hours {
        if hours > MAX_WAITING_HOURS {
            problems.push(format!("waiting_hours must not exceed {}", MAX_WAITING_HOURS));
            fields.push("waiting_hours");
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PricingError::Validation {
            message: problems.join("; "),
            fields: fields.into_iter().map(str::to_string).collect(),
        })
    }
}

/// Compute a quote.
///
/// Single pass: resolve trailer, ratio and handling, then take either the
/// flat single-pallet path or the standard proportional path.
pub fn calculate_quote(
    input: &QuoteInput,
    config: &PricingConfig,
    route: &RouteMetrics,
) -> Result<QuoteResult, PricingError> {
    validate_input(input)?;

    let (trailer_type, trailer) = config.trailer(input.trailer_type.as_deref());
    let ratio = resolve_load_ratio(&input.load, config);
    let handling = compute_handling(config, &input.options, input.measured_approach_hours, ratio);

    let mut derived = Derived {
        distance_km: route.distance_km,
        duration_hours: route.duration_hours,
        load_ratio: ratio,
        trailer_label: if trailer.label.is_empty() {
            trailer_type.clone()
        } else {
            trailer.label.clone()
        },
        trailer_type,
        trailer_multiplier: trailer.multiplier,
        path: PricingPath::Standard,
        location: handling.location,
        handling,
        subtotal: Decimal::ZERO,
        pre_discount_total: Decimal::ZERO,
    };

    if is_minimal_load(&input.load, config) {
        derived.path = PricingPath::FlatRate;
        return Ok(flat_rate_quote(config, &input.options, derived));
    }

    let distance = Decimal::from(route.distance_km);
    let options = &input.options;

    let base = match config.base_fee_mode {
        BaseFeeMode::AddedToSubtotal => config.min_fee,
        BaseFeeMode::FloorOnly => Decimal::ZERO,
    };
    let linehaul = distance * config.distance_rate * trailer.multiplier * ratio;
    let km_levy = if options.km_levy {
        config.km_levy_rate * distance
    } else {
        Decimal::ZERO
    };
    let accessorials = standard_accessorials(config, options, distance);

    let subtotal = base + linehaul + handling.costs.total + km_levy + accessorials;
    let fuel = subtotal * config.fuel_pct;
    let zone_flat = config.zone_flat(options.zone.as_deref());
    let pre_discount_total = subtotal + fuel + zone_flat;
    let discount = if options.combined {
        -(pre_discount_total * config.combined_discount_pct)
    } else {
        Decimal::ZERO
    };
    let total = config.min_fee.max(pre_discount_total + discount);

    derived.subtotal = subtotal;
    derived.pre_discount_total = pre_discount_total;

    Ok(QuoteResult {
        derived,
        breakdown: Breakdown {
            base,
            one_pallet: Decimal::ZERO,
            linehaul,
            handling_approach: handling.costs.approach,
            handling_depart: handling.costs.depart,
            handling_load: handling.costs.load,
            handling_unload: handling.costs.unload,
            km_levy,
            accessorials,
            fuel,
            zone_flat,
            discount,
        },
        total,
    })
}

fn standard_accessorials(config: &PricingConfig, options: &QuoteOptions, distance: Decimal) -> Decimal {
    let fees = &config.accessorials;
    let mut total = Decimal::ZERO;
    if options.city_delivery {
        total += fees.city_delivery;
    }
    if options.adr {
        total += fees.adr;
    }
    if options.toll {
        total += fees.toll_per_km * distance;
    }
    if let Some(hours) = options.waiting_hours {
        total += fees.waiting_per_hour * hours.max(Decimal::ZERO);
    }
    total
}

/// Flat single-pallet path. Skips linehaul, base, zone and discount; folds
/// in only what `one_pallet.include` enables.
fn flat_rate_quote(config: &PricingConfig, options: &QuoteOptions, mut derived: Derived) -> QuoteResult {
    let flat = &config.one_pallet;
    let include = flat.include;
    let distance = Decimal::from(derived.distance_km);

    let price = flat.price_for(derived.distance_km);

    let costs = derived.handling.costs;
    let (approach, depart, load, unload) = if include.handling {
        (costs.approach, costs.depart, costs.load, costs.unload)
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    };

    let km_levy = if include.km_levy && options.km_levy {
        config.km_levy_rate * distance
    } else {
        Decimal::ZERO
    };
    let accessorials = if include.city_delivery && options.city_delivery {
        config.accessorials.city_delivery
    } else {
        Decimal::ZERO
    };

    let subtotal = price + approach + depart + load + unload + km_levy + accessorials;
    let fuel = if include.fuel {
        subtotal * config.fuel_pct
    } else {
        Decimal::ZERO
    };
    let pre_floor = subtotal + fuel;
    let total = if include.min_fee {
        config.min_fee.max(pre_floor)
    } else {
        pre_floor
    };

    derived.subtotal = subtotal;
    derived.pre_discount_total = pre_floor;

    QuoteResult {
        derived,
        breakdown: Breakdown {
            one_pallet: price,
            handling_approach: approach,
            handling_depart: depart,
            handling_load: load,
            handling_unload: unload,
            km_levy,
            accessorials,
            fuel,
            ..Breakdown::default()
        },
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{HandlingRates, LoadSize, ZoneFee};
    use rust_decimal_macros::dec;

    fn route(distance_km: u32) -> RouteMetrics {
        RouteMetrics {
            distance_km,
            duration_hours: dec!(1.5),
        }
    }

    fn input(load: LoadSize, options: QuoteOptions) -> QuoteInput {
        QuoteInput {
            origin: "Amsterdam".to_string(),
            destination: "Utrecht".to_string(),
            trailer_type: Some("tautliner".to_string()),
            load,
            options,
            measured_approach_hours: None,
        }
    }

    fn full() -> LoadSize {
        LoadSize {
            grade: Some("full".to_string()),
            fraction: None,
        }
    }

    fn one_pallet() -> LoadSize {
        LoadSize {
            grade: Some("one_pallet".to_string()),
            fraction: None,
        }
    }

    /// Tariff without handling so line items are easy to check by hand.
    fn no_handling_config() -> PricingConfig {
        PricingConfig {
            handling: HandlingRates {
                rate_per_hour: Decimal::ZERO,
                ..HandlingRates::default()
            },
            ..PricingConfig::default()
        }
    }

    #[test]
    fn test_standard_full_load_no_options() {
        let config = no_handling_config();

        let quote = calculate_quote(&input(full(), QuoteOptions::default()), &config, &route(40)).unwrap();

        assert_eq!(quote.derived.path, PricingPath::Standard);
        assert_eq!(quote.breakdown.base, dec!(110));
        assert_eq!(quote.breakdown.linehaul, dec!(32.00));
        assert_eq!(quote.derived.subtotal, dec!(142));
        assert_eq!(quote.breakdown.fuel, dec!(25.56));
        assert_eq!(quote.breakdown.zone_flat, Decimal::ZERO);
        assert_eq!(quote.total, dec!(167.56));
    }

    #[test]
    fn test_linehaul_scales_with_ratio_and_trailer() {
        let config = PricingConfig::default();
        let request = QuoteInput {
            trailer_type: Some("dieplader".to_string()),
            load: LoadSize {
                grade: None,
                fraction: Some(0.4),
            },
            ..input(full(), QuoteOptions::default())
        };

        let quote = calculate_quote(&request, &config, &route(137)).unwrap();

        // 137 * 0.8 * 1.25 * 0.4
        assert_eq!(quote.breakdown.linehaul, dec!(54.8));
        assert_eq!(quote.derived.trailer_multiplier, dec!(1.25));
        assert_eq!(quote.derived.load_ratio, dec!(0.4));
    }

    #[test]
    fn test_unknown_trailer_uses_default_multiplier() {
        let config = no_handling_config();
        let request = QuoteInput {
            trailer_type: Some("hovercraft".to_string()),
            ..input(full(), QuoteOptions::default())
        };

        let quote = calculate_quote(&request, &config, &route(40)).unwrap();

        assert_eq!(quote.derived.trailer_type, "tautliner");
        assert_eq!(quote.breakdown.linehaul, dec!(32.0));
    }

    #[test]
    fn test_km_levy_is_not_ratio_scaled() {
        let config = no_handling_config();
        let options = QuoteOptions {
            km_levy: true,
            ..Default::default()
        };
        let request = input(
            LoadSize {
                grade: Some("quarter".to_string()),
                fraction: None,
            },
            options,
        );

        let quote = calculate_quote(&request, &config, &route(200)).unwrap();

        assert_eq!(quote.breakdown.km_levy, dec!(24.00));
        assert_eq!(quote.breakdown.linehaul, dec!(40.0)); // 200 * 0.8 * 0.25
    }

    #[test]
    fn test_accessorials_sum_enabled_options() {
        let mut config = no_handling_config();
        config.accessorials.city_delivery = dec!(25);
        config.accessorials.adr = dec!(40);
        config.accessorials.toll_per_km = dec!(0.2);
        config.accessorials.waiting_per_hour = dec!(60);
        let options = QuoteOptions {
            city_delivery: true,
            adr: true,
            toll: true,
            waiting_hours: Some(dec!(1.5)),
            ..Default::default()
        };

        let quote = calculate_quote(&input(full(), options), &config, &route(100)).unwrap();

        // 25 + 40 + 0.2*100 + 60*1.5
        assert_eq!(quote.breakdown.accessorials, dec!(175));
    }

    #[test]
    fn test_zone_flat_is_added_after_fuel() {
        let mut config = no_handling_config();
        config.zones.insert("BE".to_string(), ZoneFee { flat: dec!(50) });
        let options = QuoteOptions {
            zone: Some("BE".to_string()),
            ..Default::default()
        };

        let quote = calculate_quote(&input(full(), options), &config, &route(40)).unwrap();

        assert_eq!(quote.breakdown.zone_flat, dec!(50));
        assert_eq!(quote.breakdown.fuel, dec!(25.56));
        assert_eq!(quote.total, dec!(217.56));
    }

    #[test]
    fn test_combined_discount() {
        let mut config = no_handling_config();
        config.min_fee = Decimal::ZERO;
        config.fuel_pct = Decimal::ZERO;
        config.distance_rate = dec!(1);
        let options = QuoteOptions {
            combined: true,
            ..Default::default()
        };

        let quote = calculate_quote(&input(full(), options), &config, &route(200)).unwrap();

        assert_eq!(quote.derived.pre_discount_total, dec!(200));
        assert_eq!(quote.breakdown.discount, dec!(-40.00));
        assert_eq!(quote.total, dec!(160.00));
    }

    #[test]
    fn test_min_fee_floors_total() {
        let mut config = no_handling_config();
        config.base_fee_mode = BaseFeeMode::FloorOnly;
        let request = input(
            LoadSize {
                grade: Some("quarter".to_string()),
                fraction: None,
            },
            QuoteOptions::default(),
        );

        let quote = calculate_quote(&request, &config, &route(10)).unwrap();

        assert_eq!(quote.breakdown.base, Decimal::ZERO);
        assert!(quote.derived.pre_discount_total < config.min_fee);
        assert_eq!(quote.total, dec!(110));
    }

    #[test]
    fn test_total_never_below_min_fee() {
        let config = PricingConfig::default();
        for km in [1, 5, 24, 51, 99, 101, 400] {
            for fraction in [0.0, 0.05, 0.07, 0.5, 1.0] {
                for combined in [false, true] {
                    let options = QuoteOptions {
                        combined,
                        ..Default::default()
                    };
                    let request = input(
                        LoadSize {
                            grade: None,
                            fraction: Some(fraction),
                        },
                        options,
                    );
                    let quote = calculate_quote(&request, &config, &route(km)).unwrap();
                    assert!(quote.total >= config.min_fee, "{} km / {}: {}", km, fraction, quote.total);
                }
            }
        }
    }

    #[test]
    fn test_external_location_wins_in_quote() {
        let config = PricingConfig::default();
        let options = QuoteOptions {
            location: LoadUnloadLocation::from_flags(true, true),
            ..Default::default()
        };

        let quote = calculate_quote(&input(full(), options), &config, &route(40)).unwrap();

        assert_eq!(quote.derived.location, LoadUnloadLocation::External);
        assert_eq!(quote.derived.handling.hours.depart, dec!(0.5));
        assert_eq!(quote.derived.handling.hours.load, dec!(1.5));
        assert_eq!(quote.breakdown.handling_load, dec!(138.75));
    }

    #[test]
    fn test_handling_lines_match_handling_costs() {
        let config = PricingConfig::default();
        let options = QuoteOptions {
            location: LoadUnloadLocation::Internal,
            ..Default::default()
        };

        let quote = calculate_quote(&input(full(), options), &config, &route(40)).unwrap();

        assert_eq!(quote.breakdown.handling_total(), quote.derived.handling.costs.total);
        assert_eq!(quote.breakdown.handling_depart, Decimal::ZERO);
    }

    #[test]
    fn test_flat_rate_with_km_levy() {
        let mut config = PricingConfig::default();
        config.one_pallet.include.km_levy = true;
        let options = QuoteOptions {
            km_levy: true,
            ..Default::default()
        };

        let quote = calculate_quote(&input(one_pallet(), options), &config, &route(30)).unwrap();

        assert_eq!(quote.derived.path, PricingPath::FlatRate);
        assert_eq!(quote.breakdown.one_pallet, dec!(110));
        assert_eq!(quote.breakdown.km_levy, dec!(3.60));
        assert_eq!(quote.breakdown.linehaul, Decimal::ZERO);
        assert_eq!(quote.breakdown.base, Decimal::ZERO);
        assert_eq!(quote.breakdown.fuel, Decimal::ZERO);
        assert_eq!(quote.breakdown.handling_total(), Decimal::ZERO);
        assert_eq!(quote.total, dec!(113.60));
    }

    #[test]
    fn test_flat_rate_above_all_tiers() {
        let config = PricingConfig::default();

        let quote = calculate_quote(&input(one_pallet(), QuoteOptions::default()), &config, &route(120)).unwrap();

        assert_eq!(quote.breakdown.one_pallet, dec!(225));
        assert_eq!(quote.total, dec!(225));
    }

    #[test]
    fn test_flat_rate_small_fraction_selects_flat_path() {
        let config = PricingConfig::default();
        let request = input(
            LoadSize {
                grade: Some("half".to_string()),
                fraction: Some(0.04),
            },
            QuoteOptions::default(),
        );

        let quote = calculate_quote(&request, &config, &route(60)).unwrap();

        assert_eq!(quote.derived.path, PricingPath::FlatRate);
        assert_eq!(quote.breakdown.one_pallet, dec!(145));
    }

    #[test]
    fn test_flat_rate_is_monotonic_in_distance() {
        let config = PricingConfig::default();
        let mut previous = Decimal::ZERO;
        for km in 1..=150 {
            let quote =
                calculate_quote(&input(one_pallet(), QuoteOptions::default()), &config, &route(km)).unwrap();
            assert!(quote.breakdown.one_pallet >= previous, "price dropped at {} km", km);
            previous = quote.breakdown.one_pallet;
        }
    }

    #[test]
    fn test_flat_rate_include_flags() {
        let mut config = PricingConfig::default();
        config.accessorials.city_delivery = dec!(20);
        config.one_pallet.include.handling = true;
        config.one_pallet.include.fuel = true;
        config.one_pallet.include.city_delivery = true;
        let options = QuoteOptions {
            city_delivery: true,
            location: LoadUnloadLocation::Internal,
            ..Default::default()
        };

        let quote = calculate_quote(&input(one_pallet(), options), &config, &route(20)).unwrap();

        // internal: 0.5 approach + 1.0 load + 1.0 unload
        let handling = dec!(2.5) * dec!(92.5);
        assert_eq!(quote.breakdown.handling_total(), handling);
        assert_eq!(quote.breakdown.accessorials, dec!(20));
        let subtotal = dec!(85) + handling + dec!(20);
        assert_eq!(quote.derived.subtotal, subtotal);
        assert_eq!(quote.breakdown.fuel, subtotal * dec!(0.18));
        assert_eq!(quote.total, subtotal * dec!(1.18));
    }

    #[test]
    fn test_flat_rate_without_min_fee_floor() {
        let mut config = PricingConfig::default();
        config.one_pallet.include.min_fee = false;

        let quote = calculate_quote(&input(one_pallet(), QuoteOptions::default()), &config, &route(10)).unwrap();

        assert_eq!(quote.total, dec!(85));
    }

    #[test]
    fn test_missing_endpoints_fail_validation() {
        let config = PricingConfig::default();
        let request = QuoteInput {
            origin: "  ".to_string(),
            destination: String::new(),
            ..input(full(), QuoteOptions::default())
        };

        let err = calculate_quote(&request, &config, &route(10)).unwrap_err();

        match err {
            PricingError::Validation { fields, .. } => assert_eq!(fields, vec!["from", "to"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_excessive_waiting_hours_fail_validation() {
        let mut config = PricingConfig::default();
        config.accessorials.waiting_per_hour = dec!(60);
        let request = input(
            full(),
            QuoteOptions {
                waiting_hours: Some(Decimal::from_scientific("5e27").unwrap()),
                ..Default::default()
            },
        );

        let err = calculate_quote(&request, &config, &route(10)).unwrap_err();

        match err {
            PricingError::Validation { fields, .. } => assert_eq!(fields, vec!["waiting_hours"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_waiting_hours_at_limit_are_priced() {
        let mut config = no_handling_config();
        config.accessorials.waiting_per_hour = dec!(60);
        let request = input(
            full(),
            QuoteOptions {
                waiting_hours: Some(MAX_WAITING_HOURS),
                ..Default::default()
            },
        );

        let quote = calculate_quote(&request, &config, &route(10)).unwrap();

        assert_eq!(quote.breakdown.accessorials, dec!(525600));
    }

    #[test]
    fn test_quote_is_deterministic() {
        let config = PricingConfig::default();
        let options = QuoteOptions {
            crane: true,
            km_levy: true,
            combined: true,
            location: LoadUnloadLocation::External,
            ..Default::default()
        };
        let request = input(full(), options);

        let first = calculate_quote(&request, &config, &route(87)).unwrap();
        let second = calculate_quote(&request, &config, &route(87)).unwrap();

        assert_eq!(first, second);
    }
}
