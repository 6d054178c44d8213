//! Customer-facing summary of a quote.
//!
//! Presentation policy only: the engine result is left untouched. Internal
//! lines (`base`, `linehaul`, `fuel`) are hidden, loading and unloading are
//! shown as one line, and lines that round to zero are dropped.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::engine::QuoteResult;

const HIDDEN: [&str; 3] = ["base", "linehaul", "fuel"];
const ZERO_THRESHOLD: Decimal = dec!(0.005);

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: &'static str,
    pub label: &'static str,
    pub amount: Decimal,
}

fn label(key: &str) -> &'static str {
    match key {
        "load_unload" => "Laden/Lossen",
        "handling_approach" => "Aanrijden",
        "handling_depart" => "Afrijden",
        "one_pallet" => "1× pallet",
        "km_levy" => "Kilometerheffing",
        "accessorials" => "Bijkosten",
        "zone_flat" => "Zonetoeslag",
        "discount" => "Korting gecombineerd transport",
        _ => "Overig",
    }
}

fn visible(amount: Decimal) -> bool {
    amount.abs() >= ZERO_THRESHOLD
}

/// Build the customer rows for a quote.
pub fn customer_rows(quote: &QuoteResult) -> Vec<SummaryRow> {
    let breakdown = &quote.breakdown;
    let mut rows = Vec::new();

    let load_unload = breakdown.handling_load + breakdown.handling_unload;
    if visible(load_unload) {
        rows.push(SummaryRow {
            key: "load_unload",
            label: label("load_unload"),
            amount: load_unload,
        });
    }

    for (key, amount) in breakdown.lines() {
        if HIDDEN.contains(&key) || key == "handling_load" || key == "handling_unload" {
            continue;
        }
        if !visible(amount) {
            continue;
        }
        rows.push(SummaryRow {
            key,
            label: label(key),
            amount,
        });
    }

    rows
}
