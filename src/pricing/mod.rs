//! Pricing engine module for freight quotes.
//!
//! `calculators` and `engine` are pure; `services` adds route lookup;
//! `routes` exposes everything over HTTP/JSON.

pub mod calculators;
pub mod engine;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod summary;

// Re-export commonly used items
pub use calculators::{compute_handling, resolve_load_ratio, round_money, Handling};
pub use engine::{calculate_quote, Breakdown, PricingPath, QuoteResult};
pub use models::{PricingConfig, QuoteInput};
pub use routes::router;
pub use services::{calculate_quote_for_lane, PricingError};
