//! In-memory caching using moka
//!
//! Route lookups are the only slow step of a quote and the same lanes are
//! quoted over and over, so successful lookups are kept for a while.
//! Failures are never cached.

use moka::future::Cache;
use serde::Serialize;
use std::time::Duration;

use crate::routing::RouteMetrics;

/// Application cache holding route metrics
#[derive(Clone)]
pub struct AppCache {
    /// Route metrics ("origin|destination" -> RouteMetrics)
    pub routes: Cache<String, RouteMetrics>,
}

impl AppCache {
    /// Create a new cache instance with the given capacity and TTL
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            routes: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            routes_size: self.routes.entry_count(),
        }
    }

    /// Generate cache key for a route. Case and surrounding whitespace do
    /// not make a different lane.
    pub fn route_key(origin: &str, destination: &str) -> String {
        format!(
            "{}|{}",
            origin.trim().to_lowercase(),
            destination.trim().to_lowercase()
        )
    }
}

impl Default for AppCache {
    fn default() -> Self {
        // 1000 lanes, 1 hour TTL
        Self::new(1000, Duration::from_secs(60 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub routes_size: u64,
}
