//! # Roster Stats
//!
//! Valorant roster tracker: cached match history, ranked/scrim/team-match
//! classification and aggregated player statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, match records, stats)
//! - **cache**: TTL cache, injected clock and single-flight coalescing
//! - **fetch**: Upstream match-history gateway (HenrikDev API)
//! - **classify**: Ranked, scrim and team-match classification
//! - **calculate**: Statistics and derived metrics computation
//! - **refresh**: Roster refresh controller
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod models;
pub mod refresh;

pub use models::*;

use std::time::Duration;

/// Parse a refresher interval such as "30m", "1h" or "90s". A bare number
/// is seconds. Zero is accepted here; config validation decides whether it
/// makes sense.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit_secs) = match s.char_indices().last()? {
        (i, 'h') => (&s[..i], 3600),
        (i, 'm') => (&s[..i], 60),
        (i, 's') => (&s[..i], 1),
        _ => (s, 1),
    };

    let value: u64 = digits.trim().parse().ok()?;
    value.checked_mul(unit_secs).map(Duration::from_secs)
}
