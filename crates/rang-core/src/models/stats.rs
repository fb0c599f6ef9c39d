use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Fallback values substituted when the stats endpoint is unreachable.
/// The endpoint is cosmetic; callers never see an error from it.
pub const FALLBACK_TOTAL_USERS: i64 = 9;
pub const FALLBACK_TOTAL_MEMORIES: i64 = 34;

/// Aggregate usage counters shown on the landing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_users: i64,
    pub total_memories: i64,
    pub last_updated: String,
}

impl StatsSnapshot {
    pub fn fallback() -> Self {
        Self {
            total_users: FALLBACK_TOTAL_USERS,
            total_memories: FALLBACK_TOTAL_MEMORIES,
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}

/// Format a counter for display, e.g. 12500 -> "12.5K+".
pub fn format_count(count: i64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M+", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K+", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}
