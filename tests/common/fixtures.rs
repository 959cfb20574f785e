//! Dashboard payloads used across integration tests

use serde_json::{Value, json};
use stellar_insights_core::{CorridorPerformance, DashboardSnapshot};

/// Wire form of the reference success scenario
pub fn scenario_json() -> Value {
    json!({
        "stats": {
            "volume24h": 2_500_000,
            "volumeGrowth": 3,
            "avgSuccessRate": 98,
            "successRateGrowth": 1,
            "activeCorridors": 12,
            "corridorsGrowth": 2
        },
        "timeSeriesData": [
            {"time": "00:00", "volume": 100, "corridors": 5}
        ],
        "corridorPerformance": [
            {"corridor": "US-MX", "successRate": 97, "volume": 15000, "health": 90}
        ]
    })
}

/// Decoded reference scenario
pub fn scenario_snapshot() -> DashboardSnapshot {
    serde_json::from_value(scenario_json()).unwrap_or_else(|e| panic!("bad fixture: {e}"))
}

/// A corridor row
pub fn corridor(label: &str, success_rate: f64, volume: f64, health: f64) -> CorridorPerformance {
    CorridorPerformance {
        corridor: label.to_string(),
        success_rate,
        volume,
        health,
    }
}

/// Reference scenario with a different corridor table
pub fn snapshot_with_corridors(rows: Vec<CorridorPerformance>) -> DashboardSnapshot {
    DashboardSnapshot {
        corridor_performance: rows,
        ..scenario_snapshot()
    }
}
