//! Core data types for Stellar Insights

use crate::error::LOAD_FAILURE_MESSAGE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Headline network statistics, pre-aggregated by the analytics source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Network volume over the last 24 hours, in currency units
    pub volume24h: f64,

    /// Volume growth since yesterday, in percent
    pub volume_growth: f64,

    /// Average payment success rate, in percent
    pub avg_success_rate: f64,

    /// Success rate growth since last week, in percent
    pub success_rate_growth: f64,

    /// Number of corridors with activity
    pub active_corridors: u64,

    /// Change in active corridors this month
    pub corridors_growth: i64,
}

/// One point of the network activity time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Axis label, e.g. `"00:00"`
    pub time: String,

    /// Volume in this bucket
    pub volume: f64,

    /// Active corridors in this bucket
    pub corridors: f64,
}

/// Performance figures for a single payment corridor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorPerformance {
    /// Corridor label, e.g. `"US-MX"`
    pub corridor: String,

    /// Success rate in percent (0-100)
    pub success_rate: f64,

    /// Volume over the last 24 hours
    pub volume: f64,

    /// Health score in percent (0-100)
    pub health: f64,
}

/// Complete dashboard payload.
///
/// Sequences keep the order the source sent them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Headline statistics
    pub stats: DashboardStats,

    /// Chronological activity series
    pub time_series_data: Vec<TimeSeriesPoint>,

    /// Per-corridor figures
    pub corridor_performance: Vec<CorridorPerformance>,
}

/// State of a dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// A fetch is outstanding
    Loading,

    /// The last fetch failed
    Error {
        /// User-safe message
        message: String,
    },

    /// The last fetch succeeded
    Ready {
        /// Snapshot being displayed
        snapshot: Arc<DashboardSnapshot>,
    },
}

impl ViewState {
    /// The error state every load failure maps to
    pub fn load_failed() -> Self {
        Self::Error {
            message: LOAD_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Wrap a freshly fetched snapshot
    pub fn ready(snapshot: DashboardSnapshot) -> Self {
        Self::Ready {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Whether a fetch is outstanding
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Snapshot on display, if any
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            Self::Ready { snapshot } => Some(snapshot),
            _ => None,
        }
    }

    /// Short name of the state, as used on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error { .. } => "error",
            Self::Ready { .. } => "ready",
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Loading
    }
}

/// A published state transition.
///
/// Revisions start at 0 for the initial `Loading` state and grow by one
/// with every transition, so consumers can tell a fresh `Loading` from the
/// one they already rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Transition sequence number
    pub revision: u64,
    /// State after the transition
    #[serde(flatten)]
    pub state: ViewState,
}
