//! Display model of the analytics dashboard
//!
//! Maps a [`ViewState`] to everything the page shows. Every value is taken
//! from the snapshot as delivered; nothing is recomputed here.

use serde::Serialize;
use stellar_insights_core::format::{
    STATUS_BADGE_TEXT, format_growth_count, format_growth_percent, format_number, format_percent,
    format_volume_millions, format_volume_thousands, health_bar_width,
};
use stellar_insights_core::{CorridorPerformance, DashboardSnapshot, DashboardStats, TimeSeriesPoint, ViewState};

/// Page heading
pub const PAGE_TITLE: &str = "Analytics";

/// Line under the page heading
pub const PAGE_SUBTITLE: &str = "Deep insights into Stellar network performance and metrics";

/// Heading shown above the error message
pub const ERROR_HEADING: &str = "Error Loading Data";

/// Label of the retry control
pub const RETRY_LABEL: &str = "Retry";

/// Title of the corridor table
pub const TABLE_TITLE: &str = "Detailed Corridor Performance";

/// Column headings of the corridor table
pub const TABLE_COLUMNS: [&str; 5] = [
    "Corridor",
    "Success Rate",
    "24h Volume",
    "Health Score",
    "Status",
];

/// What the dashboard shows for one view state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardView {
    /// Busy indicator only
    Busy,

    /// Error message plus retry control
    Failed {
        /// Message shown to the user
        message: String,
        /// Label of the retry control
        retry_label: &'static str,
    },

    /// Cards, charts and table
    Ready(Box<ReadyView>),
}

impl DashboardView {
    /// Derive the display for `state`
    pub fn from_state(state: &ViewState) -> Self {
        match state {
            ViewState::Loading => Self::Busy,
            ViewState::Error { message } => Self::Failed {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            },
            ViewState::Ready { snapshot } => Self::Ready(Box::new(ReadyView::from_snapshot(snapshot))),
        }
    }

    /// Whether only the busy indicator is shown
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Everything shown for a loaded snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyView {
    /// Volume, success rate and corridor cards, in that order
    pub cards: [MetricCard; 3],
    /// Volume and corridors over time
    pub activity_chart: ChartSpec,
    /// Success rate per corridor
    pub success_chart: ChartSpec,
    /// One row per corridor, in snapshot order
    pub rows: Vec<CorridorRow>,
}

impl ReadyView {
    /// Derive the display for `snapshot`
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        Self {
            cards: metric_cards(&snapshot.stats),
            activity_chart: activity_chart(&snapshot.time_series_data),
            success_chart: success_chart(&snapshot.corridor_performance),
            rows: snapshot
                .corridor_performance
                .iter()
                .map(CorridorRow::from_performance)
                .collect(),
        }
    }
}

/// One summary card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    /// Card heading
    pub title: &'static str,
    /// Headline figure
    pub value: String,
    /// Growth line under the figure
    pub growth: String,
}

fn metric_cards(stats: &DashboardStats) -> [MetricCard; 3] {
    [
        MetricCard {
            title: "Network Volume (24h)",
            value: format_volume_millions(stats.volume24h),
            growth: format_growth_percent(stats.volume_growth, "from yesterday"),
        },
        MetricCard {
            title: "Avg Success Rate",
            value: format_percent(stats.avg_success_rate),
            growth: format_growth_percent(stats.success_rate_growth, "from last week"),
        },
        MetricCard {
            title: "Active Corridors",
            value: stats.active_corridors.to_string(),
            growth: format_growth_count(stats.corridors_growth, "this month"),
        },
    ]
}

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Line chart
    Line,
    /// Bar chart
    Bar,
}

/// One data series of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Legend label
    pub label: &'static str,
    /// Values aligned with the chart labels
    pub data: Vec<f64>,
    /// Stroke or fill colour
    pub color: &'static str,
}

/// Chart definition handed to the charting library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Chart heading
    pub title: &'static str,
    /// Chart type
    pub kind: ChartKind,
    /// X-axis labels
    pub labels: Vec<String>,
    /// Data series
    pub series: Vec<ChartSeries>,
}

fn activity_chart(points: &[TimeSeriesPoint]) -> ChartSpec {
    ChartSpec {
        title: "Network Activity Over Time",
        kind: ChartKind::Line,
        labels: points.iter().map(|p| p.time.clone()).collect(),
        series: vec![
            ChartSeries {
                label: "Volume ($)",
                data: points.iter().map(|p| p.volume).collect(),
                color: "#3b82f6",
            },
            ChartSeries {
                label: "Corridors",
                data: points.iter().map(|p| p.corridors).collect(),
                color: "#10b981",
            },
        ],
    }
}

fn success_chart(rows: &[CorridorPerformance]) -> ChartSpec {
    ChartSpec {
        title: "Success Rate by Corridor",
        kind: ChartKind::Bar,
        labels: rows.iter().map(|r| r.corridor.clone()).collect(),
        series: vec![ChartSeries {
            label: "Success Rate %",
            data: rows.iter().map(|r| r.success_rate).collect(),
            color: "#3b82f6",
        }],
    }
}

/// One row of the corridor table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorRow {
    /// Corridor label
    pub corridor: String,
    /// Success rate with a percent sign
    pub success_rate: String,
    /// 24h volume in thousands
    pub volume: String,
    /// Raw health score
    pub health: String,
    /// CSS width of the health bar
    pub health_width: String,
    /// Status badge text
    pub status: &'static str,
}

impl CorridorRow {
    fn from_performance(row: &CorridorPerformance) -> Self {
        Self {
            corridor: row.corridor.clone(),
            success_rate: format_percent(row.success_rate),
            volume: format_volume_thousands(row.volume),
            health: format_number(row.health),
            health_width: health_bar_width(row.health),
            status: STATUS_BADGE_TEXT,
        }
    }
}
