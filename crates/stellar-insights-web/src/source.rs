//! Analytics source abstraction

use async_trait::async_trait;
use stellar_insights_core::{DashboardSnapshot, Result};

/// Provider of pre-aggregated dashboard snapshots.
///
/// Implementations report every kind of failure through the returned
/// error; callers do not distinguish between them.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Fetch one complete snapshot
    async fn fetch_dashboard_snapshot(&self) -> Result<DashboardSnapshot>;

    /// Name used in log output
    fn name(&self) -> &str;
}
