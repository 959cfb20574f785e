//! Mock analytics source for testing

use crate::source::AnalyticsSource;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stellar_insights_core::{
    CorridorPerformance, DashboardSnapshot, DashboardStats, Error, Result, TimeSeriesPoint,
};
use tokio::sync::Semaphore;
use tokio::time::{Duration, sleep};

/// What the next fetch returns
#[derive(Debug, Clone)]
enum Outcome {
    Succeed(DashboardSnapshot),
    Fail(String),
}

/// Scriptable analytics source.
///
/// Counts calls, can delay responses, and can hold every response until
/// the test releases it through [`MockAnalyticsSource::release`].
#[derive(Debug)]
pub struct MockAnalyticsSource {
    outcome: Mutex<Outcome>,
    delay: Duration,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockAnalyticsSource {
    /// Source that always returns `snapshot`
    pub fn succeeding(snapshot: DashboardSnapshot) -> Self {
        Self::with_outcome(Outcome::Succeed(snapshot))
    }

    /// Source that always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Fail(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            delay: Duration::ZERO,
            gate: None,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Delay every response
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hold every response until [`release`](Self::release) is called
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `count` held responses through
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Make subsequent fetches succeed with `snapshot`
    pub fn succeed_with(&self, snapshot: DashboardSnapshot) {
        *self.outcome.lock() = Outcome::Succeed(snapshot);
    }

    /// Make subsequent fetches fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.outcome.lock() = Outcome::Fail(message.into());
    }

    /// Number of fetches started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of fetches that ran to completion
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsSource for MockAnalyticsSource {
    async fn fetch_dashboard_snapshot(&self) -> Result<DashboardSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| Error::Other(format!("Mock gate closed: {e}")))?
                .forget();
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let outcome = self.outcome.lock().clone();
        self.completed.fetch_add(1, Ordering::SeqCst);

        match outcome {
            Outcome::Succeed(snapshot) => Ok(snapshot),
            Outcome::Fail(message) => Err(Error::Other(message)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Snapshot matching the reference dashboard scenario
pub fn sample_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        stats: DashboardStats {
            volume24h: 2_500_000.0,
            volume_growth: 3.0,
            avg_success_rate: 98.0,
            success_rate_growth: 1.0,
            active_corridors: 12,
            corridors_growth: 2,
        },
        time_series_data: vec![TimeSeriesPoint {
            time: "00:00".to_string(),
            volume: 100.0,
            corridors: 5.0,
        }],
        corridor_performance: vec![CorridorPerformance {
            corridor: "US-MX".to_string(),
            success_rate: 97.0,
            volume: 15_000.0,
            health: 90.0,
        }],
    }
}
