//! Dashboard view controller
//!
//! Owns the single [`ViewState`] cell of a dashboard view and drives the
//! fetch lifecycle against an [`AnalyticsSource`]:
//!
//! * `initialize` moves to `Loading` and issues one fetch, unless one is
//!   already outstanding.
//! * A finished fetch moves to `Ready` or `Error`, but only if it is still
//!   the current attempt and the controller has not been disposed.
//! * `retry` abandons any outstanding fetch and starts over.
//! * `dispose` abandons the outstanding fetch for good.
//!
//! The latest state is kept in a [`tokio::sync::watch`] channel. Every
//! transition is also broadcast as a numbered [`StateUpdate`] so that
//! observers which must not miss intermediate states can follow along.

use crate::source::AnalyticsSource;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use stellar_insights_core::{
    AnalyticsLoadFailure, DashboardSnapshot, Error, Result, StateUpdate, ViewState,
};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Name of the fetch outcome counter
pub const FETCH_COUNTER: &str = "insights_dashboard_fetch_total";

/// Transitions buffered per update subscriber before it lags
pub const UPDATE_CAPACITY: usize = 64;

/// Handle identifying one fetch attempt.
///
/// Completion handlers ignore tickets that are no longer current.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    attempt: u64,
    cancel: CancellationToken,
}

impl FetchTicket {
    /// Sequence number of the attempt, starting at 1
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }
}

#[derive(Debug, Default)]
struct Lifecycle {
    attempt: u64,
    revision: u64,
    in_flight: Option<CancellationToken>,
    disposed: bool,
}

struct Shared {
    source: Arc<dyn AnalyticsSource>,
    state: watch::Sender<ViewState>,
    updates: broadcast::Sender<StateUpdate>,
    lifecycle: Mutex<Lifecycle>,
    request_timeout: Option<Duration>,
}

/// Controller for one dashboard view instance.
///
/// Cheap to clone; clones share the same state cell.
#[derive(Clone)]
pub struct DashboardController {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Publishing holds the lifecycle lock while writing the state cell,
        // so the state borrow must be released before locking.
        let state = self.shared.state.borrow().name();
        let lifecycle = self.shared.lifecycle.lock();

        f.debug_struct("DashboardController")
            .field("source", &self.shared.source.name())
            .field("state", &state)
            .field("lifecycle", &*lifecycle)
            .finish()
    }
}

impl DashboardController {
    /// Create a controller in the `Loading` state. No fetch is issued until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(source: Arc<dyn AnalyticsSource>, request_timeout: Option<Duration>) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                source,
                state,
                updates,
                lifecycle: Mutex::new(Lifecycle::default()),
                request_timeout,
            }),
        }
    }

    /// Enter `Loading` and issue one fetch.
    ///
    /// Returns `Ok(false)` without doing anything if a fetch is already
    /// outstanding. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] once the controller has been disposed.
    pub fn initialize(&self) -> Result<bool> {
        match self.begin_attempt(false)? {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discard the current state and start a fresh lifecycle.
    ///
    /// An outstanding fetch is cancelled and its response, should it still
    /// arrive, is ignored. Exactly one new fetch is issued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] once the controller has been disposed.
    pub fn retry(&self) -> Result<()> {
        if let Some(ticket) = self.begin_attempt(true)? {
            info!(attempt = ticket.attempt, "Retrying dashboard fetch");
            self.spawn_fetch(ticket);
        }
        Ok(())
    }

    /// Tear the view down. Any outstanding fetch is cancelled and no later
    /// response will change the state.
    pub fn dispose(&self) {
        let mut lifecycle = self.shared.lifecycle.lock();
        if lifecycle.disposed {
            return;
        }

        lifecycle.disposed = true;
        if let Some(cancel) = lifecycle.in_flight.take() {
            cancel.cancel();
        }
        info!(attempt = lifecycle.attempt, "Dashboard controller disposed");
    }

    /// Publish a fetched snapshot. Returns whether the state changed.
    pub fn on_fetch_succeeded(&self, ticket: &FetchTicket, snapshot: DashboardSnapshot) -> bool {
        let applied = self.complete(ticket, ViewState::ready(snapshot));
        if applied {
            debug!(attempt = ticket.attempt, "Dashboard snapshot loaded");
            metrics::counter!(FETCH_COUNTER, "outcome" => "success").increment(1);
        }
        applied
    }

    /// Publish a failed fetch. The error is logged; the state only ever
    /// carries the fixed user-facing message. Returns whether the state
    /// changed.
    pub fn on_fetch_failed(&self, ticket: &FetchTicket, error: Error) -> bool {
        let failure = AnalyticsLoadFailure::new(error);
        let applied = self.complete(
            ticket,
            ViewState::Error {
                message: failure.user_message().to_string(),
            },
        );

        if applied {
            error!(
                attempt = ticket.attempt,
                source = self.shared.source.name(),
                error = %failure.cause(),
                "Failed to load analytics data"
            );
            metrics::counter!(FETCH_COUNTER, "outcome" => "failure").increment(1);
        } else {
            debug!(
                attempt = ticket.attempt,
                error = %failure.cause(),
                "Ignoring failure of superseded dashboard fetch"
            );
        }
        applied
    }

    /// Current state
    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Receiver of the latest state. Intermediate states may be skipped
    /// when several transitions happen before the receiver looks.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    /// Receiver of every subsequent transition, in order
    pub fn subscribe_updates(&self) -> broadcast::Receiver<StateUpdate> {
        self.shared.updates.subscribe()
    }

    /// Current state together with its revision
    pub fn current_update(&self) -> StateUpdate {
        let lifecycle = self.shared.lifecycle.lock();
        let state = self.shared.state.borrow().clone();
        StateUpdate {
            revision: lifecycle.revision,
            state,
        }
    }

    /// Whether a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.shared.lifecycle.lock().in_flight.is_some()
    }

    /// Whether [`dispose`](Self::dispose) has been called
    pub fn is_disposed(&self) -> bool {
        self.shared.lifecycle.lock().disposed
    }

    /// Book a new attempt and publish `Loading`.
    ///
    /// With `restart` unset an outstanding attempt wins and `None` comes
    /// back; with it set the outstanding attempt is cancelled first.
    fn begin_attempt(&self, restart: bool) -> Result<Option<FetchTicket>> {
        let mut lifecycle = self.shared.lifecycle.lock();
        if lifecycle.disposed {
            return Err(Error::Disposed);
        }

        if let Some(cancel) = &lifecycle.in_flight {
            if !restart {
                debug!(attempt = lifecycle.attempt, "Dashboard fetch already in flight");
                return Ok(None);
            }
            cancel.cancel();
        }

        lifecycle.attempt += 1;
        let cancel = CancellationToken::new();
        lifecycle.in_flight = Some(cancel.clone());
        self.publish(&mut lifecycle, ViewState::Loading);

        Ok(Some(FetchTicket {
            attempt: lifecycle.attempt,
            cancel,
        }))
    }

    fn complete(&self, ticket: &FetchTicket, next: ViewState) -> bool {
        let mut lifecycle = self.shared.lifecycle.lock();
        if lifecycle.disposed || lifecycle.attempt != ticket.attempt || ticket.cancel.is_cancelled()
        {
            metrics::counter!(FETCH_COUNTER, "outcome" => "discarded").increment(1);
            return false;
        }

        lifecycle.in_flight = None;
        self.publish(&mut lifecycle, next);
        true
    }

    /// Store `next` and broadcast it under a fresh revision. Callers hold
    /// the lifecycle lock so revisions and states stay in step.
    fn publish(&self, lifecycle: &mut Lifecycle, next: ViewState) {
        lifecycle.revision += 1;
        self.shared.state.send_replace(next.clone());

        // No subscribers is not an error
        let _ = self.shared.updates.send(StateUpdate {
            revision: lifecycle.revision,
            state: next,
        });
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let controller = self.clone();

        tokio::spawn(async move {
            let source = Arc::clone(&controller.shared.source);
            let request_timeout = controller.shared.request_timeout;

            let fetch = async move {
                match request_timeout {
                    Some(limit) => tokio::time::timeout(limit, source.fetch_dashboard_snapshot())
                        .await
                        .unwrap_or_else(|_| {
                            Err(Error::Timeout {
                                duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                            })
                        }),
                    None => source.fetch_dashboard_snapshot().await,
                }
            };

            tokio::select! {
                biased;
                () = ticket.cancel.cancelled() => {
                    debug!(attempt = ticket.attempt, "Dashboard fetch cancelled");
                    metrics::counter!(FETCH_COUNTER, "outcome" => "discarded").increment(1);
                }
                outcome = fetch => {
                    match outcome {
                        Ok(snapshot) => controller.on_fetch_succeeded(&ticket, snapshot),
                        Err(e) => controller.on_fetch_failed(&ticket, e),
                    };
                }
            }
        });
    }
}
