//! Store - the single owner of application state.
//!
//! The store is the central coordinator:
//!
//! ```text
//! UI intent ─► dispatch(action) ─► Reducer ─► new state ─► subscribers
//!                    │
//!                    └─► matching effect runners ─► remote calls
//!                              │
//!                              └─► ctx.dispatch(result action) ──┐
//!                                                                │
//!        dispatch(result action) ◄───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use statesync::{Policy, StoreBuilder};
//!
//! let store = StoreBuilder::new(AppState::default(), deps)
//!     .with_effect("payment.fetch", Policy::TakeEvery, FetchPaymentsEffect)
//!     .with_effect("payment.add", Policy::TakeLatest, AddPaymentEffect)
//!     .with_error_handler(NotifyingErrorHandler::new(notifier))
//!     .build()?;
//!
//! // Fire and forget
//! store.dispatch(PaymentAction::Fetch { page: 1, fresh: true });
//!
//! // Or wait until every runner it caused has finished
//! store.dispatch_and_await(PaymentAction::Fetch { page: 1, fresh: true }).await?;
//! ```
//!
//! # Serial Reduction
//!
//! Reduction runs under the store's state lock, to completion. While the
//! lock is held the store also checks take-latest cancellation, evaluates
//! `dispatch_if` predicates, publishes the envelope and prepares runner
//! tickets, so each of those observes exactly the state its action produced.
//! Runners are launched after the lock is released.

use std::any::type_name;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info};

use crate::bus::{ActionBus, DEFAULT_CAPACITY};
use crate::core::{Action, ActionEnvelope, CorrelationId};
use crate::effect_impl::{CancelToken, Effect, EffectWrapper};
use crate::error::{ErrorHandler, LogErrorHandler, RunnerFailure, StatesyncError};
use crate::inflight::InflightTracker;
use crate::policy::{Matcher, Policy};
use crate::reducer::Reducer;
use crate::runner::Registration;

/// Default timeout for `dispatch_and_await`.
pub const DEFAULT_AWAIT_TIMEOUT: Duration = Duration::from_secs(30);

struct StoreInner<S, A> {
    state: Mutex<Arc<S>>,
    snapshots: watch::Sender<Arc<S>>,
    bus: ActionBus<A>,
    registrations: Vec<Registration<S, A>>,
    inflight: Arc<InflightTracker>,
    error_handler: Arc<dyn ErrorHandler>,
    runtime: Handle,
}

/// Handle to a store. Cheap to clone; all clones share the same state.
pub struct Store<S, A> {
    inner: Arc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    /// Create a new store builder.
    pub fn builder<D: Send + Sync + 'static>(initial: S, deps: D) -> StoreBuilder<S, A, D> {
        StoreBuilder::new(initial, deps)
    }

    /// Dispatch an action under a fresh correlation ID.
    ///
    /// The action is reduced before this returns; matching runners are
    /// scheduled but not awaited. Returns the correlation ID used.
    pub fn dispatch(&self, action: impl Into<A>) -> CorrelationId {
        let cid = CorrelationId::new();
        self.dispatch_checked(action.into(), cid, None, None);
        cid
    }

    /// Dispatch an action with a specific correlation ID.
    pub fn dispatch_with_correlation(&self, action: A, cid: CorrelationId) {
        self.dispatch_checked(action, cid, None, None);
    }

    /// Dispatch `action` only if `predicate` holds for the current state.
    ///
    /// The check and the reduction happen under one lock acquisition.
    pub fn dispatch_if<P>(&self, predicate: P, action: impl Into<A>) -> bool
    where
        P: FnOnce(&S) -> bool,
    {
        self.dispatch_checked(
            action.into(),
            CorrelationId::new(),
            None,
            Some(Box::new(predicate)),
        )
    }

    pub(crate) fn dispatch_gated(
        &self,
        action: A,
        cid: CorrelationId,
        cancel: Option<&CancelToken>,
    ) -> bool {
        self.dispatch_checked(action, cid, cancel, None)
    }

    pub(crate) fn dispatch_checked(
        &self,
        action: A,
        cid: CorrelationId,
        cancel: Option<&CancelToken>,
        predicate: Option<Box<dyn FnOnce(&S) -> bool + '_>>,
    ) -> bool {
        let tag = action.tag();

        let tickets = {
            let mut state = self.lock_state();

            if cancel.is_some_and(CancelToken::is_cancelled) {
                debug!(tag, %cid, "superseded runner dispatch suppressed");
                return false;
            }
            if let Some(predicate) = predicate {
                if !predicate(&**state) {
                    debug!(tag, %cid, "dispatch predicate rejected");
                    return false;
                }
            }

            let next = Arc::new((**state).clone().reduce(&action));
            *state = next.clone();
            self.inner.snapshots.send_replace(next);

            let tickets: Vec<_> = self
                .inner
                .registrations
                .iter()
                .filter(|registration| registration.matches(tag))
                .map(|registration| (registration, registration.prepare()))
                .collect();

            debug!(tag, %cid, runners = tickets.len(), "action reduced");
            self.inner
                .bus
                .publish_envelope(ActionEnvelope::new(cid, action.clone()));
            tickets
        };

        for (registration, ticket) in tickets {
            registration.launch(ticket, self, &action, cid);
        }
        true
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<S> {
        self.lock_state().clone()
    }

    /// Watch state snapshots. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.inner.snapshots.subscribe()
    }

    /// Observe dispatched actions from now on.
    pub fn actions(&self) -> broadcast::Receiver<ActionEnvelope<A>> {
        self.inner.bus.subscribe()
    }

    /// Get the action bus.
    pub fn bus(&self) -> &ActionBus<A> {
        &self.inner.bus
    }

    /// Get the inflight tracker.
    pub fn inflight(&self) -> &Arc<InflightTracker> {
        &self.inner.inflight
    }

    /// Dispatch an action and wait until every runner it caused, directly
    /// or through follow-up actions, has finished.
    ///
    /// Uses [`DEFAULT_AWAIT_TIMEOUT`]. Runner failures are not returned here;
    /// they go to the error handler.
    pub async fn dispatch_and_await(&self, action: impl Into<A>) -> Result<(), StatesyncError> {
        self.dispatch_and_await_timeout(action, DEFAULT_AWAIT_TIMEOUT)
            .await
    }

    /// Dispatch an action and wait for its correlated work, with custom timeout.
    pub async fn dispatch_and_await_timeout(
        &self,
        action: impl Into<A>,
        timeout: Duration,
    ) -> Result<(), StatesyncError> {
        let cid = CorrelationId::new();
        self.dispatch_with_correlation(action.into(), cid);

        tokio::time::timeout(timeout, self.inner.inflight.wait_zero(cid))
            .await
            .map_err(|_| StatesyncError::Timeout { duration: timeout })
    }

    /// Wait until no runner instance is pending anywhere in the store.
    pub async fn settled(&self) {
        self.inner.inflight.wait_idle().await
    }

    /// Number of runner instances currently scheduled, running or parked.
    pub fn running_count(&self) -> usize {
        self.inner.inflight.total()
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.inner.runtime
    }

    /// Hand a runner failure to the error handler.
    ///
    /// A panicking handler is logged and swallowed.
    pub(crate) fn report_failure(&self, failure: RunnerFailure) {
        let handler = &self.inner.error_handler;
        if catch_unwind(AssertUnwindSafe(|| handler.handle_error(&failure))).is_err() {
            error!(
                tag = failure.tag,
                registration = %failure.registration,
                cid = %failure.cid,
                "error handler panicked"
            );
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Arc<S>> {
        // A panicking reducer never stored its result, so the last state is intact.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("registrations", &self.inner.registrations)
            .field("inflight", &self.inner.inflight)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Store Builder
// =============================================================================

/// Builder for a [`Store`] with its effect registrations.
///
/// Registrations are fixed once the store is built.
///
/// # Example
///
/// ```ignore
/// let store = StoreBuilder::new(AppState::default(), deps)
///     .with_effect(Matcher::AnyOf(vec!["customer.add", "customer.update"]), Policy::TakeLatest, SaveCustomerEffect)
///     .with_bus_capacity(256)
///     .build()?;
/// ```
pub struct StoreBuilder<S, A, D> {
    initial: S,
    deps: Arc<D>,
    registrations: Vec<Registration<S, A>>,
    error_handler: Arc<dyn ErrorHandler>,
    bus_capacity: usize,
}

impl<S, A, D> StoreBuilder<S, A, D>
where
    S: Reducer<A>,
    A: Action,
    D: Send + Sync + 'static,
{
    /// Create a new builder with the initial state and runner dependencies.
    pub fn new(initial: S, deps: D) -> Self {
        Self::with_arc(initial, Arc::new(deps))
    }

    /// Create a new builder with Arc-wrapped dependencies.
    ///
    /// Use this when the dependencies are shared with other parts of the system.
    pub fn with_arc(initial: S, deps: Arc<D>) -> Self {
        Self {
            initial,
            deps,
            registrations: Vec::new(),
            error_handler: Arc::new(LogErrorHandler),
            bus_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Register an effect for the tags accepted by `matcher`.
    ///
    /// Several registrations may match the same tag; they are launched in
    /// registration order.
    pub fn with_effect<E>(mut self, matcher: impl Into<Matcher>, policy: Policy, effect: E) -> Self
    where
        E: Effect<S, A, D>,
    {
        let matcher = matcher.into();
        let name = format!("{}({})", short_type_name::<E>(), matcher);
        debug!(registration = %name, %policy, "registering effect");

        let effect = EffectWrapper::new(effect, self.deps.clone());
        self.registrations
            .push(Registration::new(name, matcher, policy, Arc::new(effect)));
        self
    }

    /// Replace the default logging error handler.
    pub fn with_error_handler(mut self, handler: impl ErrorHandler) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Set how many envelopes the action bus buffers for slow observers.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Build the store. Runners are spawned on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StatesyncError::NoRuntime`] when called outside a runtime.
    pub fn build(self) -> Result<Store<S, A>, StatesyncError> {
        let runtime = Handle::try_current().map_err(|_| StatesyncError::NoRuntime)?;

        let initial = Arc::new(self.initial);
        let (snapshots, _) = watch::channel(initial.clone());

        info!(
            registrations = self.registrations.len(),
            "store built"
        );
        for registration in &self.registrations {
            debug!(
                registration = registration.name(),
                policy = %registration.policy(),
                "effect registered"
            );
        }

        Ok(Store {
            inner: Arc::new(StoreInner {
                state: Mutex::new(initial),
                snapshots,
                bus: ActionBus::with_capacity(self.bus_capacity),
                registrations: self.registrations,
                inflight: Arc::new(InflightTracker::new()),
                error_handler: self.error_handler,
                runtime,
            }),
        })
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
