//! Effect registrations and runner scheduling.
//!
//! A registration pairs a [`Matcher`] with an effect and a [`Policy`]. When
//! the store reduces a matching action it asks the registration for a
//! [`Ticket`] (still under the state lock) and then launches the instance:
//!
//! ```text
//! dispatch(action)
//!   ├─ lock state ─ reduce ─ publish ─ prepare tickets ─ unlock
//!   └─ launch(ticket) per matching registration
//!        ├─ TakeEvery   → spawn instance
//!        ├─ TakeLatest  → abort previous, spawn instance that first awaits
//!        │                the previous one's teardown
//!        └─ QueueLatest → spawn driver, or park (replacing any parked action)
//! ```
//!
//! Preparing take-latest tickets under the state lock means that by the time
//! `dispatch` returns, the previous instance is already marked cancelled and
//! cannot dispatch its result any more.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::{Action, CorrelationId};
use crate::effect_impl::{AnyEffect, CancelToken};
use crate::error::RunnerFailure;
use crate::inflight::InflightGuard;
use crate::policy::{Matcher, Policy};
use crate::reducer::Reducer;
use crate::store::Store;

/// Permission to launch one instance, prepared while the state lock is held.
pub(crate) struct Ticket {
    cancel: Option<CancelToken>,
}

struct SlotState<A> {
    /// Handle of the newest take-latest instance.
    current: Option<JoinHandle<()>>,
    /// Whether a queue-latest driver is running.
    running: bool,
    /// Newest action waiting for the queue-latest driver.
    parked: Option<(A, CorrelationId)>,
}

/// Per-registration scheduling state.
struct Slot<A> {
    latest: Arc<AtomicU64>,
    state: Mutex<SlotState<A>>,
}

impl<A> Slot<A> {
    fn new() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            state: Mutex::new(SlotState {
                current: None,
                running: false,
                parked: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One effect registered for a matcher under a concurrency policy.
pub(crate) struct Registration<S, A> {
    name: Arc<str>,
    matcher: Matcher,
    policy: Policy,
    effect: Arc<dyn AnyEffect<S, A>>,
    slot: Arc<Slot<A>>,
}

impl<S, A> Registration<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    pub(crate) fn new(
        name: String,
        matcher: Matcher,
        policy: Policy,
        effect: Arc<dyn AnyEffect<S, A>>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher,
            policy,
            effect,
            slot: Arc::new(Slot::new()),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn policy(&self) -> Policy {
        self.policy
    }

    pub(crate) fn matches(&self, tag: &'static str) -> bool {
        self.matcher.matches(tag)
    }

    /// Prepare a launch. Must be called while the store's state lock is held.
    pub(crate) fn prepare(&self) -> Ticket {
        match self.policy {
            Policy::TakeLatest => {
                let generation = self.slot.latest.fetch_add(1, Ordering::AcqRel) + 1;
                Ticket {
                    cancel: Some(CancelToken::new(self.slot.latest.clone(), generation)),
                }
            }
            Policy::TakeEvery | Policy::QueueLatest => Ticket { cancel: None },
        }
    }

    /// Launch (or park) an instance for a prepared ticket.
    pub(crate) fn launch(&self, ticket: Ticket, store: &Store<S, A>, action: &A, cid: CorrelationId) {
        let tag = action.tag();

        match self.policy {
            Policy::TakeEvery => {
                debug!(tag, registration = %self.name, %cid, "spawning runner");
                store.runtime().spawn(run_instance(
                    self.effect.clone(),
                    self.name.clone(),
                    store.clone(),
                    action.clone(),
                    cid,
                    None,
                    claim(store, cid),
                ));
            }
            Policy::TakeLatest => {
                let mut slot = self.slot.lock();

                // A newer dispatch already launched past this ticket.
                if ticket.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    debug!(tag, registration = %self.name, %cid, "ticket superseded before launch");
                    return;
                }

                let previous = slot.current.take();
                let abort = previous
                    .as_ref()
                    .filter(|h| !h.is_finished())
                    .map(JoinHandle::abort_handle);

                let instance = run_instance(
                    self.effect.clone(),
                    self.name.clone(),
                    store.clone(),
                    action.clone(),
                    cid,
                    ticket.cancel,
                    claim(store, cid),
                );
                slot.current = Some(store.runtime().spawn(async move {
                    // Let the cancelled instance finish its teardown (exit
                    // guards included) before this one raises any flag.
                    if let Some(previous) = previous {
                        let _ = previous.await;
                    }
                    instance.await;
                }));
                drop(slot);

                if let Some(abort) = abort {
                    debug!(tag, registration = %self.name, %cid, "cancelling previous runner");
                    abort.abort();
                }
            }
            Policy::QueueLatest => {
                let mut slot = self.slot.lock();
                if slot.running {
                    if let Some((superseded, superseded_cid)) =
                        slot.parked.replace((action.clone(), cid))
                    {
                        debug!(
                            tag = superseded.tag(),
                            registration = %self.name,
                            cid = %superseded_cid,
                            "dropping superseded parked action"
                        );
                        store.inflight().dec(superseded_cid, 1);
                    }
                    // Counted now, adopted by the driver when it runs.
                    store.inflight().inc(cid, 1);
                    return;
                }
                slot.running = true;
                drop(slot);

                debug!(tag, registration = %self.name, %cid, "starting queue driver");
                store.runtime().spawn(drive_queue(
                    self.effect.clone(),
                    self.name.clone(),
                    self.slot.clone(),
                    store.clone(),
                    action.clone(),
                    cid,
                    claim(store, cid),
                ));
            }
        }
    }
}

/// Count one instance for `cid` and hand back the guard releasing it.
fn claim<S, A>(store: &Store<S, A>, cid: CorrelationId) -> InflightGuard
where
    S: Reducer<A>,
    A: Action,
{
    store.inflight().inc(cid, 1);
    InflightGuard::adopt(store.inflight().clone(), cid)
}

impl<S, A> std::fmt::Debug for Registration<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Run queued actions one after another until nothing is parked.
async fn drive_queue<S, A>(
    effect: Arc<dyn AnyEffect<S, A>>,
    name: Arc<str>,
    slot: Arc<Slot<A>>,
    store: Store<S, A>,
    action: A,
    cid: CorrelationId,
    guard: InflightGuard,
) where
    S: Reducer<A>,
    A: Action,
{
    let mut next = Some((action, cid, guard));
    while let Some((action, cid, guard)) = next.take() {
        run_instance(
            effect.clone(),
            name.clone(),
            store.clone(),
            action,
            cid,
            None,
            guard,
        )
        .await;

        next = {
            let mut state = slot.lock();
            match state.parked.take() {
                Some((action, cid)) => {
                    let guard = InflightGuard::adopt(store.inflight().clone(), cid);
                    Some((action, cid, guard))
                }
                None => {
                    state.running = false;
                    None
                }
            }
        };
    }
}

/// Run one instance, converting errors and panics into a `RunnerFailure`.
///
/// The inflight guard is an argument so it is owned by the future from the
/// moment it is created: dropping an instance that never started still
/// releases its unit.
async fn run_instance<S, A>(
    effect: Arc<dyn AnyEffect<S, A>>,
    name: Arc<str>,
    store: Store<S, A>,
    action: A,
    cid: CorrelationId,
    cancel: Option<CancelToken>,
    _guard: InflightGuard,
) where
    S: Reducer<A>,
    A: Action,
{
    let tag = action.tag();
    let outcome = AssertUnwindSafe(effect.run_any(action, store.clone(), cid, cancel.clone()))
        .catch_unwind()
        .await;

    let (error, panicked) = match outcome {
        Ok(Ok(())) => {
            debug!(tag, registration = %name, %cid, "runner finished");
            return;
        }
        Ok(Err(err)) => (err, false),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            (anyhow!("runner panicked: {}", message), true)
        }
    };

    if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
        warn!(tag, registration = %name, %cid, error = %error, "superseded runner failed, not reported");
        return;
    }

    store.report_failure(RunnerFailure {
        tag,
        registration: name.to_string(),
        cid,
        error,
        panicked,
    });
}
