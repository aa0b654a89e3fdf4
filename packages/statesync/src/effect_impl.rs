//! Effect trait and context for runner execution.
//!
//! Effects are the IO layer: they observe a triggering action, call remote
//! collaborators and dispatch follow-up actions describing the outcome.
//!
//! # Key Properties
//!
//! - **Stateless**: effects keep nothing between runs; actions carry the input
//! - **Explicit state access**: the only way to read the store is
//!   [`EffectContext::state`]
//! - **Guaranteed cleanup**: [`EffectContext::on_exit`] dispatches a reset
//!   action when the run ends, whether it succeeded, failed, panicked or was
//!   cancelled, and never twice

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{Action, CorrelationId};
use crate::reducer::Reducer;
use crate::store::Store;

/// Cancellation state of one take-latest instance.
///
/// The registration bumps `latest` when a newer action arrives; an instance
/// whose generation is no longer the latest is cancelled.
#[derive(Debug, Clone)]
pub(crate) struct CancelToken {
    latest: Arc<AtomicU64>,
    generation: u64,
}

impl CancelToken {
    pub(crate) fn new(latest: Arc<AtomicU64>, generation: u64) -> Self {
        Self { latest, generation }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.generation
    }
}

/// Context passed to effect runners.
///
/// # Narrow API
///
/// Effects only:
/// 1. Access dependencies via `deps()`
/// 2. Read a state snapshot via `state()`
/// 3. Dispatch follow-up actions via `dispatch()` / `dispatch_if()`
/// 4. Register cleanup via `on_exit()`
///
/// # Correlation Propagation
///
/// Actions dispatched through the context carry the correlation ID of the
/// triggering action, so `Store::dispatch_and_await` tracks cascading work.
///
/// # Cancellation
///
/// Once a take-latest instance is superseded, `dispatch` and `dispatch_if`
/// become no-ops returning `false`; exit guards still fire.
pub struct EffectContext<S, A, D> {
    deps: Arc<D>,
    store: Store<S, A>,
    cid: CorrelationId,
    cancel: Option<CancelToken>,
}

impl<S, A, D> EffectContext<S, A, D>
where
    S: Reducer<A>,
    A: Action,
{
    pub(crate) fn new(
        deps: Arc<D>,
        store: Store<S, A>,
        cid: CorrelationId,
        cancel: Option<CancelToken>,
    ) -> Self {
        Self {
            deps,
            store,
            cid,
            cancel,
        }
    }

    /// Get shared dependencies (remote API client, notifier, navigator).
    pub fn deps(&self) -> &D {
        &self.deps
    }

    /// Snapshot of the store state at the time of the call.
    pub fn state(&self) -> Arc<S> {
        self.store.state()
    }

    /// Dispatch a follow-up action with this run's correlation.
    ///
    /// Returns `false` (and dispatches nothing) when the run was cancelled.
    pub fn dispatch(&self, action: impl Into<A>) -> bool {
        self.store
            .dispatch_gated(action.into(), self.cid, self.cancel.as_ref())
    }

    /// Atomically check the state and dispatch when the predicate holds.
    ///
    /// The predicate and the reduction run under the same store lock, so two
    /// runners racing on the same guard cannot both pass it.
    pub fn dispatch_if<P>(&self, predicate: P, action: impl Into<A>) -> bool
    where
        P: FnOnce(&S) -> bool,
    {
        self.store.dispatch_checked(
            action.into(),
            self.cid,
            self.cancel.as_ref(),
            Some(Box::new(predicate)),
        )
    }

    /// Dispatch `action` when the returned guard is dropped.
    ///
    /// Bind the guard to a local (`let _reset = ctx.on_exit(..)`) at the top
    /// of the run; it fires once on every exit path, including cancellation.
    pub fn on_exit(&self, action: impl Into<A>) -> ExitGuard<S, A> {
        ExitGuard {
            store: self.store.clone(),
            cid: self.cid,
            action: Some(action.into()),
        }
    }

    /// Get the correlation ID of the triggering action.
    pub fn correlation_id(&self) -> CorrelationId {
        self.cid
    }

    /// Returns true once a newer action superseded this take-latest run.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl<S, A, D> Clone for EffectContext<S, A, D> {
    fn clone(&self) -> Self {
        Self {
            deps: self.deps.clone(),
            store: self.store.clone(),
            cid: self.cid,
            cancel: self.cancel.clone(),
        }
    }
}

impl<S, A, D> std::fmt::Debug for EffectContext<S, A, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectContext")
            .field("cid", &self.cid)
            .finish_non_exhaustive()
    }
}

/// Dispatches its action exactly once when dropped, unless disarmed.
///
/// Cleanup dispatches bypass cancellation: a superseded run still resets
/// the flags it raised.
#[must_use = "the cleanup action fires when the guard is dropped"]
pub struct ExitGuard<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    store: Store<S, A>,
    cid: CorrelationId,
    action: Option<A>,
}

impl<S, A> ExitGuard<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    /// Drop the guard without dispatching.
    pub fn disarm(mut self) {
        self.action = None;
    }
}

impl<S, A> Drop for ExitGuard<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            self.store.dispatch_with_correlation(action, self.cid);
        }
    }
}

/// Effect runner body.
///
/// # Example
///
/// ```ignore
/// struct AddPaymentEffect;
///
/// #[async_trait]
/// impl Effect<AppState, AppAction, AppDeps> for AddPaymentEffect {
///     async fn run(&self, action: AppAction, ctx: EffectContext<AppState, AppAction, AppDeps>) -> Result<()> {
///         let AppAction::Payment(PaymentAction::Add { params }) = action else {
///             return Ok(());
///         };
///         let _reset = ctx.on_exit(PaymentAction::spinner(Flag::IsSaving, false));
///         ctx.dispatch(PaymentAction::spinner(Flag::IsSaving, true));
///
///         let payment = ctx.deps().api.create_payment(&params).await?;
///         ctx.dispatch(PaymentAction::AddSuccess { payment });
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Effect<S, A, D>: Send + Sync + 'static
where
    S: Reducer<A>,
    A: Action,
    D: Send + Sync + 'static,
{
    /// Run in response to a matching action.
    ///
    /// # Errors
    ///
    /// Return `Err` when the run fails. The store hands the error to its
    /// `ErrorHandler`; it never reaches the dispatch caller.
    async fn run(&self, action: A, ctx: EffectContext<S, A, D>) -> Result<()>;
}

/// Type-erased effect, with dependencies already bound.
#[async_trait]
pub(crate) trait AnyEffect<S, A>: Send + Sync {
    async fn run_any(
        &self,
        action: A,
        store: Store<S, A>,
        cid: CorrelationId,
        cancel: Option<CancelToken>,
    ) -> Result<()>;
}

/// Binds an effect to its dependencies.
pub(crate) struct EffectWrapper<E, D> {
    effect: E,
    deps: Arc<D>,
}

impl<E, D> EffectWrapper<E, D> {
    pub(crate) fn new(effect: E, deps: Arc<D>) -> Self {
        Self { effect, deps }
    }
}

#[async_trait]
impl<S, A, D, E> AnyEffect<S, A> for EffectWrapper<E, D>
where
    S: Reducer<A>,
    A: Action,
    D: Send + Sync + 'static,
    E: Effect<S, A, D>,
{
    async fn run_any(
        &self,
        action: A,
        store: Store<S, A>,
        cid: CorrelationId,
        cancel: Option<CancelToken>,
    ) -> Result<()> {
        let ctx = EffectContext::new(self.deps.clone(), store, cid, cancel);
        self.effect.run(action, ctx).await
    }
}
