//! # Statesync
//!
//! A unidirectional store where reducers decide state, effect runners perform
//! IO, and concurrency policies define which intent wins.
//!
//! ## Core Concepts
//!
//! Statesync separates **state transitions** from **side effects**:
//! - [`Action`] = an immutable description of an intent or an outcome
//! - [`Reducer`] = pure `(state, action) -> state`, the only way state changes
//! - [`Effect`] = async IO started by a matching action, reporting back by
//!   dispatching more actions
//!
//! ## Architecture
//!
//! ```text
//! Caller (UI / CLI)
//!     │
//!     ▼ dispatch()
//! Store ─── lock ─► Reducer.reduce() ─► new snapshot ─► watch subscribers
//!     │                                        │
//!     │                                        └─► ActionBus observers
//!     │
//!     └─► matching Registrations (Matcher + Policy)
//!              │
//!              ├─ TakeEvery   ─► spawn
//!              ├─ TakeLatest  ─► cancel previous, spawn
//!              └─ QueueLatest ─► run one, keep newest parked
//!                      │
//!                      ▼
//!               Effect.run(action, ctx)
//!                      │
//!                      ├─► ctx.dispatch(result) ──► Store
//!                      └─► Err / panic ──► ErrorHandler
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Reducers are pure** - No IO, no async; unknown actions return the state unchanged
//! 2. **Serial reduction** - One reduction at a time, run to completion
//! 3. **Runners read state only through their context** - `ctx.state()`
//! 4. **Superseded runners are silent** - A cancelled take-latest instance never dispatches its result
//! 5. **Cleanup runs exactly once** - `ctx.on_exit()` guards fire on every exit path
//! 6. **Failures stop at the runner boundary** - They reach the `ErrorHandler`, never the dispatch caller
//!
//! ## Guarantees
//!
//! - **At-most-once delivery** on the action bus: slow observers may miss actions
//! - **In-memory only**: state is not persisted by statesync
//!
//! ## Example
//!
//! ```ignore
//! use statesync::{Action, Effect, EffectContext, Policy, Reducer, StoreBuilder};
//!
//! #[derive(Debug, Clone)]
//! enum CounterAction {
//!     Load,
//!     Loaded(u64),
//! }
//!
//! impl Action for CounterAction {
//!     fn tag(&self) -> &'static str {
//!         match self {
//!             CounterAction::Load => "counter.load",
//!             CounterAction::Loaded(_) => "counter.load.success",
//!         }
//!     }
//! }
//!
//! #[derive(Debug, Clone, Default)]
//! struct Counter {
//!     value: u64,
//! }
//!
//! impl Reducer<CounterAction> for Counter {
//!     fn reduce(self, action: &CounterAction) -> Self {
//!         match action {
//!             CounterAction::Loaded(value) => Counter { value: *value },
//!             CounterAction::Load => self,
//!         }
//!     }
//! }
//!
//! struct LoadEffect;
//!
//! #[async_trait::async_trait]
//! impl Effect<Counter, CounterAction, Client> for LoadEffect {
//!     async fn run(&self, _: CounterAction, ctx: EffectContext<Counter, CounterAction, Client>) -> anyhow::Result<()> {
//!         let value = ctx.deps().fetch_count().await?;
//!         ctx.dispatch(CounterAction::Loaded(value));
//!         Ok(())
//!     }
//! }
//!
//! let store = StoreBuilder::new(Counter::default(), client)
//!     .with_effect("counter.load", Policy::TakeLatest, LoadEffect)
//!     .build()?;
//!
//! store.dispatch_and_await(CounterAction::Load).await?;
//! ```

// Core modules
mod bus;
mod core;
mod effect_impl;
mod error;
mod inflight;
mod policy;
mod reducer;
mod request;
mod runner;
mod store;

// Merge primitives for list-backed slices
pub mod collection;

// Testing utilities (feature-gated)
#[cfg(feature = "testing")]
pub mod testing;

// Stress tests (test-only)
#[cfg(test)]
mod stress_tests;

// Re-export core traits
pub use crate::core::{domain_of, Action, ActionEnvelope, CorrelationId};

// Re-export reducer
pub use reducer::Reducer;

// Re-export request helpers (syntactic sugar over the action bus)
pub use request::DEFAULT_REQUEST_TIMEOUT;

// Re-export error types
pub use crate::error::{ErrorHandler, LogErrorHandler, RunnerFailure, StatesyncError};

// Re-export effect types
pub use effect_impl::{Effect, EffectContext, ExitGuard};

// Re-export registration types
pub use policy::{Matcher, Policy};

// Re-export bus types
pub use bus::ActionBus;

// Re-export store types (primary entry point)
pub use inflight::InflightTracker;
pub use store::{Store, StoreBuilder, DEFAULT_AWAIT_TIMEOUT};

// Re-export commonly used collection types
pub use collection::{Collection, Flag, Identified, LoadingFlags, PageCursor, PageInfo};

// Re-export commonly used external types
pub use async_trait::async_trait;
