//! Testing utilities for reducers and stores.
//!
//! # Feature Flag
//!
//! This module is only available with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! statesync = { path = "../statesync", features = ["testing"] }
//! ```
//!
//! # Quick Start
//!
//! ## Using `assert_reduces!` Macro
//!
//! ```ignore
//! use statesync::assert_reduces;
//!
//! assert_reduces!(
//!     PaymentState::default(),
//!     PaymentAction::spinner(Flag::IsSaving, true),
//!     PaymentAction::spinner(Flag::IsSaving, false)
//!     => PaymentState::default()
//! );
//! ```
//!
//! ## Using Fluent Builder
//!
//! ```ignore
//! use statesync::testing::ReducerTest;
//!
//! ReducerTest::new(PaymentState::default())
//!     .given(PaymentAction::FetchSuccess { page: first_page, fresh: true })
//!     .then(PaymentAction::FetchSuccess { page: second_page, fresh: false })
//!     .assert_state(|s| s.payments.ids() == vec![1, 2, 3, 4]);
//! ```
//!
//! ## Using `ActionRecorder`
//!
//! ```ignore
//! let recorder = ActionRecorder::attach(&store);
//! store.dispatch_and_await(PaymentAction::Add { params }).await?;
//! recorder.assert_sequence(&["payment.add", "payment.spinner", "payment.add.success", "payment.spinner"]);
//! ```

use std::sync::Mutex;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::core::{Action, ActionEnvelope, CorrelationId};
use crate::reducer::Reducer;
use crate::store::Store;

/// Asserts that folding actions over a state yields the expected state.
///
/// # Syntax
///
/// ```ignore
/// assert_reduces!(initial, action1, action2, ... => expected);
/// ```
#[macro_export]
macro_rules! assert_reduces {
    ($state:expr, $($action:expr),+ $(,)? => $expected:expr) => {{
        let state = $state;
        $(
            let state = $crate::Reducer::reduce(state, &$action);
        )+
        assert_eq!(state, $expected);
    }};
}

/// Fluent builder for reducer scenarios.
pub struct ReducerTest<S, A> {
    state: S,
    applied: Vec<A>,
}

impl<S, A> ReducerTest<S, A>
where
    S: Reducer<A> + std::fmt::Debug,
    A: Action,
{
    /// Start from the given state.
    pub fn new(state: S) -> Self {
        Self {
            state,
            applied: Vec::new(),
        }
    }

    /// Apply an action.
    pub fn given(mut self, action: impl Into<A>) -> Self {
        let action = action.into();
        self.state = self.state.reduce(&action);
        self.applied.push(action);
        self
    }

    /// Apply another action (alias for readability).
    pub fn then(self, action: impl Into<A>) -> Self {
        self.given(action)
    }

    /// Assert the state satisfies a predicate.
    ///
    /// # Panics
    ///
    /// Panics with the applied actions and the state if the predicate fails.
    pub fn assert_state<F>(self, predicate: F) -> Self
    where
        F: FnOnce(&S) -> bool,
    {
        assert!(
            predicate(&self.state),
            "state assertion failed after {:?}: {:?}",
            self.applied.iter().map(Action::tag).collect::<Vec<_>>(),
            self.state
        );
        self
    }

    /// Assert that applying `action` leaves the state unchanged.
    pub fn assert_unchanged_by(self, action: impl Into<A>) -> Self
    where
        S: PartialEq,
    {
        let action = action.into();
        let before = self.state.clone();
        let this = self.given(action);
        assert_eq!(before, this.state, "expected no state change");
        this
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Consume the builder, returning the state.
    pub fn into_state(self) -> S {
        self.state
    }
}

/// Records every action a store publishes after the recorder is attached.
pub struct ActionRecorder<A> {
    receiver: Mutex<broadcast::Receiver<ActionEnvelope<A>>>,
    recorded: Mutex<Vec<ActionEnvelope<A>>>,
}

impl<A: Action> ActionRecorder<A> {
    /// Start recording the store's actions.
    pub fn attach<S: Reducer<A>>(store: &Store<S, A>) -> Self {
        Self {
            receiver: Mutex::new(store.actions()),
            recorded: Mutex::new(Vec::new()),
        }
    }

    fn drain(&self) -> std::sync::MutexGuard<'_, Vec<ActionEnvelope<A>>> {
        let mut recorded = self.recorded.lock().unwrap_or_else(|e| e.into_inner());
        let mut receiver = self.receiver.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            match receiver.try_recv() {
                Ok(envelope) => recorded.push(envelope),
                Err(TryRecvError::Lagged(n)) => {
                    warn!(lagged = n, "action recorder lagged, actions were missed")
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        recorded
    }

    /// Tags of all recorded actions, in reduction order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.drain().iter().map(ActionEnvelope::tag).collect()
    }

    /// All recorded actions, in reduction order.
    pub fn actions(&self) -> Vec<A> {
        self.drain()
            .iter()
            .map(|envelope| A::clone(&envelope.action))
            .collect()
    }

    /// Recorded actions carrying the given correlation ID.
    pub fn for_correlation(&self, cid: CorrelationId) -> Vec<A> {
        self.drain()
            .iter()
            .filter(|envelope| envelope.cid == cid)
            .map(|envelope| A::clone(&envelope.action))
            .collect()
    }

    /// How many recorded actions have the given tag.
    pub fn count(&self, tag: &str) -> usize {
        self.drain().iter().filter(|e| e.tag() == tag).count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.drain().clear();
    }

    /// Assert an action with the given tag was recorded.
    pub fn assert_dispatched(&self, tag: &str) {
        let tags = self.tags();
        assert!(
            tags.iter().any(|t| *t == tag),
            "expected {tag} to be dispatched, recorded: {tags:?}"
        );
    }

    /// Assert no action with the given tag was recorded.
    pub fn assert_not_dispatched(&self, tag: &str) {
        let tags = self.tags();
        assert!(
            !tags.iter().any(|t| *t == tag),
            "expected {tag} not to be dispatched, recorded: {tags:?}"
        );
    }

    /// Assert the recorded tags are exactly `expected`, in order.
    pub fn assert_sequence(&self, expected: &[&str]) {
        assert_eq!(self.tags(), expected);
    }
}

impl<A> std::fmt::Debug for ActionRecorder<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRecorder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreBuilder;

    #[derive(Debug, Clone, PartialEq)]
    enum Toggle {
        On,
        Off,
        Ping,
    }

    impl Action for Toggle {
        fn tag(&self) -> &'static str {
            match self {
                Toggle::On => "toggle.on",
                Toggle::Off => "toggle.off",
                Toggle::Ping => "toggle.ping",
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Switch {
        on: bool,
    }

    impl Reducer<Toggle> for Switch {
        fn reduce(self, action: &Toggle) -> Self {
            match action {
                Toggle::On => Switch { on: true },
                Toggle::Off => Switch { on: false },
                Toggle::Ping => self,
            }
        }
    }

    #[test]
    fn test_assert_reduces_macro() {
        assert_reduces!(Switch::default(), Toggle::On => Switch { on: true });
        assert_reduces!(Switch::default(), Toggle::On, Toggle::Off => Switch { on: false });
    }

    #[test]
    fn test_reducer_test_builder() {
        let state = ReducerTest::new(Switch::default())
            .given(Toggle::On)
            .assert_state(|s| s.on)
            .assert_unchanged_by(Toggle::Ping)
            .into_state();
        assert!(state.on);
    }

    #[test]
    #[should_panic(expected = "state assertion failed")]
    fn test_reducer_test_reports_failure() {
        ReducerTest::new(Switch::default())
            .given(Toggle::Off)
            .assert_state(|s| s.on);
    }

    #[tokio::test]
    async fn test_recorder_sees_actions_in_order() {
        let store = StoreBuilder::new(Switch::default(), ()).build().unwrap();
        let recorder = ActionRecorder::attach(&store);

        store.dispatch(Toggle::On);
        let cid = store.dispatch(Toggle::Off);

        recorder.assert_sequence(&["toggle.on", "toggle.off"]);
        assert_eq!(recorder.for_correlation(cid), vec![Toggle::Off]);
        recorder.assert_not_dispatched("toggle.ping");

        recorder.clear();
        assert!(recorder.tags().is_empty());
    }
}
