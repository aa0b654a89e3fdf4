//! Stress tests designed to break the store's scheduling.
//!
//! These tests exercise races between dispatches, cancellation and cleanup.

#[cfg(test)]
mod stress_tests {
    use crate::core::Action;
    use crate::effect_impl::{Effect, EffectContext};
    use crate::error::RunnerFailure;
    use crate::policy::Policy;
    use crate::reducer::Reducer;
    use crate::store::{Store, StoreBuilder};
    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // ==========================================================================
    // Test Types
    // ==========================================================================

    #[derive(Debug, Clone)]
    enum LoadAction {
        Load(u32),
        Loaded(u32),
        Spinner(bool),
        Fail(u32),
        Claim,
        TryClaim,
        Released(u32),
    }

    impl Action for LoadAction {
        fn tag(&self) -> &'static str {
            match self {
                LoadAction::Load(_) => "load.start",
                LoadAction::Loaded(_) => "load.start.success",
                LoadAction::Spinner(_) => "load.spinner",
                LoadAction::Fail(_) => "load.fail",
                LoadAction::Claim => "load.claim",
                LoadAction::TryClaim => "load.try_claim",
                LoadAction::Released(_) => "load.released",
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    struct LoadState {
        loaded: Vec<u32>,
        busy: bool,
        claimed: bool,
    }

    impl Reducer<LoadAction> for LoadState {
        fn reduce(self, action: &LoadAction) -> Self {
            match action {
                LoadAction::Loaded(n) => {
                    let mut loaded = self.loaded;
                    loaded.push(*n);
                    Self { loaded, ..self }
                }
                LoadAction::Spinner(busy) => Self {
                    busy: *busy,
                    ..self
                },
                LoadAction::Claim => Self {
                    claimed: true,
                    ..self
                },
                LoadAction::Load(_)
                | LoadAction::Fail(_)
                | LoadAction::TryClaim
                | LoadAction::Released(_) => self,
            }
        }
    }

    type Ctx = EffectContext<LoadState, LoadAction, ()>;

    // ==========================================================================
    // Test Effects
    // ==========================================================================

    struct JitteryLoadEffect {
        max_delay_ms: u64,
    }

    #[async_trait::async_trait]
    impl Effect<LoadState, LoadAction, ()> for JitteryLoadEffect {
        async fn run(&self, action: LoadAction, ctx: Ctx) -> Result<()> {
            let n = match action {
                LoadAction::Load(n) | LoadAction::Fail(n) => n,
                _ => return Ok(()),
            };

            let _reset = ctx.on_exit(LoadAction::Spinner(false));
            ctx.dispatch(LoadAction::Spinner(true));

            tokio::time::sleep(Duration::from_millis(fastrand::u64(1..=self.max_delay_ms))).await;

            if matches!(action, LoadAction::Fail(_)) {
                return Err(anyhow!("load {} failed", n));
            }
            ctx.dispatch(LoadAction::Loaded(n));
            Ok(())
        }
    }

    struct ClaimEffect {
        claims: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Effect<LoadState, LoadAction, ()> for ClaimEffect {
        async fn run(&self, _action: LoadAction, ctx: Ctx) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(fastrand::u64(0..=2))).await;
            if ctx.dispatch_if(|state| !state.claimed, LoadAction::Claim) {
                self.claims.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    /// Records which instances started and releases each one on exit.
    struct TrackedLoadEffect {
        started: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait::async_trait]
    impl Effect<LoadState, LoadAction, ()> for TrackedLoadEffect {
        async fn run(&self, action: LoadAction, ctx: Ctx) -> Result<()> {
            let LoadAction::Load(n) = action else {
                return Ok(());
            };

            let _release = ctx.on_exit(LoadAction::Released(n));
            self.started.lock().unwrap().push(n);

            tokio::time::sleep(Duration::from_millis(fastrand::u64(1..=10))).await;
            ctx.dispatch(LoadAction::Loaded(n));
            Ok(())
        }
    }

    async fn settle(store: &Store<LoadState, LoadAction>) {
        tokio::time::timeout(Duration::from_secs(10), store.settled())
            .await
            .expect("store should settle");
    }

    fn assert_strictly_increasing(values: &[u32]) {
        assert!(
            values.windows(2).all(|w| w[0] < w[1]),
            "expected increasing results, got {:?}",
            values
        );
    }

    // ==========================================================================
    // Take Latest
    // ==========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_take_latest_never_delivers_stale_results() {
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.start",
                Policy::TakeLatest,
                JitteryLoadEffect { max_delay_ms: 20 },
            )
            .build()
            .unwrap();

        for n in 1..=200 {
            store.dispatch(LoadAction::Load(n));
            if fastrand::u8(..) < 32 {
                tokio::task::yield_now().await;
            }
        }
        settle(&store).await;

        let state = store.state();
        assert_eq!(state.loaded.last(), Some(&200));
        assert_strictly_increasing(&state.loaded);
        assert!(!state.busy, "the spinner must end reset");
        assert_eq!(store.running_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_take_latest_cleans_up_each_instance_once() {
        let started = Arc::new(Mutex::new(Vec::new()));
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.start",
                Policy::TakeLatest,
                TrackedLoadEffect {
                    started: started.clone(),
                },
            )
            .build()
            .unwrap();
        let mut actions = store.actions();

        for n in 1..=40 {
            store.dispatch(LoadAction::Load(n));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        settle(&store).await;

        let mut releases: HashMap<u32, usize> = HashMap::new();
        while let Ok(envelope) = actions.try_recv() {
            if let LoadAction::Released(n) = envelope.action.as_ref() {
                *releases.entry(*n).or_default() += 1;
            }
        }

        let started = started.lock().unwrap().clone();
        assert!(started.contains(&40), "the last load must run");
        for n in &started {
            assert_eq!(releases.get(n), Some(&1), "instance {n} must release once");
        }
        assert!(
            releases.values().all(|count| *count == 1),
            "duplicate releases: {releases:?}"
        );
        assert_eq!(releases.len(), started.len());
        assert_eq!(store.state().loaded.last(), Some(&40));
    }

    // ==========================================================================
    // Take Every
    // ==========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_take_every_runs_each_instance() {
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.start",
                Policy::TakeEvery,
                JitteryLoadEffect { max_delay_ms: 5 },
            )
            .build()
            .unwrap();

        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50u32 {
                    store.dispatch(LoadAction::Load(worker * 100 + i));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        settle(&store).await;

        let state = store.state();
        assert_eq!(state.loaded.len(), 400);
        assert!(!state.busy);
    }

    // ==========================================================================
    // Queue Latest
    // ==========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_queue_latest_runs_first_and_last() {
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.start",
                Policy::QueueLatest,
                JitteryLoadEffect { max_delay_ms: 3 },
            )
            .build()
            .unwrap();

        for n in 1..=100 {
            store.dispatch(LoadAction::Load(n));
        }
        settle(&store).await;

        let state = store.state();
        assert_eq!(state.loaded.first(), Some(&1));
        assert_eq!(state.loaded.last(), Some(&100));
        assert_strictly_increasing(&state.loaded);
        assert!(!state.busy);
    }

    // ==========================================================================
    // Single Flight Guard
    // ==========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn stress_dispatch_if_is_single_flight() {
        for _ in 0..20 {
            let claims = Arc::new(AtomicUsize::new(0));
            let store = StoreBuilder::new(LoadState::default(), ())
                .with_effect(
                    "load.try_claim",
                    Policy::TakeEvery,
                    ClaimEffect {
                        claims: claims.clone(),
                    },
                )
                .build()
                .unwrap();

            for _ in 0..50 {
                store.dispatch(LoadAction::TryClaim);
            }
            settle(&store).await;

            assert_eq!(claims.load(Ordering::SeqCst), 1);
        }
    }

    // ==========================================================================
    // Failures
    // ==========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_failures_release_everything() {
        let failures = Arc::new(AtomicUsize::new(0));
        let seen = failures.clone();
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.fail",
                Policy::TakeEvery,
                JitteryLoadEffect { max_delay_ms: 3 },
            )
            .with_error_handler(move |_: &RunnerFailure| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        for n in 0..200 {
            store.dispatch(LoadAction::Fail(n));
        }
        settle(&store).await;

        assert_eq!(failures.load(Ordering::SeqCst), 200);
        assert!(!store.state().busy);
        assert_eq!(store.inflight().active_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_concurrent_awaiters_each_complete() {
        let store = StoreBuilder::new(LoadState::default(), ())
            .with_effect(
                "load.start",
                Policy::TakeEvery,
                JitteryLoadEffect { max_delay_ms: 5 },
            )
            .build()
            .unwrap();

        let mut handles = Vec::new();
        for n in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .dispatch_and_await_timeout(LoadAction::Load(n), Duration::from_secs(5))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.state().loaded.len(), 50);
    }
}
