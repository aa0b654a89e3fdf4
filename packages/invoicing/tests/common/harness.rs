//! Store harness wired to mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use invoicing_core::kernel::{
    MockInvoiceApi, RecordingNavigator, RecordingNotifier, TestDependencies,
};
use invoicing_core::{build_store, AppAction, AppState, AppStore};
use statesync::testing::ActionRecorder;

/// Upper bound for any test scenario to settle.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestHarness {
    pub store: AppStore,
    pub deps: TestDependencies,
    pub recorder: ActionRecorder<AppAction>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_api(MockInvoiceApi::new())
    }

    /// Build the application store around `api`. Must run inside a Tokio runtime.
    pub fn with_api(api: MockInvoiceApi) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::with_api(api);
        let store = build_store(deps.app_deps()).expect("Failed to build store");
        let recorder = ActionRecorder::attach(&store);
        Self {
            store,
            deps,
            recorder,
        }
    }

    pub fn api(&self) -> &Arc<MockInvoiceApi> {
        &self.deps.api
    }

    pub fn notifier(&self) -> &Arc<RecordingNotifier> {
        &self.deps.notifier
    }

    pub fn navigator(&self) -> &Arc<RecordingNavigator> {
        &self.deps.navigator
    }

    pub fn state(&self) -> Arc<AppState> {
        self.store.state()
    }

    /// Dispatch and wait for every runner the action started.
    pub async fn run(&self, action: impl Into<AppAction>) {
        self.store
            .dispatch_and_await_timeout(action, SETTLE_TIMEOUT)
            .await
            .expect("action did not settle");
    }

    /// Wait until no runner is in flight anywhere.
    pub async fn settle(&self) {
        tokio::time::timeout(SETTLE_TIMEOUT, self.store.settled())
            .await
            .expect("store did not settle");
    }
}
