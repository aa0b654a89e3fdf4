//! Application dependencies for effects (using traits for testability)
//!
//! This module provides the dependency container handed to every domain
//! effect. All collaborators are trait objects so tests inject mocks.

use std::sync::Arc;

use tracing::info;

use super::{BaseInvoiceApi, BaseNavigator, BaseNotifier};

// =============================================================================
// Headless Collaborators (used by the CLI)
// =============================================================================

/// Notifier that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl BaseNotifier for LogNotifier {
    fn show_notification(&self, message: &str) {
        info!(message, "notification");
    }
}

/// Navigator for a process without screens.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl BaseNavigator for NoopNavigator {
    fn go_back(&self) {}

    fn navigate(&self, route: &str) {
        info!(route, "navigation requested");
    }

    fn reload(&self) {
        info!("reload requested");
    }
}

// =============================================================================
// AppDeps
// =============================================================================

/// Dependencies accessible to effects
#[derive(Clone)]
pub struct AppDeps {
    pub api: Arc<dyn BaseInvoiceApi>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub navigator: Arc<dyn BaseNavigator>,
}

impl AppDeps {
    pub fn new(
        api: Arc<dyn BaseInvoiceApi>,
        notifier: Arc<dyn BaseNotifier>,
        navigator: Arc<dyn BaseNavigator>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
        }
    }

    /// Headless dependencies around an API client.
    pub fn headless(api: Arc<dyn BaseInvoiceApi>) -> Self {
        Self::new(api, Arc::new(LogNotifier), Arc::new(NoopNavigator))
    }
}
