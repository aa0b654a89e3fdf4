//! Structured errors and the runner failure boundary.
//!
//! # The Runner Boundary Rule
//!
//! > **No runner error ever reaches the caller of `dispatch`.**
//!
//! - `anyhow` is the transport inside effect bodies (ergonomic `?`)
//! - every `Err` or panic leaving a runner is wrapped in a [`RunnerFailure`]
//!   and handed to the store's [`ErrorHandler`]
//! - the handler turns it into something user visible (a notification) or
//!   just logs it

use std::time::Duration;

use thiserror::Error;
use tracing::error;

use crate::core::CorrelationId;

/// Errors produced by the store itself.
#[derive(Debug, Error)]
pub enum StatesyncError {
    /// `StoreBuilder::build` was called outside a Tokio runtime.
    #[error("no tokio runtime available to schedule effect runners")]
    NoRuntime,

    /// Awaiting correlated work took longer than allowed.
    #[error("timed out after {duration:?} waiting for correlated work")]
    Timeout { duration: Duration },

    /// All work for a request finished without a matching response action.
    #[error("work for {cid} settled without a response action")]
    NoResponse { cid: CorrelationId },

    /// The action bus closed while waiting for a response.
    #[error("action bus closed")]
    BusClosed,
}

/// A failure that escaped an effect runner.
#[derive(Debug)]
pub struct RunnerFailure {
    /// Tag of the action that triggered the runner.
    pub tag: &'static str,
    /// Name of the registration (effect type and matcher).
    pub registration: String,
    /// Correlation of the triggering action.
    pub cid: CorrelationId,
    /// The error returned by the runner, or a description of its panic.
    pub error: anyhow::Error,
    /// True when the runner panicked rather than returning `Err`.
    pub panicked: bool,
}

impl RunnerFailure {
    /// Look for an error of type `E` anywhere in the error chain.
    pub fn find<E>(&self) -> Option<&E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.error.chain().find_map(|cause| cause.downcast_ref::<E>())
    }
}

/// Shared error-handling collaborator.
///
/// Implementations must not panic; the store still guards the call and
/// logs a panicking handler instead of propagating it.
pub trait ErrorHandler: Send + Sync + 'static {
    /// Surface a runner failure (notification, log, metrics).
    fn handle_error(&self, failure: &RunnerFailure);
}

/// Error handler that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn handle_error(&self, failure: &RunnerFailure) {
        error!(
            tag = failure.tag,
            registration = %failure.registration,
            cid = %failure.cid,
            panicked = failure.panicked,
            error = %format!("{:#}", failure.error),
            "effect runner failed"
        );
    }
}

impl<F> ErrorHandler for F
where
    F: Fn(&RunnerFailure) + Send + Sync + 'static,
{
    fn handle_error(&self, failure: &RunnerFailure) {
        self(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("remote said no")]
    struct RemoteError;

    #[test]
    fn test_find_walks_context_chain() {
        let err = anyhow::Error::new(RemoteError).context("while fetching payments");
        let failure = RunnerFailure {
            tag: "payment.fetch",
            registration: "PaymentEffect(payment.fetch)".to_string(),
            cid: CorrelationId::new(),
            error: err,
            panicked: false,
        };
        assert!(failure.find::<RemoteError>().is_some());
    }

    #[test]
    fn test_timeout_display() {
        let err = StatesyncError::Timeout {
            duration: Duration::from_millis(5),
        };
        assert!(err.to_string().contains("5ms"));
    }

    #[test]
    fn test_closure_is_error_handler() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let handler = move |_: &RunnerFailure| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        };

        handler.handle_error(&RunnerFailure {
            tag: "x.y",
            registration: "r".to_string(),
            cid: CorrelationId::NONE,
            error: anyhow::anyhow!("boom"),
            panicked: false,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
