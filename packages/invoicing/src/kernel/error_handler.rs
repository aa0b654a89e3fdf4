//! Turns runner failures into user notifications.

use std::sync::Arc;

use statesync::{ErrorHandler, RunnerFailure};
use tracing::error;

use super::{ApiError, BaseNotifier};

const INTERNAL_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Logs every runner failure and notifies the user.
///
/// Remote failures use [`ApiError::user_message`]; anything else, including
/// panics, gets a generic message so internals never reach the screen.
pub struct NotifyingErrorHandler {
    notifier: Arc<dyn BaseNotifier>,
}

impl NotifyingErrorHandler {
    pub fn new(notifier: Arc<dyn BaseNotifier>) -> Self {
        Self { notifier }
    }
}

impl ErrorHandler for NotifyingErrorHandler {
    fn handle_error(&self, failure: &RunnerFailure) {
        let api_error = failure.find::<ApiError>();

        error!(
            tag = failure.tag,
            registration = %failure.registration,
            cid = %failure.cid,
            panicked = failure.panicked,
            transient = api_error.map(ApiError::is_transient),
            error = %format!("{:#}", failure.error),
            "effect failed"
        );

        let message = match api_error {
            Some(err) => err.user_message(),
            None => INTERNAL_FAILURE_MESSAGE.to_string(),
        };
        self.notifier.show_notification(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::RecordingNotifier;
    use anyhow::Context;
    use statesync::CorrelationId;

    fn failure(error: anyhow::Error, panicked: bool) -> RunnerFailure {
        RunnerFailure {
            tag: "payment.add",
            registration: "AddPaymentEffect(payment.add)".into(),
            cid: CorrelationId::new(),
            error,
            panicked,
        }
    }

    #[test]
    fn test_api_error_message_reaches_user() {
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = NotifyingErrorHandler::new(notifier.clone());

        let err = Err::<(), _>(ApiError::NotFound)
            .context("while updating payment")
            .unwrap_err();
        handler.handle_error(&failure(err, false));

        assert_eq!(
            notifier.messages(),
            vec![ApiError::NotFound.user_message()]
        );
    }

    #[test]
    fn test_internal_failure_gets_generic_message() {
        let notifier = Arc::new(RecordingNotifier::new());
        let handler = NotifyingErrorHandler::new(notifier.clone());

        handler.handle_error(&failure(anyhow::anyhow!("index out of bounds"), true));

        assert_eq!(notifier.messages(), vec![INTERNAL_FAILURE_MESSAGE]);
    }
}
