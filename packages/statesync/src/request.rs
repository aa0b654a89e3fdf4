//! Request/response helpers for callers outside the store.
//!
//! These are **syntactic sugar** over the action bus and inflight tracking;
//! they do not change how actions are reduced or runners scheduled.
//!
//! A request dispatches an action under a fresh correlation ID and waits for
//! a correlated action the extractor accepts, typically the `.success`
//! outcome the runner dispatches. Callers that used to hand a completion
//! callback into an action (`onSuccess`) await the result action instead.
//!
//! # Important Semantics
//!
//! A request does NOT guarantee a response exists. When every runner the
//! action caused has finished without a matching action, the request fails
//! with [`StatesyncError::NoResponse`] instead of waiting for the timeout.
//!
//! # Example
//!
//! ```ignore
//! let payment = store
//!     .request(PaymentAction::Add { params }, |action| match action {
//!         AppAction::Payment(PaymentAction::AddSuccess { payment }) => Some(payment.clone()),
//!         _ => None,
//!     })
//!     .await?;
//! ```

use std::time::Duration;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::time::timeout;
use tracing::warn;

use crate::core::{Action, ActionEnvelope, CorrelationId};
use crate::error::StatesyncError;
use crate::reducer::Reducer;
use crate::store::Store;

/// Default timeout for request/response operations.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl<S, A> Store<S, A>
where
    S: Reducer<A>,
    A: Action,
{
    /// Dispatch an action and wait for a correlated response action.
    ///
    /// Uses [`DEFAULT_REQUEST_TIMEOUT`].
    pub async fn request<R, F>(
        &self,
        action: impl Into<A>,
        extractor: F,
    ) -> Result<R, StatesyncError>
    where
        F: Fn(&A) -> Option<R>,
    {
        self.request_timeout(action, DEFAULT_REQUEST_TIMEOUT, extractor)
            .await
    }

    /// Dispatch an action and wait for a correlated response action, with
    /// custom timeout.
    ///
    /// # Errors
    ///
    /// - [`StatesyncError::NoResponse`] when all correlated work settled
    ///   without an action the extractor accepted
    /// - [`StatesyncError::Timeout`] when nothing settled in time
    pub async fn request_timeout<R, F>(
        &self,
        action: impl Into<A>,
        request_timeout: Duration,
        extractor: F,
    ) -> Result<R, StatesyncError>
    where
        F: Fn(&A) -> Option<R>,
    {
        let cid = CorrelationId::new();

        // Subscribe before dispatching to avoid missing a fast response
        let mut receiver = self.actions();
        self.dispatch_with_correlation(action.into(), cid);

        let inflight = self.inflight().clone();
        let extract = |envelope: &ActionEnvelope<A>| {
            if envelope.cid == cid {
                extractor(&envelope.action)
            } else {
                None
            }
        };

        let wait = async {
            loop {
                tokio::select! {
                    biased;

                    received = receiver.recv() => match received {
                        Ok(envelope) => {
                            if let Some(response) = extract(&envelope) {
                                return Ok(response);
                            }
                        }
                        Err(RecvError::Closed) => return Err(StatesyncError::BusClosed),
                        Err(RecvError::Lagged(n)) => {
                            warn!(lagged = n, %cid, "request receiver lagged, actions may be missed");
                        }
                    },

                    _ = inflight.wait_zero(cid) => break,
                }
            }

            // Everything correlated was published before the work settled.
            loop {
                match receiver.try_recv() {
                    Ok(envelope) => {
                        if let Some(response) = extract(&envelope) {
                            return Ok(response);
                        }
                    }
                    Err(TryRecvError::Lagged(n)) => {
                        warn!(lagged = n, %cid, "request receiver lagged, actions may be missed");
                    }
                    Err(TryRecvError::Empty) => return Err(StatesyncError::NoResponse { cid }),
                    Err(TryRecvError::Closed) => return Err(StatesyncError::BusClosed),
                }
            }
        };

        timeout(request_timeout, wait)
            .await
            .map_err(|_| StatesyncError::Timeout {
                duration: request_timeout,
            })?
    }
}
