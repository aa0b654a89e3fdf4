//! Core traits for the statesync pipeline.
//!
//! # Overview
//!
//! statesync separates **decisions about state** from **IO**:
//! - [`Action`] = an immutable description of an intent or an outcome
//! - [`Reducer`](crate::Reducer) = pure state transition, never IO
//! - [`Effect`](crate::Effect) = IO performed in response to an action
//!
//! # Correlation
//!
//! Every dispatched action travels inside an [`ActionEnvelope`] carrying a
//! [`CorrelationId`]. Actions dispatched from inside an effect runner inherit
//! the correlation of the action that triggered the runner, which lets
//! callers await all work caused by one user intent.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Correlation ID for tracking related actions and runner instances.
///
/// Use `CorrelationId::NONE` for uncorrelated actions, or
/// `CorrelationId::new()` to generate a fresh ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Sentinel value for uncorrelated actions.
    ///
    /// Uses nil UUID (`00000000-0000-0000-0000-000000000000`).
    pub const NONE: Self = Self(Uuid::nil());

    /// Create a new random correlation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Check if this is the NONE sentinel value.
    pub fn is_none(&self) -> bool {
        self.0.is_nil()
    }

    /// Check if this is a real correlation ID (not NONE).
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Get the inner UUID value.
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An immutable, tagged description of an intent or an external result.
///
/// Tags are `domain.verb[.outcome]` strings such as `payment.fetch.success`.
/// The domain is the part before the first `.`; effect registrations match
/// on tags, never on payload shape.
///
/// Applications usually define one enum per domain and wrap them in a single
/// root enum, so every reducer match is exhaustive:
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// enum AppAction {
///     Payment(PaymentAction),
///     Company(CompanyAction),
/// }
///
/// impl Action for AppAction {
///     fn tag(&self) -> &'static str {
///         match self {
///             AppAction::Payment(a) => a.tag(),
///             AppAction::Company(a) => a.tag(),
///         }
///     }
/// }
/// ```
pub trait Action: Clone + fmt::Debug + Send + Sync + 'static {
    /// The stable tag of this action.
    fn tag(&self) -> &'static str;

    /// The domain this action belongs to (tag prefix before the first `.`).
    fn domain(&self) -> &'static str {
        domain_of(self.tag())
    }
}

/// Extract the domain part of a tag.
pub fn domain_of(tag: &'static str) -> &'static str {
    tag.split_once('.').map(|(domain, _)| domain).unwrap_or(tag)
}

/// Envelope wrapping a dispatched action with correlation metadata.
///
/// Domain action enums remain clean; correlation is transport-level metadata.
#[derive(Debug)]
pub struct ActionEnvelope<A> {
    /// Correlation ID for tracking related work
    pub cid: CorrelationId,
    /// The dispatched action
    pub action: Arc<A>,
}

impl<A> Clone for ActionEnvelope<A> {
    fn clone(&self) -> Self {
        Self {
            cid: self.cid,
            action: self.action.clone(),
        }
    }
}

impl<A: Action> ActionEnvelope<A> {
    /// Create a new envelope.
    pub fn new(cid: CorrelationId, action: A) -> Self {
        Self {
            cid,
            action: Arc::new(action),
        }
    }

    /// The tag of the wrapped action.
    pub fn tag(&self) -> &'static str {
        self.action.tag()
    }
}
