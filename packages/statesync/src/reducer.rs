//! Reducer trait.
//!
//! Reducers are the only code allowed to produce a new state. They are pure:
//! no IO, no async, no access to anything but the previous state and the
//! action being applied.
//!
//! # Key Properties
//!
//! - **Total**: actions a reducer does not care about return the state unchanged
//! - **By value**: the reducer consumes the previous state and returns the next
//!   one; the store keeps older snapshots alive for whoever still holds them
//! - **Slice ownership**: a root state delegates each domain action to the one
//!   slice that owns it, so no slice ever touches another slice's data

use crate::core::Action;

/// A pure state transition function over actions of type `A`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// struct AppState {
///     payments: PaymentState,
///     company: CompanyState,
/// }
///
/// impl Reducer<AppAction> for AppState {
///     fn reduce(self, action: &AppAction) -> Self {
///         match action {
///             AppAction::Payment(a) => Self { payments: self.payments.reduce(a), ..self },
///             AppAction::Company(a) => Self { company: self.company.reduce(a), ..self },
///         }
///     }
/// }
/// ```
pub trait Reducer<A: Action>: Clone + Send + Sync + 'static {
    /// Compute the next state from the current state and an action.
    ///
    /// # Guarantees
    ///
    /// - Called synchronously (no async)
    /// - Called serially (never two reductions at once on the same store)
    /// - Run to completion before any runner observes the new state
    fn reduce(self, action: &A) -> Self;
}
