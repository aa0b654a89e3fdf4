//! Invoicing client core.
//!
//! Domain slices (payments, company, settings, customers, customize, auth)
//! reduced by a `statesync` store, effect runners talking to the invoicing
//! HTTP API, and the collaborators (notifications, navigation) those
//! runners report to.

pub mod app;
pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use app::{build_store, AppAction, AppState, AppStore};
pub use config::Config;
