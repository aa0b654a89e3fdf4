pub mod actions;
pub mod effects;
pub mod models;
pub mod reducer;

// Re-export actions
pub use actions::PaymentAction;

// Re-export models
pub use models::{Payment, PaymentParams, UnpaidInvoice};

// Re-export slice state
pub use reducer::PaymentState;
