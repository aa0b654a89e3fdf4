pub mod actions;
pub mod effects;
pub mod models;
pub mod reducer;

// Re-export actions
pub use actions::CustomizeAction;

// Re-export models
pub use models::{CustomizeKind, CustomizeSettings};

// Re-export slice state
pub use reducer::CustomizeState;
