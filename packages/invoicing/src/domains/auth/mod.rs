pub mod actions;
pub mod effects;
pub mod reducer;

pub use actions::AuthAction;
pub use reducer::AuthState;
