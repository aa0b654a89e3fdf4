pub mod actions;
pub mod effects;
pub mod models;
pub mod reducer;

pub use actions::SettingsAction;
pub use models::{Country, Preferences};
pub use reducer::SettingsState;
