pub mod actions;
pub mod effects;
pub mod models;
pub mod reducer;

pub use actions::CustomerAction;
pub use models::{Address, Customer, CustomerParams};
pub use reducer::CustomerState;
