pub mod deps;
pub mod error;
pub mod error_handler;
pub mod http_api;
pub mod test_dependencies;
pub mod traits;

pub use deps::*;
pub use error::*;
pub use error_handler::*;
pub use http_api::*;
pub use test_dependencies::*;
pub use traits::*;
