pub mod actions;
pub mod effects;
pub mod models;
pub mod reducer;

// Re-export actions
pub use actions::CompanyAction;

// Re-export models
pub use models::{
    Company, CompanyParams, Currency, DatasetStatus, DateFormat, FiscalYear, Language, LogoUpload,
    Timezone,
};

// Re-export slice state
pub use reducer::CompanyState;
