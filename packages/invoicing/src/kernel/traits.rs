// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Which calls happen in which order is decided by the domain effects.
//
// Naming convention: Base* for trait names (e.g., BaseInvoiceApi, BaseNotifier)

use async_trait::async_trait;

use super::ApiError;
use crate::common::{Page, PageQuery};
use crate::domains::company::models::{
    Company, CompanyParams, Currency, DateFormat, FiscalYear, Language, LogoUpload, Timezone,
};
use crate::domains::customers::models::{Customer, CustomerParams};
use crate::domains::customize::models::{CustomizeKind, CustomizeSettings};
use crate::domains::payments::models::{Payment, PaymentParams, UnpaidInvoice};
use crate::domains::settings::models::{Country, Preferences};

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Remote API Trait (one method per remote operation)
// =============================================================================

#[async_trait]
pub trait BaseInvoiceApi: Send + Sync {
    // Payments
    async fn fetch_payments(&self, query: &PageQuery) -> ApiResult<Page<Payment>>;
    async fn create_payment(&self, params: &PaymentParams) -> ApiResult<Payment>;
    async fn update_payment(&self, id: i64, params: &PaymentParams) -> ApiResult<Payment>;
    async fn delete_payment(&self, id: i64) -> ApiResult<()>;
    async fn fetch_unpaid_invoices(
        &self,
        customer_id: i64,
        query: &PageQuery,
    ) -> ApiResult<Page<UnpaidInvoice>>;

    // Customers
    async fn fetch_customers(&self, query: &PageQuery) -> ApiResult<Page<Customer>>;
    async fn create_customer(&self, params: &CustomerParams) -> ApiResult<Customer>;
    async fn update_customer(&self, id: i64, params: &CustomerParams) -> ApiResult<Customer>;
    async fn delete_customer(&self, id: i64) -> ApiResult<()>;

    // Companies
    async fn fetch_companies(&self) -> ApiResult<Vec<Company>>;
    async fn create_company(&self, params: &CompanyParams) -> ApiResult<Company>;
    async fn upload_company_logo(&self, company_id: i64, logo: &LogoUpload) -> ApiResult<()>;

    // Preferences
    async fn fetch_preferences(&self) -> ApiResult<Preferences>;
    async fn update_preferences(&self, preferences: &Preferences) -> ApiResult<Preferences>;

    // Reference datasets
    async fn fetch_currencies(&self) -> ApiResult<Vec<Currency>>;
    async fn fetch_timezones(&self) -> ApiResult<Vec<Timezone>>;
    async fn fetch_date_formats(&self) -> ApiResult<Vec<DateFormat>>;
    async fn fetch_fiscal_years(&self) -> ApiResult<Vec<FiscalYear>>;
    async fn fetch_languages(&self) -> ApiResult<Vec<Language>>;
    async fn fetch_countries(&self) -> ApiResult<Vec<Country>>;

    // Document customization
    async fn fetch_customize_settings(&self, kind: CustomizeKind) -> ApiResult<CustomizeSettings>;
    async fn update_customize_settings(
        &self,
        kind: CustomizeKind,
        settings: &CustomizeSettings,
    ) -> ApiResult<()>;

    // Authentication
    async fn send_forgot_password_mail(&self, email: &str) -> ApiResult<()>;
}

// =============================================================================
// UI Collaborators (fire and forget)
// =============================================================================

pub trait BaseNotifier: Send + Sync {
    /// Show a transient message to the user
    fn show_notification(&self, message: &str);
}

pub trait BaseNavigator: Send + Sync {
    /// Leave the current screen
    fn go_back(&self);

    /// Open the screen registered under `route`
    fn navigate(&self, route: &str);

    /// Restart the UI so a layout direction change takes effect
    fn reload(&self);
}
