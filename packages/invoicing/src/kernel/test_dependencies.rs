// TestDependencies - mock implementations for testing
//
// Provides mock collaborators that can be injected into the store for tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{ApiError, ApiResult, AppDeps, BaseInvoiceApi, BaseNavigator, BaseNotifier};
use crate::common::{Page, PageQuery};
use crate::domains::company::models::{
    Company, CompanyParams, Currency, DateFormat, FiscalYear, Language, LogoUpload, Timezone,
};
use crate::domains::customers::models::{Customer, CustomerParams};
use crate::domains::customize::models::{CustomizeKind, CustomizeSettings};
use crate::domains::payments::models::{Payment, PaymentParams, UnpaidInvoice};
use crate::domains::settings::models::{Country, Preferences};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock Invoice API
// =============================================================================

/// In-memory API that counts calls per operation.
///
/// Operations are named after the trait methods (`"create_payment"`,
/// `"fetch_currencies"`, ...). Unless told otherwise every call succeeds
/// with fixture data.
pub struct MockInvoiceApi {
    calls: Arc<Mutex<Vec<&'static str>>>,
    failures: Arc<Mutex<HashMap<&'static str, VecDeque<ApiError>>>>,
    latency: Arc<Mutex<HashMap<&'static str, Duration>>>,
    payment_pages: Arc<Mutex<VecDeque<Page<Payment>>>>,
    customer_pages: Arc<Mutex<VecDeque<Page<Customer>>>>,
    unpaid_invoices: Arc<Mutex<Vec<UnpaidInvoice>>>,
    companies: Arc<Mutex<Vec<Company>>>,
    preferences: Arc<Mutex<Preferences>>,
    currencies: Arc<Mutex<Vec<Currency>>>,
    customize_settings: Arc<Mutex<BTreeMap<CustomizeKind, CustomizeSettings>>>,
    reset_mails: Arc<Mutex<Vec<String>>>,
    next_id: Arc<AtomicI64>,
}

impl MockInvoiceApi {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            latency: Arc::new(Mutex::new(HashMap::new())),
            payment_pages: Arc::new(Mutex::new(VecDeque::new())),
            customer_pages: Arc::new(Mutex::new(VecDeque::new())),
            unpaid_invoices: Arc::new(Mutex::new(Vec::new())),
            companies: Arc::new(Mutex::new(Vec::new())),
            preferences: Arc::new(Mutex::new(Preferences::default())),
            currencies: Arc::new(Mutex::new(vec![
                fixture_currency(1, "US Dollar", "USD"),
                fixture_currency(2, "Euro", "EUR"),
            ])),
            customize_settings: Arc::new(Mutex::new(BTreeMap::new())),
            reset_mails: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Id assigned to the next created record (then incremented).
    pub fn with_next_id(self, id: i64) -> Self {
        self.next_id.store(id, Ordering::SeqCst);
        self
    }

    /// Fail the next call of `operation` with `error`.
    pub fn with_failure(self, operation: &'static str, error: ApiError) -> Self {
        lock(&self.failures)
            .entry(operation)
            .or_default()
            .push_back(error);
        self
    }

    /// Delay every call of `operation`.
    pub fn with_latency(self, operation: &'static str, latency: Duration) -> Self {
        lock(&self.latency).insert(operation, latency);
        self
    }

    /// Queue a page returned by the next `fetch_payments`.
    pub fn with_payment_page(self, page: Page<Payment>) -> Self {
        lock(&self.payment_pages).push_back(page);
        self
    }

    /// Queue a page returned by the next `fetch_customers`.
    pub fn with_customer_page(self, page: Page<Customer>) -> Self {
        lock(&self.customer_pages).push_back(page);
        self
    }

    pub fn with_unpaid_invoices(self, invoices: Vec<UnpaidInvoice>) -> Self {
        *lock(&self.unpaid_invoices) = invoices;
        self
    }

    pub fn with_companies(self, companies: Vec<Company>) -> Self {
        *lock(&self.companies) = companies;
        self
    }

    pub fn with_preferences(self, preferences: Preferences) -> Self {
        *lock(&self.preferences) = preferences;
        self
    }

    pub fn with_currencies(self, currencies: Vec<Currency>) -> Self {
        *lock(&self.currencies) = currencies;
        self
    }

    /// Settings returned for `kind` until an update replaces them.
    pub fn with_customize_settings(self, kind: CustomizeKind, settings: CustomizeSettings) -> Self {
        lock(&self.customize_settings).insert(kind, settings);
        self
    }

    /// Settings last stored for `kind`, as the server received them
    pub fn customize_settings(&self, kind: CustomizeKind) -> Option<CustomizeSettings> {
        lock(&self.customize_settings).get(&kind).cloned()
    }

    /// Addresses a password reset mail was sent to
    pub fn reset_mails(&self) -> Vec<String> {
        lock(&self.reset_mails).clone()
    }

    /// All calls in the order they started
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == operation).count()
    }

    pub fn was_called(&self, operation: &str) -> bool {
        self.call_count(operation) > 0
    }

    /// Record the call, wait out its latency and return any injected failure.
    async fn enter(&self, operation: &'static str) -> ApiResult<()> {
        lock(&self.calls).push(operation);

        let latency = lock(&self.latency).get(operation).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = lock(&self.failures)
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MockInvoiceApi {
    fn default() -> Self {
        Self::new()
    }
}

fn fixture_currency(id: i64, name: &str, code: &str) -> Currency {
    Currency {
        id,
        name: name.to_string(),
        code: code.to_string(),
        symbol: None,
        precision: Some(2),
    }
}

fn payment_from(id: i64, params: &PaymentParams) -> Payment {
    Payment {
        id,
        amount: params.amount,
        payment_number: params.payment_number.clone(),
        payment_date: params.payment_date.clone(),
        customer_id: params.customer_id,
        invoice_id: params.invoice_id,
        payment_method_id: params.payment_method_id,
        notes: params.notes.clone(),
    }
}

fn customer_from(id: i64, params: &CustomerParams) -> Customer {
    Customer {
        id,
        name: params.name.clone(),
        email: params.email.clone(),
        phone: params.phone.clone(),
        contact_name: params.contact_name.clone(),
        currency_id: params.currency_id,
        billing_address: params.billing.clone(),
        shipping_address: params.shipping.clone(),
    }
}

#[async_trait]
impl BaseInvoiceApi for MockInvoiceApi {
    async fn fetch_payments(&self, _query: &PageQuery) -> ApiResult<Page<Payment>> {
        self.enter("fetch_payments").await?;
        Ok(lock(&self.payment_pages)
            .pop_front()
            .unwrap_or_else(|| Page::single(Vec::new())))
    }

    async fn create_payment(&self, params: &PaymentParams) -> ApiResult<Payment> {
        self.enter("create_payment").await?;
        Ok(payment_from(self.assign_id(), params))
    }

    async fn update_payment(&self, id: i64, params: &PaymentParams) -> ApiResult<Payment> {
        self.enter("update_payment").await?;
        Ok(payment_from(id, params))
    }

    async fn delete_payment(&self, _id: i64) -> ApiResult<()> {
        self.enter("delete_payment").await
    }

    async fn fetch_unpaid_invoices(
        &self,
        customer_id: i64,
        _query: &PageQuery,
    ) -> ApiResult<Page<UnpaidInvoice>> {
        self.enter("fetch_unpaid_invoices").await?;
        let invoices = lock(&self.unpaid_invoices)
            .iter()
            .filter(|invoice| invoice.customer_id == Some(customer_id))
            .cloned()
            .collect();
        Ok(Page::single(invoices))
    }

    async fn fetch_customers(&self, _query: &PageQuery) -> ApiResult<Page<Customer>> {
        self.enter("fetch_customers").await?;
        Ok(lock(&self.customer_pages)
            .pop_front()
            .unwrap_or_else(|| Page::single(Vec::new())))
    }

    async fn create_customer(&self, params: &CustomerParams) -> ApiResult<Customer> {
        self.enter("create_customer").await?;
        Ok(customer_from(self.assign_id(), params))
    }

    async fn update_customer(&self, id: i64, params: &CustomerParams) -> ApiResult<Customer> {
        self.enter("update_customer").await?;
        Ok(customer_from(id, params))
    }

    async fn delete_customer(&self, _id: i64) -> ApiResult<()> {
        self.enter("delete_customer").await
    }

    async fn fetch_companies(&self) -> ApiResult<Vec<Company>> {
        self.enter("fetch_companies").await?;
        Ok(lock(&self.companies).clone())
    }

    async fn create_company(&self, params: &CompanyParams) -> ApiResult<Company> {
        self.enter("create_company").await?;
        let company = Company {
            id: self.assign_id(),
            name: params.name.clone(),
            logo: None,
            unique_hash: None,
        };
        lock(&self.companies).push(company.clone());
        Ok(company)
    }

    async fn upload_company_logo(&self, _company_id: i64, _logo: &LogoUpload) -> ApiResult<()> {
        self.enter("upload_company_logo").await
    }

    async fn fetch_preferences(&self) -> ApiResult<Preferences> {
        self.enter("fetch_preferences").await?;
        Ok(lock(&self.preferences).clone())
    }

    async fn update_preferences(&self, preferences: &Preferences) -> ApiResult<Preferences> {
        self.enter("update_preferences").await?;
        let mut stored = lock(&self.preferences);
        *stored = stored.clone().merge(preferences);
        Ok(stored.clone())
    }

    async fn fetch_currencies(&self) -> ApiResult<Vec<Currency>> {
        self.enter("fetch_currencies").await?;
        Ok(lock(&self.currencies).clone())
    }

    async fn fetch_timezones(&self) -> ApiResult<Vec<Timezone>> {
        self.enter("fetch_timezones").await?;
        Ok(vec![Timezone {
            key: "UTC".to_string(),
            value: "UTC".to_string(),
        }])
    }

    async fn fetch_date_formats(&self) -> ApiResult<Vec<DateFormat>> {
        self.enter("fetch_date_formats").await?;
        Ok(vec![DateFormat {
            display_date: "2024-01-31".to_string(),
            carbon_format_value: "Y-m-d".to_string(),
            moment_format_value: Some("YYYY-MM-DD".to_string()),
        }])
    }

    async fn fetch_fiscal_years(&self) -> ApiResult<Vec<FiscalYear>> {
        self.enter("fetch_fiscal_years").await?;
        Ok(vec![FiscalYear {
            key: "january-december".to_string(),
            value: "1-12".to_string(),
        }])
    }

    async fn fetch_languages(&self) -> ApiResult<Vec<Language>> {
        self.enter("fetch_languages").await?;
        Ok(vec![
            Language {
                code: "en".to_string(),
                name: "English".to_string(),
            },
            Language {
                code: "ar".to_string(),
                name: "Arabic".to_string(),
            },
        ])
    }

    async fn fetch_countries(&self) -> ApiResult<Vec<Country>> {
        self.enter("fetch_countries").await?;
        Ok(vec![Country {
            id: 1,
            code: "US".to_string(),
            name: "United States".to_string(),
        }])
    }

    async fn fetch_customize_settings(&self, kind: CustomizeKind) -> ApiResult<CustomizeSettings> {
        self.enter("fetch_customize_settings").await?;
        Ok(self.customize_settings(kind).unwrap_or_default())
    }

    async fn update_customize_settings(
        &self,
        kind: CustomizeKind,
        settings: &CustomizeSettings,
    ) -> ApiResult<()> {
        self.enter("update_customize_settings").await?;
        lock(&self.customize_settings).insert(kind, settings.clone());
        Ok(())
    }

    async fn send_forgot_password_mail(&self, email: &str) -> ApiResult<()> {
        self.enter("send_forgot_password_mail").await?;
        lock(&self.reset_mails).push(email.to_string());
        Ok(())
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All messages shown so far
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    pub fn was_shown(&self, message: &str) -> bool {
        lock(&self.messages).iter().any(|m| m == message)
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseNotifier for RecordingNotifier {
    fn show_notification(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}

// =============================================================================
// Recording Navigator
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Back,
    Navigate(String),
    Reload,
}

pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        lock(&self.events).clone()
    }

    pub fn count(&self, event: &NavigationEvent) -> usize {
        lock(&self.events).iter().filter(|e| *e == event).count()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseNavigator for RecordingNavigator {
    fn go_back(&self) {
        lock(&self.events).push(NavigationEvent::Back);
    }

    fn navigate(&self, route: &str) {
        lock(&self.events).push(NavigationEvent::Navigate(route.to_string()));
    }

    fn reload(&self) {
        lock(&self.events).push(NavigationEvent::Reload);
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock collaborators plus the `AppDeps` wired to them.
pub struct TestDependencies {
    pub api: Arc<MockInvoiceApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_api(MockInvoiceApi::new())
    }

    pub fn with_api(api: MockInvoiceApi) -> Self {
        Self {
            api: Arc::new(api),
            notifier: Arc::new(RecordingNotifier::new()),
            navigator: Arc::new(RecordingNavigator::new()),
        }
    }

    pub fn app_deps(&self) -> AppDeps {
        AppDeps::new(
            self.api.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
