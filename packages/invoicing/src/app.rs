//! The application store: root state, root action and effect registrations.
//!
//! ```text
//! AppAction ─┬─ Payment(PaymentAction)   ─► PaymentState
//!            ├─ Company(CompanyAction)   ─► CompanyState
//!            ├─ Settings(SettingsAction) ─► SettingsState
//!            ├─ Customer(CustomerAction) ─► CustomerState
//!            ├─ Customize(CustomizeAction) ─► CustomizeState
//!            └─ Auth(AuthAction)         ─► AuthState
//! ```
//!
//! Each slice only sees its own domain's actions. Effects that touch more
//! than one slice do so by dispatching each slice's actions.

use serde::Serialize;
use statesync::{Action, EffectContext, Policy, Reducer, StatesyncError, Store, StoreBuilder};
use tracing::info;

use crate::domains::auth::actions::tags as auth_tags;
use crate::domains::auth::effects::SendForgotPasswordMailEffect;
use crate::domains::auth::{AuthAction, AuthState};
use crate::domains::company::actions::tags as company_tags;
use crate::domains::company::effects::{
    AddCompanyEffect, FetchCompaniesEffect, FetchInitialDetailsEffect, FetchPreferencesEffect,
    UpdatePreferencesEffect,
};
use crate::domains::company::{CompanyAction, CompanyState};
use crate::domains::customers::actions::tags as customer_tags;
use crate::domains::customers::effects::{
    AddCustomerEffect, FetchCustomersEffect, RemoveCustomerEffect, UpdateCustomerEffect,
};
use crate::domains::customers::{CustomerAction, CustomerState};
use crate::domains::customize::actions::tags as customize_tags;
use crate::domains::customize::effects::{
    FetchCustomizeSettingsEffect, UpdateCustomizeSettingsEffect,
};
use crate::domains::customize::{CustomizeAction, CustomizeState};
use crate::domains::payments::actions::tags as payment_tags;
use crate::domains::payments::effects::{
    AddPaymentEffect, FetchPaymentsEffect, FetchUnpaidInvoicesEffect, RemovePaymentEffect,
    UpdatePaymentEffect,
};
use crate::domains::payments::{PaymentAction, PaymentState};
use crate::domains::settings::actions::tags as settings_tags;
use crate::domains::settings::effects::FetchCountriesEffect;
use crate::domains::settings::{SettingsAction, SettingsState};
use crate::kernel::{AppDeps, NotifyingErrorHandler};

pub type AppStore = Store<AppState, AppAction>;
pub type AppContext = EffectContext<AppState, AppAction, AppDeps>;

// =============================================================================
// Root Action
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Payment(PaymentAction),
    Company(CompanyAction),
    Settings(SettingsAction),
    Customer(CustomerAction),
    Customize(CustomizeAction),
    Auth(AuthAction),
}

impl Action for AppAction {
    fn tag(&self) -> &'static str {
        match self {
            AppAction::Payment(action) => action.tag(),
            AppAction::Company(action) => action.tag(),
            AppAction::Settings(action) => action.tag(),
            AppAction::Customer(action) => action.tag(),
            AppAction::Customize(action) => action.tag(),
            AppAction::Auth(action) => action.tag(),
        }
    }
}

impl From<PaymentAction> for AppAction {
    fn from(action: PaymentAction) -> Self {
        AppAction::Payment(action)
    }
}

impl From<CompanyAction> for AppAction {
    fn from(action: CompanyAction) -> Self {
        AppAction::Company(action)
    }
}

impl From<SettingsAction> for AppAction {
    fn from(action: SettingsAction) -> Self {
        AppAction::Settings(action)
    }
}

impl From<CustomerAction> for AppAction {
    fn from(action: CustomerAction) -> Self {
        AppAction::Customer(action)
    }
}

impl From<CustomizeAction> for AppAction {
    fn from(action: CustomizeAction) -> Self {
        AppAction::Customize(action)
    }
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        AppAction::Auth(action)
    }
}

// =============================================================================
// Root State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub payments: PaymentState,
    pub company: CompanyState,
    pub settings: SettingsState,
    pub customers: CustomerState,
    pub customize: CustomizeState,
    pub auth: AuthState,
}

impl Reducer<AppAction> for AppState {
    fn reduce(self, action: &AppAction) -> Self {
        match action {
            AppAction::Payment(action) => Self {
                payments: self.payments.reduce(action),
                ..self
            },
            AppAction::Company(action) => Self {
                company: self.company.reduce(action),
                ..self
            },
            AppAction::Settings(action) => Self {
                settings: self.settings.reduce(action),
                ..self
            },
            AppAction::Customer(action) => Self {
                customers: self.customers.reduce(action),
                ..self
            },
            AppAction::Customize(action) => Self {
                customize: self.customize.reduce(action),
                ..self
            },
            AppAction::Auth(action) => Self {
                auth: self.auth.reduce(action),
                ..self
            },
        }
    }
}

// =============================================================================
// Store Wiring
// =============================================================================

/// Build the application store with every effect registered.
///
/// Create/update/delete intents and list fetches are take-latest: a newer
/// submission supersedes an older one still in flight. Preference and
/// reference-data loads are take-every; the dataset load is guarded inside
/// the effect instead.
///
/// # Errors
///
/// [`StatesyncError::NoRuntime`] when called outside a Tokio runtime.
pub fn build_store(deps: AppDeps) -> Result<AppStore, StatesyncError> {
    let error_handler = NotifyingErrorHandler::new(deps.notifier.clone());

    let store = StoreBuilder::new(AppState::default(), deps)
        .with_error_handler(error_handler)
        // Payments
        .with_effect(payment_tags::FETCH, Policy::TakeLatest, FetchPaymentsEffect)
        .with_effect(payment_tags::ADD, Policy::TakeLatest, AddPaymentEffect)
        .with_effect(payment_tags::UPDATE, Policy::TakeLatest, UpdatePaymentEffect)
        .with_effect(payment_tags::REMOVE, Policy::TakeLatest, RemovePaymentEffect)
        .with_effect(
            payment_tags::FETCH_UNPAID_INVOICES,
            Policy::TakeLatest,
            FetchUnpaidInvoicesEffect,
        )
        // Customers
        .with_effect(customer_tags::FETCH, Policy::TakeLatest, FetchCustomersEffect)
        .with_effect(customer_tags::ADD, Policy::TakeLatest, AddCustomerEffect)
        .with_effect(customer_tags::UPDATE, Policy::TakeLatest, UpdateCustomerEffect)
        .with_effect(customer_tags::REMOVE, Policy::TakeLatest, RemoveCustomerEffect)
        // Company
        .with_effect(
            company_tags::FETCH_COMPANIES,
            Policy::TakeEvery,
            FetchCompaniesEffect,
        )
        .with_effect(
            company_tags::FETCH_PREFERENCES,
            Policy::TakeEvery,
            FetchPreferencesEffect,
        )
        .with_effect(
            company_tags::UPDATE_PREFERENCES,
            Policy::TakeEvery,
            UpdatePreferencesEffect,
        )
        .with_effect(company_tags::ADD, Policy::TakeLatest, AddCompanyEffect)
        .with_effect(
            company_tags::FETCH_INITIAL_DETAILS,
            Policy::TakeEvery,
            FetchInitialDetailsEffect,
        )
        // Settings
        .with_effect(
            settings_tags::FETCH_COUNTRIES,
            Policy::TakeEvery,
            FetchCountriesEffect,
        )
        // Customize
        .with_effect(
            customize_tags::FETCH,
            Policy::TakeLatest,
            FetchCustomizeSettingsEffect,
        )
        .with_effect(
            customize_tags::UPDATE,
            Policy::TakeLatest,
            UpdateCustomizeSettingsEffect,
        )
        // Auth
        .with_effect(
            auth_tags::SEND_FORGOT_PASSWORD_MAIL,
            Policy::TakeLatest,
            SendForgotPasswordMailEffect,
        )
        .build()?;

    info!("application store ready");
    Ok(store)
}
