use statesync::{Action, Flag};

use super::models::{
    Company, CompanyParams, Currency, DateFormat, FiscalYear, Language, LogoUpload, Timezone,
};
use crate::domains::settings::models::Preferences;

pub mod tags {
    pub const SPINNER: &str = "company.spinner";
    pub const FETCH_COMPANIES: &str = "company.companies.fetch";
    pub const FETCH_COMPANIES_SUCCESS: &str = "company.companies.fetch.success";
    pub const FETCH_PREFERENCES: &str = "company.preferences.fetch";
    pub const PREFERENCES_FETCHED: &str = "company.preferences.fetched";
    pub const UPDATE_PREFERENCES: &str = "company.preferences.update";
    pub const DATASETS_CLAIMED: &str = "company.datasets.claimed";
    pub const DATASETS_LOADED: &str = "company.datasets.loaded";
    pub const DATASETS_RELEASED: &str = "company.datasets.released";
    pub const DATASETS_RESET: &str = "company.datasets.reset";
    pub const CURRENCIES_LOADED: &str = "company.currencies.success";
    pub const LANGUAGES_LOADED: &str = "company.languages.success";
    pub const TIMEZONES_LOADED: &str = "company.timezones.success";
    pub const DATE_FORMATS_LOADED: &str = "company.date_formats.success";
    pub const FISCAL_YEARS_LOADED: &str = "company.fiscal_years.success";
    pub const ADD: &str = "company.add";
    pub const ADD_SUCCESS: &str = "company.add.success";
    pub const FETCH_INITIAL_DETAILS: &str = "company.initial_details.fetch";
}

/// Company, preferences and reference-dataset actions
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyAction {
    Spinner { flag: Flag, value: bool },

    FetchCompanies,
    FetchCompaniesSuccess { companies: Vec<Company> },

    /// Load preferences, and the reference datasets if nobody loaded them yet
    FetchPreferences,
    PreferencesFetched { preferences: Preferences },

    /// Save preferences and apply them to the settings slice
    UpdatePreferences { preferences: Preferences },

    // Load-once guard of the reference datasets
    DatasetsClaimed,
    DatasetsLoaded,
    /// Give up a claim after a failed load
    DatasetsReleased,
    /// Forget that the datasets were loaded
    DatasetsReset,

    CurrenciesLoaded { currencies: Vec<Currency> },
    LanguagesLoaded { languages: Vec<Language> },
    TimezonesLoaded { timezones: Vec<Timezone> },
    DateFormatsLoaded { date_formats: Vec<DateFormat> },
    FiscalYearsLoaded { fiscal_years: Vec<FiscalYear> },

    /// Create a company, then upload its logo if one was picked
    Add {
        params: CompanyParams,
        logo: Option<LogoUpload>,
    },
    AddSuccess { company: Company },

    /// Currencies and countries needed by the company form
    FetchInitialDetails,
}

impl CompanyAction {
    pub fn spinner(flag: Flag, value: bool) -> Self {
        CompanyAction::Spinner { flag, value }
    }
}

impl Action for CompanyAction {
    fn tag(&self) -> &'static str {
        match self {
            CompanyAction::Spinner { .. } => tags::SPINNER,
            CompanyAction::FetchCompanies => tags::FETCH_COMPANIES,
            CompanyAction::FetchCompaniesSuccess { .. } => tags::FETCH_COMPANIES_SUCCESS,
            CompanyAction::FetchPreferences => tags::FETCH_PREFERENCES,
            CompanyAction::PreferencesFetched { .. } => tags::PREFERENCES_FETCHED,
            CompanyAction::UpdatePreferences { .. } => tags::UPDATE_PREFERENCES,
            CompanyAction::DatasetsClaimed => tags::DATASETS_CLAIMED,
            CompanyAction::DatasetsLoaded => tags::DATASETS_LOADED,
            CompanyAction::DatasetsReleased => tags::DATASETS_RELEASED,
            CompanyAction::DatasetsReset => tags::DATASETS_RESET,
            CompanyAction::CurrenciesLoaded { .. } => tags::CURRENCIES_LOADED,
            CompanyAction::LanguagesLoaded { .. } => tags::LANGUAGES_LOADED,
            CompanyAction::TimezonesLoaded { .. } => tags::TIMEZONES_LOADED,
            CompanyAction::DateFormatsLoaded { .. } => tags::DATE_FORMATS_LOADED,
            CompanyAction::FiscalYearsLoaded { .. } => tags::FISCAL_YEARS_LOADED,
            CompanyAction::Add { .. } => tags::ADD,
            CompanyAction::AddSuccess { .. } => tags::ADD_SUCCESS,
            CompanyAction::FetchInitialDetails => tags::FETCH_INITIAL_DETAILS,
        }
    }
}
