use statesync::Action;

use super::models::{Country, Preferences};
use crate::domains::company::models::Currency;

pub mod tags {
    pub const SET: &str = "settings.set";
    pub const FETCH_COUNTRIES: &str = "settings.countries.fetch";
    pub const COUNTRIES_LOADED: &str = "settings.countries.fetch.success";
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    /// Merge updated preferences; `selected_currency` is the currency
    /// record matching `settings.currency`, when it was known
    Set {
        settings: Preferences,
        selected_currency: Option<Currency>,
    },
    FetchCountries,
    CountriesLoaded { countries: Vec<Country> },
}

impl Action for SettingsAction {
    fn tag(&self) -> &'static str {
        match self {
            SettingsAction::Set { .. } => tags::SET,
            SettingsAction::FetchCountries => tags::FETCH_COUNTRIES,
            SettingsAction::CountriesLoaded { .. } => tags::COUNTRIES_LOADED,
        }
    }
}
