use serde::Serialize;
use statesync::{Collection, Reducer};

use super::actions::SettingsAction;
use super::models::{is_rtl_language, Country, Preferences};
use crate::domains::company::models::Currency;

/// Applied preferences of the current company.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsState {
    pub settings: Preferences,
    pub selected_currency: Option<Currency>,
    pub countries: Collection<Country>,
    /// Layout direction derived from the applied language
    pub is_rtl: bool,
}

impl Reducer<SettingsAction> for SettingsState {
    fn reduce(self, action: &SettingsAction) -> Self {
        match action {
            SettingsAction::Set {
                settings,
                selected_currency,
            } => {
                let is_rtl = match &settings.language {
                    Some(language) => is_rtl_language(language),
                    None => self.is_rtl,
                };
                // An unresolved id keeps the current record only when it matches.
                let selected_currency = match (settings.currency, selected_currency) {
                    (Some(_), Some(currency)) => Some(currency.clone()),
                    (Some(id), None) => self.selected_currency.filter(|c| c.id == id),
                    (None, _) => self.selected_currency,
                };
                Self {
                    settings: self.settings.merge(settings),
                    selected_currency,
                    is_rtl,
                    ..self
                }
            }
            SettingsAction::CountriesLoaded { countries } => Self {
                countries: self.countries.replace_all(countries.clone()),
                ..self
            },
            SettingsAction::FetchCountries => self,
        }
    }
}
