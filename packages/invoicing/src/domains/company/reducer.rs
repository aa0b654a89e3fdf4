use serde::Serialize;
use statesync::{Collection, Flag, LoadingFlags, Reducer};

use super::actions::CompanyAction;
use super::models::{Company, Currency, DatasetStatus, DateFormat, FiscalYear, Language, Timezone};
use crate::domains::settings::models::Preferences;

/// Companies slice, including the reference datasets shared by the forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyState {
    pub companies: Collection<Company>,
    pub currencies: Collection<Currency>,
    pub languages: Vec<Language>,
    pub timezones: Vec<Timezone>,
    pub date_formats: Vec<DateFormat>,
    pub fiscal_years: Vec<FiscalYear>,
    pub datasets: DatasetStatus,
    /// Preferences as last fetched from the server
    pub preferences: Option<Preferences>,
    #[serde(flatten)]
    pub flags: LoadingFlags,
    /// Company loads run take-every; `is_loading` stays set until all finish
    #[serde(skip)]
    pub pending_loads: u32,
}

impl Reducer<CompanyAction> for CompanyState {
    fn reduce(self, action: &CompanyAction) -> Self {
        match action {
            CompanyAction::Spinner {
                flag: Flag::IsLoading,
                value,
            } => {
                let pending_loads = if *value {
                    self.pending_loads + 1
                } else {
                    self.pending_loads.saturating_sub(1)
                };
                Self {
                    flags: self.flags.set(Flag::IsLoading, pending_loads > 0),
                    pending_loads,
                    ..self
                }
            }
            CompanyAction::Spinner { flag, value } => Self {
                flags: self.flags.set(*flag, *value),
                ..self
            },

            CompanyAction::FetchCompaniesSuccess { companies } => Self {
                companies: self.companies.replace_all(companies.clone()),
                ..self
            },

            CompanyAction::AddSuccess { company } => Self {
                companies: self.companies.prepend(company.clone()),
                ..self
            },

            CompanyAction::PreferencesFetched { preferences } => Self {
                preferences: Some(preferences.clone()),
                ..self
            },

            // Claiming only succeeds from Unloaded; the runner checks that
            // atomically before dispatching.
            CompanyAction::DatasetsClaimed if self.datasets == DatasetStatus::Unloaded => Self {
                datasets: DatasetStatus::Loading,
                ..self
            },
            CompanyAction::DatasetsLoaded if self.datasets == DatasetStatus::Loading => Self {
                datasets: DatasetStatus::Loaded,
                ..self
            },
            CompanyAction::DatasetsReleased if self.datasets == DatasetStatus::Loading => Self {
                datasets: DatasetStatus::Unloaded,
                ..self
            },
            // A reset during a load would let a second runner claim it again.
            CompanyAction::DatasetsReset if self.datasets != DatasetStatus::Loading => Self {
                datasets: DatasetStatus::Unloaded,
                ..self
            },

            CompanyAction::CurrenciesLoaded { currencies } => Self {
                currencies: self.currencies.replace_all(currencies.clone()),
                ..self
            },
            CompanyAction::LanguagesLoaded { languages } => Self {
                languages: languages.clone(),
                ..self
            },
            CompanyAction::TimezonesLoaded { timezones } => Self {
                timezones: timezones.clone(),
                ..self
            },
            CompanyAction::DateFormatsLoaded { date_formats } => Self {
                date_formats: date_formats.clone(),
                ..self
            },
            CompanyAction::FiscalYearsLoaded { fiscal_years } => Self {
                fiscal_years: fiscal_years.clone(),
                ..self
            },

            CompanyAction::DatasetsClaimed
            | CompanyAction::DatasetsLoaded
            | CompanyAction::DatasetsReleased
            | CompanyAction::DatasetsReset
            | CompanyAction::FetchCompanies
            | CompanyAction::FetchPreferences
            | CompanyAction::UpdatePreferences { .. }
            | CompanyAction::Add { .. }
            | CompanyAction::FetchInitialDetails => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statesync::testing::ReducerTest;

    fn company(id: i64, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            logo: None,
            unique_hash: None,
        }
    }

    #[test]
    fn test_dataset_lifecycle() {
        ReducerTest::new(CompanyState::default())
            .given(CompanyAction::DatasetsClaimed)
            .assert_state(|s| s.datasets == DatasetStatus::Loading)
            .then(CompanyAction::DatasetsLoaded)
            .assert_state(|s| s.datasets == DatasetStatus::Loaded)
            .then(CompanyAction::DatasetsReset)
            .assert_state(|s| s.datasets == DatasetStatus::Unloaded);
    }

    #[test]
    fn test_claim_is_ignored_unless_unloaded() {
        let loaded = CompanyState {
            datasets: DatasetStatus::Loaded,
            ..Default::default()
        };
        ReducerTest::new(loaded)
            .assert_unchanged_by(CompanyAction::DatasetsClaimed)
            .assert_unchanged_by(CompanyAction::DatasetsReleased);
    }

    #[test]
    fn test_reset_and_loaded_ignored_out_of_order() {
        let loading = CompanyState {
            datasets: DatasetStatus::Loading,
            ..Default::default()
        };
        ReducerTest::new(loading).assert_unchanged_by(CompanyAction::DatasetsReset);

        ReducerTest::new(CompanyState::default())
            .assert_unchanged_by(CompanyAction::DatasetsLoaded);
    }

    #[test]
    fn test_overlapping_loads_keep_loading_flag() {
        ReducerTest::new(CompanyState::default())
            .given(CompanyAction::spinner(Flag::IsLoading, true))
            .then(CompanyAction::spinner(Flag::IsLoading, true))
            .then(CompanyAction::spinner(Flag::IsLoading, false))
            .assert_state(|s| s.flags.is_loading && s.pending_loads == 1)
            .then(CompanyAction::spinner(Flag::IsLoading, false))
            .assert_state(|s| !s.flags.is_loading && s.pending_loads == 0)
            .then(CompanyAction::spinner(Flag::IsLoading, false))
            .assert_state(|s| !s.flags.is_loading && s.pending_loads == 0);
    }

    #[test]
    fn test_release_returns_claim() {
        let state = CompanyState::default()
            .reduce(&CompanyAction::DatasetsClaimed)
            .reduce(&CompanyAction::DatasetsReleased);

        assert_eq!(state.datasets, DatasetStatus::Unloaded);
    }

    #[test]
    fn test_companies_replace_then_prepend() {
        let state = CompanyState::default()
            .reduce(&CompanyAction::FetchCompaniesSuccess {
                companies: vec![company(1, "Acme"), company(2, "Globex")],
            })
            .reduce(&CompanyAction::AddSuccess {
                company: company(3, "Initech"),
            });

        assert_eq!(state.companies.ids(), vec![3, 1, 2]);
    }

    #[test]
    fn test_spinner_sets_only_named_flag() {
        let state = CompanyState::default().reduce(&CompanyAction::spinner(Flag::IsSaving, true));

        assert!(state.flags.is_saving);
        assert!(!state.flags.is_loading);
    }
}
