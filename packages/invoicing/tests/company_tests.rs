//! Integration tests for the company slice.
//!
//! - the reference datasets load once, however many preference fetches race
//! - a failed dataset load releases the claim so a later fetch retries
//! - fetched and updated preferences reach the settings slice
//! - switching into or out of a right-to-left language reloads
//! - company creation with logo upload

mod common;

use std::time::Duration;

use crate::common::TestHarness;
use invoicing_core::domains::company::effects::{COMPANY_CREATED, PREFERENCES_UPDATED};
use invoicing_core::domains::company::{CompanyAction, CompanyParams, DatasetStatus, LogoUpload};
use invoicing_core::domains::settings::Preferences;
use invoicing_core::kernel::{ApiError, MockInvoiceApi, NavigationEvent};

const DATASET_CALLS: [&str; 5] = [
    "fetch_currencies",
    "fetch_timezones",
    "fetch_date_formats",
    "fetch_fiscal_years",
    "fetch_languages",
];

fn dataset_calls(harness: &TestHarness) -> Vec<&'static str> {
    harness
        .api()
        .calls()
        .into_iter()
        .filter(|call| DATASET_CALLS.contains(call))
        .collect()
}

fn language(code: &str) -> Preferences {
    Preferences {
        language: Some(code.to_string()),
        ..Default::default()
    }
}

// =============================================================================
// Load Once
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_preference_fetches_load_datasets_once() {
    let api = MockInvoiceApi::new()
        .with_latency("fetch_preferences", Duration::from_millis(5))
        .with_latency("fetch_currencies", Duration::from_millis(20));
    let harness = TestHarness::with_api(api);

    for _ in 0..10 {
        harness.store.dispatch(CompanyAction::FetchPreferences);
    }
    harness.settle().await;

    assert_eq!(harness.api().call_count("fetch_preferences"), 10);
    assert_eq!(dataset_calls(&harness), DATASET_CALLS.to_vec());
    assert_eq!(harness.recorder.count("company.datasets.claimed"), 1);
    assert_eq!(harness.recorder.count("company.preferences.fetched"), 10);

    let state = harness.state();
    assert_eq!(state.company.datasets, DatasetStatus::Loaded);
    assert_eq!(state.company.currencies.len(), 2);
    assert_eq!(state.company.languages.len(), 2);
    assert!(!state.company.flags.is_loading);
}

#[tokio::test]
async fn later_fetch_skips_loaded_datasets() {
    let harness = TestHarness::new();

    harness.run(CompanyAction::FetchPreferences).await;
    harness.run(CompanyAction::FetchPreferences).await;

    assert_eq!(harness.api().call_count("fetch_currencies"), 1);
    assert_eq!(harness.api().call_count("fetch_preferences"), 2);
}

#[tokio::test]
async fn reset_allows_reloading_datasets() {
    let harness = TestHarness::new();

    harness.run(CompanyAction::FetchPreferences).await;
    harness.run(CompanyAction::DatasetsReset).await;
    harness.run(CompanyAction::FetchPreferences).await;

    assert_eq!(harness.api().call_count("fetch_languages"), 2);
    assert_eq!(harness.state().company.datasets, DatasetStatus::Loaded);
}

#[tokio::test]
async fn failed_dataset_load_releases_claim() {
    let error = ApiError::Network("connection reset".into());
    let harness =
        TestHarness::with_api(MockInvoiceApi::new().with_failure("fetch_timezones", error.clone()));

    harness.run(CompanyAction::FetchPreferences).await;

    let state = harness.state();
    assert_eq!(state.company.datasets, DatasetStatus::Unloaded);
    assert!(!state.company.flags.is_loading);
    harness
        .recorder
        .assert_not_dispatched("company.preferences.fetched");
    assert_eq!(harness.notifier().messages(), vec![error.user_message()]);

    harness.run(CompanyAction::FetchPreferences).await;

    assert_eq!(harness.state().company.datasets, DatasetStatus::Loaded);
    assert_eq!(harness.api().call_count("fetch_currencies"), 2);
    assert_eq!(harness.api().call_count("fetch_timezones"), 2);
    assert_eq!(harness.api().call_count("fetch_languages"), 1);
}

#[tokio::test]
async fn fetched_preferences_answer_the_request() {
    let stored = Preferences {
        currency: Some(1),
        time_zone: Some("UTC".into()),
        ..Default::default()
    };
    let harness = TestHarness::with_api(MockInvoiceApi::new().with_preferences(stored.clone()));

    let preferences = harness
        .store
        .request(CompanyAction::FetchPreferences, |action| match action {
            invoicing_core::AppAction::Company(CompanyAction::PreferencesFetched {
                preferences,
            }) => Some(preferences.clone()),
            _ => None,
        })
        .await
        .expect("preferences should be fetched");

    assert_eq!(preferences, stored);

    let state = harness.state();
    assert_eq!(state.company.preferences, Some(stored.clone()));
    assert_eq!(state.settings.settings, stored);
    assert_eq!(
        state.settings.selected_currency.as_ref().map(|c| c.code.as_str()),
        Some("USD")
    );
}

#[tokio::test]
async fn reset_during_dataset_load_is_ignored() {
    let api = MockInvoiceApi::new().with_latency("fetch_currencies", Duration::from_millis(150));
    let harness = TestHarness::with_api(api);

    harness.store.dispatch(CompanyAction::FetchPreferences);
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(harness.state().company.datasets, DatasetStatus::Loading);

    harness.store.dispatch(CompanyAction::DatasetsReset);
    harness.store.dispatch(CompanyAction::FetchPreferences);
    harness.settle().await;

    assert_eq!(dataset_calls(&harness), DATASET_CALLS.to_vec());
    assert_eq!(harness.recorder.count("company.datasets.claimed"), 1);
    assert_eq!(harness.state().company.datasets, DatasetStatus::Loaded);
}

#[tokio::test]
async fn overlapping_loads_keep_loading_until_the_last_finishes() {
    let api = MockInvoiceApi::new()
        .with_latency("fetch_companies", Duration::from_millis(10))
        .with_latency("fetch_countries", Duration::from_millis(300));
    let harness = TestHarness::with_api(api);

    harness.store.dispatch(CompanyAction::FetchCompanies);
    harness.store.dispatch(CompanyAction::FetchInitialDetails);
    tokio::time::sleep(Duration::from_millis(100)).await;

    harness
        .recorder
        .assert_dispatched("company.companies.fetch.success");
    assert!(harness.state().company.flags.is_loading);

    harness.settle().await;

    let state = harness.state();
    assert!(!state.company.flags.is_loading);
    assert_eq!(state.company.pending_loads, 0);
}

// =============================================================================
// Update Preferences
// =============================================================================

#[tokio::test]
async fn update_resolves_selected_currency() {
    let harness = TestHarness::new();
    harness.run(CompanyAction::FetchInitialDetails).await;

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: Preferences {
                currency: Some(2),
                ..Default::default()
            },
        })
        .await;

    let state = harness.state();
    assert_eq!(state.settings.settings.currency, Some(2));
    assert_eq!(
        state.settings.selected_currency.as_ref().map(|c| c.code.as_str()),
        Some("EUR")
    );
    assert!(!state.settings.countries.is_empty());
    assert_eq!(harness.notifier().messages(), vec![PREFERENCES_UPDATED]);
    assert_eq!(harness.navigator().events(), vec![NavigationEvent::Back]);
}

#[tokio::test]
async fn switching_into_or_out_of_rtl_reloads() {
    let harness = TestHarness::new();

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: language("ar"),
        })
        .await;
    assert!(harness.state().settings.is_rtl);
    assert_eq!(harness.navigator().count(&NavigationEvent::Reload), 1);

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: language("en"),
        })
        .await;
    assert!(!harness.state().settings.is_rtl);
    assert_eq!(harness.navigator().count(&NavigationEvent::Reload), 2);

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: language("fr"),
        })
        .await;
    assert_eq!(harness.navigator().count(&NavigationEvent::Reload), 2);
    assert_eq!(harness.navigator().count(&NavigationEvent::Back), 3);
}

#[tokio::test]
async fn switching_away_from_fetched_rtl_language_reloads() {
    let harness = TestHarness::with_api(MockInvoiceApi::new().with_preferences(language("ar")));

    harness.run(CompanyAction::FetchPreferences).await;

    let state = harness.state();
    assert_eq!(state.settings.settings.language.as_deref(), Some("ar"));
    assert!(state.settings.is_rtl);

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: language("en"),
        })
        .await;

    assert!(!harness.state().settings.is_rtl);
    assert_eq!(harness.navigator().count(&NavigationEvent::Reload), 1);
}

#[tokio::test]
async fn failed_update_leaves_settings_untouched() {
    let harness = TestHarness::with_api(
        MockInvoiceApi::new().with_failure("update_preferences", ApiError::Timeout(Duration::from_secs(30))),
    );

    harness
        .run(CompanyAction::UpdatePreferences {
            preferences: language("ar"),
        })
        .await;

    let state = harness.state();
    assert_eq!(state.settings.settings, Preferences::default());
    assert!(!state.company.flags.is_saving);
    assert!(harness.navigator().events().is_empty());
    harness.recorder.assert_not_dispatched("settings.set");
}

// =============================================================================
// Add Company
// =============================================================================

fn logo() -> LogoUpload {
    LogoUpload {
        file_name: "logo.png".into(),
        mime: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

#[tokio::test]
async fn add_company_uploads_logo() {
    let harness = TestHarness::with_api(MockInvoiceApi::new().with_next_id(3));

    harness
        .run(CompanyAction::Add {
            params: CompanyParams {
                name: "Initech".into(),
                ..Default::default()
            },
            logo: Some(logo()),
        })
        .await;

    assert_eq!(
        harness.api().calls(),
        vec!["create_company", "upload_company_logo"]
    );
    let state = harness.state();
    assert_eq!(state.company.companies.ids(), vec![3]);
    assert!(!state.company.flags.is_saving);
    assert_eq!(harness.notifier().messages(), vec![COMPANY_CREATED]);
}

#[tokio::test]
async fn add_company_without_logo_skips_upload() {
    let harness = TestHarness::new();

    harness
        .run(CompanyAction::Add {
            params: CompanyParams {
                name: "Globex".into(),
                ..Default::default()
            },
            logo: None,
        })
        .await;

    assert!(!harness.api().was_called("upload_company_logo"));
    harness.recorder.assert_dispatched("company.add.success");
}

#[tokio::test]
async fn failed_logo_upload_is_reported() {
    let harness = TestHarness::with_api(
        MockInvoiceApi::new().with_failure(
            "upload_company_logo",
            ApiError::from_status(413, "too large".into()),
        ),
    );

    harness
        .run(CompanyAction::Add {
            params: CompanyParams {
                name: "Initech".into(),
                ..Default::default()
            },
            logo: Some(logo()),
        })
        .await;

    harness.recorder.assert_not_dispatched("company.add.success");
    assert!(!harness.state().company.flags.is_saving);
    assert_eq!(
        harness.notifier().messages(),
        vec![ApiError::from_status(413, "too large".into()).user_message()]
    );
}

// =============================================================================
// Companies
// =============================================================================

#[tokio::test]
async fn fetch_companies_replaces_list() {
    use invoicing_core::domains::company::Company;

    let company = |id: i64| Company {
        id,
        name: format!("Company {}", id),
        logo: None,
        unique_hash: None,
    };
    let harness =
        TestHarness::with_api(MockInvoiceApi::new().with_companies(vec![company(1), company(2)]));

    harness.run(CompanyAction::FetchCompanies).await;
    harness.run(CompanyAction::FetchCompanies).await;

    assert_eq!(harness.state().company.companies.ids(), vec![1, 2]);
}
