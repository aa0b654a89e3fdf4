//! Integration tests for document customization.

mod common;

use crate::common::TestHarness;
use invoicing_core::domains::customize::effects::{CUSTOMIZE_LIST_ROUTE, SETTINGS_UPDATED};
use invoicing_core::domains::customize::models::EMPTY_TEMPLATE;
use invoicing_core::domains::customize::{CustomizeAction, CustomizeKind, CustomizeSettings};
use invoicing_core::kernel::{ApiError, MockInvoiceApi, NavigationEvent};
use invoicing_core::AppAction;
use serde_json::json;

const INVOICE: CustomizeKind = CustomizeKind::Invoice;

fn stored() -> CustomizeSettings {
    serde_json::from_value(json!({
        "invoice_prefix": "INV",
        "invoice_auto_generate": "YES",
        "invoice_email_attachment": "NO",
        "set_due_date_automatically": "YES",
        "due_date_days": "7",
    }))
    .unwrap()
}

#[tokio::test]
async fn fetch_returns_settings_in_form_shape() {
    let harness =
        TestHarness::with_api(MockInvoiceApi::new().with_customize_settings(INVOICE, stored()));

    let settings = harness
        .store
        .request(CustomizeAction::Fetch { kind: INVOICE }, |action| match action {
            AppAction::Customize(CustomizeAction::FetchSuccess { settings, .. }) => {
                Some(settings.clone())
            }
            _ => None,
        })
        .await
        .expect("settings should be fetched");

    assert_eq!(settings.get("invoice_auto_generate"), Some(&json!(true)));
    assert_eq!(settings.get("invoice_email_attachment"), Some(&json!(false)));
    assert_eq!(settings.get("set_due_date_automatically"), Some(&json!(true)));
    assert_eq!(settings.get("due_date_days"), Some(&json!("7")));

    let state = harness.state();
    assert_eq!(state.customize.get(INVOICE), Some(&settings));
    assert!(!state.customize.flags.is_loading);
}

#[tokio::test]
async fn update_saves_normalized_settings_and_returns_to_list() {
    let harness =
        TestHarness::with_api(MockInvoiceApi::new().with_customize_settings(INVOICE, stored()));
    harness.run(CustomizeAction::Fetch { kind: INVOICE }).await;

    let edited = harness
        .state()
        .customize
        .get(INVOICE)
        .cloned()
        .unwrap()
        .with("invoice_email_attachment", true)
        .with("invoice_mail_body", "")
        .with("next_umber", 42);

    harness
        .run(CustomizeAction::Update {
            kind: INVOICE,
            settings: edited.clone(),
        })
        .await;

    let saved = harness.api().customize_settings(INVOICE).unwrap();
    assert_eq!(saved.get("invoice_auto_generate"), Some(&json!("YES")));
    assert_eq!(saved.get("invoice_email_attachment"), Some(&json!("YES")));
    assert_eq!(saved.get("invoice_mail_body"), Some(&json!(EMPTY_TEMPLATE)));
    assert_eq!(saved.get("next_umber"), None);

    let state = harness.state();
    assert_eq!(state.customize.get(INVOICE), Some(&edited));
    assert!(!state.customize.flags.is_saving);
    assert_eq!(harness.notifier().messages(), vec![SETTINGS_UPDATED]);
    assert_eq!(
        harness.navigator().events(),
        vec![NavigationEvent::Navigate(CUSTOMIZE_LIST_ROUTE.to_string())]
    );
}

#[tokio::test]
async fn failed_update_stays_on_screen() {
    let error = ApiError::from_status(
        422,
        r#"{"errors": {"invoice_prefix": ["The prefix is required."]}}"#.into(),
    );
    let harness = TestHarness::with_api(
        MockInvoiceApi::new().with_failure("update_customize_settings", error),
    );

    harness
        .run(CustomizeAction::Update {
            kind: INVOICE,
            settings: CustomizeSettings::default().with("invoice_prefix", ""),
        })
        .await;

    harness.recorder.assert_not_dispatched("customize.update.success");
    assert!(!harness.state().customize.flags.is_saving);
    assert!(harness.navigator().events().is_empty());
    assert_eq!(harness.notifier().messages(), vec!["The prefix is required."]);
}
