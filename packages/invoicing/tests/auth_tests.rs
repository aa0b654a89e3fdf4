//! Integration tests for the password reset mail.

mod common;

use crate::common::TestHarness;
use invoicing_core::domains::auth::AuthAction;
use invoicing_core::kernel::{ApiError, MockInvoiceApi};
use invoicing_core::{AppAction, AppStore};

/// Send the reset mail and wait for its outcome.
async fn send_mail(store: &AppStore, email: &str) -> Result<String, String> {
    store
        .request(
            AuthAction::SendForgotPasswordMail {
                email: email.to_string(),
            },
            |action| match action {
                AppAction::Auth(AuthAction::ForgotPasswordMailSent { email }) => {
                    Some(Ok(email.clone()))
                }
                AppAction::Auth(AuthAction::ForgotPasswordMailFailed { message, .. }) => {
                    Some(Err(message.clone()))
                }
                _ => None,
            },
        )
        .await
        .expect("an outcome should be dispatched")
}

#[tokio::test]
async fn reset_mail_is_sent() {
    let harness = TestHarness::new();

    let sent = send_mail(&harness.store, " ana@example.com ").await;

    assert_eq!(sent, Ok("ana@example.com".to_string()));
    assert_eq!(harness.api().reset_mails(), vec!["ana@example.com"]);
    let state = harness.state();
    assert_eq!(state.auth.reset_mail_sent_to.as_deref(), Some("ana@example.com"));
    assert!(!state.auth.flags.is_loading);
    assert!(harness.notifier().messages().is_empty());
}

#[tokio::test]
async fn blank_email_sends_nothing() {
    let harness = TestHarness::new();

    harness
        .run(AuthAction::SendForgotPasswordMail {
            email: "   ".to_string(),
        })
        .await;

    assert!(!harness.api().was_called("send_forgot_password_mail"));
    harness.recorder.assert_sequence(&["auth.forgot_password.send"]);
}

#[tokio::test]
async fn failed_mail_reports_failure() {
    let error = ApiError::Network("connection refused".into());
    let harness = TestHarness::with_api(
        MockInvoiceApi::new().with_failure("send_forgot_password_mail", error.clone()),
    );

    let outcome = send_mail(&harness.store, "ana@example.com").await;

    assert_eq!(outcome, Err(error.user_message()));
    harness.settle().await;

    let state = harness.state();
    assert_eq!(state.auth.reset_mail_sent_to, None);
    assert!(!state.auth.flags.is_loading);
    assert_eq!(harness.notifier().messages(), vec![error.user_message()]);

    let resent = send_mail(&harness.store, "ana@example.com").await;
    assert_eq!(resent, Ok("ana@example.com".to_string()));
}
