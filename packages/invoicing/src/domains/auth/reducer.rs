use serde::Serialize;
use statesync::{LoadingFlags, Reducer};

use super::actions::AuthAction;

/// Authentication slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    /// Address the last reset mail went to
    pub reset_mail_sent_to: Option<String>,
    #[serde(flatten)]
    pub flags: LoadingFlags,
}

impl Reducer<AuthAction> for AuthState {
    fn reduce(self, action: &AuthAction) -> Self {
        match action {
            AuthAction::Spinner { flag, value } => Self {
                flags: self.flags.set(*flag, *value),
                ..self
            },
            AuthAction::ForgotPasswordMailSent { email } => Self {
                reset_mail_sent_to: Some(email.clone()),
                ..self
            },
            AuthAction::SendForgotPasswordMail { .. }
            | AuthAction::ForgotPasswordMailFailed { .. } => self,
        }
    }
}
