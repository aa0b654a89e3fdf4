use statesync::{Action, Flag};

pub mod tags {
    pub const SPINNER: &str = "auth.spinner";
    pub const SEND_FORGOT_PASSWORD_MAIL: &str = "auth.forgot_password.send";
    pub const FORGOT_PASSWORD_MAIL_SENT: &str = "auth.forgot_password.send.success";
    pub const FORGOT_PASSWORD_MAIL_FAILED: &str = "auth.forgot_password.send.failure";
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Spinner { flag: Flag, value: bool },

    /// Ask the server to mail a password reset link
    SendForgotPasswordMail { email: String },
    ForgotPasswordMailSent { email: String },
    /// `message` is the user-facing reason
    ForgotPasswordMailFailed { email: String, message: String },
}

impl AuthAction {
    pub fn spinner(flag: Flag, value: bool) -> Self {
        AuthAction::Spinner { flag, value }
    }
}

impl Action for AuthAction {
    fn tag(&self) -> &'static str {
        match self {
            AuthAction::Spinner { .. } => tags::SPINNER,
            AuthAction::SendForgotPasswordMail { .. } => tags::SEND_FORGOT_PASSWORD_MAIL,
            AuthAction::ForgotPasswordMailSent { .. } => tags::FORGOT_PASSWORD_MAIL_SENT,
            AuthAction::ForgotPasswordMailFailed { .. } => tags::FORGOT_PASSWORD_MAIL_FAILED,
        }
    }
}
