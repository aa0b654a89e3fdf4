use anyhow::Result;
use statesync::{async_trait, Effect, Flag};
use tracing::{debug, info};

use super::actions::AuthAction;
use crate::app::{AppAction, AppContext, AppState};
use crate::kernel::AppDeps;

/// Sends the password reset mail.
///
/// Both outcomes are dispatched so a waiting caller can tell them apart;
/// a failure also reaches the error handler.
pub struct SendForgotPasswordMailEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for SendForgotPasswordMailEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Auth(AuthAction::SendForgotPasswordMail { email }) = action else {
            return Ok(());
        };
        let email = email.trim().to_string();
        if email.is_empty() {
            debug!("no email given, reset mail not sent");
            return Ok(());
        }

        let _reset = ctx.on_exit(AuthAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(AuthAction::spinner(Flag::IsLoading, true));

        match ctx.deps().api.send_forgot_password_mail(&email).await {
            Ok(()) => {
                info!("password reset mail sent");
                ctx.dispatch(AuthAction::ForgotPasswordMailSent { email });
                Ok(())
            }
            Err(error) => {
                ctx.dispatch(AuthAction::ForgotPasswordMailFailed {
                    email,
                    message: error.user_message(),
                });
                Err(anyhow::Error::new(error).context("failed to send password reset mail"))
            }
        }
    }
}
