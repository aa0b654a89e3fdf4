//! Document customization effects.

use anyhow::{Context, Result};
use statesync::{async_trait, Effect, Flag};
use tracing::info;

use super::actions::CustomizeAction;
use crate::app::{AppAction, AppContext, AppState};
use crate::kernel::AppDeps;

pub const SETTINGS_UPDATED: &str = "Settings updated successfully";

/// Screen listing the customizable documents.
pub const CUSTOMIZE_LIST_ROUTE: &str = "customize_list";

/// Loads the settings of one document kind, switches read as booleans.
pub struct FetchCustomizeSettingsEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchCustomizeSettingsEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customize(CustomizeAction::Fetch { kind }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomizeAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(CustomizeAction::spinner(Flag::IsLoading, true));

        let settings = ctx
            .deps()
            .api
            .fetch_customize_settings(kind)
            .await
            .with_context(|| format!("failed to fetch {} settings", kind.as_str()))?;

        ctx.dispatch(CustomizeAction::FetchSuccess {
            kind,
            settings: settings.for_form(kind),
        });
        Ok(())
    }
}

/// Saves edited settings, then returns to the customization list.
pub struct UpdateCustomizeSettingsEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for UpdateCustomizeSettingsEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customize(CustomizeAction::Update { kind, settings }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomizeAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(CustomizeAction::spinner(Flag::IsSaving, true));

        let body = settings.clone().for_update(kind);
        ctx.deps()
            .api
            .update_customize_settings(kind, &body)
            .await
            .with_context(|| format!("failed to update {} settings", kind.as_str()))?;

        if ctx.dispatch(CustomizeAction::UpdateSuccess { kind, settings }) {
            info!(kind = kind.as_str(), "customization saved");
            ctx.deps().notifier.show_notification(SETTINGS_UPDATED);
            ctx.deps().navigator.navigate(CUSTOMIZE_LIST_ROUTE);
        }
        Ok(())
    }
}
