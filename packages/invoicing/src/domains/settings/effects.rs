use anyhow::{Context, Result};
use statesync::{async_trait, Effect};

use super::actions::SettingsAction;
use crate::app::{AppAction, AppContext, AppState};
use crate::kernel::AppDeps;

/// Fetch the country list into the settings slice.
///
/// Shared by the countries effect and the company initial-details load.
pub async fn load_countries(ctx: &AppContext) -> Result<()> {
    let countries = ctx
        .deps()
        .api
        .fetch_countries()
        .await
        .context("failed to fetch countries")?;
    ctx.dispatch(SettingsAction::CountriesLoaded { countries });
    Ok(())
}

pub struct FetchCountriesEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchCountriesEffect {
    async fn run(&self, _action: AppAction, ctx: AppContext) -> Result<()> {
        load_countries(&ctx).await
    }
}
