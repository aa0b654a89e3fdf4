//! Company, preference and reference-dataset effects.

use anyhow::{Context, Result};
use statesync::{async_trait, Effect, Flag};
use tracing::{debug, info};

use super::actions::CompanyAction;
use super::models::{Currency, DatasetStatus};
use crate::app::{AppAction, AppContext, AppState};
use crate::domains::settings::effects::load_countries;
use crate::domains::settings::models::{is_rtl_language, Preferences};
use crate::domains::settings::SettingsAction;
use crate::kernel::AppDeps;

pub const PREFERENCES_UPDATED: &str = "Preferences updated successfully";
pub const COMPANY_CREATED: &str = "Company created successfully";

pub struct FetchCompaniesEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchCompaniesEffect {
    async fn run(&self, _action: AppAction, ctx: AppContext) -> Result<()> {
        let _reset = ctx.on_exit(CompanyAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(CompanyAction::spinner(Flag::IsLoading, true));

        let companies = ctx
            .deps()
            .api
            .fetch_companies()
            .await
            .context("failed to fetch companies")?;

        ctx.dispatch(CompanyAction::FetchCompaniesSuccess { companies });
        Ok(())
    }
}

/// Loads preferences and applies them to the settings slice; the first
/// instance to find the reference datasets unloaded also loads them.
///
/// Several instances may run at once. The claim is a check-and-set under
/// the store lock, so exactly one of them performs the five dataset loads.
/// A failed load releases the claim and a later fetch retries.
pub struct FetchPreferencesEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchPreferencesEffect {
    async fn run(&self, _action: AppAction, ctx: AppContext) -> Result<()> {
        let _reset = ctx.on_exit(CompanyAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(CompanyAction::spinner(Flag::IsLoading, true));

        let preferences = ctx
            .deps()
            .api
            .fetch_preferences()
            .await
            .context("failed to fetch preferences")?;

        let claimed = ctx.dispatch_if(
            |state| state.company.datasets == DatasetStatus::Unloaded,
            CompanyAction::DatasetsClaimed,
        );
        if claimed {
            let release = ctx.on_exit(CompanyAction::DatasetsReleased);
            load_datasets(&ctx).await?;
            ctx.dispatch(CompanyAction::DatasetsLoaded);
            release.disarm();
        } else {
            debug!(
                datasets = ?ctx.state().company.datasets,
                "reference datasets already claimed"
            );
        }

        let selected_currency = resolve_currency(&ctx, &preferences);
        ctx.dispatch(CompanyAction::PreferencesFetched {
            preferences: preferences.clone(),
        });
        ctx.dispatch(SettingsAction::Set {
            settings: preferences,
            selected_currency,
        });
        Ok(())
    }
}

/// The known currency record matching the preferred currency id.
fn resolve_currency(ctx: &AppContext, preferences: &Preferences) -> Option<Currency> {
    preferences
        .currency
        .and_then(|id| ctx.state().company.currencies.get(&id).cloned())
}

/// The five reference datasets, one after the other.
async fn load_datasets(ctx: &AppContext) -> Result<()> {
    let api = &ctx.deps().api;

    let currencies = api
        .fetch_currencies()
        .await
        .context("failed to fetch currencies")?;
    ctx.dispatch(CompanyAction::CurrenciesLoaded { currencies });

    let timezones = api
        .fetch_timezones()
        .await
        .context("failed to fetch timezones")?;
    ctx.dispatch(CompanyAction::TimezonesLoaded { timezones });

    let date_formats = api
        .fetch_date_formats()
        .await
        .context("failed to fetch date formats")?;
    ctx.dispatch(CompanyAction::DateFormatsLoaded { date_formats });

    let fiscal_years = api
        .fetch_fiscal_years()
        .await
        .context("failed to fetch fiscal years")?;
    ctx.dispatch(CompanyAction::FiscalYearsLoaded { fiscal_years });

    let languages = api
        .fetch_languages()
        .await
        .context("failed to fetch languages")?;
    ctx.dispatch(CompanyAction::LanguagesLoaded { languages });

    info!("reference datasets loaded");
    Ok(())
}

/// Saves preferences and applies them to the settings slice.
///
/// Switching into or out of a right-to-left language reloads the UI.
pub struct UpdatePreferencesEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for UpdatePreferencesEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Company(CompanyAction::UpdatePreferences { preferences }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CompanyAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(CompanyAction::spinner(Flag::IsSaving, true));

        let previous_language = ctx.state().settings.settings.language.clone();

        ctx.deps()
            .api
            .update_preferences(&preferences)
            .await
            .context("failed to update preferences")?;

        let selected_currency = resolve_currency(&ctx, &preferences);
        ctx.dispatch(SettingsAction::Set {
            settings: preferences.clone(),
            selected_currency,
        });

        ctx.deps().notifier.show_notification(PREFERENCES_UPDATED);

        if let Some(language) = &preferences.language {
            let was_rtl = previous_language.as_deref().is_some_and(is_rtl_language);
            if was_rtl || is_rtl_language(language) {
                info!(%language, "layout direction may change, reloading");
                ctx.deps().navigator.reload();
            }
        }
        ctx.deps().navigator.go_back();
        Ok(())
    }
}

/// Creates a company and uploads its logo.
pub struct AddCompanyEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for AddCompanyEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Company(CompanyAction::Add { params, logo }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CompanyAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(CompanyAction::spinner(Flag::IsSaving, true));

        let api = &ctx.deps().api;
        let company = api
            .create_company(&params)
            .await
            .context("failed to create company")?;

        if let Some(logo) = &logo {
            api.upload_company_logo(company.id, logo)
                .await
                .with_context(|| format!("failed to upload logo of company {}", company.id))?;
        }

        let id = company.id;
        if ctx.dispatch(CompanyAction::AddSuccess { company }) {
            info!(company_id = id, with_logo = logo.is_some(), "company created");
            ctx.deps().navigator.go_back();
            ctx.deps().notifier.show_notification(COMPANY_CREATED);
        }
        Ok(())
    }
}

/// Loads what the company form needs: currencies, then countries.
pub struct FetchInitialDetailsEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchInitialDetailsEffect {
    async fn run(&self, _action: AppAction, ctx: AppContext) -> Result<()> {
        let _reset = ctx.on_exit(CompanyAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(CompanyAction::spinner(Flag::IsLoading, true));

        let currencies = ctx
            .deps()
            .api
            .fetch_currencies()
            .await
            .context("failed to fetch currencies")?;
        ctx.dispatch(CompanyAction::CurrenciesLoaded { currencies });

        load_countries(&ctx).await
    }
}
