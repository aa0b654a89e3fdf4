//! Customer effects, shaped like the payment effects.

use anyhow::{Context, Result};
use statesync::{async_trait, Effect, Flag};
use tracing::info;

use super::actions::CustomerAction;
use crate::app::{AppAction, AppContext, AppState};
use crate::kernel::AppDeps;

pub const CUSTOMER_CREATED: &str = "Customer created successfully";
pub const CUSTOMER_UPDATED: &str = "Customer updated successfully";
pub const CUSTOMER_DELETED: &str = "Customer deleted successfully";

pub struct FetchCustomersEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchCustomersEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customer(CustomerAction::Fetch { query, fresh }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomerAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(CustomerAction::spinner(Flag::IsLoading, true));

        let page = ctx
            .deps()
            .api
            .fetch_customers(&query)
            .await
            .with_context(|| format!("failed to fetch customers page {}", query.page))?;

        ctx.dispatch(CustomerAction::FetchSuccess {
            customers: page.data,
            meta: page.meta,
            fresh,
        });
        Ok(())
    }
}

pub struct AddCustomerEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for AddCustomerEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customer(CustomerAction::Add { params }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomerAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(CustomerAction::spinner(Flag::IsSaving, true));

        let customer = ctx
            .deps()
            .api
            .create_customer(&params)
            .await
            .context("failed to create customer")?;

        let id = customer.id;
        if ctx.dispatch(CustomerAction::AddSuccess { customer }) {
            info!(customer_id = id, "customer created");
            ctx.deps().notifier.show_notification(CUSTOMER_CREATED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}

pub struct UpdateCustomerEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for UpdateCustomerEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customer(CustomerAction::Update { id, params }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomerAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(CustomerAction::spinner(Flag::IsSaving, true));

        let customer = ctx
            .deps()
            .api
            .update_customer(id, &params)
            .await
            .with_context(|| format!("failed to update customer {}", id))?;

        if ctx.dispatch(CustomerAction::UpdateSuccess { customer }) {
            ctx.deps().notifier.show_notification(CUSTOMER_UPDATED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}

pub struct RemoveCustomerEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for RemoveCustomerEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Customer(CustomerAction::Remove { id }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(CustomerAction::spinner(Flag::IsDeleting, false));
        ctx.dispatch(CustomerAction::spinner(Flag::IsDeleting, true));

        ctx.deps()
            .api
            .delete_customer(id)
            .await
            .with_context(|| format!("failed to delete customer {}", id))?;

        if ctx.dispatch(CustomerAction::RemoveSuccess { id }) {
            ctx.deps().notifier.show_notification(CUSTOMER_DELETED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}
