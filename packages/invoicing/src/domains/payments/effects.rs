//! Payment effects.
//!
//! Every effect raises one spinner flag and resets it through an exit guard,
//! so the flag is cleared on success, failure and cancellation alike.
//! Failures propagate as `ApiError` with context and reach the notifying
//! error handler.

use anyhow::{Context, Result};
use statesync::{async_trait, Effect, Flag};
use tracing::info;

use super::actions::PaymentAction;
use crate::app::{AppAction, AppContext, AppState};
use crate::kernel::AppDeps;

pub const PAYMENT_CREATED: &str = "Payment created successfully";
pub const PAYMENT_UPDATED: &str = "Payment updated successfully";
pub const PAYMENT_DELETED: &str = "Payment deleted successfully";

/// Loads a page of payments.
pub struct FetchPaymentsEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchPaymentsEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Payment(PaymentAction::Fetch { query, fresh }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(PaymentAction::spinner(Flag::IsLoading, false));
        ctx.dispatch(PaymentAction::spinner(Flag::IsLoading, true));

        let page = ctx
            .deps()
            .api
            .fetch_payments(&query)
            .await
            .with_context(|| format!("failed to fetch payments page {}", query.page))?;

        ctx.dispatch(PaymentAction::FetchSuccess {
            payments: page.data,
            meta: page.meta,
            fresh,
        });
        Ok(())
    }
}

pub struct AddPaymentEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for AddPaymentEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Payment(PaymentAction::Add { params }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(PaymentAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(PaymentAction::spinner(Flag::IsSaving, true));

        let payment = ctx
            .deps()
            .api
            .create_payment(&params)
            .await
            .context("failed to create payment")?;

        let id = payment.id;
        if ctx.dispatch(PaymentAction::AddSuccess { payment }) {
            info!(payment_id = id, "payment created");
            ctx.deps().notifier.show_notification(PAYMENT_CREATED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}

pub struct UpdatePaymentEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for UpdatePaymentEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Payment(PaymentAction::Update { id, params }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(PaymentAction::spinner(Flag::IsSaving, false));
        ctx.dispatch(PaymentAction::spinner(Flag::IsSaving, true));

        let payment = ctx
            .deps()
            .api
            .update_payment(id, &params)
            .await
            .with_context(|| format!("failed to update payment {}", id))?;

        if ctx.dispatch(PaymentAction::UpdateSuccess { payment }) {
            info!(payment_id = id, "payment updated");
            ctx.deps().notifier.show_notification(PAYMENT_UPDATED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}

pub struct RemovePaymentEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for RemovePaymentEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Payment(PaymentAction::Remove { id }) = action else {
            return Ok(());
        };

        let _reset = ctx.on_exit(PaymentAction::spinner(Flag::IsDeleting, false));
        ctx.dispatch(PaymentAction::spinner(Flag::IsDeleting, true));

        ctx.deps()
            .api
            .delete_payment(id)
            .await
            .with_context(|| format!("failed to delete payment {}", id))?;

        if ctx.dispatch(PaymentAction::RemoveSuccess { id }) {
            info!(payment_id = id, "payment deleted");
            ctx.deps().notifier.show_notification(PAYMENT_DELETED);
            ctx.deps().navigator.go_back();
        }
        Ok(())
    }
}

/// Loads the unpaid invoices a payment can be applied to.
pub struct FetchUnpaidInvoicesEffect;

#[async_trait]
impl Effect<AppState, AppAction, AppDeps> for FetchUnpaidInvoicesEffect {
    async fn run(&self, action: AppAction, ctx: AppContext) -> Result<()> {
        let AppAction::Payment(PaymentAction::FetchUnpaidInvoices {
            customer_id,
            query,
            fresh,
        }) = action
        else {
            return Ok(());
        };

        let page = ctx
            .deps()
            .api
            .fetch_unpaid_invoices(customer_id, &query)
            .await
            .with_context(|| format!("failed to fetch unpaid invoices of customer {}", customer_id))?;

        ctx.dispatch(PaymentAction::FetchUnpaidInvoicesSuccess {
            invoices: page.data,
            meta: page.meta,
            fresh,
        });
        Ok(())
    }
}
