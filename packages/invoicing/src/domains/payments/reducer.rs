use serde::Serialize;
use statesync::{Collection, Flag, LoadingFlags, PageCursor, Reducer};

use super::actions::PaymentAction;
use super::models::{Payment, UnpaidInvoice};

/// Payments slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentState {
    pub payments: Collection<Payment>,
    pub unpaid_invoices: Collection<UnpaidInvoice>,
    #[serde(flatten)]
    pub flags: LoadingFlags,
    pub cursor: PageCursor,
    pub unpaid_cursor: PageCursor,
}

impl PaymentState {
    pub fn is_saving(&self) -> bool {
        self.flags.get(Flag::IsSaving)
    }

    pub fn is_deleting(&self) -> bool {
        self.flags.get(Flag::IsDeleting)
    }

    pub fn is_loading(&self) -> bool {
        self.flags.get(Flag::IsLoading)
    }
}

impl Reducer<PaymentAction> for PaymentState {
    fn reduce(self, action: &PaymentAction) -> Self {
        match action {
            PaymentAction::Spinner { flag, value } => Self {
                flags: self.flags.set(*flag, *value),
                ..self
            },

            PaymentAction::FetchSuccess {
                payments,
                meta,
                fresh,
            } => {
                let state = Self {
                    payments: self.payments.merge_page(payments.clone(), *fresh),
                    cursor: self.cursor.record(*meta),
                    ..self
                };
                if *fresh {
                    // A fresh load also settles whatever was in progress.
                    Self {
                        flags: LoadingFlags::cleared(),
                        ..state
                    }
                } else {
                    state
                }
            }

            PaymentAction::AddSuccess { payment } => Self {
                payments: self.payments.prepend(payment.clone()),
                ..self
            },

            PaymentAction::UpdateSuccess { payment } => Self {
                payments: self.payments.update(payment.clone()),
                ..self
            },

            PaymentAction::RemoveSuccess { id } => Self {
                payments: self.payments.remove(id),
                ..self
            },

            PaymentAction::FetchUnpaidInvoicesSuccess {
                invoices,
                meta,
                fresh,
            } => Self {
                unpaid_invoices: self.unpaid_invoices.merge_page(invoices.clone(), *fresh),
                unpaid_cursor: self.unpaid_cursor.record(*meta),
                ..self
            },

            PaymentAction::Fetch { .. }
            | PaymentAction::Add { .. }
            | PaymentAction::Update { .. }
            | PaymentAction::Remove { .. }
            | PaymentAction::FetchUnpaidInvoices { .. } => self,
        }
    }
}
