use statesync::{Action, Flag, PageInfo};

use super::models::{Payment, PaymentParams, UnpaidInvoice};
use crate::common::PageQuery;

pub mod tags {
    pub const SPINNER: &str = "payment.spinner";
    pub const FETCH: &str = "payment.fetch";
    pub const FETCH_SUCCESS: &str = "payment.fetch.success";
    pub const ADD: &str = "payment.add";
    pub const ADD_SUCCESS: &str = "payment.add.success";
    pub const UPDATE: &str = "payment.update";
    pub const UPDATE_SUCCESS: &str = "payment.update.success";
    pub const REMOVE: &str = "payment.remove";
    pub const REMOVE_SUCCESS: &str = "payment.remove.success";
    pub const FETCH_UNPAID_INVOICES: &str = "payment.unpaid_invoices.fetch";
    pub const FETCH_UNPAID_INVOICES_SUCCESS: &str = "payment.unpaid_invoices.fetch.success";
}

/// Payment intents and outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentAction {
    /// Set one in-progress flag
    Spinner { flag: Flag, value: bool },

    /// Load a page of payments (`fresh` replaces the list)
    Fetch { query: PageQuery, fresh: bool },
    FetchSuccess {
        payments: Vec<Payment>,
        meta: PageInfo,
        fresh: bool,
    },

    Add { params: PaymentParams },
    AddSuccess { payment: Payment },

    Update { id: i64, params: PaymentParams },
    UpdateSuccess { payment: Payment },

    Remove { id: i64 },
    RemoveSuccess { id: i64 },

    /// Load invoices of a customer that still have a due amount
    FetchUnpaidInvoices {
        customer_id: i64,
        query: PageQuery,
        fresh: bool,
    },
    FetchUnpaidInvoicesSuccess {
        invoices: Vec<UnpaidInvoice>,
        meta: PageInfo,
        fresh: bool,
    },
}

impl PaymentAction {
    pub fn spinner(flag: Flag, value: bool) -> Self {
        PaymentAction::Spinner { flag, value }
    }

    /// Fetch a page; the first page is always a fresh load.
    pub fn fetch(query: PageQuery) -> Self {
        let fresh = query.is_first();
        PaymentAction::Fetch { query, fresh }
    }
}

impl Action for PaymentAction {
    fn tag(&self) -> &'static str {
        match self {
            PaymentAction::Spinner { .. } => tags::SPINNER,
            PaymentAction::Fetch { .. } => tags::FETCH,
            PaymentAction::FetchSuccess { .. } => tags::FETCH_SUCCESS,
            PaymentAction::Add { .. } => tags::ADD,
            PaymentAction::AddSuccess { .. } => tags::ADD_SUCCESS,
            PaymentAction::Update { .. } => tags::UPDATE,
            PaymentAction::UpdateSuccess { .. } => tags::UPDATE_SUCCESS,
            PaymentAction::Remove { .. } => tags::REMOVE,
            PaymentAction::RemoveSuccess { .. } => tags::REMOVE_SUCCESS,
            PaymentAction::FetchUnpaidInvoices { .. } => tags::FETCH_UNPAID_INVOICES,
            PaymentAction::FetchUnpaidInvoicesSuccess { .. } => {
                tags::FETCH_UNPAID_INVOICES_SUCCESS
            }
        }
    }
}
