use statesync::{Action, Flag, PageInfo};

use super::models::{Customer, CustomerParams};
use crate::common::PageQuery;

pub mod tags {
    pub const SPINNER: &str = "customer.spinner";
    pub const FETCH: &str = "customer.fetch";
    pub const FETCH_SUCCESS: &str = "customer.fetch.success";
    pub const ADD: &str = "customer.add";
    pub const ADD_SUCCESS: &str = "customer.add.success";
    pub const UPDATE: &str = "customer.update";
    pub const UPDATE_SUCCESS: &str = "customer.update.success";
    pub const REMOVE: &str = "customer.remove";
    pub const REMOVE_SUCCESS: &str = "customer.remove.success";
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerAction {
    Spinner { flag: Flag, value: bool },

    Fetch { query: PageQuery, fresh: bool },
    FetchSuccess {
        customers: Vec<Customer>,
        meta: PageInfo,
        fresh: bool,
    },

    Add { params: CustomerParams },
    AddSuccess { customer: Customer },

    Update { id: i64, params: CustomerParams },
    UpdateSuccess { customer: Customer },

    Remove { id: i64 },
    RemoveSuccess { id: i64 },
}

impl CustomerAction {
    pub fn spinner(flag: Flag, value: bool) -> Self {
        CustomerAction::Spinner { flag, value }
    }

    pub fn fetch(query: PageQuery) -> Self {
        let fresh = query.is_first();
        CustomerAction::Fetch { query, fresh }
    }
}

impl Action for CustomerAction {
    fn tag(&self) -> &'static str {
        match self {
            CustomerAction::Spinner { .. } => tags::SPINNER,
            CustomerAction::Fetch { .. } => tags::FETCH,
            CustomerAction::FetchSuccess { .. } => tags::FETCH_SUCCESS,
            CustomerAction::Add { .. } => tags::ADD,
            CustomerAction::AddSuccess { .. } => tags::ADD_SUCCESS,
            CustomerAction::Update { .. } => tags::UPDATE,
            CustomerAction::UpdateSuccess { .. } => tags::UPDATE_SUCCESS,
            CustomerAction::Remove { .. } => tags::REMOVE,
            CustomerAction::RemoveSuccess { .. } => tags::REMOVE_SUCCESS,
        }
    }
}
