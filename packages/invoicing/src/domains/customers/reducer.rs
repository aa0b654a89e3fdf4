use serde::Serialize;
use statesync::{Collection, LoadingFlags, PageCursor, Reducer};

use super::actions::CustomerAction;
use super::models::Customer;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerState {
    pub customers: Collection<Customer>,
    #[serde(flatten)]
    pub flags: LoadingFlags,
    pub cursor: PageCursor,
}

impl Reducer<CustomerAction> for CustomerState {
    fn reduce(self, action: &CustomerAction) -> Self {
        match action {
            CustomerAction::Spinner { flag, value } => Self {
                flags: self.flags.set(*flag, *value),
                ..self
            },
            CustomerAction::FetchSuccess {
                customers,
                meta,
                fresh,
            } => Self {
                customers: self.customers.merge_page(customers.clone(), *fresh),
                cursor: self.cursor.record(*meta),
                ..self
            },
            CustomerAction::AddSuccess { customer } => Self {
                customers: self.customers.prepend(customer.clone()),
                ..self
            },
            CustomerAction::UpdateSuccess { customer } => Self {
                customers: self.customers.update(customer.clone()),
                ..self
            },
            CustomerAction::RemoveSuccess { id } => Self {
                customers: self.customers.remove(id),
                ..self
            },
            CustomerAction::Fetch { .. }
            | CustomerAction::Add { .. }
            | CustomerAction::Update { .. }
            | CustomerAction::Remove { .. } => self,
        }
    }
}
