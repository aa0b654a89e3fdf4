use statesync::{Action, Flag};

use super::models::{CustomizeKind, CustomizeSettings};

pub mod tags {
    pub const SPINNER: &str = "customize.spinner";
    pub const FETCH: &str = "customize.fetch";
    pub const FETCH_SUCCESS: &str = "customize.fetch.success";
    pub const UPDATE: &str = "customize.update";
    pub const UPDATE_SUCCESS: &str = "customize.update.success";
}

/// Document customization intents and outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum CustomizeAction {
    Spinner { flag: Flag, value: bool },

    Fetch { kind: CustomizeKind },
    /// Settings as edited by the form (switches are booleans)
    FetchSuccess {
        kind: CustomizeKind,
        settings: CustomizeSettings,
    },

    /// Save edited settings
    Update {
        kind: CustomizeKind,
        settings: CustomizeSettings,
    },
    UpdateSuccess {
        kind: CustomizeKind,
        settings: CustomizeSettings,
    },
}

impl CustomizeAction {
    pub fn spinner(flag: Flag, value: bool) -> Self {
        CustomizeAction::Spinner { flag, value }
    }
}

impl Action for CustomizeAction {
    fn tag(&self) -> &'static str {
        match self {
            CustomizeAction::Spinner { .. } => tags::SPINNER,
            CustomizeAction::Fetch { .. } => tags::FETCH,
            CustomizeAction::FetchSuccess { .. } => tags::FETCH_SUCCESS,
            CustomizeAction::Update { .. } => tags::UPDATE,
            CustomizeAction::UpdateSuccess { .. } => tags::UPDATE_SUCCESS,
        }
    }
}
