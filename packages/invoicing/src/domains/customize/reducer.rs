use std::collections::BTreeMap;

use serde::Serialize;
use statesync::{LoadingFlags, Reducer};

use super::actions::CustomizeAction;
use super::models::{CustomizeKind, CustomizeSettings};

/// Customization settings per document kind, in form shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomizeState {
    pub settings: BTreeMap<CustomizeKind, CustomizeSettings>,
    #[serde(flatten)]
    pub flags: LoadingFlags,
}

impl CustomizeState {
    pub fn get(&self, kind: CustomizeKind) -> Option<&CustomizeSettings> {
        self.settings.get(&kind)
    }
}

impl Reducer<CustomizeAction> for CustomizeState {
    fn reduce(self, action: &CustomizeAction) -> Self {
        match action {
            CustomizeAction::Spinner { flag, value } => Self {
                flags: self.flags.set(*flag, *value),
                ..self
            },
            CustomizeAction::FetchSuccess { kind, settings }
            | CustomizeAction::UpdateSuccess { kind, settings } => {
                let mut all = self.settings;
                all.insert(*kind, settings.clone());
                Self {
                    settings: all,
                    ..self
                }
            }
            CustomizeAction::Fetch { .. } | CustomizeAction::Update { .. } => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statesync::testing::ReducerTest;
    use statesync::Flag;

    #[test]
    fn test_success_replaces_kind_settings() {
        let first = CustomizeSettings::default().with("invoice_prefix", "INV");
        let second = CustomizeSettings::default().with("invoice_prefix", "BILL");

        ReducerTest::new(CustomizeState::default())
            .given(CustomizeAction::FetchSuccess {
                kind: CustomizeKind::Invoice,
                settings: first,
            })
            .then(CustomizeAction::UpdateSuccess {
                kind: CustomizeKind::Invoice,
                settings: second.clone(),
            })
            .assert_state(|s| s.get(CustomizeKind::Invoice) == Some(&second))
            .assert_unchanged_by(CustomizeAction::Fetch {
                kind: CustomizeKind::Invoice,
            });
    }

    #[test]
    fn test_spinner_sets_only_named_flag() {
        let state = CustomizeState::default().reduce(&CustomizeAction::spinner(Flag::IsSaving, true));

        assert!(state.flags.is_saving);
        assert!(!state.flags.is_loading);
    }
}
