use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body stored for a template field the user left empty.
pub const EMPTY_TEMPLATE: &str = "<p></p>";

/// Keys the server rejects on update.
const READ_ONLY_FIELDS: &[&str] = &["next_umber"];

/// Which document's settings are being customized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizeKind {
    Invoice,
}

impl CustomizeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomizeKind::Invoice => "invoice",
        }
    }

    /// Settings edited as on/off switches.
    pub fn switch_fields(&self) -> &'static [&'static str] {
        match self {
            CustomizeKind::Invoice => &[
                "invoice_auto_generate",
                "invoice_email_attachment",
                "set_due_date_automatically",
            ],
        }
    }
}

/// Customization settings as the flat key/value map the server keeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomizeSettings(pub BTreeMap<String, Value>);

impl CustomizeSettings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Whether a switch reads as on. The server spells it `YES`, forms use
    /// booleans.
    pub fn is_enabled(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(on)) => *on,
            Some(Value::String(s)) => matches!(s.as_str(), "YES" | "1" | "true"),
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }

    /// Switch fields as booleans, ready for editing.
    pub fn for_form(self, kind: CustomizeKind) -> Self {
        let switches: Vec<(&str, bool)> = kind
            .switch_fields()
            .iter()
            .map(|field| (*field, self.is_enabled(field)))
            .collect();

        switches
            .into_iter()
            .fold(self, |settings, (field, on)| settings.with(field, on))
    }

    /// Edited values in the shape the server stores.
    ///
    /// Switches become `YES`/`NO`, blank mail bodies and address formats
    /// become an empty paragraph, and read-only keys are dropped.
    pub fn for_update(self, kind: CustomizeKind) -> Self {
        let mut values = self.0;

        for (key, value) in values.iter_mut() {
            if is_template_field(key) && is_blank(value) {
                *value = Value::from(EMPTY_TEMPLATE);
            }
        }

        let settings = CustomizeSettings(values);
        let switches: Vec<(&str, bool)> = kind
            .switch_fields()
            .iter()
            .map(|field| (*field, settings.is_enabled(field)))
            .collect();

        let mut values = switches
            .into_iter()
            .fold(settings, |settings, (field, on)| {
                settings.with(field, if on { "YES" } else { "NO" })
            })
            .0;
        for field in READ_ONLY_FIELDS {
            values.remove(*field);
        }
        CustomizeSettings(values)
    }
}

fn is_template_field(key: &str) -> bool {
    key.contains("mail_body") || key.contains("address_format")
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
