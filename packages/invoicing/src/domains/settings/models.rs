use serde::{Deserialize, Serialize};
use statesync::Identified;

/// Language codes rendered right-to-left.
const RTL_LANGUAGES: &[&str] = &["ar"];

/// Returns true if the language is rendered right-to-left.
pub fn is_rtl_language(code: &str) -> bool {
    RTL_LANGUAGES.contains(&code)
}

/// Company preferences. Every field is optional so a partial update merges
/// into the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
}

impl Preferences {
    /// Overlay the fields set in `update`.
    pub fn merge(self, update: &Preferences) -> Self {
        Self {
            currency: update.currency.or(self.currency),
            language: update.language.clone().or(self.language),
            time_zone: update.time_zone.clone().or(self.time_zone),
            date_format: update.date_format.clone().or(self.date_format),
            fiscal_year: update.fiscal_year.clone().or(self.fiscal_year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl Identified for Country {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let stored = Preferences {
            currency: Some(1),
            language: Some("en".into()),
            time_zone: Some("UTC".into()),
            ..Default::default()
        };
        let update = Preferences {
            language: Some("ar".into()),
            ..Default::default()
        };

        let merged = stored.merge(&update);

        assert_eq!(merged.currency, Some(1));
        assert_eq!(merged.language.as_deref(), Some("ar"));
        assert_eq!(merged.time_zone.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_rtl_languages() {
        assert!(is_rtl_language("ar"));
        assert!(!is_rtl_language("en"));
    }
}
