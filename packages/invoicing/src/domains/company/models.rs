use serde::{Deserialize, Serialize};
use statesync::Identified;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub unique_hash: Option<String>,
}

impl Identified for Company {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
}

/// An image to attach to a freshly created company.
#[derive(Clone, PartialEq)]
pub struct LogoUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for LogoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub precision: Option<u8>,
}

impl Identified for Currency {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timezone {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFormat {
    pub display_date: String,
    pub carbon_format_value: String,
    #[serde(default)]
    pub moment_format_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalYear {
    pub key: String,
    pub value: String,
}

/// Lifecycle of the auxiliary datasets loaded alongside preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    #[default]
    Unloaded,
    /// One runner claimed the load and is fetching.
    Loading,
    Loaded,
}
