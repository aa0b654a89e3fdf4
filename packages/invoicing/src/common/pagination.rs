//! Paginated list requests and responses.

use serde::{Deserialize, Serialize};
use statesync::PageInfo;

/// Query for one page of a remote list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Whether this query loads the first page (a fresh load).
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }
}

/// One page of records as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageInfo,
}

impl<T> Page<T> {
    /// A single page holding every record.
    pub fn single(data: Vec<T>) -> Self {
        Self {
            data,
            meta: PageInfo::single(),
        }
    }
}
