//! Payloads of the natural-language helpers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::dto::bulk::BulkDeleteResult;
use crate::pagination::PageInfo;

#[derive(Debug, Serialize)]
pub struct AiSearchResult {
    pub contacts: Vec<Map<String, Value>>,
    pub pagination: PageInfo,
    /// Filters read from the query.
    pub interpreted_filters: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AiDeleteResult {
    Preview {
        contacts: Vec<Map<String, Value>>,
        would_delete: usize,
        dry_run: bool,
    },
    Deleted(BulkDeleteResult),
}
