//! Paged list payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::types::SavedViewId;
use crate::pagination::PageInfo;

/// Saved view that shaped a generic list response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewInfo {
    pub view_name: String,
    pub view_id: SavedViewId,
    pub is_owner: bool,
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<Map<String, Value>>,
    pub pagination: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_info: Option<ViewInfo>,
}

#[derive(Debug, Serialize)]
pub struct ContactList {
    pub contacts: Vec<Map<String, Value>>,
    pub pagination: PageInfo,
}
