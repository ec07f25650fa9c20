//! Saved view and list settings payloads.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::list::SortSpec;
use crate::domain::saved_view::{ListSettings, SavedView};
use crate::domain::types::SavedViewId;
use crate::pagination::PageInfo;

/// Owner label shown for public views created by someone else.
pub const PUBLIC_OWNER: &str = "Public";

/// A saved view as seen by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewData {
    pub view_id: SavedViewId,
    pub view_name: String,
    pub doctype: String,
    pub filters: Map<String, Value>,
    pub sorts: Vec<SortSpec>,
    pub columns: Vec<Value>,
    pub fields: Vec<String>,
    pub page_size: Option<usize>,
    pub is_default: bool,
    pub is_public: bool,
    pub is_mine: bool,
    pub owner: String,
    pub modified: NaiveDateTime,
}

impl ViewData {
    pub fn for_user(view: SavedView, user_email: &str) -> Self {
        let is_mine = view.is_owned_by(user_email);
        let owner = if is_mine {
            view.owner
        } else {
            PUBLIC_OWNER.to_string()
        };
        Self {
            view_id: view.id,
            view_name: view.label,
            doctype: view.doctype,
            filters: view.filters,
            sorts: view.sorts,
            columns: view.columns,
            fields: view.fields,
            page_size: view.page_size,
            is_default: view.is_default,
            is_public: view.is_public,
            is_mine,
            owner,
            modified: view.updated_at,
        }
    }
}

/// Settings that were used to produce a contact list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedView {
    pub view_id: Option<SavedViewId>,
    pub view_name: Option<String>,
    pub filters: Value,
    pub sorts: Vec<SortSpec>,
    pub columns: Vec<Value>,
    pub fields: Vec<String>,
    pub page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct ContactsWithView {
    pub contacts: Vec<Map<String, Value>>,
    pub pagination: PageInfo,
    pub applied_view: AppliedView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSettingsEntry {
    pub name: String,
    pub settings_name: String,
}

impl From<&ListSettings> for ListSettingsEntry {
    fn from(settings: &ListSettings) -> Self {
        Self {
            name: format!("{}-{}", settings.doctype, settings.settings_name),
            settings_name: settings.settings_name.clone(),
        }
    }
}
