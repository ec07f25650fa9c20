use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::list::SortSpec;
use crate::domain::types::{HubId, SavedViewId, ViewLabel};

/// Named list configuration owned by a user, optionally shared.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavedView {
    #[serde(rename = "name")]
    pub id: SavedViewId,
    #[serde(skip)]
    pub hub_id: HubId,
    pub doctype: String,
    #[serde(rename = "view_name")]
    pub label: String,
    pub owner: String,
    pub filters: Map<String, Value>,
    pub sorts: Vec<SortSpec>,
    pub columns: Vec<Value>,
    pub fields: Vec<String>,
    pub page_size: Option<usize>,
    pub is_default: bool,
    pub is_public: bool,
    #[serde(rename = "creation")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified")]
    pub updated_at: NaiveDateTime,
}

impl SavedView {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner == email
    }

    /// Owners see their own views; everyone else only public ones.
    pub fn is_visible_to(&self, email: &str) -> bool {
        self.is_public || self.is_owned_by(email)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSavedView {
    pub hub_id: HubId,
    pub doctype: String,
    pub label: ViewLabel,
    pub owner: String,
    pub filters: Map<String, Value>,
    pub sorts: Vec<SortSpec>,
    pub columns: Vec<Value>,
    pub fields: Vec<String>,
    pub page_size: Option<usize>,
    pub is_default: bool,
    pub is_public: bool,
}

/// Free-form per-doctype list settings stored under a name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListSettings {
    #[serde(skip)]
    pub hub_id: HubId,
    pub doctype: String,
    pub settings_name: String,
    pub values: Map<String, Value>,
    #[serde(rename = "modified")]
    pub updated_at: NaiveDateTime,
}

pub const DEFAULT_SETTINGS_NAME: &str = "default";
