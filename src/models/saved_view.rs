//! Diesel models for saved list views and list settings.
//!
//! JSON columns are stored as text and parsed leniently on the way out.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::saved_view::{
    ListSettings as DomainListSettings, NewSavedView as DomainNewSavedView,
    SavedView as DomainSavedView,
};
use crate::domain::types::{HubId, SavedViewId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::saved_views)]
pub struct SavedView {
    pub id: i32,
    pub hub_id: i32,
    pub doctype: String,
    pub label: String,
    pub owner: String,
    pub filters: String,
    pub sorts: String,
    #[diesel(column_name = view_columns)]
    pub columns: String,
    pub fields: String,
    pub page_size: Option<i32>,
    pub is_default: bool,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::saved_views)]
#[diesel(treat_none_as_null = true)]
pub struct SavedViewColumns<'a> {
    pub label: &'a str,
    pub filters: String,
    pub sorts: String,
    #[diesel(column_name = view_columns)]
    pub columns: String,
    pub fields: String,
    pub page_size: Option<i32>,
    pub is_default: bool,
    pub is_public: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::saved_views)]
pub struct NewSavedView<'a> {
    pub hub_id: i32,
    pub doctype: &'a str,
    pub owner: &'a str,
    pub created_at: NaiveDateTime,
    #[diesel(embed)]
    pub columns: SavedViewColumns<'a>,
}

impl<'a> SavedViewColumns<'a> {
    pub fn from_domain(view: &'a DomainNewSavedView, now: NaiveDateTime) -> Self {
        Self {
            label: view.label.as_str(),
            filters: Value::Object(view.filters.clone()).to_string(),
            sorts: serde_json::to_string(&view.sorts).unwrap_or_else(|_| "[]".to_string()),
            columns: Value::Array(view.columns.clone()).to_string(),
            fields: serde_json::to_string(&view.fields).unwrap_or_else(|_| "[]".to_string()),
            page_size: view.page_size.and_then(|size| i32::try_from(size).ok()),
            is_default: view.is_default,
            is_public: view.is_public,
            updated_at: now,
        }
    }
}

impl<'a> NewSavedView<'a> {
    pub fn from_domain(view: &'a DomainNewSavedView, now: NaiveDateTime) -> Self {
        Self {
            hub_id: view.hub_id.get(),
            doctype: view.doctype.as_str(),
            owner: view.owner.as_str(),
            created_at: now,
            columns: SavedViewColumns::from_domain(view, now),
        }
    }
}

impl TryFrom<SavedView> for DomainSavedView {
    type Error = TypeConstraintError;

    fn try_from(row: SavedView) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SavedViewId::new(row.id)?,
            hub_id: HubId::new(row.hub_id)?,
            doctype: row.doctype,
            label: row.label,
            owner: row.owner,
            filters: serde_json::from_str(&row.filters).unwrap_or_default(),
            sorts: serde_json::from_str(&row.sorts).unwrap_or_default(),
            columns: serde_json::from_str(&row.columns).unwrap_or_default(),
            fields: serde_json::from_str(&row.fields).unwrap_or_default(),
            page_size: row.page_size.and_then(|size| usize::try_from(size).ok()),
            is_default: row.is_default,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::list_settings)]
pub struct ListSettings {
    pub id: i32,
    pub hub_id: i32,
    pub doctype: String,
    pub settings_name: String,
    pub settings_values: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::list_settings)]
pub struct NewListSettings<'a> {
    pub hub_id: i32,
    pub doctype: &'a str,
    pub settings_name: &'a str,
    pub settings_values: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ListSettings> for DomainListSettings {
    type Error = TypeConstraintError;

    fn try_from(row: ListSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            hub_id: HubId::new(row.hub_id)?,
            doctype: row.doctype,
            settings_name: row.settings_name,
            values: serde_json::from_str(&row.settings_values).unwrap_or_default(),
            updated_at: row.updated_at,
        })
    }
}
