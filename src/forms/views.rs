//! Saved view, contact view and list settings payloads.

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::list::{MAX_PAGE_SIZE, SortDirection, SortSpec};
use crate::domain::saved_view::{DEFAULT_SETTINGS_NAME, NewSavedView};
use crate::domain::types::{HubId, SavedViewId, ViewLabel};
use crate::forms::{FormError, lenient_json, parse_field_list, trimmed};

/// Key some clients use to carry the settings name inside the values.
const SETTINGS_NAME_KEY: &str = "doctype_name";

/// `[{"field": .., "direction": ..}]`, `["city desc"]` or `"city desc, name"`.
pub(crate) fn parse_sorts(value: Value) -> Result<Vec<SortSpec>, FormError> {
    let parse_text = |text: &str| -> Result<SortSpec, FormError> {
        let mut parts = text.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| FormError::InvalidSort(text.to_string()))?;
        let direction = match parts.next() {
            Some(direction) => direction
                .parse::<SortDirection>()
                .map_err(|err| FormError::InvalidSort(err.to_string()))?,
            None => SortDirection::Asc,
        };
        if parts.next().is_some() {
            return Err(FormError::InvalidSort(text.to_string()));
        }
        Ok(SortSpec {
            field: field.to_string(),
            direction,
        })
    };

    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_text)
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => parse_text(text.trim()),
                Value::Object(_) => serde_json::from_value::<SortSpec>(item)
                    .map_err(|err| FormError::InvalidSort(err.to_string())),
                other => Err(FormError::InvalidSort(other.to_string())),
            })
            .collect(),
        other => Err(FormError::InvalidSort(other.to_string())),
    }
}

fn filters_object(value: Value) -> Result<Map<String, Value>, FormError> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        _ => Err(FormError::InvalidFilters),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveViewForm {
    #[serde(alias = "label")]
    #[validate(length(min = 1, max = 140))]
    pub view_name: String,
    #[serde(default, deserialize_with = "lenient_json")]
    pub filters: Value,
    #[serde(default, deserialize_with = "lenient_json")]
    pub sorts: Value,
    #[serde(default, deserialize_with = "lenient_json")]
    pub columns: Value,
    #[serde(default, alias = "rows", deserialize_with = "lenient_json")]
    pub fields: Value,
    #[validate(range(min = 1, max = 500))]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_public: bool,
    pub view_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveViewPayload {
    pub view_id: Option<SavedViewId>,
    pub label: ViewLabel,
    pub filters: Map<String, Value>,
    pub sorts: Vec<SortSpec>,
    pub columns: Vec<Value>,
    pub fields: Vec<String>,
    pub page_size: Option<usize>,
    pub is_default: bool,
    pub is_public: bool,
}

impl TryFrom<SaveViewForm> for SaveViewPayload {
    type Error = FormError;

    fn try_from(form: SaveViewForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let label = ViewLabel::new(form.view_name).map_err(|_| FormError::InvalidName)?;
        let view_id = form
            .view_id
            .map(SavedViewId::new)
            .transpose()
            .map_err(|_| FormError::InvalidViewId)?;
        let columns = match form.columns {
            Value::Null => Vec::new(),
            Value::Array(columns) => columns,
            _ => return Err(FormError::InvalidColumns),
        };

        Ok(Self {
            view_id,
            label,
            filters: filters_object(form.filters)?,
            sorts: parse_sorts(form.sorts)?,
            columns,
            fields: parse_field_list(form.fields)?.unwrap_or_default(),
            page_size: form.page_size,
            is_default: form.is_default,
            is_public: form.is_public,
        })
    }
}

impl SaveViewPayload {
    pub fn into_domain(self, hub_id: HubId, doctype: &str, owner: &str) -> NewSavedView {
        NewSavedView {
            hub_id,
            doctype: doctype.to_string(),
            label: self.label,
            owner: owner.to_string(),
            filters: self.filters,
            sorts: self.sorts,
            columns: self.columns,
            fields: self.fields,
            page_size: self.page_size,
            is_default: self.is_default,
            is_public: self.is_public,
        }
    }
}

/// Contact list shaped by a saved view and ad hoc overrides.
#[derive(Debug, Default, Deserialize)]
pub struct ContactsViewForm {
    pub view_id: Option<i32>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    #[serde(default, alias = "filters", deserialize_with = "lenient_json")]
    pub override_filters: Value,
    #[serde(default, alias = "sorts", deserialize_with = "lenient_json")]
    pub override_sorts: Value,
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactsViewPayload {
    pub view_id: Option<SavedViewId>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub override_filters: Value,
    /// `None` keeps the sorts of the view.
    pub override_sorts: Option<Vec<SortSpec>>,
    pub search_text: Option<String>,
}

impl TryFrom<ContactsViewForm> for ContactsViewPayload {
    type Error = FormError;

    fn try_from(form: ContactsViewForm) -> Result<Self, Self::Error> {
        let view_id = form
            .view_id
            .map(SavedViewId::new)
            .transpose()
            .map_err(|_| FormError::InvalidViewId)?;
        let override_sorts = parse_sorts(form.override_sorts)?;

        Ok(Self {
            view_id,
            page: form.page.unwrap_or(1).max(1),
            page_size: form.page_size.map(|size| size.clamp(1, MAX_PAGE_SIZE)),
            override_filters: Value::Object(filters_object(form.override_filters)?),
            override_sorts: (!override_sorts.is_empty()).then_some(override_sorts),
            search_text: trimmed(form.search_text),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSettingsForm {
    pub settings_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_json")]
    pub values: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSettingsPayload {
    pub settings_name: String,
    pub values: Map<String, Value>,
}

impl TryFrom<ListSettingsForm> for ListSettingsPayload {
    type Error = FormError;

    fn try_from(form: ListSettingsForm) -> Result<Self, Self::Error> {
        let mut values = match form.values {
            Value::Null => Map::new(),
            Value::Object(values) => values,
            _ => return Err(FormError::NotAnObject("values")),
        };

        let embedded = match values.remove(SETTINGS_NAME_KEY) {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let settings_name = trimmed(form.settings_name)
            .or_else(|| trimmed(embedded))
            .unwrap_or_else(|| DEFAULT_SETTINGS_NAME.to_string());

        Ok(Self {
            settings_name,
            values,
        })
    }
}
