//! Query parameters of the generic list endpoint.

use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::types::SavedViewId;
use crate::forms::{FormError, check_filters, lenient_json, parse_field_list, trimmed};

/// Saved view reference: numeric id or the view label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRef {
    Id(SavedViewId),
    Label(String),
}

impl ViewRef {
    pub fn parse(raw: &str) -> Result<Option<Self>, FormError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<i32>() {
            Ok(id) => SavedViewId::new(id)
                .map(|id| Some(ViewRef::Id(id)))
                .map_err(|_| FormError::InvalidViewId),
            Err(_) => Ok(Some(ViewRef::Label(raw.to_string()))),
        }
    }
}

impl Display for ViewRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewRef::Id(id) => write!(f, "{id}"),
            ViewRef::Label(label) => f.write_str(label),
        }
    }
}

/// Accepts both query strings and JSON bodies; structured values may be
/// sent as JSON encoded strings.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListForm {
    #[serde(default, deserialize_with = "lenient_json")]
    pub filters: Value,
    #[serde(default, deserialize_with = "lenient_json")]
    pub fields: Value,
    pub order_by: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub view: Option<String>,
    #[validate(length(max = 140))]
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPayload {
    pub filters: Value,
    pub fields: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub view: Option<ViewRef>,
    pub search_text: Option<String>,
}

impl TryFrom<ListForm> for ListPayload {
    type Error = FormError;

    fn try_from(form: ListForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let view = match form.view.as_deref() {
            Some(raw) => ViewRef::parse(raw)?,
            None => None,
        };

        Ok(Self {
            filters: check_filters(form.filters)?,
            fields: parse_field_list(form.fields)?,
            order_by: trimmed(form.order_by),
            page: form.page,
            page_size: form.page_size,
            view,
            search_text: trimmed(form.search_text),
        })
    }
}
