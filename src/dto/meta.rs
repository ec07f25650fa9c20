//! Field registry projections for list builders and forms.

use serde::Serialize;

use crate::domain::meta::{DocField, FieldType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    pub fieldname: &'static str,
    pub label: &'static str,
    pub fieldtype: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    pub reqd: bool,
    pub read_only: bool,
    pub in_list_view: bool,
    pub in_standard_filter: bool,
    pub in_global_search: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Contact type the field applies to, or `all`.
    pub applicable_to: &'static str,
}

impl From<&DocField> for FieldInfo {
    fn from(field: &DocField) -> Self {
        let options = match field.fieldtype {
            FieldType::Select => Some(field.options.join("\n")),
            FieldType::Link | FieldType::Table => field.target.map(str::to_string),
            _ => None,
        };
        Self {
            fieldname: field.fieldname,
            label: field.label,
            fieldtype: field.fieldtype.as_str(),
            options,
            reqd: field.reqd,
            read_only: field.read_only,
            in_list_view: field.in_list_view,
            in_standard_filter: field.in_standard_filter,
            in_global_search: field.in_global_search,
            depends_on: field.depends_on,
            default: field.default,
            applicable_to: field.applicable_to().unwrap_or("all"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListFields {
    pub doctype: &'static str,
    pub fields: Vec<FieldInfo>,
    pub title_field: &'static str,
    pub total_fields: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub label: &'static str,
    #[serde(rename = "type")]
    pub fieldtype: &'static str,
    pub key: &'static str,
    pub width: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DefaultListData {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<&'static str>,
}
