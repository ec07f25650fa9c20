//! Parsing of list requests (fields, filters, ordering) against the registry.
//!
//! Everything that later becomes SQL is resolved here to a [`DocField`] from
//! the static registry, so column names never come from user input. Values
//! stay typed in [`FilterValue`] and are bound as parameters by the
//! repository.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::meta::{self, DocField, DocMeta};

pub const DEFAULT_ORDER_BY: &str = "modified desc";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 500;

static ORDER_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-zA-Z0-9_`]+(\s+(asc|desc))?$").expect("valid order_by regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListQueryError {
    #[error("Invalid fields requested: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("Invalid order_by format: {0}")]
    InvalidOrderBy(String),

    #[error("Cannot sort by unknown field: {0}")]
    UnknownOrderField(String),

    #[error("Cannot filter by unknown field: {0}")]
    UnknownFilterField(String),

    #[error("Invalid filter for '{field}': {message}")]
    InvalidFilter { field: String, message: String },

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),
}

impl ListQueryError {
    fn filter(field: &str, message: impl Into<String>) -> Self {
        ListQueryError::InvalidFilter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ListQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ListQueryError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = ListQueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortDirection> for String {
    fn from(value: SortDirection) -> Self {
        value.as_str().to_string()
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort entry as stored in saved views: `{"field": .., "direction": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Joins sort specs into an `order_by` string.
pub fn sorts_to_order_by(sorts: &[SortSpec]) -> Option<String> {
    if sorts.is_empty() {
        return None;
    }
    Some(
        sorts
            .iter()
            .map(|sort| format!("{} {}", sort.field, sort.direction))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Resolved sort column.
#[derive(Debug, Clone, Copy)]
pub struct OrderClause {
    pub field: &'static DocField,
    pub direction: SortDirection,
}

/// Parses a comma separated `order_by` such as `modified desc, full_name`.
pub fn parse_order_by(
    meta: &'static DocMeta,
    order_by: &str,
) -> Result<Vec<OrderClause>, ListQueryError> {
    let order_by = if order_by.trim().is_empty() {
        DEFAULT_ORDER_BY
    } else {
        order_by
    };

    order_by
        .split(',')
        .map(|part| {
            let part = part.replace('\u{a0}', " ");
            let part = part.trim();
            if !ORDER_PART.is_match(part) {
                return Err(ListQueryError::InvalidOrderBy(part.to_string()));
            }
            let mut tokens = part.split_whitespace();
            let fieldname = tokens.next().unwrap_or_default().replace('`', "");
            let direction = match tokens.next() {
                Some(direction) => direction.parse()?,
                None => SortDirection::Asc,
            };
            let field = meta
                .resolve(&fieldname)
                .filter(|field| !field.fieldtype.is_table() && !field.fieldtype.is_layout())
                .ok_or(ListQueryError::UnknownOrderField(fieldname))?;
            Ok(OrderClause { field, direction })
        })
        .collect()
}

/// Validates requested fields. Table and system fields are dropped silently,
/// unknown ones are rejected together. Sort fields are appended.
pub fn resolve_fields(
    meta: &'static DocMeta,
    requested: Option<&[String]>,
    order: &[OrderClause],
) -> Result<Vec<&'static DocField>, ListQueryError> {
    let requested = requested.filter(|fields| !fields.is_empty());

    let Some(requested) = requested else {
        return Ok(meta
            .default_list_fields()
            .iter()
            .filter_map(|name| meta.resolve(name))
            .collect());
    };

    let mut fields: Vec<&'static DocField> = Vec::new();
    let mut invalid = Vec::new();
    for name in requested {
        let name = name.trim();
        if meta::is_system_field(name) {
            continue;
        }
        match meta.resolve(name) {
            None => invalid.push(name.to_string()),
            Some(field) if field.fieldtype.is_table() || field.fieldtype.is_layout() => {}
            Some(field) => push_unique(&mut fields, field),
        }
    }

    if !invalid.is_empty() {
        return Err(ListQueryError::InvalidFields(invalid));
    }

    if fields.is_empty() {
        for name in ["name", meta.title_field] {
            if let Some(field) = meta.resolve(name) {
                push_unique(&mut fields, field);
            }
        }
    }

    for clause in order {
        push_unique(&mut fields, clause.field);
    }

    Ok(fields)
}

fn push_unique(fields: &mut Vec<&'static DocField>, field: &'static DocField) {
    if !fields.iter().any(|f| f.fieldname == field.fieldname) {
        fields.push(field);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    IsSet,
    IsNotSet,
    Between,
}

/// Operators recognised in `[op, value]` filter values.
const OPERATOR_NAMES: &[&str] = &[
    "=", "!=", "<", "<=", ">", ">=", "like", "not like", "in", "not in", "is", "between",
];

fn is_operator(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|op| OPERATOR_NAMES.contains(&op.trim().to_lowercase().as_str()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone)]
pub struct FilterCondition {
    pub field: &'static DocField,
    pub operator: FilterOperator,
    pub values: Vec<FilterValue>,
}

impl FilterCondition {
    /// Shorthand for `field = value` on a registry field.
    pub fn equals(field: &'static DocField, value: FilterValue) -> Self {
        Self {
            field,
            operator: FilterOperator::Eq,
            values: vec![value],
        }
    }
}

/// Parses filters given either as an object (`{"city": "Pune"}`,
/// `{"age": [">", 30]}`) or as a list of `[field, op, value]` entries.
pub fn parse_filters(
    meta: &'static DocMeta,
    filters: &Value,
) -> Result<Vec<FilterCondition>, ListQueryError> {
    match filters {
        Value::Null => Ok(Vec::new()),
        Value::Object(entries) => entries
            .iter()
            .map(|(field, value)| parse_entry(meta, field, value))
            .collect(),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                let parts = entry.as_array().ok_or_else(|| {
                    ListQueryError::filter("filters", "expected [field, operator, value]")
                })?;
                let parts = match parts.len() {
                    3 => parts.as_slice(),
                    4 => &parts[1..],
                    _ => {
                        return Err(ListQueryError::filter(
                            "filters",
                            "expected [field, operator, value]",
                        ));
                    }
                };
                let field = parts[0]
                    .as_str()
                    .ok_or_else(|| ListQueryError::filter("filters", "field must be a string"))?;
                let operator = parts[1]
                    .as_str()
                    .ok_or_else(|| ListQueryError::filter(field, "operator must be a string"))?;
                let field = resolve_filter_field(meta, field)?;
                build_condition(field, operator, &parts[2])
            })
            .collect(),
        _ => Err(ListQueryError::filter(
            "filters",
            "expected an object or a list",
        )),
    }
}

fn resolve_filter_field(
    meta: &'static DocMeta,
    fieldname: &str,
) -> Result<&'static DocField, ListQueryError> {
    meta.resolve(fieldname.trim())
        .filter(|field| !field.fieldtype.is_table() && !field.fieldtype.is_layout())
        .ok_or_else(|| ListQueryError::UnknownFilterField(fieldname.to_string()))
}

fn parse_entry(
    meta: &'static DocMeta,
    fieldname: &str,
    value: &Value,
) -> Result<FilterCondition, ListQueryError> {
    let field = resolve_filter_field(meta, fieldname)?;
    match value {
        Value::Null => Ok(FilterCondition {
            field,
            operator: FilterOperator::IsNotSet,
            values: Vec::new(),
        }),
        Value::Array(items) if items.len() == 2 && is_operator(&items[0]) => {
            let operator = items[0].as_str().unwrap_or_default();
            build_condition(field, operator, &items[1])
        }
        Value::Array(items) => Ok(FilterCondition {
            field,
            operator: FilterOperator::In,
            values: items
                .iter()
                .map(|item| filter_value(field, item))
                .collect::<Result<_, _>>()?,
        }),
        scalar => Ok(FilterCondition::equals(field, filter_value(field, scalar)?)),
    }
}

fn build_condition(
    field: &'static DocField,
    operator: &str,
    value: &Value,
) -> Result<FilterCondition, ListQueryError> {
    let name = field.fieldname;
    let single = |operator| -> Result<FilterCondition, ListQueryError> {
        Ok(FilterCondition {
            field,
            operator,
            values: vec![filter_value(field, value)?],
        })
    };

    match operator.trim().to_lowercase().as_str() {
        "=" => single(FilterOperator::Eq),
        "!=" => single(FilterOperator::NotEq),
        "<" => single(FilterOperator::Lt),
        "<=" => single(FilterOperator::Le),
        ">" => single(FilterOperator::Gt),
        ">=" => single(FilterOperator::Ge),
        op @ ("like" | "not like") => {
            let pattern = scalar_text(value)
                .ok_or_else(|| ListQueryError::filter(name, "like expects a text pattern"))?;
            let pattern = if pattern.contains('%') {
                pattern
            } else {
                format!("%{pattern}%")
            };
            Ok(FilterCondition {
                field,
                operator: if op == "like" {
                    FilterOperator::Like
                } else {
                    FilterOperator::NotLike
                },
                values: vec![FilterValue::Text(pattern)],
            })
        }
        op @ ("in" | "not in") => {
            let values = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| filter_value(field, item))
                    .collect::<Result<Vec<_>, _>>()?,
                Value::String(text) => text
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| filter_value(field, &Value::String(item.to_string())))
                    .collect::<Result<Vec<_>, _>>()?,
                Value::Null => Vec::new(),
                scalar => vec![filter_value(field, scalar)?],
            };
            Ok(FilterCondition {
                field,
                operator: if op == "in" {
                    FilterOperator::In
                } else {
                    FilterOperator::NotIn
                },
                values,
            })
        }
        "is" => {
            let operator = match value.as_str().map(|v| v.trim().to_lowercase()).as_deref() {
                Some("set") => FilterOperator::IsSet,
                Some("not set") => FilterOperator::IsNotSet,
                _ => {
                    return Err(ListQueryError::filter(name, "is expects 'set' or 'not set'"));
                }
            };
            Ok(FilterCondition {
                field,
                operator,
                values: Vec::new(),
            })
        }
        "between" => {
            let bounds = value
                .as_array()
                .filter(|items| items.len() == 2)
                .ok_or_else(|| ListQueryError::filter(name, "between expects two values"))?;
            Ok(FilterCondition {
                field,
                operator: FilterOperator::Between,
                values: vec![
                    filter_value(field, &bounds[0])?,
                    filter_value(field, &bounds[1])?,
                ],
            })
        }
        other => Err(ListQueryError::filter(
            name,
            format!("unsupported operator {other}"),
        )),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

fn filter_value(field: &DocField, value: &Value) -> Result<FilterValue, ListQueryError> {
    let name = field.fieldname;
    if field.is_integer() {
        return match value {
            Value::Number(number) => number
                .as_i64()
                .map(FilterValue::Int)
                .or_else(|| number.as_f64().map(FilterValue::Float))
                .ok_or_else(|| ListQueryError::filter(name, "expects a number")),
            Value::Bool(flag) => Ok(FilterValue::Int(i64::from(*flag))),
            Value::String(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .map(FilterValue::Int)
                    .or_else(|_| text.parse::<f64>().map(FilterValue::Float))
                    .map_err(|_| ListQueryError::filter(name, "expects a number"))
            }
            _ => Err(ListQueryError::filter(name, "expects a number")),
        };
    }

    scalar_text(value)
        .map(FilterValue::Text)
        .ok_or_else(|| ListQueryError::filter(name, "expects a scalar value"))
}

/// Merges two filter sets; `overrides` wins on every field it names.
///
/// Two objects merge key by key. Once either side uses the list form the
/// result is a list of `[field, operator, value]` entries in which the base
/// keeps only the fields `overrides` leaves untouched.
pub fn merge_filters(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            let mut merged = base.clone();
            for (key, value) in overrides {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        (Value::Null, _) => overrides.clone(),
        (_, Value::Object(map)) if map.is_empty() => base.clone(),
        (_, Value::Object(_) | Value::Array(_)) => {
            let overrides = filter_entries(overrides);
            let overridden: HashSet<&str> = overrides.iter().filter_map(entry_field).collect();
            let mut merged: Vec<Value> = filter_entries(base)
                .into_iter()
                .filter(|entry| entry_field(entry).is_none_or(|field| !overridden.contains(field)))
                .collect();
            merged.extend(overrides.iter().cloned());
            Value::Array(merged)
        }
        _ => overrides.clone(),
    }
}

/// Filters in list form; object entries become `[field, operator, value]`.
fn filter_entries(filters: &Value) -> Vec<Value> {
    match filters {
        Value::Object(entries) => entries
            .iter()
            .map(|(field, value)| match value {
                Value::Null => Value::from(vec![
                    Value::from(field.as_str()),
                    Value::from("is"),
                    Value::from("not set"),
                ]),
                Value::Array(items) if items.len() == 2 && is_operator(&items[0]) => {
                    Value::from(vec![Value::from(field.as_str()), items[0].clone(), items[1].clone()])
                }
                Value::Array(_) => {
                    Value::from(vec![Value::from(field.as_str()), Value::from("in"), value.clone()])
                }
                _ => Value::from(vec![Value::from(field.as_str()), Value::from("="), value.clone()]),
            })
            .collect(),
        Value::Array(entries) => entries.clone(),
        _ => Vec::new(),
    }
}

fn entry_field(entry: &Value) -> Option<&str> {
    let parts = entry.as_array()?;
    let index = usize::from(parts.len() == 4);
    parts.get(index)?.as_str().map(str::trim)
}

/// True when `order_by` asks for nothing beyond the default ordering.
pub fn is_default_order(order_by: &str) -> bool {
    let normalized = order_by
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    normalized.is_empty() || normalized == DEFAULT_ORDER_BY
}

/// Keeps only `fields` of a serialized record, in order.
pub fn project(record: &Map<String, Value>, fields: &[&'static DocField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            (
                field.fieldname.to_string(),
                record.get(field.fieldname).cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}

/// Clamps page numbers to `1..` and page sizes to `1..=MAX_PAGE_SIZE`.
pub fn normalize_paging(page: Option<usize>, page_size: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::meta::contact_meta;

    fn names(fields: &[&DocField]) -> Vec<&'static str> {
        fields.iter().map(|field| field.fieldname).collect()
    }

    #[test]
    fn order_by_defaults_to_modified_desc() {
        let clauses = parse_order_by(contact_meta(), "").expect("default order");
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].field.column_name(), "updated_at");
        assert_eq!(clauses[0].direction, SortDirection::Desc);
    }

    #[test]
    fn order_by_accepts_backticks_and_nbsp() {
        let clauses =
            parse_order_by(contact_meta(), "`full_name`\u{a0}ASC, city").expect("valid order");
        assert_eq!(clauses[0].field.fieldname, "full_name");
        assert_eq!(clauses[0].direction, SortDirection::Asc);
        assert_eq!(clauses[1].field.fieldname, "city");
    }

    #[test]
    fn order_by_rejects_injection() {
        let err = parse_order_by(contact_meta(), "city; DROP TABLE contacts").unwrap_err();
        assert_eq!(
            err,
            ListQueryError::InvalidOrderBy("city; DROP TABLE contacts".to_string())
        );

        let err = parse_order_by(contact_meta(), "nickname desc").unwrap_err();
        assert_eq!(err, ListQueryError::UnknownOrderField("nickname".into()));
    }

    #[test]
    fn fields_drop_tables_and_system_and_add_sort_field() {
        let order = parse_order_by(contact_meta(), "city asc").expect("order");
        let requested = vec![
            "full_name".to_string(),
            "email_ids".to_string(),
            "_liked_by".to_string(),
            "full_name".to_string(),
        ];
        let fields = resolve_fields(contact_meta(), Some(&requested), &order).expect("fields");
        assert_eq!(names(&fields), vec!["full_name", "city"]);
    }

    #[test]
    fn unknown_fields_are_reported_together() {
        let requested = vec!["nickname".to_string(), "city".to_string(), "age".to_string()];
        let err = resolve_fields(contact_meta(), Some(&requested), &[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid fields requested: nickname, age");
    }

    #[test]
    fn only_skipped_fields_fall_back_to_name_and_title() {
        let requested = vec!["phone_nos".to_string()];
        let fields = resolve_fields(contact_meta(), Some(&requested), &[]).expect("fields");
        assert_eq!(names(&fields), vec!["name", "full_name"]);
    }

    #[test]
    fn filter_shapes() {
        let filters = json!({
            "city": "Pune",
            "contact_type": ["Vendor", "Customer"],
            "gstin": null,
            "full_name": ["like", "asha"],
            "dob": ["between", ["1990-01-01", "1999-12-31"]],
            "email_id": ["is", "set"],
        });
        let conditions = parse_filters(contact_meta(), &filters).expect("filters");
        let find = |name: &str| {
            conditions
                .iter()
                .find(|c| c.field.fieldname == name)
                .expect("condition present")
        };

        assert_eq!(find("city").operator, FilterOperator::Eq);
        assert_eq!(find("contact_type").operator, FilterOperator::In);
        assert_eq!(find("contact_type").values.len(), 2);
        assert_eq!(find("gstin").operator, FilterOperator::IsNotSet);
        assert_eq!(
            find("full_name").values,
            vec![FilterValue::Text("%asha%".into())]
        );
        assert_eq!(find("dob").operator, FilterOperator::Between);
        assert_eq!(find("email_id").operator, FilterOperator::IsSet);
    }

    #[test]
    fn triple_filters_and_integer_links() {
        let filters = json!([["manager", "=", "12"], ["Contact", "name", "in", "3, 4"]]);
        let conditions = parse_filters(contact_meta(), &filters).expect("filters");
        assert_eq!(conditions[0].field.column_name(), "manager_id");
        assert_eq!(conditions[0].values, vec![FilterValue::Int(12)]);
        assert_eq!(
            conditions[1].values,
            vec![FilterValue::Int(3), FilterValue::Int(4)]
        );
    }

    #[test]
    fn filters_reject_unknown_and_table_fields() {
        let err = parse_filters(contact_meta(), &json!({"nickname": "x"})).unwrap_err();
        assert_eq!(err, ListQueryError::UnknownFilterField("nickname".into()));

        assert!(parse_filters(contact_meta(), &json!({"email_ids": "x"})).is_err());
        assert!(parse_filters(contact_meta(), &json!({"manager": "boss"})).is_err());
    }

    #[test]
    fn list_overrides_keep_view_filters_on_other_fields() {
        let merged = merge_filters(
            &json!({"city": "Pune", "status": "Passive", "gstin": null}),
            &json!([["status", "=", "Active"], ["Contact", "first_name", "like", "A%"]]),
        );
        assert_eq!(
            merged,
            json!([
                ["city", "=", "Pune"],
                ["gstin", "is", "not set"],
                ["status", "=", "Active"],
                ["Contact", "first_name", "like", "A%"]
            ])
        );

        let conditions = parse_filters(contact_meta(), &merged).expect("merged filters parse");
        assert_eq!(conditions.len(), 4);
    }

    #[test]
    fn object_overrides_replace_list_view_entries() {
        let merged = merge_filters(
            &json!([["city", "in", ["Pune", "Delhi"]]]),
            &json!({"city": "Mumbai", "contact_type": ["!=", "Vendor"]}),
        );
        assert_eq!(
            merged,
            json!([["city", "=", "Mumbai"], ["contact_type", "!=", "Vendor"]])
        );
    }

    #[test]
    fn default_order_is_recognised_loosely() {
        assert!(is_default_order("modified desc"));
        assert!(is_default_order("  Modified   DESC "));
        assert!(is_default_order(""));
        assert!(!is_default_order("modified asc"));
        assert!(!is_default_order("full_name asc, modified desc"));
    }

    #[test]
    fn merge_prefers_overrides() {
        let merged = merge_filters(
            &json!({"city": "Pune", "contact_type": "Vendor"}),
            &json!({"city": "Mumbai"}),
        );
        assert_eq!(merged, json!({"city": "Mumbai", "contact_type": "Vendor"}));
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        let sort: SortSpec =
            serde_json::from_value(json!({"field": "city", "direction": "DESC"})).expect("sort");
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(
            sorts_to_order_by(&[sort]).as_deref(),
            Some("city desc")
        );
        assert!(serde_json::from_value::<SortSpec>(json!({"field": "city", "direction": "up"})).is_err());
    }

    #[test]
    fn paging_is_clamped() {
        assert_eq!(normalize_paging(None, None), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(normalize_paging(Some(0), Some(10_000)), (1, MAX_PAGE_SIZE));
    }
}
