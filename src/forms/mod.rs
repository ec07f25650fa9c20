//! Request payloads accepted by the API routes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

pub mod assistant;
pub mod bulk;
pub mod documents;
pub mod list;
pub mod views;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid view id")]
    InvalidViewId,

    #[error("invalid view name")]
    InvalidName,

    #[error("filters must be an object or a list of [field, operator, value] entries")]
    InvalidFilters,

    #[error("fields must be a list of field names")]
    InvalidFieldList,

    #[error("invalid sort: {0}")]
    InvalidSort(String),

    #[error("columns must be a list")]
    InvalidColumns,

    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),

    #[error("file content is not valid base64")]
    InvalidBase64,

    #[error("unsupported file type {0}, only csv is accepted")]
    UnsupportedFileType(String),

    #[error("invalid CSV: {0}")]
    InvalidCsv(#[from] csv::Error),

    #[error("file is not valid UTF-8")]
    InvalidEncoding,

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts a JSON value or a string holding JSON, as sent in query strings.
pub(crate) fn lenient_json<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if text.trim().is_empty() => Value::Null,
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    })
}

/// `["a", "b"]` or `"a, b"`; `null` means "not given".
pub(crate) fn parse_field_list(value: Value) -> Result<Option<Vec<String>>, FormError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(
            text.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.trim().to_string()),
                _ => Err(FormError::InvalidFieldList),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(FormError::InvalidFieldList),
    }
}

/// Filters arrive as an object or as a list of triples.
pub(crate) fn check_filters(value: Value) -> Result<Value, FormError> {
    match value {
        Value::Null | Value::Object(_) | Value::Array(_) => Ok(value),
        _ => Err(FormError::InvalidFilters),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_json")]
        filters: Value,
    }

    #[test]
    fn query_string_json_is_decoded() {
        let probe = actix_web::web::Query::<Probe>::from_query(
            "filters=%7B%22city%22%3A%22Pune%22%7D",
        )
        .expect("decode")
        .into_inner();
        assert_eq!(probe.filters, json!({"city": "Pune"}));

        let probe: Probe = serde_json::from_value(json!({"filters": {"city": "Pune"}}))
            .expect("decode");
        assert_eq!(probe.filters, json!({"city": "Pune"}));

        let probe: Probe = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(probe.filters, Value::Null);
    }

    #[test]
    fn field_lists_accept_arrays_and_csv() {
        assert_eq!(
            parse_field_list(json!(["name", " city "])).expect("list"),
            Some(vec!["name".to_string(), "city".to_string()])
        );
        assert_eq!(
            parse_field_list(json!("name, city,")).expect("list"),
            Some(vec!["name".to_string(), "city".to_string()])
        );
        assert!(parse_field_list(json!([1])).is_err());
        assert!(check_filters(json!(5)).is_err());
    }
}
