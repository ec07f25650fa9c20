//! Type coercion from untyped JSON payloads into field values.
//!
//! Every write path (single create, bulk create, CSV import, updates merged
//! over stored records) funnels user input through [`coerce_document`] so the
//! same conversion and required-field rules apply everywhere.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::meta::{self, DocField, DocMeta, FieldType};
use crate::domain::types::sanitize_long_text;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised while coercing or validating a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("DocType {0} not found")]
    UnknownDocType(String),

    #[error("Document data must be a JSON object")]
    NotAnObject,

    #[error("Field '{field}' {message}")]
    InvalidField { field: String, message: String },

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A business rule rejected the document.
    #[error("{0}")]
    Rule(String),
}

impl DocumentError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Table(Vec<CoercedDocument>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Int(number) => Value::from(*number),
            FieldValue::Bool(flag) => Value::Bool(*flag),
            FieldValue::Date(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            FieldValue::Datetime(datetime) => {
                Value::String(datetime.format(DATETIME_FORMAT).to_string())
            }
            FieldValue::Table(rows) => {
                Value::Array(rows.iter().map(|row| Value::Object(row.to_json())).collect())
            }
        }
    }
}

/// Typed values keyed by field name. Unset fields are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedDocument {
    values: BTreeMap<String, FieldValue>,
    ignored_fields: Vec<String>,
}

impl CoercedDocument {
    pub fn get(&self, fieldname: &str) -> Option<&FieldValue> {
        self.values.get(fieldname)
    }

    pub fn set(&mut self, fieldname: impl Into<String>, value: FieldValue) {
        self.values.insert(fieldname.into(), value);
    }

    pub fn remove(&mut self, fieldname: &str) -> Option<FieldValue> {
        self.values.remove(fieldname)
    }

    pub fn is_set(&self, fieldname: &str) -> bool {
        match self.values.get(fieldname) {
            Some(FieldValue::Table(rows)) => !rows.is_empty(),
            Some(FieldValue::Text(text)) => !text.is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    pub fn text(&self, fieldname: &str) -> Option<&str> {
        match self.values.get(fieldname) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, fieldname: &str) -> Option<i64> {
        match self.values.get(fieldname) {
            Some(FieldValue::Int(number)) => Some(*number),
            _ => None,
        }
    }

    /// Check fields default to `false` when unset.
    pub fn flag(&self, fieldname: &str) -> bool {
        matches!(self.values.get(fieldname), Some(FieldValue::Bool(true)))
    }

    pub fn date(&self, fieldname: &str) -> Option<NaiveDate> {
        match self.values.get(fieldname) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    pub fn datetime(&self, fieldname: &str) -> Option<NaiveDateTime> {
        match self.values.get(fieldname) {
            Some(FieldValue::Datetime(datetime)) => Some(*datetime),
            Some(FieldValue::Date(date)) => date.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    pub fn table(&self, fieldname: &str) -> &[CoercedDocument] {
        match self.values.get(fieldname) {
            Some(FieldValue::Table(rows)) => rows.as_slice(),
            _ => &[],
        }
    }

    /// Payload keys that matched no field of the DocType.
    pub fn ignored_fields(&self) -> &[String] {
        &self.ignored_fields
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

/// Converts a JSON object into typed values according to `meta`.
///
/// `doctype`, standard, system and read-only keys are skipped; keys matching
/// no field are recorded in [`CoercedDocument::ignored_fields`].
pub fn coerce_document(meta: &DocMeta, payload: &Value) -> Result<CoercedDocument, DocumentError> {
    let object = payload.as_object().ok_or(DocumentError::NotAnObject)?;
    let mut document = CoercedDocument::default();

    for (key, raw) in object {
        if key == "doctype" || meta::is_system_field(key) || meta::standard_field(key).is_some() {
            continue;
        }
        let Some(field) = meta.field(key) else {
            document.ignored_fields.push(key.clone());
            continue;
        };
        if field.fieldtype.is_layout() || field.read_only {
            continue;
        }
        if let Some(value) = coerce_value(field, raw)? {
            document.values.insert(field.fieldname.to_string(), value);
        }
    }

    Ok(document)
}

/// Fills unset fields that declare a default.
pub fn apply_defaults(meta: &DocMeta, document: &mut CoercedDocument) {
    for field in meta.value_fields() {
        if let Some(default) = field.default
            && !document.is_set(field.fieldname)
        {
            document.set(field.fieldname, FieldValue::Text(default.to_string()));
        }
    }
}

/// Reports every required field left unset.
pub fn check_required(meta: &DocMeta, document: &CoercedDocument) -> Result<(), DocumentError> {
    let missing: Vec<String> = meta
        .value_fields()
        .filter(|field| field.reqd && !document.is_set(field.fieldname))
        .map(|field| field.fieldname.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::MissingFields(missing))
    }
}

fn coerce_value(field: &DocField, raw: &Value) -> Result<Option<FieldValue>, DocumentError> {
    if raw.is_null() {
        return Ok(None);
    }

    match field.fieldtype {
        FieldType::Data | FieldType::Link | FieldType::Phone => {
            Ok(coerce_text(field, raw)?.map(FieldValue::Text))
        }
        FieldType::LongText => Ok(coerce_text(field, raw)?
            .map(|text| sanitize_long_text(&text))
            .filter(|text| !text.is_empty())
            .map(FieldValue::Text)),
        FieldType::Select => {
            let Some(text) = coerce_text(field, raw)? else {
                return Ok(None);
            };
            if field.options.contains(&text.as_str()) {
                Ok(Some(FieldValue::Text(text)))
            } else {
                Err(DocumentError::invalid(
                    field.fieldname,
                    format!("must be one of: {}", field.options.join(", ")),
                ))
            }
        }
        FieldType::Int => coerce_int(field, raw),
        FieldType::Check => coerce_check(field, raw),
        FieldType::Date => {
            let Some(text) = coerce_text(field, raw)? else {
                return Ok(None);
            };
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map(|date| Some(FieldValue::Date(date)))
                .map_err(|_| {
                    DocumentError::invalid(field.fieldname, "expects a date in YYYY-MM-DD format")
                })
        }
        FieldType::Datetime => {
            let Some(text) = coerce_text(field, raw)? else {
                return Ok(None);
            };
            parse_datetime(&text)
                .map(|datetime| Some(FieldValue::Datetime(datetime)))
                .ok_or_else(|| {
                    DocumentError::invalid(
                        field.fieldname,
                        "expects a datetime in YYYY-MM-DD HH:MM:SS format",
                    )
                })
        }
        FieldType::Table => coerce_table(field, raw),
        FieldType::SectionBreak => Ok(None),
    }
}

fn coerce_text(field: &DocField, raw: &Value) -> Result<Option<String>, DocumentError> {
    let text = match raw {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number_to_text(number),
        _ => {
            return Err(DocumentError::invalid(field.fieldname, "expects a text value"));
        }
    };
    Ok(Some(text).filter(|text| !text.is_empty()))
}

/// Integral floats (spreadsheet phone numbers) lose their `.0` suffix.
fn number_to_text(number: &serde_json::Number) -> String {
    if let Some(float) = number.as_f64().filter(|_| number.is_f64())
        && float.fract() == 0.0
        && float.abs() < 1e15
    {
        return format!("{}", float as i64);
    }
    number.to_string()
}

fn coerce_int(field: &DocField, raw: &Value) -> Result<Option<FieldValue>, DocumentError> {
    let invalid = || DocumentError::invalid(field.fieldname, "expects an integer");
    match raw {
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Ok(Some(FieldValue::Int(value)));
            }
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 => Ok(Some(FieldValue::Int(float as i64))),
                _ => Err(invalid()),
            }
        }
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(|value| Some(FieldValue::Int(value)))
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn coerce_check(field: &DocField, raw: &Value) -> Result<Option<FieldValue>, DocumentError> {
    let invalid = || DocumentError::invalid(field.fieldname, "expects 0/1 or true/false");
    match raw {
        Value::Bool(flag) => Ok(Some(FieldValue::Bool(*flag))),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Ok(Some(FieldValue::Bool(false))),
            Some(1) => Ok(Some(FieldValue::Bool(true))),
            _ => Err(invalid()),
        },
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" => Ok(Some(FieldValue::Bool(true))),
            "0" | "false" | "no" => Ok(Some(FieldValue::Bool(false))),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

fn coerce_table(field: &DocField, raw: &Value) -> Result<Option<FieldValue>, DocumentError> {
    let child_meta = field
        .target
        .and_then(meta::doctype)
        .ok_or_else(|| DocumentError::UnknownDocType(field.target.unwrap_or_default().into()))?;
    let rows = raw
        .as_array()
        .ok_or_else(|| DocumentError::invalid(field.fieldname, "expects a list of rows"))?;

    let mut coerced = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let prefix = format!("{}[{idx}]", field.fieldname);
        let document = coerce_document(child_meta, row).map_err(|err| match err {
            DocumentError::InvalidField { field, message } => {
                DocumentError::invalid(format!("{prefix}.{field}"), message)
            }
            DocumentError::NotAnObject => DocumentError::invalid(prefix.clone(), "must be an object"),
            other => other,
        })?;
        check_required(child_meta, &document).map_err(|err| match err {
            DocumentError::MissingFields(missing) => DocumentError::invalid(
                prefix.clone(),
                format!("is missing required fields: {}", missing.join(", ")),
            ),
            other => other,
        })?;
        coerced.push(document);
    }

    Ok(Some(FieldValue::Table(coerced)))
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, ISO `T` separated values, RFC 3339 and bare dates.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::meta::{communication_meta, contact_meta};

    #[test]
    fn coerces_scalars_by_fieldtype() {
        let payload = json!({
            "first_name": "  Asha ",
            "mobile_no": 9876543210u64,
            "dob": "1990-04-12",
            "contact_type": "Employee",
            "notes": "<script>x</script>Met at <b>expo</b>",
        });

        let document = coerce_document(contact_meta(), &payload).expect("coerces");

        assert_eq!(document.text("first_name"), Some("Asha"));
        assert_eq!(document.text("mobile_no"), Some("9876543210"));
        assert_eq!(
            document.date("dob"),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert_eq!(document.text("notes"), Some("Met at <b>expo</b>"));
    }

    #[test]
    fn spreadsheet_floats_become_plain_digits() {
        let payload = json!({ "mobile_no": 9876543210.0 });
        let document = coerce_document(contact_meta(), &payload).expect("coerces");
        assert_eq!(document.text("mobile_no"), Some("9876543210"));
    }

    #[test]
    fn rejects_unknown_select_option() {
        let payload = json!({ "contact_type": "Alien" });
        let err = coerce_document(contact_meta(), &payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'contact_type' must be one of: Customer, Vendor, Employee, Partner"
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        let payload = json!({ "dob": "12/04/1990" });
        let err = coerce_document(contact_meta(), &payload).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidField { ref field, .. } if field == "dob"));
    }

    #[test]
    fn empty_values_are_unset_and_unknown_keys_reported() {
        let payload = json!({
            "first_name": "Ravi",
            "city": "   ",
            "favourite_colour": "blue",
            "full_name": "ignored because read only",
            "_user_tags": "x",
            "doctype": "Contact",
        });

        let document = coerce_document(contact_meta(), &payload).expect("coerces");

        assert!(!document.is_set("city"));
        assert!(!document.is_set("full_name"));
        assert_eq!(document.ignored_fields(), ["favourite_colour"]);
    }

    #[test]
    fn child_rows_are_coerced_with_their_own_meta() {
        let payload = json!({
            "email_ids": [
                { "email_id": "a@example.com", "is_primary": 1 },
                { "email_id": "b@example.com", "is_primary": "false" }
            ]
        });

        let document = coerce_document(contact_meta(), &payload).expect("coerces");
        let rows = document.table("email_ids");

        assert_eq!(rows.len(), 2);
        assert!(rows[0].flag("is_primary"));
        assert!(!rows[1].flag("is_primary"));
    }

    #[test]
    fn child_row_errors_carry_their_position() {
        let payload = json!({ "phone_nos": [ { "is_primary_phone": 1 } ] });
        let err = coerce_document(contact_meta(), &payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'phone_nos[0]' is missing required fields: phone"
        );
    }

    #[test]
    fn check_required_lists_all_missing_fields() {
        let mut document =
            coerce_document(communication_meta(), &json!({ "content": "hello" })).expect("ok");
        apply_defaults(communication_meta(), &mut document);

        let err = check_required(communication_meta(), &document).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: subject, reference_name"
        );
        assert_eq!(document.text("sent_or_received"), Some("Sent"));
    }

    #[test]
    fn parses_common_datetime_layouts() {
        assert!(parse_datetime("2024-01-15 10:30:00").is_some());
        assert!(parse_datetime("2024-01-15T10:30:00.123").is_some());
        assert!(parse_datetime("2024-01-15T10:30:00+05:30").is_some());
        assert!(parse_datetime("2024-01-15").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
