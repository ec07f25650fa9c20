//! Bulk create, update, delete, import and export payloads.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::forms::{FormError, check_filters, lenient_json, parse_field_list};

const CSV_FILE_TYPE: &str = "csv";

/// Decodes base64 content, tolerating a `data:...;base64,` prefix.
pub(crate) fn decode_base64(content: &str) -> Result<Vec<u8>, FormError> {
    let content = content.trim();
    let content = match content.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => content,
    };
    STANDARD
        .decode(content)
        .map_err(|_| FormError::InvalidBase64)
}

/// Reads a CSV with a header row into one object per record. Cells are kept
/// as strings and empty cells are dropped.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Map<String, Value>>, FormError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|_| FormError::InvalidEncoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, cell)| !header.is_empty() && !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn ensure_csv(file_type: &str) -> Result<(), FormError> {
    if file_type.trim().eq_ignore_ascii_case(CSV_FILE_TYPE) {
        Ok(())
    } else {
        Err(FormError::UnsupportedFileType(file_type.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateForm {
    #[serde(alias = "contacts_data", deserialize_with = "lenient_json")]
    pub contacts: Value,
}

impl BulkCreateForm {
    pub fn into_rows(self) -> Result<Vec<Value>, FormError> {
        match self.contacts {
            Value::Array(rows) => Ok(rows),
            _ => Err(FormError::NotAnObject("contacts")),
        }
    }
}

fn default_file_type() -> String {
    CSV_FILE_TYPE.to_string()
}

/// Base64 encoded CSV sent in a JSON body.
#[derive(Debug, Deserialize, Validate)]
pub struct CsvImportForm {
    #[validate(length(min = 1))]
    pub file_content: String,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    #[serde(default)]
    pub validate_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvImportPayload {
    pub rows: Vec<Map<String, Value>>,
    pub validate_only: bool,
}

impl TryFrom<CsvImportForm> for CsvImportPayload {
    type Error = FormError;

    fn try_from(form: CsvImportForm) -> Result<Self, Self::Error> {
        form.validate()?;
        ensure_csv(&form.file_type)?;
        let bytes = decode_base64(&form.file_content)?;

        Ok(Self {
            rows: parse_csv(&bytes)?,
            validate_only: form.validate_only,
        })
    }
}

/// Multipart CSV upload.
#[derive(MultipartForm)]
pub struct UploadContactsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
    pub validate_only: Option<Text<bool>>,
}

impl UploadContactsForm {
    pub fn parse(&self) -> Result<CsvImportPayload, FormError> {
        let bytes = std::fs::read(self.csv.file.path())?;
        Ok(CsvImportPayload {
            rows: parse_csv(&bytes)?,
            validate_only: self
                .validate_only
                .as_ref()
                .is_some_and(|flag| flag.0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateForm {
    #[serde(alias = "updates_data", deserialize_with = "lenient_json")]
    pub updates: Value,
}

/// One requested update: the target and the fields to change.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactUpdate {
    pub name: Value,
    pub patch: Value,
}

impl BulkUpdateForm {
    /// Entries carry the target as `contact_name` or `name`; every other key
    /// is part of the patch.
    pub fn into_updates(self) -> Result<Vec<ContactUpdate>, FormError> {
        let Value::Array(entries) = self.updates else {
            return Err(FormError::NotAnObject("updates"));
        };
        entries
            .into_iter()
            .map(|entry| {
                let Value::Object(mut patch) = entry else {
                    return Err(FormError::NotAnObject("update"));
                };
                let name = patch
                    .remove("contact_name")
                    .or_else(|| patch.remove("name"))
                    .unwrap_or(Value::Null);
                Ok(ContactUpdate {
                    name,
                    patch: Value::Object(patch),
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteForm {
    #[serde(alias = "names", deserialize_with = "lenient_json")]
    pub contact_names: Value,
    #[serde(default)]
    pub force_delete: bool,
}

impl BulkDeleteForm {
    pub fn names(&self) -> Result<Vec<Value>, FormError> {
        match &self.contact_names {
            Value::Array(names) => Ok(names.clone()),
            _ => Err(FormError::NotAnObject("contact_names")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportForm {
    #[serde(default, deserialize_with = "lenient_json")]
    pub filters: Value,
    #[serde(default, deserialize_with = "lenient_json")]
    pub fields: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub filters: Value,
    pub fields: Option<Vec<String>>,
}

impl TryFrom<ExportForm> for ExportPayload {
    type Error = FormError;

    fn try_from(form: ExportForm) -> Result<Self, Self::Error> {
        Ok(Self {
            filters: check_filters(form.filters)?,
            fields: parse_field_list(form.fields)?,
        })
    }
}
