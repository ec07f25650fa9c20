//! Bulk import, export and generic document payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::types::ContactId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedContact {
    pub index: usize,
    pub name: ContactId,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedContact {
    pub index: usize,
    pub data: Value,
    pub error: String,
}

/// Row rejected before any write was attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowErrors {
    /// Spreadsheet row number, header included.
    pub row: usize,
    pub errors: Vec<String>,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkCreateResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub created_contacts: Vec<CreatedContact>,
    pub failed_contacts: Vec<FailedContact>,
    pub total_requested: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<RowErrors>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportValidation {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub validation_errors: Vec<RowErrors>,
}

/// Outcome of a CSV import: either a dry validation or the created rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CsvImportResult {
    Validated(ImportValidation),
    Created(BulkCreateResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedUpdate {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkUpdateResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub total_requested: usize,
    pub failed_docs: Vec<FailedUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedContact {
    pub name: ContactId,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDelete {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkDeleteResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub deleted_contacts: Vec<DeletedContact>,
    pub failed_contacts: Vec<FailedDelete>,
    pub total_requested: usize,
}

/// Base64 encoded CSV download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvExport {
    pub content: String,
    pub filename: String,
    pub format: &'static str,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportTemplate {
    pub content: String,
    pub filename: &'static str,
    pub headers: Vec<&'static str>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStatus {
    pub operation_id: String,
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedDocument {
    pub doctype: &'static str,
    pub name: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFailure {
    pub index: usize,
    pub doctype: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultipleDocumentsResult {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<DocumentFailure>,
    pub created_documents: Vec<CreatedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRowError {
    pub row: usize,
    pub error: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentUploadResult {
    pub success_count: usize,
    pub error_count: usize,
    /// First errors only.
    pub errors: Vec<UploadRowError>,
    /// First created names only.
    pub created_documents: Vec<i32>,
}

/// Import template for a generic DocType.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentTemplate {
    Json {
        fields: Vec<&'static str>,
        sample: Map<String, Value>,
        required_fields: Vec<&'static str>,
    },
    Csv {
        content: String,
        filename: String,
        fields: Vec<&'static str>,
        field_labels: Vec<&'static str>,
    },
}

/// Parsed but unsaved document data awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub data: Map<String, Value>,
    pub require_confirmation: bool,
}
