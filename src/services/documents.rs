//! DocType-generic creation, CSV upload, templates and text parsing.

use regex::Regex;
use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::meta::{COMMUNICATION, CONTACT, DocField, DocMeta, FieldType};
use crate::domain::types::HubId;
use crate::dto::bulk::{
    CreatedDocument, DocumentFailure, DocumentTemplate, DocumentUploadResult,
    MultipleDocumentsResult, ParsedDocument, UploadRowError,
};
use crate::forms::documents::{DataKind, TemplateKind, UnstructuredDataPayload, UploadDocumentsPayload};
use crate::repository::{CommunicationWriter, ContactReader, ContactWriter};
use crate::services::bulk::encode_csv;
use crate::services::contacts::{insert_communication, insert_contact};
use crate::services::list::{resolve_doctype, to_record, unknown_doctype};
use crate::services::{ServiceError, ServiceResult, WithWarnings};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const UPLOAD_ERRORS_SHOWN: usize = 10;
const UPLOAD_NAMES_SHOWN: usize = 100;
const PHONE_MIN_DIGITS: usize = 10;

/// Rough classification of a line of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    Email,
    Phone,
    Other,
}

pub(crate) fn classify_line(line: &str) -> LineKind {
    if line.contains('@') {
        return LineKind::Email;
    }
    let digits = line.chars().filter(char::is_ascii_digit).count();
    if digits >= PHONE_MIN_DIGITS {
        LineKind::Phone
    } else {
        LineKind::Other
    }
}

/// Stores one document and returns its record.
fn insert_document<R>(
    repo: &R,
    hub_id: HubId,
    user_email: &str,
    meta: &'static DocMeta,
    data: &Value,
) -> ServiceResult<WithWarnings<Map<String, Value>>>
where
    R: ContactReader + ContactWriter + CommunicationWriter + ?Sized,
{
    match meta.name {
        CONTACT => {
            let created = insert_contact(repo, hub_id, user_email, data)?;
            Ok(WithWarnings::new(to_record(&created.value)?, created.warnings))
        }
        COMMUNICATION => {
            let created = insert_communication(repo, hub_id, user_email, data)?;
            Ok(WithWarnings::new(to_record(&created)?, Vec::new()))
        }
        other => Err(unknown_doctype(other)),
    }
}

fn record_name(record: &Map<String, Value>) -> i32 {
    record
        .get("name")
        .and_then(Value::as_i64)
        .and_then(|name| i32::try_from(name).ok())
        .unwrap_or_default()
}

pub fn create_document<R>(
    repo: &R,
    user: &AuthenticatedUser,
    doctype: &str,
    data: &Value,
) -> ServiceResult<WithWarnings<Map<String, Value>>>
where
    R: ContactReader + ContactWriter + CommunicationWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(doctype)?;

    let created = insert_document(repo, hub_id, &user.email, meta, data)?;
    log::info!("Created {} {}", meta.name, record_name(&created.value));
    Ok(created)
}

/// Creates documents of mixed DocTypes; each carries its own `doctype`.
pub fn create_multiple_documents<R>(
    repo: &R,
    user: &AuthenticatedUser,
    documents: Vec<Value>,
) -> ServiceResult<MultipleDocumentsResult>
where
    R: ContactReader + ContactWriter + CommunicationWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user.hub()?;

    let mut result = MultipleDocumentsResult::default();
    for (index, mut document) in documents.into_iter().enumerate() {
        let doctype = document
            .as_object_mut()
            .and_then(|data| data.remove("doctype"))
            .and_then(|doctype| doctype.as_str().map(str::to_string));

        let outcome = match doctype.as_deref() {
            Some(doctype) => resolve_doctype(doctype).and_then(|meta| {
                insert_document(repo, hub_id, &user.email, meta, &document)
                    .map(|created| (meta.name, record_name(&created.value)))
            }),
            None => Err(ServiceError::Validation(
                "doctype is required for each document".to_string(),
            )),
        };

        match outcome {
            Ok((doctype, name)) => result
                .created_documents
                .push(CreatedDocument { doctype, name }),
            Err(err) => result.errors.push(DocumentFailure {
                index,
                doctype,
                error: err.to_string(),
            }),
        }
    }

    result.success_count = result.created_documents.len();
    result.error_count = result.errors.len();
    Ok(result)
}

pub fn bulk_upload_documents<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: UploadDocumentsPayload,
) -> ServiceResult<DocumentUploadResult>
where
    R: ContactReader + ContactWriter + CommunicationWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;
    let meta = resolve_doctype(&payload.doctype)?;

    let mut result = DocumentUploadResult::default();
    for (idx, row) in payload.rows.into_iter().enumerate() {
        match insert_document(repo, hub_id, &user.email, meta, &Value::Object(row.clone())) {
            Ok(created) => {
                result.success_count += 1;
                if result.created_documents.len() < UPLOAD_NAMES_SHOWN {
                    result.created_documents.push(record_name(&created.value));
                }
            }
            Err(err) => {
                result.error_count += 1;
                if result.errors.len() < UPLOAD_ERRORS_SHOWN {
                    result.errors.push(UploadRowError {
                        row: idx + 2,
                        error: err.to_string(),
                        data: row,
                    });
                }
            }
        }
    }

    log::info!(
        "Uploaded {} {} documents, {} failed",
        result.success_count,
        meta.name,
        result.error_count
    );
    Ok(result)
}

fn sample_value(field: &DocField) -> Option<Value> {
    match field.fieldtype {
        FieldType::Data | FieldType::LongText => {
            Some(Value::String(format!("Sample {}", field.label)))
        }
        FieldType::Int | FieldType::Check => Some(Value::from(0)),
        FieldType::Date => Some(Value::String("2024-01-01".to_string())),
        FieldType::Link => field
            .target
            .map(|target| Value::String(format!("Valid {target}"))),
        _ => None,
    }
}

pub fn get_document_template(
    user: &AuthenticatedUser,
    doctype: &str,
    kind: TemplateKind,
) -> ServiceResult<DocumentTemplate> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(doctype)?;

    let fields: Vec<&'static DocField> = meta.importable_fields().collect();
    let sample: Map<String, Value> = fields
        .iter()
        .filter_map(|field| sample_value(field).map(|value| (field.fieldname.to_string(), value)))
        .collect();
    let names: Vec<&'static str> = fields.iter().map(|field| field.fieldname).collect();

    match kind {
        TemplateKind::Json => Ok(DocumentTemplate::Json {
            fields: names,
            sample,
            required_fields: meta
                .value_fields()
                .filter(|field| field.reqd)
                .map(|field| field.fieldname)
                .collect(),
        }),
        TemplateKind::Csv => {
            let row: Vec<String> = names
                .iter()
                .map(|name| match sample.get(*name) {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect();
            Ok(DocumentTemplate::Csv {
                content: encode_csv(&names, &[row])?,
                filename: format!("{}_template.csv", meta.name.to_lowercase()),
                fields: names,
                field_labels: fields.iter().map(|field| field.label).collect(),
            })
        }
    }
}

/// First declared value field whose name contains one of `terms`.
fn field_matching(meta: &DocMeta, terms: &[&str]) -> Option<&'static str> {
    meta.listable_fields()
        .map(|field| field.fieldname)
        .find(|name| terms.iter().any(|term| name.contains(term)))
}

/// Extracts field values from free text without saving anything.
pub fn create_document_from_unstructured_data(
    user: &AuthenticatedUser,
    payload: UnstructuredDataPayload,
) -> ServiceResult<ParsedDocument> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let meta = resolve_doctype(&payload.doctype)?;

    let mut data = Map::new();
    data.insert("doctype".to_string(), Value::String(meta.name.to_string()));

    match payload.data_type {
        DataKind::Json => match serde_json::from_str::<Value>(&payload.text) {
            Ok(Value::Object(parsed)) => data.extend(parsed),
            Ok(_) | Err(_) => log::debug!("Unstructured JSON for {} is not an object", meta.name),
        },
        DataKind::Text => {
            let rules = payload
                .parsing_rules
                .iter()
                .map(|(field, rule)| {
                    Regex::new(&rule.pattern)
                        .map(|regex| (field.as_str(), regex))
                        .map_err(|_| {
                            ServiceError::Validation(format!("Invalid parsing rule for {field}"))
                        })
                })
                .collect::<ServiceResult<Vec<_>>>()?;

            let email_field = field_matching(meta, &["email"]);
            let phone_field = meta
                .resolve("mobile_no")
                .map(|field| field.fieldname)
                .or_else(|| field_matching(meta, &["mobile", "phone"]));

            for line in payload.text.lines().map(str::trim) {
                let target = match classify_line(line) {
                    LineKind::Email => email_field,
                    LineKind::Phone => phone_field,
                    LineKind::Other => None,
                };
                if let Some(target) = target {
                    data.insert(target.to_string(), Value::String(line.to_string()));
                }

                for (field, regex) in &rules {
                    if let Some(captures) = regex.captures(line) {
                        if let Some(found) = captures.get(1).or_else(|| captures.get(0)) {
                            data.insert(field.to_string(), Value::String(found.as_str().to_string()));
                        }
                    }
                }
            }
        }
    }

    Ok(ParsedDocument {
        data,
        require_confirmation: true,
    })
}
