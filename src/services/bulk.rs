//! Bulk contact import, update, deletion and CSV export.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use serde_json::{Map, Value};

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::contact::ContactType;
use crate::domain::list::DEFAULT_ORDER_BY;
use crate::domain::meta::contact_meta;
use crate::domain::types::{ContactId, Gstin, HubId, is_mobile_number};
use crate::dto::bulk::{
    BulkCreateResult, BulkDeleteResult, BulkUpdateResult, CreatedContact, CsvExport,
    CsvImportResult, DeletedContact, FailedContact, FailedDelete, FailedUpdate, ImportTemplate,
    ImportValidation, OperationStatus, RowErrors,
};
use crate::forms::bulk::{ContactUpdate, CsvImportPayload, ExportPayload};
use crate::repository::{CommunicationReader, ContactReader, ContactWriter, DocumentReader};
use crate::services::contacts::{
    apply_contact_update, contact_not_found, insert_contact, parse_contact_id, remove_contact,
};
use crate::services::list::{ListPlan, run_list};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

const MAX_BULK_CREATE: usize = 500;
const MAX_BULK_UPDATE: usize = 500;
const MAX_BULK_DELETE: usize = 100;
const MAX_EXPORT_ROWS: usize = 10_000;

const EXPORT_FIELDS: &[&str] = &[
    "name",
    "full_name",
    "first_name",
    "last_name",
    "email_id",
    "mobile_no",
    "phone",
    "contact_type",
    "contact_category",
    "city",
    "state",
    "country",
    "pincode",
    "gstin",
    "employee_code",
    "designation",
    "company_name",
    "creation",
    "modified",
];

const TEMPLATE_HEADERS: &[&str] = &[
    "first_name",
    "last_name",
    "email_id",
    "mobile_no",
    "contact_type",
    "contact_category",
    "city",
    "state",
    "country",
    "pincode",
    "gstin",
    "employee_code",
    "vendor_type",
    "designation",
    "company_name",
    "dob",
    "date_of_joining",
    "instagram",
    "notes",
];

const TEMPLATE_SAMPLES: &[&[(&str, &str)]] = &[
    &[
        ("first_name", "John"),
        ("last_name", "Doe"),
        ("email_id", "john.doe@example.com"),
        ("mobile_no", "9876543210"),
        ("contact_type", "Customer"),
        ("contact_category", "Individual"),
        ("city", "Mumbai"),
        ("state", "Maharashtra"),
        ("country", "India"),
        ("pincode", "400001"),
        ("designation", "Manager"),
        ("company_name", "ABC Corp"),
    ],
    &[
        ("first_name", "Jane"),
        ("last_name", "Smith"),
        ("email_id", "jane.smith@company.com"),
        ("mobile_no", "9876543211"),
        ("contact_type", "Employee"),
        ("employee_code", "EMP001"),
        ("date_of_joining", "2024-01-15"),
        ("city", "Delhi"),
        ("state", "Delhi"),
    ],
];

fn check_batch_size(len: usize, limit: usize, message: &str) -> ServiceResult<()> {
    if len > limit {
        return Err(ServiceError::Validation(message.to_string()));
    }
    Ok(())
}

/// Contact names arrive as numbers or numeric strings.
pub(crate) fn contact_name(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn display_name(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Text form of a cell written to an export.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn encode_csv(headers: &[&str], rows: &[Vec<String>]) -> ServiceResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

fn create_rows<R>(
    repo: &R,
    hub_id: HubId,
    user_email: &str,
    rows: &[Value],
) -> BulkCreateResult
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let mut result = BulkCreateResult {
        total_requested: rows.len(),
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        match insert_contact(repo, hub_id, user_email, row) {
            Ok(created) => {
                for warning in &created.warnings {
                    log::warn!("Contact {}: {warning}", created.value.id);
                }
                result.created_contacts.push(CreatedContact {
                    index,
                    name: created.value.id,
                    full_name: created.value.full_name,
                });
            }
            Err(err) => {
                log::warn!("Bulk create row {index} failed: {err}");
                result.failed_contacts.push(FailedContact {
                    index,
                    data: row.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    result.success_count = result.created_contacts.len();
    result.failed_count = result.failed_contacts.len();
    result
}

/// Creates contacts one by one; a failing row does not stop the batch.
pub fn bulk_create_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rows: Vec<Value>,
) -> ServiceResult<BulkCreateResult>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;
    check_batch_size(
        rows.len(),
        MAX_BULK_CREATE,
        "Bulk create is limited to 500 contacts per request",
    )?;

    let result = create_rows(repo, hub_id, &user.email, &rows);
    log::info!(
        "Bulk created {} contacts, {} failed",
        result.success_count,
        result.failed_count
    );
    Ok(result)
}

fn text<'a>(row: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    row.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Checks one imported row, normalizing its GSTIN in place.
fn check_import_row(row: &mut Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    if ["email_id", "mobile_no", "instagram"]
        .iter()
        .all(|key| text(row, key).is_none())
    {
        errors.push(
            "At least one contact method (email_id, mobile_no, or instagram) is required"
                .to_string(),
        );
    }

    if let Some(mobile) = text(row, "mobile_no") {
        if !is_mobile_number(mobile) {
            errors.push("Invalid mobile number format".to_string());
        }
    }

    if let Some(gstin) = text(row, "gstin").map(str::to_uppercase) {
        match Gstin::new(gstin) {
            Ok(gstin) => {
                row.insert("gstin".to_string(), Value::String(gstin.into_inner()));
            }
            Err(_) => errors.push("Invalid GSTIN format".to_string()),
        }
    }

    let contact_type = text(row, "contact_type").and_then(|value| value.parse().ok());
    if contact_type == Some(ContactType::Employee) && text(row, "employee_code").is_none() {
        errors.push("Employee Code is required for Employee contacts".to_string());
    }
    if contact_type == Some(ContactType::Vendor) && text(row, "vendor_type").is_none() {
        errors.push("Vendor Type is required for Vendor contacts".to_string());
    }

    errors
}

/// Splits imported rows into valid rows and per-row errors.
pub(crate) fn check_import_rows(
    rows: Vec<Map<String, Value>>,
) -> (Vec<Map<String, Value>>, Vec<RowErrors>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for (idx, mut row) in rows.into_iter().enumerate() {
        let errors = check_import_row(&mut row);
        if errors.is_empty() {
            valid.push(row);
        } else {
            invalid.push(RowErrors {
                row: idx + 2,
                errors,
                data: row,
            });
        }
    }

    (valid, invalid)
}

pub fn bulk_create_from_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: CsvImportPayload,
) -> ServiceResult<CsvImportResult>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;

    let total_rows = payload.rows.len();
    let (valid, validation_errors) = check_import_rows(payload.rows);

    if payload.validate_only {
        return Ok(CsvImportResult::Validated(ImportValidation {
            total_rows,
            valid_rows: valid.len(),
            invalid_rows: validation_errors.len(),
            validation_errors,
        }));
    }

    if valid.is_empty() {
        return Err(ServiceError::Validation(
            "No valid contacts found to create".to_string(),
        ));
    }
    check_batch_size(
        valid.len(),
        MAX_BULK_CREATE,
        "Bulk create is limited to 500 contacts per request",
    )?;

    let rows: Vec<Value> = valid.into_iter().map(Value::Object).collect();
    let mut result = create_rows(repo, hub_id, &user.email, &rows);
    result.validation_errors = validation_errors;
    log::info!(
        "Imported {} contacts from CSV, {} failed, {} rejected",
        result.success_count,
        result.failed_count,
        result.validation_errors.len()
    );

    Ok(CsvImportResult::Created(result))
}

pub fn bulk_update_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    updates: Vec<ContactUpdate>,
) -> ServiceResult<BulkUpdateResult>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;
    check_batch_size(
        updates.len(),
        MAX_BULK_UPDATE,
        "Bulk update is limited to 500 contacts per request",
    )?;

    let mut result = BulkUpdateResult {
        total_requested: updates.len(),
        ..Default::default()
    };

    for update in &updates {
        let outcome = match contact_name(&update.name) {
            Some(raw) => parse_contact_id(raw).and_then(|id| {
                apply_contact_update(repo, hub_id, &user.email, id, &update.patch)
            }),
            None => Err(contact_not_found(display_name(&update.name))),
        };

        match outcome {
            Ok(_) => result.success_count += 1,
            Err(err) => result.failed_docs.push(FailedUpdate {
                name: display_name(&update.name),
                error: err.to_string(),
            }),
        }
    }

    result.failed_count = result.failed_docs.len();
    log::info!(
        "Bulk updated {} contacts, {} failed",
        result.success_count,
        result.failed_count
    );
    Ok(result)
}

pub fn bulk_delete_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    names: Vec<Value>,
    force: bool,
) -> ServiceResult<BulkDeleteResult>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;
    check_batch_size(
        names.len(),
        MAX_BULK_DELETE,
        "Bulk delete is limited to 100 contacts per request for safety",
    )?;

    let mut result = BulkDeleteResult {
        total_requested: names.len(),
        ..Default::default()
    };

    for name in &names {
        let contact = match contact_name(name).and_then(|raw| ContactId::new(raw).ok()) {
            Some(id) => repo.get_contact_by_id(id, hub_id).map_err(|err| {
                log::error!("Failed to load contact {id}: {err}");
                err
            })?,
            None => None,
        };

        let Some(contact) = contact else {
            result.failed_contacts.push(FailedDelete {
                name: display_name(name),
                full_name: None,
                error: "Contact not found".to_string(),
            });
            continue;
        };

        match remove_contact(repo, hub_id, &contact, force) {
            Ok(()) => result.deleted_contacts.push(DeletedContact {
                name: contact.id,
                full_name: contact.full_name,
            }),
            Err(err) => result.failed_contacts.push(FailedDelete {
                name: contact.id.to_string(),
                full_name: Some(contact.full_name),
                error: err.to_string(),
            }),
        }
    }

    result.success_count = result.deleted_contacts.len();
    result.failed_count = result.failed_contacts.len();
    Ok(result)
}

/// Exports up to ten thousand matching contacts, newest first.
pub fn bulk_export_contacts<R>(
    repo: &R,
    user: &AuthenticatedUser,
    payload: ExportPayload,
) -> ServiceResult<CsvExport>
where
    R: DocumentReader + ContactReader + CommunicationReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    let hub_id = user.hub()?;

    let fields = payload
        .fields
        .unwrap_or_else(|| EXPORT_FIELDS.iter().map(|field| field.to_string()).collect());
    let plan = ListPlan {
        filters: payload.filters,
        fields: Some(fields.clone()),
        order_by: Some(DEFAULT_ORDER_BY.to_string()),
        search_text: None,
        page: 1,
        page_size: MAX_EXPORT_ROWS,
    };
    let (records, _) = run_list(repo, hub_id, contact_meta(), &plan)?;

    let content = if records.is_empty() {
        String::new()
    } else {
        let headers: Vec<&str> = fields.iter().map(String::as_str).collect();
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|field| cell(record.get(*field)))
                    .collect()
            })
            .collect();
        encode_csv(&headers, &rows)?
    };

    log::info!("Exported {} contacts", records.len());
    Ok(CsvExport {
        content,
        filename: format!("contacts_export_{}.csv", Local::now().format("%Y%m%d_%H%M%S")),
        format: "csv",
        record_count: records.len(),
    })
}

pub fn get_bulk_import_template(user: &AuthenticatedUser) -> ServiceResult<ImportTemplate> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let rows: Vec<Vec<String>> = TEMPLATE_SAMPLES
        .iter()
        .map(|sample| {
            TEMPLATE_HEADERS
                .iter()
                .map(|header| {
                    sample
                        .iter()
                        .find(|(key, _)| key == header)
                        .map(|(_, value)| value.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Ok(ImportTemplate {
        content: encode_csv(TEMPLATE_HEADERS, &rows)?,
        filename: "contact_import_template.csv",
        headers: TEMPLATE_HEADERS.to_vec(),
        sample_count: rows.len(),
    })
}

/// Bulk operations run inline, so every operation reports as completed.
pub fn get_bulk_operation_status(
    user: &AuthenticatedUser,
    operation_id: &str,
) -> ServiceResult<OperationStatus> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    Ok(OperationStatus {
        operation_id: operation_id.to_string(),
        status: "completed",
        message: "Bulk operations are currently synchronous",
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::contact::{Contact, ContactDraft};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, stored_contact, viewer_user};

    fn created(draft: &ContactDraft, raw: i32) -> Contact {
        Contact {
            id: ContactId::new(raw).expect("id"),
            full_name: draft.full_name.clone(),
            first_name: draft.first_name.clone(),
            email_id: draft.email_id.clone(),
            ..stored_contact(raw)
        }
    }

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    /// Ensures bulk writes are reserved for administrators.
    #[test]
    fn bulk_create_requires_admin() {
        let repo = MockRepository::new();

        let result = bulk_create_contacts(&repo, &viewer_user(), vec![]);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    /// Ensures oversized batches are rejected up front.
    #[test]
    fn bulk_create_limits_batch_size() {
        let repo = MockRepository::new();
        let rows = vec![json!({"first_name": "A"}); 501];

        match bulk_create_contacts(&repo, &admin_user(), rows) {
            Err(ServiceError::Validation(message)) => {
                assert_eq!(message, "Bulk create is limited to 500 contacts per request")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Ensures a failing row is reported while the others are created.
    #[test]
    fn bulk_create_reports_failed_rows() {
        let mut repo = MockRepository::new();
        repo.expect_find_contact_by_email()
            .returning(|_, _, _| Ok(None));
        repo.expect_create_contact()
            .times(1)
            .returning(|_, draft, _| Ok(created(draft, 5)));

        let result = bulk_create_contacts(
            &repo,
            &admin_user(),
            vec![
                json!({"first_name": "Meera", "email_id": "meera@example.com"}),
                json!({"email_id": "nobody@example.com"}),
            ],
        )
        .expect("bulk create");

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.failed_contacts[0].index, 1);
        assert_eq!(
            result.failed_contacts[0].error,
            "Missing required fields: first_name"
        );
    }

    /// Ensures import rows are checked with spreadsheet row numbers.
    #[test]
    fn import_rows_are_checked() {
        let (valid, invalid) = check_import_rows(vec![
            row(json!({"first_name": "A", "gstin": "27aapfu0939f1zv", "email_id": "a@x.com"})),
            row(json!({"first_name": "B"})),
            row(json!({"first_name": "C", "mobile_no": "12345", "contact_type": "Employee"})),
            row(json!({"first_name": "D", "instagram": "d", "contact_type": "Vendor"})),
        ]);

        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0]["gstin"], json!("27AAPFU0939F1ZV"));
        assert_eq!(invalid.len(), 3);
        assert_eq!(invalid[0].row, 3);
        assert_eq!(
            invalid[0].errors,
            vec!["At least one contact method (email_id, mobile_no, or instagram) is required"]
        );
        assert_eq!(
            invalid[1].errors,
            vec![
                "Invalid mobile number format",
                "Employee Code is required for Employee contacts"
            ]
        );
        assert_eq!(
            invalid[2].errors,
            vec!["Vendor Type is required for Vendor contacts"]
        );
    }

    /// Ensures a dry run validates without writing anything.
    #[test]
    fn csv_validate_only_does_not_write() {
        let repo = MockRepository::new();
        let payload = CsvImportPayload {
            rows: vec![
                row(json!({"first_name": "A", "email_id": "a@example.com"})),
                row(json!({"first_name": "B"})),
            ],
            validate_only: true,
        };

        let result = bulk_create_from_csv(&repo, &admin_user(), payload).expect("validated");

        match result {
            CsvImportResult::Validated(report) => {
                assert_eq!(report.total_rows, 2);
                assert_eq!(report.valid_rows, 1);
                assert_eq!(report.invalid_rows, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Ensures an import without a single valid row is refused.
    #[test]
    fn csv_without_valid_rows_fails() {
        let repo = MockRepository::new();
        let payload = CsvImportPayload {
            rows: vec![row(json!({"first_name": "B"}))],
            validate_only: false,
        };

        match bulk_create_from_csv(&repo, &admin_user(), payload) {
            Err(ServiceError::Validation(message)) => {
                assert_eq!(message, "No valid contacts found to create")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Ensures unknown targets fail individually during bulk updates.
    #[test]
    fn bulk_update_reports_unknown_contacts() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id().returning(|_, _| Ok(None));

        let result = bulk_update_contacts(
            &repo,
            &admin_user(),
            vec![
                ContactUpdate {
                    name: json!("7"),
                    patch: json!({"city": "Goa"}),
                },
                ContactUpdate {
                    name: json!("abc"),
                    patch: json!({"city": "Goa"}),
                },
            ],
        )
        .expect("bulk update");

        assert_eq!(result.success_count, 0);
        assert_eq!(result.failed_count, 2);
        assert_eq!(result.failed_docs[0].error, "Contact 7 not found");
        assert_eq!(result.failed_docs[1].name, "abc");
    }

    /// Ensures forced bulk deletes skip missing contacts and delete the rest.
    #[test]
    fn bulk_delete_skips_missing_contacts() {
        let mut repo = MockRepository::new();
        repo.expect_get_contact_by_id()
            .returning(|id, _| Ok((id.get() == 3).then(|| stored_contact(3))));
        repo.expect_delete_contact()
            .withf(|id, _, force| id.get() == 3 && *force)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let result = bulk_delete_contacts(&repo, &admin_user(), vec![json!(3), json!("9")], true)
            .expect("bulk delete");

        assert_eq!(result.success_count, 1);
        assert_eq!(result.deleted_contacts[0].full_name, "Asha Rao");
        assert_eq!(result.failed_contacts[0].name, "9");
        assert_eq!(result.failed_contacts[0].error, "Contact not found");
    }

    /// Ensures deletions beyond the safety limit are refused.
    #[test]
    fn bulk_delete_limits_batch_size() {
        let repo = MockRepository::new();

        let result = bulk_delete_contacts(&repo, &admin_user(), vec![json!(1); 101], false);

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    /// Ensures an empty export yields no content.
    #[test]
    fn export_without_rows_is_empty() {
        let mut repo = MockRepository::new();
        repo.expect_list_document_ids()
            .withf(|query| query.pagination.map(|p| p.per_page) == Some(MAX_EXPORT_ROWS))
            .returning(|_| Ok((0, vec![])));
        repo.expect_get_contacts_by_ids().returning(|_, _| Ok(vec![]));

        let export = bulk_export_contacts(
            &repo,
            &admin_user(),
            ExportPayload {
                filters: json!({"city": "Pune"}),
                fields: None,
            },
        )
        .expect("export");

        assert_eq!(export.content, "");
        assert_eq!(export.record_count, 0);
        assert!(export.filename.starts_with("contacts_export_"));
        assert!(export.filename.ends_with(".csv"));
    }

    /// Ensures exported rows are encoded as CSV in field order.
    #[test]
    fn export_encodes_rows() {
        let mut repo = MockRepository::new();
        repo.expect_list_document_ids()
            .returning(|_| Ok((1, vec![4])));
        repo.expect_get_contacts_by_ids()
            .returning(|_, _| Ok(vec![stored_contact(4)]));

        let export = bulk_export_contacts(
            &repo,
            &admin_user(),
            ExportPayload {
                filters: Value::Null,
                fields: Some(vec!["full_name".to_string(), "city".to_string()]),
            },
        )
        .expect("export");

        let decoded = STANDARD.decode(export.content).expect("base64");
        assert_eq!(
            String::from_utf8(decoded).expect("utf8"),
            "full_name,city\nAsha Rao,Pune\n"
        );
        assert_eq!(export.record_count, 1);
    }

    #[test]
    fn import_template_has_samples() {
        let template = get_bulk_import_template(&viewer_user()).expect("template");

        let decoded = String::from_utf8(STANDARD.decode(template.content).expect("base64"))
            .expect("utf8");
        let mut lines = decoded.lines();
        assert_eq!(lines.next(), Some(TEMPLATE_HEADERS.join(",").as_str()));
        assert!(lines.next().expect("sample").starts_with("John,Doe,john.doe@example.com"));
        assert_eq!(template.sample_count, 2);
        assert_eq!(template.headers.len(), 19);
    }

    #[test]
    fn operation_status_is_completed() {
        let status = get_bulk_operation_status(&viewer_user(), "op-1").expect("status");

        assert_eq!(status.status, "completed");
        assert_eq!(status.operation_id, "op-1");
    }
}
