use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::dto::bulk::{BulkCreateResult, CsvImportResult};
use crate::forms::bulk::{
    BulkCreateForm, BulkDeleteForm, BulkUpdateForm, CsvImportForm, CsvImportPayload, ExportForm,
    ExportPayload, UploadContactsForm,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, ServiceResult, bulk as bulk_service};

fn created_message(result: &BulkCreateResult) -> String {
    format!(
        "Created {} contacts, {} failed",
        result.success_count, result.failed_count
    )
}

fn import_response(result: ServiceResult<CsvImportResult>) -> HttpResponse {
    match result {
        Ok(CsvImportResult::Validated(report)) => HttpResponse::Ok().json(
            ApiResponse::ok(CsvImportResult::Validated(report)).with_message("Validation completed"),
        ),
        Ok(CsvImportResult::Created(result)) => {
            let message = created_message(&result);
            HttpResponse::Ok()
                .json(ApiResponse::ok(CsvImportResult::Created(result)).with_message(message))
        }
        Err(err) => error_response(err, "import contacts"),
    }
}

#[post("/contacts/bulk/create")]
pub async fn bulk_create(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkCreateForm>,
) -> impl Responder {
    let rows = match form.into_rows() {
        Ok(rows) => rows,
        Err(err) => return error_response(ServiceError::from(err), "create contacts"),
    };

    match bulk_service::bulk_create_contacts(repo.get_ref(), &user, rows) {
        Ok(result) => {
            let message = created_message(&result);
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "create contacts"),
    }
}

#[post("/contacts/bulk/csv")]
pub async fn bulk_create_from_csv(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CsvImportForm>,
) -> impl Responder {
    let payload = match CsvImportPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "import contacts"),
    };

    import_response(bulk_service::bulk_create_from_csv(
        repo.get_ref(),
        &user,
        payload,
    ))
}

#[post("/contacts/bulk/upload")]
pub async fn upload_contacts_csv(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadContactsForm>,
) -> impl Responder {
    let payload = match form.parse() {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "import contacts"),
    };

    import_response(bulk_service::bulk_create_from_csv(
        repo.get_ref(),
        &user,
        payload,
    ))
}

#[post("/contacts/bulk/update")]
pub async fn bulk_update(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkUpdateForm>,
) -> impl Responder {
    let updates = match form.into_updates() {
        Ok(updates) => updates,
        Err(err) => return error_response(ServiceError::from(err), "update contacts"),
    };

    match bulk_service::bulk_update_contacts(repo.get_ref(), &user, updates) {
        Ok(result) => {
            let message = format!(
                "Updated {} contacts, {} failed",
                result.success_count, result.failed_count
            );
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "update contacts"),
    }
}

#[post("/contacts/bulk/delete")]
pub async fn bulk_delete(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkDeleteForm>,
) -> impl Responder {
    let names = match form.names() {
        Ok(names) => names,
        Err(err) => return error_response(ServiceError::from(err), "delete contacts"),
    };

    match bulk_service::bulk_delete_contacts(repo.get_ref(), &user, names, form.force_delete) {
        Ok(result) => {
            let message = format!(
                "Deleted {} contacts, {} failed",
                result.success_count, result.failed_count
            );
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "delete contacts"),
    }
}

#[post("/contacts/bulk/export")]
pub async fn bulk_export(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: Option<web::Json<ExportForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    let payload = match ExportPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "export contacts"),
    };

    match bulk_service::bulk_export_contacts(repo.get_ref(), &user, payload) {
        Ok(export) => HttpResponse::Ok().json(ApiResponse::ok(export)),
        Err(err) => error_response(err, "export contacts"),
    }
}

#[get("/contacts/bulk/template")]
pub async fn import_template(user: AuthenticatedUser) -> impl Responder {
    match bulk_service::get_bulk_import_template(&user) {
        Ok(template) => HttpResponse::Ok().json(ApiResponse::ok(template)),
        Err(err) => error_response(err, "build import template"),
    }
}

#[get("/contacts/bulk/status/{operation_id}")]
pub async fn operation_status(
    operation_id: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    match bulk_service::get_bulk_operation_status(&user, &operation_id) {
        Ok(status) => HttpResponse::Ok().json(ApiResponse::ok(status)),
        Err(err) => error_response(err, "load operation status"),
    }
}
