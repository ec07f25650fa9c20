use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::forms::documents::{
    CreateDocumentForm, MultipleDocumentsForm, TemplateQuery, UnstructuredDataForm,
    UnstructuredDataPayload, UploadDocumentsForm, UploadDocumentsPayload,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, documents as documents_service};

#[post("/documents/batch")]
pub async fn create_multiple(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MultipleDocumentsForm>,
) -> impl Responder {
    let documents = match form.into_documents() {
        Ok(documents) => documents,
        Err(err) => return error_response(ServiceError::from(err), "create documents"),
    };

    match documents_service::create_multiple_documents(repo.get_ref(), &user, documents) {
        Ok(result) => {
            let message = format!("Created {} documents successfully", result.success_count);
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "create documents"),
    }
}

#[post("/documents/upload")]
pub async fn upload_documents(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UploadDocumentsForm>,
) -> impl Responder {
    let payload = match UploadDocumentsPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "upload documents"),
    };
    let doctype = payload.doctype.clone();

    match documents_service::bulk_upload_documents(repo.get_ref(), &user, payload) {
        Ok(result) => {
            let message = format!(
                "Uploaded {} {doctype} documents successfully",
                result.success_count
            );
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "upload documents"),
    }
}

#[post("/documents/parse")]
pub async fn parse_unstructured(
    user: AuthenticatedUser,
    web::Json(form): web::Json<UnstructuredDataForm>,
) -> impl Responder {
    let payload = match UnstructuredDataPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "parse document data"),
    };

    match documents_service::create_document_from_unstructured_data(&user, payload) {
        Ok(parsed) => HttpResponse::Ok()
            .json(ApiResponse::ok(parsed).with_message("Data parsed successfully")),
        Err(err) => error_response(err, "parse document data"),
    }
}

#[get("/documents/{doctype}/template")]
pub async fn document_template(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    query: web::Query<TemplateQuery>,
) -> impl Responder {
    match documents_service::get_document_template(&user, &doctype, query.template_type) {
        Ok(template) => HttpResponse::Ok().json(ApiResponse::ok(template)),
        Err(err) => error_response(err, "build document template"),
    }
}

#[post("/documents/{doctype}")]
pub async fn create_document(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateDocumentForm>,
) -> impl Responder {
    match documents_service::create_document(repo.get_ref(), &user, &doctype, &form.data) {
        Ok(created) => HttpResponse::Created().json(
            ApiResponse::ok(created.value)
                .with_message(format!("{doctype} created successfully"))
                .with_warnings(created.warnings),
        ),
        Err(err) => error_response(err, "create document"),
    }
}
