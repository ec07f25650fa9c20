use actix_web::{HttpResponse, Responder, get, web};

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::forms::list::{ListForm, ListPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, list as list_service, meta as meta_service};

#[get("/list/{doctype}")]
pub async fn list_documents(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Query(form): web::Query<ListForm>,
) -> impl Responder {
    let payload = match ListPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "list documents"),
    };

    match list_service::get_list(repo.get_ref(), &user, &doctype, payload) {
        Ok(list) => HttpResponse::Ok().json(ApiResponse::ok(list)),
        Err(err) => error_response(err, "list documents"),
    }
}

#[get("/fields/{doctype}")]
pub async fn list_fields(doctype: web::Path<String>, user: AuthenticatedUser) -> impl Responder {
    match meta_service::list_fields(&user, &doctype) {
        Ok(fields) => HttpResponse::Ok().json(ApiResponse::ok(fields)),
        Err(err) => error_response(err, "load list fields"),
    }
}

#[get("/fields/{doctype}/quick-entry")]
pub async fn quick_entry_fields(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    match meta_service::quick_entry_fields(&user, &doctype) {
        Ok(fields) => HttpResponse::Ok().json(ApiResponse::ok(fields)),
        Err(err) => error_response(err, "load quick entry fields"),
    }
}

#[get("/columns/{doctype}/default")]
pub async fn default_columns(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    match meta_service::default_list_columns(&user, &doctype) {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::ok(data)),
        Err(err) => error_response(err, "load default columns"),
    }
}

#[get("/columns/{doctype}")]
pub async fn available_columns(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    match meta_service::available_columns(&user, &doctype) {
        Ok(columns) => HttpResponse::Ok().json(ApiResponse::ok(columns)),
        Err(err) => error_response(err, "load columns"),
    }
}
