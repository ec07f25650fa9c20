use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::forms::list::{ListForm, ListPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, contacts as contacts_service, list as list_service};

#[derive(Deserialize)]
struct DeleteContactParams {
    #[serde(default)]
    force: bool,
}

#[get("/contacts")]
pub async fn list_contacts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Query(form): web::Query<ListForm>,
) -> impl Responder {
    let payload = match ListPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "list contacts"),
    };

    match list_service::get_contacts(repo.get_ref(), &user, payload) {
        Ok(list) => HttpResponse::Ok().json(ApiResponse::ok(list)),
        Err(err) => error_response(err, "list contacts"),
    }
}

#[post("/contacts")]
pub async fn create_contact(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<Value>,
) -> impl Responder {
    match contacts_service::create_contact(repo.get_ref(), &user, &payload) {
        Ok(created) => HttpResponse::Created().json(
            ApiResponse::ok(created.value)
                .with_message("Contact created successfully")
                .with_warnings(created.warnings),
        ),
        Err(err) => error_response(err, "create contact"),
    }
}

#[get("/contacts/meta")]
pub async fn contact_meta(user: AuthenticatedUser) -> impl Responder {
    match contacts_service::get_contact_meta(&user) {
        Ok(meta) => HttpResponse::Ok().json(ApiResponse::ok(meta)),
        Err(err) => error_response(err, "load contact metadata"),
    }
}

#[get("/contacts/{contact_id}")]
pub async fn contact_detail(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts_service::get_contact_detail(repo.get_ref(), &user, contact_id.into_inner()) {
        Ok(detail) => HttpResponse::Ok().json(ApiResponse::ok(detail)),
        Err(err) => error_response(err, "load contact"),
    }
}

#[put("/contacts/{contact_id}")]
pub async fn update_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(patch): web::Json<Value>,
) -> impl Responder {
    match contacts_service::update_contact(repo.get_ref(), &user, contact_id.into_inner(), &patch)
    {
        Ok(updated) => HttpResponse::Ok().json(
            ApiResponse::ok(updated.value)
                .with_message("Contact updated successfully")
                .with_warnings(updated.warnings),
        ),
        Err(err) => error_response(err, "update contact"),
    }
}

#[delete("/contacts/{contact_id}")]
pub async fn delete_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<DeleteContactParams>,
) -> impl Responder {
    match contacts_service::delete_contact(
        repo.get_ref(),
        &user,
        contact_id.into_inner(),
        params.force,
    ) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Contact deleted successfully")),
        Err(err) => error_response(err, "delete contact"),
    }
}

#[get("/contacts/{contact_id}/summary")]
pub async fn contact_summary(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts_service::get_contact_summary(repo.get_ref(), &user, contact_id.into_inner()) {
        Ok(summary) => HttpResponse::Ok().json(ApiResponse::ok(summary)),
        Err(err) => error_response(err, "load contact summary"),
    }
}

#[get("/contacts/{contact_id}/hierarchy")]
pub async fn contact_hierarchy(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts_service::get_contact_hierarchy(repo.get_ref(), &user, contact_id.into_inner())
    {
        Ok(hierarchy) => HttpResponse::Ok().json(ApiResponse::ok(hierarchy)),
        Err(err) => error_response(err, "load contact hierarchy"),
    }
}

#[get("/contacts/{contact_id}/deletion-check")]
pub async fn deletion_check(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match contacts_service::validate_contact_deletion(
        repo.get_ref(),
        &user,
        contact_id.into_inner(),
    ) {
        Ok(check) => HttpResponse::Ok().json(ApiResponse::ok(check)),
        Err(err) => error_response(err, "check contact deletion"),
    }
}

#[post("/contacts/{contact_id}/duplicate")]
pub async fn duplicate_contact(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    overrides: Option<web::Json<Value>>,
) -> impl Responder {
    let overrides = overrides.map(web::Json::into_inner).unwrap_or(Value::Null);

    match contacts_service::duplicate_contact(
        repo.get_ref(),
        &user,
        contact_id.into_inner(),
        &overrides,
    ) {
        Ok(copy) => HttpResponse::Created().json(
            ApiResponse::ok(copy.value)
                .with_message("Contact duplicated successfully")
                .with_warnings(copy.warnings),
        ),
        Err(err) => error_response(err, "duplicate contact"),
    }
}

#[post("/contacts/{contact_id}/communications")]
pub async fn add_communication(
    contact_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(payload): web::Json<Value>,
) -> impl Responder {
    match contacts_service::add_communication(
        repo.get_ref(),
        &user,
        contact_id.into_inner(),
        &payload,
    ) {
        Ok(communication) => HttpResponse::Created().json(
            ApiResponse::ok(communication).with_message("Communication added successfully"),
        ),
        Err(err) => error_response(err, "add communication"),
    }
}
