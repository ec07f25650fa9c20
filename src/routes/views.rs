use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::forms::views::{
    ContactsViewForm, ContactsViewPayload, ListSettingsForm, ListSettingsPayload, SaveViewForm,
    SaveViewPayload,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, views as views_service};

#[derive(Deserialize)]
struct SettingsNameParams {
    settings_name: Option<String>,
}

#[get("/contacts/view")]
pub async fn contacts_with_view(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Query(form): web::Query<ContactsViewForm>,
) -> impl Responder {
    let payload = match ContactsViewPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "list contacts"),
    };

    match views_service::get_contacts_with_view(repo.get_ref(), &user, payload) {
        Ok(list) => HttpResponse::Ok().json(ApiResponse::ok(list)),
        Err(err) => error_response(err, "list contacts"),
    }
}

#[get("/views/id/{view_id}")]
pub async fn get_view(
    view_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match views_service::get_list_view(repo.get_ref(), &user, view_id.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(ApiResponse::ok(view)),
        Err(err) => error_response(err, "load view"),
    }
}

#[delete("/views/id/{view_id}")]
pub async fn delete_view(
    view_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match views_service::delete_list_view(repo.get_ref(), &user, view_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("View deleted successfully")),
        Err(err) => error_response(err, "delete view"),
    }
}

#[get("/views/{doctype}")]
pub async fn list_views(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match views_service::get_list_views(repo.get_ref(), &user, &doctype) {
        Ok(views) => HttpResponse::Ok().json(ApiResponse::ok(views)),
        Err(err) => error_response(err, "list views"),
    }
}

#[post("/views/{doctype}")]
pub async fn save_view(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveViewForm>,
) -> impl Responder {
    let payload = match SaveViewPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "save view"),
    };

    match views_service::save_list_view(repo.get_ref(), &user, &doctype, payload) {
        Ok(view) => {
            HttpResponse::Ok().json(ApiResponse::ok(view).with_message("View saved successfully"))
        }
        Err(err) => error_response(err, "save view"),
    }
}

#[get("/list-settings/{doctype}/all")]
pub async fn all_list_settings(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match views_service::get_all_list_settings(repo.get_ref(), &user, &doctype) {
        Ok(settings) => HttpResponse::Ok().json(ApiResponse::ok(settings)),
        Err(err) => error_response(err, "list settings"),
    }
}

#[get("/list-settings/{doctype}")]
pub async fn get_list_settings(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<SettingsNameParams>,
) -> impl Responder {
    match views_service::get_list_settings(
        repo.get_ref(),
        &user,
        &doctype,
        params.settings_name.as_deref(),
    ) {
        Ok(values) => HttpResponse::Ok().json(ApiResponse::ok(values)),
        Err(err) => error_response(err, "load list settings"),
    }
}

#[post("/list-settings/{doctype}")]
pub async fn set_list_settings(
    doctype: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ListSettingsForm>,
) -> impl Responder {
    let payload = match ListSettingsPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(ServiceError::from(err), "save list settings"),
    };

    match views_service::set_list_settings(repo.get_ref(), &user, &doctype, payload) {
        Ok(settings) => HttpResponse::Ok()
            .json(ApiResponse::ok(settings).with_message("List settings saved successfully")),
        Err(err) => error_response(err, "save list settings"),
    }
}
