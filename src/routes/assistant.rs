use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::dto::api::ApiResponse;
use crate::dto::assistant::AiDeleteResult;
use crate::forms::FormError;
use crate::forms::assistant::{AiCreateForm, AiDeleteForm, AiSearchForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, assistant as assistant_service};

fn invalid(err: validator::ValidationErrors, action: &str) -> HttpResponse {
    error_response(ServiceError::from(FormError::from(err)), action)
}

#[get("/assistant/search")]
pub async fn search(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Query(form): web::Query<AiSearchForm>,
) -> impl Responder {
    if let Err(err) = form.validate() {
        return invalid(err, "search contacts");
    }

    match assistant_service::search_contacts_ai(repo.get_ref(), &user, &form.query) {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::ok(result)),
        Err(err) => error_response(err, "search contacts"),
    }
}

#[post("/assistant/parse-contact")]
pub async fn parse_contact(
    user: AuthenticatedUser,
    web::Json(form): web::Json<AiCreateForm>,
) -> impl Responder {
    if let Err(err) = form.validate() {
        return invalid(err, "parse contact");
    }

    match assistant_service::create_contact_from_ai(&user, &form.unstructured_data, form.data_type)
    {
        Ok(parsed) => HttpResponse::Ok()
            .json(ApiResponse::ok(parsed).with_message("Data parsed successfully")),
        Err(err) => error_response(err, "parse contact"),
    }
}

#[post("/assistant/delete")]
pub async fn delete_by_query(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AiDeleteForm>,
) -> impl Responder {
    if let Err(err) = form.validate() {
        return invalid(err, "delete contacts");
    }

    match assistant_service::delete_contacts_ai(repo.get_ref(), &user, &form.query, form.dry_run)
    {
        Ok(result) => {
            let message = match &result {
                AiDeleteResult::Preview { would_delete, .. } => {
                    format!("Found {would_delete} contacts matching your query")
                }
                AiDeleteResult::Deleted(report) => format!(
                    "Deleted {} contacts, {} failed",
                    report.success_count, report.failed_count
                ),
            };
            HttpResponse::Ok().json(ApiResponse::ok(result).with_message(message))
        }
        Err(err) => error_response(err, "delete contacts"),
    }
}
