//! JSON endpoints under `/api/v1`.
//!
//! Handlers extract the user and the request form, call one service and
//! wrap the outcome in [`ApiResponse`].

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::dto::api::ApiResponse;
use crate::services::ServiceError;

pub mod assistant;
pub mod bulk;
pub mod contacts;
pub mod documents;
pub mod list;
pub mod views;

/// Maps a service failure onto a status code and the error envelope.
pub(crate) fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    let message = err.to_string();
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(ApiResponse::error(message)),
        ServiceError::Forbidden(_) => HttpResponse::Forbidden().json(ApiResponse::error(message)),
        ServiceError::NotFound(_) => HttpResponse::NotFound().json(ApiResponse::error(message)),
        ServiceError::Form(_) | ServiceError::Validation(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(ApiResponse::error(message))
        }
        ServiceError::Conflict(_) => HttpResponse::Conflict().json(ApiResponse::error(message)),
        ServiceError::Repository(_) | ServiceError::Internal(_) => {
            log::error!("Failed to {action}: {message}");
            HttpResponse::InternalServerError()
                .json(ApiResponse::error(format!("Failed to {action}")))
        }
    }
}

fn bad_request(err: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error(err.to_string()))
}

/// Reports malformed JSON bodies with the error envelope.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let response = bad_request(&err);
            InternalError::from_response(err, response).into()
        })
}

/// Reports malformed query strings with the error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(&err);
        InternalError::from_response(err, response).into()
    })
}

/// Registers every API handler. Literal paths come before the
/// parameterised paths they would otherwise be shadowed by.
pub fn api_v1(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // bulk
            .service(bulk::bulk_create)
            .service(bulk::bulk_create_from_csv)
            .service(bulk::upload_contacts_csv)
            .service(bulk::bulk_update)
            .service(bulk::bulk_delete)
            .service(bulk::bulk_export)
            .service(bulk::import_template)
            .service(bulk::operation_status)
            // contacts
            .service(contacts::contact_meta)
            .service(views::contacts_with_view)
            .service(contacts::list_contacts)
            .service(contacts::create_contact)
            .service(contacts::contact_detail)
            .service(contacts::update_contact)
            .service(contacts::delete_contact)
            .service(contacts::contact_summary)
            .service(contacts::contact_hierarchy)
            .service(contacts::deletion_check)
            .service(contacts::duplicate_contact)
            .service(contacts::add_communication)
            // generic lists and metadata
            .service(list::list_documents)
            .service(list::quick_entry_fields)
            .service(list::list_fields)
            .service(list::default_columns)
            .service(list::available_columns)
            // saved views and list settings
            .service(views::get_view)
            .service(views::delete_view)
            .service(views::list_views)
            .service(views::save_view)
            .service(views::all_list_settings)
            .service(views::get_list_settings)
            .service(views::set_list_settings)
            // documents
            .service(documents::create_multiple)
            .service(documents::upload_documents)
            .service(documents::parse_unstructured)
            .service(documents::document_template)
            .service(documents::create_document)
            // assistant
            .service(assistant::search)
            .service(assistant::parse_contact)
            .service(assistant::delete_by_query),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    use super::*;

    #[actix_web::test]
    async fn conflicts_map_to_409() {
        let response = error_response(
            ServiceError::Conflict("Cannot delete Contact".to_string()),
            "delete contact",
        );

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Cannot delete Contact");
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let response = error_response(
            ServiceError::Internal("disk on fire".to_string()),
            "export contacts",
        );

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["message"], "Failed to export contacts");
    }

    #[test]
    fn permission_errors_map_to_401_and_403() {
        assert_eq!(
            error_response(ServiceError::Unauthorized, "x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_response(ServiceError::Forbidden("no".to_string()), "x").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_response(ServiceError::Form("bad".to_string()), "x").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
