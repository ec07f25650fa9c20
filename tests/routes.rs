use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use sentra_contacts::auth::AuthenticatedUser;
use sentra_contacts::models::config::ServerConfig;
use sentra_contacts::repository::DieselRepository;
use sentra_contacts::routes::{api_v1, json_config, query_config};
use serde_json::{Value, json};

mod common;

const SECRET: &str = "integration-secret-for-route-tests-0123456789";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        database_url: String::new(),
        secret: SECRET.to_string(),
        max_upload_size: 1024 * 1024,
    }
}

fn bearer(roles: &[&str]) -> (actix_web::http::header::HeaderName, String) {
    let user = AuthenticatedUser {
        sub: "1".to_string(),
        email: "agent@example.com".to_string(),
        hub_id: 1,
        name: "Agent".to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 4_102_444_800,
    };
    let token = user.to_jwt(SECRET).unwrap();
    (AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(
                        CookieSessionStore::default(),
                        Key::derive_from(SECRET.as_bytes()),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .app_data(json_config(1024 * 1024))
                .app_data(query_config())
                .app_data(web::Data::new(DieselRepository::new($db.pool())))
                .app_data(web::Data::new(server_config()))
                .configure(api_v1),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requests_without_token_are_rejected() {
    let test_db = common::TestDb::new("test_requests_without_token_are_rejected.db");
    let app = app!(test_db);

    let req = test::TestRequest::get().uri("/api/v1/contacts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts")
        .insert_header((AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_contact_lifecycle_over_http() {
    let test_db = common::TestDb::new("test_contact_lifecycle_over_http.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(bearer(&["crm"]))
        .set_json(json!({
            "first_name": "Asha",
            "last_name": "Rao",
            "email_id": "Asha@Example.com",
            "city": "Pune",
            "contact_type": "Customer"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact created successfully");
    assert_eq!(body["data"]["full_name"], "Asha Rao");
    assert_eq!(body["data"]["email_id"], "asha@example.com");
    let id = body["data"]["name"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{id}"))
        .insert_header(bearer(&["crm"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], id);
    assert_eq!(body["data"]["first_name"], "Asha");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/contacts/{id}"))
        .insert_header(bearer(&["crm"]))
        .set_json(json!({"city": "Mumbai"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Contact updated successfully");
    assert_eq!(body["data"]["city"], "Mumbai");
    assert_eq!(body["data"]["first_name"], "Asha");

    let req = test::TestRequest::get()
        .uri("/api/v1/contacts?filters=%7B%22city%22%3A%22Mumbai%22%7D")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["contacts"][0]["name"], id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/contacts/{id}"))
        .insert_header(bearer(&["crm", "crm_admin"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/contacts/{id}"))
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_invalid_contact_is_rejected_with_envelope() {
    let test_db = common::TestDb::new("test_invalid_contact_is_rejected_with_envelope.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(bearer(&["crm"]))
        .set_json(json!({"first_name": "Nobody"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("At least one contact method is required")
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts")
        .insert_header(bearer(&["crm"]))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_bulk_delete_requires_admin_role() {
    let test_db = common::TestDb::new("test_bulk_delete_requires_admin_role.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts/bulk/delete")
        .insert_header(bearer(&["crm"]))
        .set_json(json!({"names": [1]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_bulk_create_reports_failures_per_row() {
    let test_db = common::TestDb::new("test_bulk_create_reports_failures_per_row.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/contacts/bulk/create")
        .insert_header(bearer(&["crm", "crm_admin"]))
        .set_json(json!({"contacts": [
            {"first_name": "Bela", "email_id": "bela@example.com"},
            {"first_name": "Chetan"}
        ]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["success_count"], 1);
    assert_eq!(body["data"]["failed_count"], 1);
    assert_eq!(body["message"], "Created 1 contacts, 1 failed");
}

#[actix_web::test]
async fn test_saved_view_round_trip() {
    let test_db = common::TestDb::new("test_saved_view_round_trip.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/views/Contact")
        .insert_header(bearer(&["crm"]))
        .set_json(json!({
            "view_name": "Pune",
            "filters": {"city": "Pune"},
            "fields": ["full_name", "city"],
            "is_default": true
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "View saved successfully");
    let view_id = body["data"]["view_id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/views/Contact")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/views/id/{view_id}"))
        .insert_header(bearer(&["crm"]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "View deleted successfully");
}

#[actix_web::test]
async fn test_unknown_doctype_lists_are_not_found() {
    let test_db = common::TestDb::new("test_unknown_doctype_lists_are_not_found.db");
    let app = app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/v1/list/Invoice")
        .insert_header(bearer(&["crm"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
