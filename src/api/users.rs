use actix_web::{error::InternalError, error::JsonPayloadError, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::{
    models::{parse_user_id, QueryLog, UpdateUserRequest, User, UserForm},
    services::{user_service, Operation},
    state::AppState,
    utils::AppError,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OperationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListUsersResponse {
    pub success: bool,
    pub users: Vec<User>,
    pub count: usize,
    /// Only the first scan page was returned.
    pub truncated: bool,
    /// Stored items left out because they are not readable users.
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn failure(op: Operation, err: &AppError) -> HttpResponse {
    let body = OperationResponse {
        success: false,
        message: None,
        error: Some(match err {
            AppError::Validation(msg) => msg.clone(),
            AppError::RemoteService { .. } => op.failure_message(err),
        }),
    };

    if err.is_validation() {
        log::warn!("⚠️ {} rejected: {}", op.title(), err);
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

fn success(op: Operation, user_id: i64) -> HttpResponse {
    HttpResponse::Ok().json(OperationResponse {
        success: true,
        message: op.success_message(user_id),
        error: None,
    })
}

/// Unreadable JSON bodies get the same `{success, error}` shape as validation failures.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ {} {} - bad JSON body: {}", req.method(), req.path(), err);
    let body = OperationResponse {
        success: false,
        message: None,
        error: Some(format!("Invalid request body: {}", err)),
    };
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserForm,
    responses(
        (status = 200, description = "User written (replaces an existing UserID)", body = OperationResponse),
        (status = 400, description = "Missing field or non-integer UserID", body = OperationResponse),
        (status = 500, description = "Store error", body = OperationResponse)
    )
)]
pub async fn create_user(state: web::Data<AppState>, request: web::Json<UserForm>) -> HttpResponse {
    log::info!("📝 POST /api/v1/users - user_id: {}", request.user_id);

    let user = match request.validate() {
        Ok(user) => user,
        Err(e) => return failure(Operation::Add, &e),
    };

    match user_service::add_user(state.table(), &state.last_query, &user).await {
        Ok(()) => success(Operation::Add, user.user_id),
        Err(e) => failure(Operation::Add, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "First scan page of users", body = ListUsersResponse),
        (status = 500, description = "Store error; users is empty", body = ListUsersResponse)
    )
)]
pub async fn list_users(state: web::Data<AppState>) -> HttpResponse {
    log::info!("📋 GET /api/v1/users");

    match user_service::view_users(state.table(), &state.last_query).await {
        Ok(page) => HttpResponse::Ok().json(ListUsersResponse {
            success: true,
            count: page.items.len(),
            users: page.items,
            truncated: page.truncated,
            skipped: page.skipped,
            error: None,
        }),
        Err(e) => HttpResponse::InternalServerError().json(ListUsersResponse {
            success: false,
            users: Vec::new(),
            count: 0,
            truncated: false,
            skipped: 0,
            error: Some(Operation::View.failure_message(&e)),
        }),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i64, Path, description = "UserID of the record")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated (created if missing)", body = OperationResponse),
        (status = 400, description = "Missing field or non-integer UserID", body = OperationResponse),
        (status = 500, description = "Store error", body = OperationResponse)
    )
)]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    log::info!("🔧 PUT /api/v1/users/{}", user_id);

    let request = request.into_inner();
    let form = UserForm {
        user_id: user_id.into_inner(),
        first_name: request.first_name,
        email: request.email,
    };
    let user = match form.validate() {
        Ok(user) => user,
        Err(e) => return failure(Operation::Update, &e),
    };

    match user_service::update_user(state.table(), &state.last_query, &user).await {
        Ok(()) => success(Operation::Update, user.user_id),
        Err(e) => failure(Operation::Update, &e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i64, Path, description = "UserID of the record")),
    responses(
        (status = 200, description = "User deleted (or was never there)", body = OperationResponse),
        (status = 400, description = "Non-integer UserID", body = OperationResponse),
        (status = 500, description = "Store error", body = OperationResponse)
    )
)]
pub async fn delete_user(state: web::Data<AppState>, user_id: web::Path<String>) -> HttpResponse {
    log::info!("🗑️  DELETE /api/v1/users/{}", user_id);

    let user_id = match parse_user_id(&user_id) {
        Ok(id) => id,
        Err(e) => return failure(Operation::Delete, &e),
    };

    match user_service::delete_user(state.table(), &state.last_query, user_id).await {
        Ok(()) => success(Operation::Delete, user_id),
        Err(e) => failure(Operation::Delete, &e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/queries/last",
    tag = "Users",
    responses(
        (status = 200, description = "Shape of the last request sent to the store", body = QueryLog),
        (status = 204, description = "No request sent yet")
    )
)]
pub async fn last_query(state: web::Data<AppState>) -> HttpResponse {
    match state.last_query.get() {
        Some(q) => HttpResponse::Ok().json(q),
        None => HttpResponse::NoContent().finish(),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .route("", web::post().to(create_user))
            .route("", web::get().to(list_users))
            .route("/{user_id}", web::put().to(update_user))
            .route("/{user_id}", web::delete().to(delete_user)),
    )
    .route("/api/v1/queries/last", web::get().to(last_query));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryTable, UserTable, USERS_TABLE};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_scenario_create_update_delete() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"user_id": "1", "first_name": "Alice", "email": "a@x.com"}))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp, json!({"success": true, "message": "User 1 added successfully!"}));

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["users"], json!([{"UserID": 1, "FirstName": "Alice", "Email": "a@x.com"}]));

        let req = test::TestRequest::put()
            .uri("/api/v1/users/1")
            .set_json(json!({"first_name": "Alicia", "email": "alicia@x.com"}))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["success"], true);

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["users"], json!([{"UserID": 1, "FirstName": "Alicia", "Email": "alicia@x.com"}]));

        let req = test::TestRequest::delete().uri("/api/v1/users/1").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["message"], "User 1 deleted successfully!");

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["users"], json!([]));
        assert_eq!(resp["count"], 0);

        let req = test::TestRequest::get().uri("/api/v1/queries/last").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["operation"], "Scan");
    }

    #[actix_web::test]
    async fn test_list_flags_truncated_scan() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        for id in 1..=3 {
            table.put_item(&User::new(id, "N", "n@x.com")).await.unwrap();
        }
        table.limit_page(Some(1));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table))).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["truncated"], true);
        assert_eq!(resp["count"], 1);
        assert_eq!(resp["skipped"], 0);
    }

    #[actix_web::test]
    async fn test_numeric_user_id_is_accepted() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table.clone()))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"user_id": 1, "first_name": "Alice", "email": "a@x.com"}))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp, json!({"success": true, "message": "User 1 added successfully!"}));
        assert_eq!(table.snapshot().await, vec![User::new(1, "Alice", "a@x.com")]);
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_json_error_body() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table.clone()))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"user_id": {"nested": true}, "first_name": "Alice", "email": "a@x.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

        let req = test::TestRequest::put()
            .uri("/api/v1/users/1")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(table.snapshot().await.is_empty());
    }

    #[actix_web::test]
    async fn test_validation_is_bad_request() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table.clone()))).configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"user_id": "one", "first_name": "Alice", "email": "a@x.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete().uri("/api/v1/users/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/v1/queries/last").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(table.snapshot().await.is_empty());
    }

    #[actix_web::test]
    async fn test_remote_failure_is_server_error() {
        let table = Arc::new(MemoryTable::new(USERS_TABLE));
        table.fail_with(Some("throttled"));
        let app = test::init_service(
            App::new().app_data(web::Data::new(AppState::new(table))).configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["users"], json!([]));
        assert_eq!(body["error"], "Error retrieving users: throttled");

        let req = test::TestRequest::delete().uri("/api/v1/users/3").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
