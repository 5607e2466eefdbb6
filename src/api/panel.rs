use actix_web::{http::header, web, HttpResponse};

use super::render::{self, Notice, FIRST_PAGE_ONLY, NO_USERS_FOUND};
use crate::{
    models::{DeleteForm, UserForm},
    services::{user_service, Operation},
    state::AppState,
};

fn html(state: &AppState, active: Operation, notices: &[Notice], body: &str) -> HttpResponse {
    let last_query = state.last_query.get();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render::page(active, notices, body, last_query.as_ref()))
}

/// GET / - the panel opens on "Add User"
pub async fn index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/add"))
        .finish()
}

/// GET /add
pub async fn add_form(state: web::Data<AppState>) -> HttpResponse {
    html(&state, Operation::Add, &[], &render::user_form(Operation::Add, &UserForm::default()))
}

/// POST /add
pub async fn add_submit(state: web::Data<AppState>, form: web::Form<UserForm>) -> HttpResponse {
    let form = form.into_inner();
    log::info!("📝 POST /add - user_id: {}", form.user_id);

    let notice = match form.validate() {
        Ok(user) => match user_service::add_user(state.table(), &state.last_query, &user).await {
            Ok(()) => Notice::success(Operation::Add.success_message(user.user_id).unwrap_or_default()),
            Err(e) => Notice::from_error(Operation::Add, &e),
        },
        Err(e) => {
            log::warn!("⚠️ Add rejected: {}", e);
            Notice::from_error(Operation::Add, &e)
        }
    };

    html(&state, Operation::Add, &[notice], &render::user_form(Operation::Add, &form))
}

/// GET /view
pub async fn view(state: web::Data<AppState>) -> HttpResponse {
    log::info!("📋 GET /view");

    let mut notices = Vec::new();
    let users = match user_service::view_users(state.table(), &state.last_query).await {
        Ok(page) => {
            if page.truncated {
                notices.push(Notice::warning(FIRST_PAGE_ONLY));
            }
            if page.skipped > 0 {
                notices.push(Notice::warning(render::skipped_items(page.skipped)));
            }
            page.items
        }
        Err(e) => {
            // A failed scan ends up looking like an empty table, after the error.
            notices.push(Notice::from_error(Operation::View, &e));
            Vec::new()
        }
    };

    let body = if users.is_empty() {
        notices.push(Notice::info(NO_USERS_FOUND));
        "<h2>All Users</h2>".to_string()
    } else {
        render::users_table(&users)
    };

    html(&state, Operation::View, &notices, &body)
}

/// GET /update
pub async fn update_form(state: web::Data<AppState>) -> HttpResponse {
    html(
        &state,
        Operation::Update,
        &[],
        &render::user_form(Operation::Update, &UserForm::default()),
    )
}

/// POST /update
pub async fn update_submit(state: web::Data<AppState>, form: web::Form<UserForm>) -> HttpResponse {
    let form = form.into_inner();
    log::info!("🔧 POST /update - user_id: {}", form.user_id);

    let notice = match form.validate() {
        Ok(user) => match user_service::update_user(state.table(), &state.last_query, &user).await {
            Ok(()) => Notice::success(Operation::Update.success_message(user.user_id).unwrap_or_default()),
            Err(e) => Notice::from_error(Operation::Update, &e),
        },
        Err(e) => {
            log::warn!("⚠️ Update rejected: {}", e);
            Notice::from_error(Operation::Update, &e)
        }
    };

    html(&state, Operation::Update, &[notice], &render::user_form(Operation::Update, &form))
}

/// GET /delete
pub async fn delete_form(state: web::Data<AppState>) -> HttpResponse {
    html(&state, Operation::Delete, &[], &render::delete_form(&DeleteForm::default()))
}

/// POST /delete
pub async fn delete_submit(state: web::Data<AppState>, form: web::Form<DeleteForm>) -> HttpResponse {
    let form = form.into_inner();
    log::info!("🗑️  POST /delete - user_id: {}", form.user_id);

    let notice = match form.validate() {
        Ok(user_id) => match user_service::delete_user(state.table(), &state.last_query, user_id).await {
            Ok(()) => Notice::success(Operation::Delete.success_message(user_id).unwrap_or_default()),
            Err(e) => Notice::from_error(Operation::Delete, &e),
        },
        Err(e) => {
            log::warn!("⚠️ Delete rejected: {}", e);
            Notice::from_error(Operation::Delete, &e)
        }
    };

    html(&state, Operation::Delete, &[notice], &render::delete_form(&form))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/add", web::get().to(add_form))
        .route("/add", web::post().to(add_submit))
        .route("/view", web::get().to(view))
        .route("/update", web::get().to(update_form))
        .route("/update", web::post().to(update_submit))
        .route("/delete", web::get().to(delete_form))
        .route("/delete", web::post().to(delete_submit));
}
