use crate::models::{DeleteForm, QueryLog, User, UserForm};
use crate::services::Operation;
use crate::utils::{html::escape, AppError};

pub const APP_TITLE: &str = "DynamoDB User Management System";
pub const NO_USERS_FOUND: &str = "No users found";
pub const FIRST_PAGE_ONLY: &str =
    "The table holds more users than one scan returns; only the first page is shown";

pub fn skipped_items(count: usize) -> String {
    format!("{} stored item(s) could not be read as users and were left out", count)
}

const MENU: [(Operation, &str); 4] = [
    (Operation::Add, "/add"),
    (Operation::View, "/view"),
    (Operation::Update, "/update"),
    (Operation::Delete, "/delete"),
];

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:20rem;min-height:100vh;background:#f0f2f6;padding:1rem}\
main{flex:1;padding:1rem 2rem}\
aside a{display:block;padding:.25rem 0}aside a.active{font-weight:bold}\
pre{background:#fff;padding:.5rem;overflow:auto;font-size:.8rem}\
label{display:block;margin:.5rem 0}input{display:block;width:20rem}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.25rem .5rem}\
.notice{padding:.5rem 1rem;margin:.5rem 0;border-radius:.25rem}\
.success{background:#d4edda}.warning{background:#fff3cd}.error{background:#f8d7da}.info{background:#d1ecf1}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
    Info,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    /// Validation problems are warnings, store failures are errors.
    pub fn from_error(op: Operation, err: &AppError) -> Self {
        match err {
            AppError::Validation(msg) => Notice::warning(msg.clone()),
            AppError::RemoteService { .. } => Notice::error(op.failure_message(err)),
        }
    }
}

/// Full page: sidebar menu + last query, then the section body.
pub fn page(active: Operation, notices: &[Notice], body: &str, last_query: Option<&QueryLog>) -> String {
    let menu: String = MENU
        .iter()
        .map(|(op, href)| {
            let class = if *op == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", href, class, op.title())
        })
        .collect();

    let query_panel = match last_query {
        Some(q) => format!(
            "<h3>Last {} Query</h3><pre id=\"last-query\">{}</pre>",
            escape(&q.operation),
            escape(&q.pretty_params())
        ),
        None => String::new(),
    };

    let notices: String = notices
        .iter()
        .map(|n| {
            format!(
                "<div class=\"notice {}\">{}</div>",
                n.level.css_class(),
                escape(&n.text)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>{style}</style></head><body>\
<aside><h2>Menu</h2><nav>{menu}</nav>{query_panel}</aside>\
<main><h1>{title}</h1>{body}{notices}</main></body></html>",
        title = APP_TITLE,
        style = STYLE,
        menu = menu,
        query_panel = query_panel,
        body = body,
        notices = notices,
    )
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{value}\"></label>",
        label = label,
        name = name,
        value = escape(value)
    )
}

/// Add and Update share the same three fields with different labels.
pub fn user_form(op: Operation, form: &UserForm) -> String {
    let (header, labels, action) = match op {
        Operation::Update => (
            "Update User",
            ["User ID to Update", "New First Name", "New Email"],
            "/update",
        ),
        _ => ("Add New User", ["User ID", "First Name", "Email"], "/add"),
    };

    format!(
        "<h2>{header}</h2><form method=\"post\" action=\"{action}\">{}{}{}\
<button type=\"submit\">{submit}</button></form>",
        text_input("user_id", labels[0], &form.user_id),
        text_input("first_name", labels[1], &form.first_name),
        text_input("email", labels[2], &form.email),
        header = header,
        action = action,
        submit = op.title(),
    )
}

pub fn delete_form(form: &DeleteForm) -> String {
    format!(
        "<h2>Delete User</h2><form method=\"post\" action=\"/delete\">{}\
<button type=\"submit\">{}</button></form>",
        text_input("user_id", "User ID to Delete", &form.user_id),
        Operation::Delete.title()
    )
}

pub fn users_table(users: &[User]) -> String {
    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                u.user_id,
                escape(&u.first_name),
                escape(&u.email)
            )
        })
        .collect();

    format!(
        "<h2>All Users</h2><table><thead><tr><th>UserID</th><th>FirstName</th><th>Email</th></tr></thead>\
<tbody>{}</tbody></table>",
        rows
    )
}
