use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Admin Panel API",
        version = "1.0.0",
        description = "JSON access to the `Users` table behind the admin panel.\n\n**Semantics:**\n- Create replaces an existing UserID (last write wins)\n- Update creates the record when the UserID is missing\n- Delete succeeds whether or not the UserID exists\n- List returns the first scan page only (`truncated` tells you if there is more)"
    ),
    paths(
        crate::api::health::health_check,
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::users::last_query,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::users::OperationResponse,
            crate::api::users::ListUsersResponse,
            crate::models::User,
            crate::models::UserForm,
            crate::models::UpdateUserRequest,
            crate::models::QueryLog,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoint."),
        (name = "Users", description = "Add, view, update and delete users in the `Users` table."),
    )
)]
pub struct ApiDoc;
