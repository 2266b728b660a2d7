//! User CRUD handlers.
//!
//! ```text
//! POST   /user/            {"name":"Ada","email":"ada@example.com"} -> {"user_id":1}
//! GET    /user/{user_id}   -> {"name":"Ada","email":"ada@example.com"}
//! PUT    /user/{user_id}   {"name":"Ada","email":"ada@example.com"} -> same body
//! DELETE /user/{user_id}   -> "OK"
//! ```
//!
//! Handlers only translate between HTTP and the user ports on
//! [`HttpState`]; validation and uniqueness live in the domain service.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::state::HttpState;

/// Body returned by `POST /user/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedUser {
    /// Store-assigned identifier of the new user.
    #[schema(example = 1)]
    pub user_id: i64,
}

/// Body returned by `DELETE /user/{user_id}`.
pub const DELETED: &str = "OK";

/// Register the user handlers and their extractor error handlers on a
/// scope mounted at `/user`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_registry::inbound::http::users;
///
/// let _app = App::new().service(web::scope("/user").configure(users::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/user/",
    request_body = UserProfile,
    responses(
        (status = 200, description = "User created", body = CreatedUser),
        (status = 400, description = "Invalid name, email, or body", body = Error),
        (status = 401, description = "Missing or wrong API key", body = Error),
        (status = 409, description = "Email already in use", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserProfile>,
) -> ApiResult<web::Json<CreatedUser>> {
    let id = state.users.create_user(payload.into_inner()).await?;
    Ok(web::Json(CreatedUser { user_id: id.get() }))
}

/// Fetch a user's name and email.
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 400, description = "Non-integer user id", body = Error),
        (status = 401, description = "Missing or wrong API key", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.users_query.get_user(path.into_inner()).await?;
    Ok(web::Json(profile))
}

/// Replace a user's name and email.
#[utoipa::path(
    put,
    path = "/user/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    request_body = UserProfile,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid name, email, body, or id", body = Error),
        (status = 401, description = "Missing or wrong API key", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 409, description = "Email already in use", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
    payload: web::Json<UserProfile>,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state
        .users
        .update_user(path.into_inner(), payload.into_inner())
        .await?;
    Ok(web::Json(profile))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/user/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User removed", body = String),
        (status = 400, description = "Non-integer user id", body = Error),
        (status = 401, description = "Missing or wrong API key", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<&'static str>> {
    state.users.delete_user(path.into_inner()).await?;
    Ok(web::Json(DELETED))
}
