use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthContext;
use crate::models::{Role, User};
use crate::state::AppState;

pub const USERS_PATH: &str = "/chronograf/v1/users";

#[derive(Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// One user as it appears on the wire. Ids are string-encoded.
#[derive(Serialize)]
pub struct UserResponse {
    links: Links,
    id: String,
    name: String,
    provider: String,
    scheme: String,
    #[serde(rename = "superAdmin")]
    super_admin: bool,
    roles: Vec<Role>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            links: Links {
                self_link: format!("{USERS_PATH}/{}", user.id),
            },
            id: user.id.to_string(),
            name: user.name.clone(),
            provider: user.provider.clone(),
            scheme: user.scheme.clone(),
            super_admin: user.super_admin,
            roles: user.roles_list(),
        }
    }
}

#[derive(Serialize)]
pub struct UsersResponse {
    links: Links,
    users: Vec<UserResponse>,
}

/// List every user with their roles.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let users = state.users.all_users()?;
    Ok(Json(UsersResponse {
        links: Links {
            self_link: USERS_PATH.into(),
        },
        users: users.iter().map(UserResponse::from_user).collect(),
    }))
}

/// Get one user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>> {
    let user = state
        .users
        .user_by_id(id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// The caller's own user record, as resolved by the auth middleware.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<UserResponse> {
    Json(UserResponse::from_user(&ctx.user))
}
