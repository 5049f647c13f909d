use axum::debug_handler;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::models::{User, UserType};
use crate::session::CurrentUser;
use crate::{AppResult, store};

/// The signed-in user with its role profile attached, the shape the client
/// dashboard boots from.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(flatten)]
    pub user: User,
    pub profile_data: Option<Value>,
}

pub(crate) async fn load_profile(db_pool: &SqlitePool, user: &User) -> AppResult<Option<Value>> {
    Ok(match user.user_type {
        Some(UserType::Professional) => store::professionals::find_by_user_id(db_pool, &user.id)
            .await?
            .map(serde_json::to_value)
            .transpose()?,
        Some(UserType::Organization) => store::organizations::find_by_user_id(db_pool, &user.id)
            .await?
            .map(serde_json::to_value)
            .transpose()?,
        None => None,
    })
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn current_user(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<AuthUser>> {
    let profile_data = load_profile(&db_pool, &user).await?;
    Ok(Json(AuthUser { user, profile_data }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetUserTypeBody {
    pub(crate) user_type: UserType,
}

/// Switching between the two roles destructively resets the abandoned
/// role's profile data.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn set_user_type(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SetUserTypeBody>,
) -> AppResult<Json<User>> {
    let updated = store::users::set_user_type(&db_pool, &user.id, body.user_type).await?;
    Ok(Json(updated))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_account(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> AppResult<Json<Value>> {
    store::users::delete_account(&db_pool, &user.id).await?;
    session.clear().await;
    Ok(Json(serde_json::json!({ "success": true })))
}
