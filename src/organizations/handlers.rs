use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Organization, UserType};
use crate::session::CurrentUser;
use crate::store::organizations::{self, NewOrganization};
use crate::{AppError, AppResult, store};

/// Creates the caller's organization profile and tags the account with the
/// `organization` role.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewOrganization>,
) -> AppResult<Json<Organization>> {
    if organizations::find_by_user_id(&db_pool, &user.id)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request("organization profile already exists"));
    }

    store::users::set_user_type(&db_pool, &user.id, UserType::Organization).await?;
    let organization = organizations::create(&db_pool, &user.id, body).await?;

    info!("created organization {} for u/{}", organization.id, user.id);
    Ok(Json(organization))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn me(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Organization>> {
    organizations::find_by_user_id(&db_pool, &user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("organization profile not found"))
}

/// Public endpoint; no session required.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn show(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> AppResult<Json<Organization>> {
    organizations::find_by_id(&db_pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("organization not found"))
}
