use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Professional, UserType};
use crate::session::CurrentUser;
use crate::store::professionals::{self, NewProfessional, UpdateProfessional};
use crate::{AppError, AppResult, store};

/// Creates the caller's professional profile and tags the account with the
/// `professional` role, visible on the next /api/auth/user call.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewProfessional>,
) -> AppResult<Json<Professional>> {
    if professionals::find_by_user_id(&db_pool, &user.id)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request("professional profile already exists"));
    }

    store::users::set_user_type(&db_pool, &user.id, UserType::Professional).await?;
    let professional = professionals::create(&db_pool, &user.id, body).await?;

    info!("created professional profile {} for u/{}", professional.id, user.id);
    Ok(Json(professional))
}

/// Owner-only partial update; a mismatched owner gets 403 and no mutation.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn update(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateProfessional>,
) -> AppResult<Json<Professional>> {
    let Some(current) = professionals::find_by_id(&db_pool, &id).await? else {
        return Err(AppError::not_found("professional not found"));
    };

    if current.user_id != user.id {
        return Err(AppError::forbidden("not your profile"));
    }

    let updated = professionals::update(&db_pool, &current, body).await?;
    Ok(Json(updated))
}
