use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::Professional;
use crate::session::CurrentUser;
use crate::store::professionals;
use crate::{AppError, AppResult};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn me(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Professional>> {
    professionals::find_by_user_id(&db_pool, &user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("professional profile not found"))
}

/// User fields exposed on the public profile page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileUser {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    profile_image_url: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ProfessionalWithUser {
    #[serde(flatten)]
    professional: Professional,
    user: ProfileUser,
}

/// Public endpoint; no session required.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn show(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfessionalWithUser>> {
    let Some((professional, user)) = professionals::find_with_user(&db_pool, &id).await? else {
        return Err(AppError::not_found("professional not found"));
    };

    Ok(Json(ProfessionalWithUser {
        professional,
        user: ProfileUser {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            profile_image_url: user.profile_image_url,
        },
    }))
}
