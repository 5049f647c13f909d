use axum::debug_handler;
use axum::extract::State;
use axum::Json;
use sqlx::SqlitePool;

use crate::models::{Document, Professional};
use crate::session::CurrentUser;
use crate::store::documents::{self, NewDocument};
use crate::{AppError, AppResult, store};

async fn own_profile(db_pool: &SqlitePool, user_id: &str) -> AppResult<Professional> {
    store::professionals::find_by_user_id(db_pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("professional profile not found"))
}

/// Records a reference to an already-uploaded file. The file bytes are
/// handled by external storage, not this service.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewDocument>,
) -> AppResult<Json<Document>> {
    let professional = own_profile(&db_pool, &user.id).await?;
    let document = documents::create(&db_pool, &professional.id, body).await?;
    Ok(Json(document))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Document>>> {
    let professional = own_profile(&db_pool, &user.id).await?;
    Ok(Json(
        documents::list_by_professional(&db_pool, &professional.id).await?,
    ))
}
