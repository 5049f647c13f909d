use axum::debug_handler;
use axum::extract::{Path, State};
use axum::Json;
use sqlx::SqlitePool;

use crate::models::{Enrollment, TrainingCourse};
use crate::session::CurrentUser;
use crate::store::training;
use crate::{AppError, AppResult};

/// Public catalog, featured courses first.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn courses(
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Vec<TrainingCourse>>> {
    Ok(Json(training::list_courses(&db_pool).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn enroll(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> AppResult<Json<Enrollment>> {
    if training::find_course(&db_pool, &course_id).await?.is_none() {
        return Err(AppError::not_found("course not found"));
    }

    let enrollment = training::enroll(&db_pool, &user.id, &course_id).await?;
    Ok(Json(enrollment))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn enrollments(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Enrollment>>> {
    Ok(Json(training::list_enrollments(&db_pool, &user.id).await?))
}
