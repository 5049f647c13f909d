use sqlx::SqlitePool;

use crate::models::{Enrollment, TrainingCourse};

use super::{new_id, now};

const COURSE_COLS: &str = "id, title, description, duration, level, featured, created_at";
const ENROLLMENT_COLS: &str = "id, user_id, course_id, completed, enrolled_at";

/// Global catalog, featured entries first.
pub async fn list_courses(db_pool: &SqlitePool) -> sqlx::Result<Vec<TrainingCourse>> {
    sqlx::query_as::<_, TrainingCourse>(&format!(
        "SELECT {COURSE_COLS} FROM training_courses ORDER BY featured DESC, created_at DESC"
    ))
    .fetch_all(db_pool)
    .await
}

pub async fn find_course(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<TrainingCourse>> {
    sqlx::query_as::<_, TrainingCourse>(&format!(
        "SELECT {COURSE_COLS} FROM training_courses WHERE id=?"
    ))
    .bind(id)
    .fetch_optional(db_pool)
    .await
}

/// Idempotent per (user, course): re-enrolling returns the existing record.
pub async fn enroll(
    db_pool: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> sqlx::Result<Enrollment> {
    if let Some(existing) = find_enrollment(db_pool, user_id, course_id).await? {
        return Ok(existing);
    }

    let id = new_id();
    sqlx::query(
        "INSERT INTO enrollments (id, user_id, course_id, completed, enrolled_at) \
         VALUES (?,?,?,0,?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(course_id)
    .bind(now())
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLS} FROM enrollments WHERE id=?"
    ))
    .bind(&id)
    .fetch_one(db_pool)
    .await
}

async fn find_enrollment(
    db_pool: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> sqlx::Result<Option<Enrollment>> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLS} FROM enrollments WHERE user_id=? AND course_id=?"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db_pool)
    .await
}

pub async fn list_enrollments(
    db_pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<Enrollment>> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLS} FROM enrollments WHERE user_id=? ORDER BY enrolled_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db_pool)
    .await
}
