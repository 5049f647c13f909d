use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::Document;

use super::{new_id, now};

const DOC_COLS: &str = "id, professional_id, file_name, file_url, doc_type, verified, created_at";

/// Reference to an already-uploaded file; storage itself lives elsewhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub doc_type: Option<String>,
}

/// Inserts with `verified=0`; the flag is toggled by an external reviewer,
/// never through this API.
pub async fn create(
    db_pool: &SqlitePool,
    professional_id: &str,
    new: NewDocument,
) -> sqlx::Result<Document> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO documents (id, professional_id, file_name, file_url, doc_type, \
         created_at) VALUES (?,?,?,?,?,?)",
    )
    .bind(&id)
    .bind(professional_id)
    .bind(&new.file_name)
    .bind(&new.file_url)
    .bind(&new.doc_type)
    .bind(now())
    .execute(db_pool)
    .await?;

    sqlx::query_as::<_, Document>(&format!("SELECT {DOC_COLS} FROM documents WHERE id=?"))
        .bind(&id)
        .fetch_one(db_pool)
        .await
}

pub async fn list_by_professional(
    db_pool: &SqlitePool,
    professional_id: &str,
) -> sqlx::Result<Vec<Document>> {
    sqlx::query_as::<_, Document>(&format!(
        "SELECT {DOC_COLS} FROM documents WHERE professional_id=? ORDER BY created_at DESC"
    ))
    .bind(professional_id)
    .fetch_all(db_pool)
    .await
}
