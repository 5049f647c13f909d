pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod messages;
pub mod models;
pub mod onboarding;
pub mod organizations;
pub mod professionals;
pub mod session;
pub mod store;
pub mod training;

use axum::extract::FromRef;
use serde_json::Value;
use sqlx::SqlitePool;

pub use error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub clients: auth::Clients,
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> AppResult<String>;
    fn get_obj_field(&self, field: &str) -> AppResult<&Value>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> AppResult<String> {
        Ok(self
            .get(field)
            .ok_or(format!("expected {field} in provider response"))?
            .as_str()
            .ok_or(format!("expected {field} in provider response to be a string"))?
            .to_owned())
    }

    fn get_obj_field(&self, field: &str) -> AppResult<&Value> {
        self.get(field)
            .ok_or(format!("expected {field} in provider response").into())
    }
}
