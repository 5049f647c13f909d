use axum::debug_handler;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::Professional;
use crate::session::CurrentUser;
use crate::store::professionals::{self, SearchFilters};
use crate::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    specialty: Option<String>,
    language: Option<String>,
    availability: Option<String>,
    region: Option<String>,
}

impl SearchQuery {
    /// An unrecognized availability value is rejected with 400 rather than
    /// silently matching nothing; an empty one imposes no constraint.
    fn into_filters(self) -> AppResult<SearchFilters> {
        let availability = match self.availability.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse()
                    .map_err(|e| AppError::bad_request(format!("{e}")))?,
            ),
        };

        Ok(SearchFilters {
            specialty: self.specialty,
            language: self.language,
            availability,
            region: self.region,
        })
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn search(
    State(db_pool): State<SqlitePool>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Professional>>> {
    let filters = query.into_filters()?;
    Ok(Json(professionals::search(&db_pool, &filters).await?))
}

/// The unfiltered directory; same ordering as a zero-filter search.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    CurrentUser(_user): CurrentUser,
) -> AppResult<Json<Vec<Professional>>> {
    Ok(Json(
        professionals::search(&db_pool, &SearchFilters::default()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityStatus;

    #[test]
    fn unknown_availability_is_a_client_error() {
        let query = SearchQuery {
            availability: Some("on_vacation".to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filters(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn empty_availability_imposes_no_constraint() {
        let query = SearchQuery {
            availability: Some(String::new()),
            ..Default::default()
        };
        assert!(query.into_filters().unwrap().availability.is_none());
    }

    #[test]
    fn known_availability_parses_exactly() {
        let query = SearchQuery {
            availability: Some("deployment_in_progress".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            query.into_filters().unwrap().availability,
            Some(AvailabilityStatus::DeploymentInProgress)
        );
    }
}
