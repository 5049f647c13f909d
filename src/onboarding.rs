use axum::debug_handler;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{Organization, Professional, UserType};
use crate::session::CurrentUser;
use crate::{AppError, AppResult, store};

#[derive(Debug, Serialize)]
pub struct OnboardingStep {
    pub id: &'static str,
    pub title: &'static str,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub steps: Vec<OnboardingStep>,
    /// Whole percentage, completed / total * 100.
    pub progress: u8,
}

fn status(steps: Vec<OnboardingStep>) -> OnboardingStatus {
    let completed = steps.iter().filter(|s| s.completed).count();
    let progress = (completed * 100 / steps.len()) as u8;
    OnboardingStatus { steps, progress }
}

/// Checklist for professional accounts. The last two predicates are
/// placeholders, not wired to document or verification state yet.
pub fn professional_status(profile: Option<&Professional>) -> OnboardingStatus {
    status(vec![
        OnboardingStep {
            id: "create_account",
            title: "Create your account",
            completed: true,
        },
        OnboardingStep {
            id: "complete_profile",
            title: "Complete your professional profile",
            completed: profile.is_some_and(|p| !p.specialties.is_empty()),
        },
        OnboardingStep {
            id: "upload_documents",
            title: "Upload your credentials",
            // placeholder: not wired to the documents table
            completed: false,
        },
        OnboardingStep {
            id: "verify_license",
            title: "Get your license verified",
            // placeholder: not wired to verification state
            completed: false,
        },
    ])
}

/// Checklist for organization accounts; same placeholder caveat for the
/// verification and first-posting steps.
pub fn organization_status(profile: Option<&Organization>) -> OnboardingStatus {
    status(vec![
        OnboardingStep {
            id: "create_account",
            title: "Create your account",
            completed: true,
        },
        OnboardingStep {
            id: "complete_profile",
            title: "Complete your organization profile",
            completed: profile.is_some(),
        },
        OnboardingStep {
            id: "get_verified",
            title: "Get your organization verified",
            // placeholder: not wired to verification state
            completed: false,
        },
        OnboardingStep {
            id: "contact_professionals",
            title: "Reach out to your first professional",
            // placeholder: not wired to message history
            completed: false,
        },
    ])
}

#[debug_handler(state = crate::AppState)]
pub async fn progress(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<OnboardingStatus>> {
    match user.user_type {
        Some(UserType::Professional) => {
            let profile = store::professionals::find_by_user_id(&db_pool, &user.id).await?;
            Ok(Json(professional_status(profile.as_ref())))
        }
        Some(UserType::Organization) => {
            let profile = store::organizations::find_by_user_id(&db_pool, &user.id).await?;
            Ok(Json(organization_status(profile.as_ref())))
        }
        None => Err(AppError::bad_request("account type not selected")),
    }
}
