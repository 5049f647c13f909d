use axum::debug_handler;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeVerifier, TokenResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::session::{CSRF_STATE, PKCE_VERIFIER, RETURN_URL, USER_ID};
use crate::store::users::{self, UpsertUser};
use crate::{AppResult, GetField};

use super::clients::{ClientProvider, Clients};

#[derive(Deserialize)]
pub struct LockinQuery {
    pub state: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize)]
struct IdentityRequest {
    post_body: String,
    request_uri: String,
    return_idp_credential: bool,
    return_secure_token: bool,
}

/// OAuth callback: validates CSRF/PKCE, exchanges the code, resolves the
/// identity through the identity toolkit, then creates or refreshes the
/// user row and signs the session in.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn lockin(
    Path(provider): Path<ClientProvider>,
    Query(LockinQuery { state, code }): Query<LockinQuery>,
    State(db_pool): State<SqlitePool>,
    State(clients): State<Clients>,
    session: Session,
) -> AppResult<Redirect> {
    let state = CsrfToken::new(state.ok_or("OAuth: without state")?);
    let code = AuthorizationCode::new(code.ok_or("OAuth: without code")?);

    let Some(stored_state) = session.get::<String>(CSRF_STATE).await? else {
        return Err("no csrf_state")?;
    };
    if state.secret().as_str() != stored_state.as_str() {
        return Err("csrf tokens don't match")?;
    }

    let Some(pkce_verifier) = session.get::<String>(PKCE_VERIFIER).await? else {
        return Err("no pkce_verifier")?;
    };

    let client = clients.get_client(provider)?;
    let http_client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let token_result = client
        .exchange_code(code)
        .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
        .request_async(&http_client)
        .await?;

    let access_token = token_result.access_token().secret();
    let body: serde_json::Value = http_client
        .post(&clients.identity_url)
        .json(&IdentityRequest {
            post_body: format!("access_token={access_token}&providerId={}", provider.id()),
            request_uri: "http://localhost/".to_owned(),
            return_idp_credential: true,
            return_secure_token: true,
        })
        .send()
        .await?
        .json()
        .await?;

    let subject = body.get_str_field("localId")?;
    let display_name = body.get("displayName").and_then(|v| v.as_str());
    let (first_name, last_name) = split_display_name(display_name);

    let user = users::upsert(
        &db_pool,
        UpsertUser {
            provider_subject: subject,
            email: body.get("email").and_then(|v| v.as_str()).map(str::to_owned),
            first_name,
            last_name,
            profile_image_url: body
                .get("photoUrl")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
        },
    )
    .await?;

    session.insert(USER_ID, user.id.clone()).await?;
    info!("signed in u/{}", user.id);

    let return_url: Option<String> = session.get(RETURN_URL).await?;
    Ok(Redirect::to(
        return_url.unwrap_or_else(|| "/".to_owned()).as_str(),
    ))
}

fn split_display_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    match name {
        None | Some("") => (None, None),
        Some(name) => match name.split_once(' ') {
            Some((first, last)) => (Some(first.to_owned()), Some(last.to_owned())),
            None => (Some(name.to_owned()), None),
        },
    }
}
