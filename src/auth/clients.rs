use std::fmt;

use oauth2::{AuthUrl, Client, ClientId, ClientSecret, RedirectUrl, TokenUrl, basic::BasicClient};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppResult, GetField};

type HappyClient = Client<
    oauth2::StandardErrorResponse<oauth2::basic::BasicErrorResponseType>,
    oauth2::StandardTokenResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    oauth2::StandardTokenIntrospectionResponse<
        oauth2::EmptyExtraTokenFields,
        oauth2::basic::BasicTokenType,
    >,
    oauth2::StandardRevocableToken,
    oauth2::StandardErrorResponse<oauth2::RevocationErrorResponseType>,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ClientProvider {
    Google,
    Github,
}

impl ClientProvider {
    pub fn id(&self) -> &str {
        use ClientProvider::*;
        match self {
            Google => "google.com",
            Github => "github.com",
        }
    }

    fn endpoints(&self) -> (&'static str, &'static str) {
        use ClientProvider::*;
        match self {
            Google => (
                "https://accounts.google.com/o/oauth2/auth",
                "https://oauth2.googleapis.com/token",
            ),
            Github => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
            ),
        }
    }

    fn key(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "google",
            Github => "github",
        }
    }
}

impl fmt::Display for ClientProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Identity-provider client registry, built once at startup from the
/// secrets file. Providers with no keys supplied stay `None` and fail at
/// login time with a clear message.
#[derive(Clone)]
pub struct Clients {
    pub(crate) identity_url: String,
    google_client: Option<HappyClient>,
    github_client: Option<HappyClient>,
}

impl Clients {
    pub fn from_json(json: Value, base_url: &str) -> AppResult<Clients> {
        let identity_url = format!(
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithIdp?key={}",
            json.get_obj_field("firebase")?.get_str_field("apikey")?
        );

        Ok(Clients {
            identity_url,
            google_client: build_client(&json, ClientProvider::Google, base_url)?,
            github_client: build_client(&json, ClientProvider::Github, base_url)?,
        })
    }

    pub fn get_client(&self, provider: ClientProvider) -> AppResult<HappyClient> {
        use ClientProvider::*;
        match provider {
            Google => self.google_client.clone(),
            Github => self.github_client.clone(),
        }
        .ok_or(format!("OAuth provider {provider} keys not supplied").into())
    }
}

fn build_client(
    json: &Value,
    provider: ClientProvider,
    base_url: &str,
) -> AppResult<Option<HappyClient>> {
    let Some(json) = json.get(provider.key()) else {
        return Ok(None);
    };

    let client_id = ClientId::new(json.get_str_field("client_id")?);
    let client_secret = ClientSecret::new(json.get_str_field("client_secret")?);

    let (auth_url, token_url) = provider.endpoints();
    let auth_url = AuthUrl::new(auth_url.to_owned()).map_err(anyhow::Error::from)?;
    let token_url = TokenUrl::new(token_url.to_owned()).map_err(anyhow::Error::from)?;
    let redirect_url = RedirectUrl::new(format!("{base_url}/lockin/{}", provider.key()))
        .map_err(anyhow::Error::from)?;

    Ok(Some(
        BasicClient::new(client_id)
            .set_client_secret(client_secret)
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url),
    ))
}
