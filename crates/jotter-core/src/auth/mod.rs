//! Auth client for the notes API: login, registration, token refresh.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{normalize_api_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::session::{Session, SessionContext, TokenStore};
use crate::util::parse_api_error;

#[derive(Clone)]
pub struct AuthClient<S: TokenStore> {
    api_base_url: String,
    client: Client,
    session: SessionContext<S>,
}

impl<S: TokenStore> AuthClient<S> {
    pub fn new(config: &ClientConfig, session: SessionContext<S>) -> Result<Self> {
        let api_base_url = normalize_api_base_url(&config.api_base_url)?;
        Ok(Self {
            api_base_url,
            client: Client::builder().timeout(config.request_timeout()).build()?,
            session,
        })
    }

    pub const fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    /// Exchange credentials for a token pair and store both tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let request = self
            .client
            .post(format!("{}/login/", self.api_base_url))
            .json(&Credentials { email, password });
        let session = self
            .send_json::<LoginResponse>(request)
            .await
            .map_err(into_auth_error)?
            .into_session();

        self.session.store_session(&session)?;
        tracing::debug!("Stored session tokens after login");
        Ok(session)
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// Login is not attempted when registration fails.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let request = self
            .client
            .post(format!("{}/register/", self.api_base_url))
            .json(&Registration {
                email,
                password,
                username: email,
            });
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Registration(parse_api_error(status, &body)));
        }

        self.login(email, password).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Nothing calls this automatically when an access token expires.
    pub async fn refresh_token(&self) -> Result<String> {
        let refresh = self
            .session
            .refresh_token()?
            .ok_or_else(|| Error::Auth("No refresh token found".to_string()))?;

        let request = self
            .client
            .post(format!("{}/token/refresh/", self.api_base_url))
            .json(&RefreshRequest { refresh: &refresh });
        let response = self
            .send_json::<RefreshResponse>(request)
            .await
            .map_err(into_auth_error)?;

        self.session.store_access_token(&response.access)?;
        Ok(response.access)
    }

    /// Stored access token, without touching the network.
    pub fn get_token(&self) -> Result<Option<String>> {
        self.session.access_token()
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get_token()?.is_some())
    }

    /// Clear the stored access token. The refresh token stays stored.
    pub fn logout(&self) -> Result<()> {
        self.session.clear_access_token()?;
        tracing::debug!("Cleared access token");
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch {
                status: status.as_u16(),
                message: parse_api_error(status, &body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn into_auth_error(error: Error) -> Error {
    match error {
        Error::Fetch { message, .. } => Error::Auth(message),
        other => other,
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::Auth("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::Auth("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    username: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

impl LoginResponse {
    fn into_session(self) -> Session {
        Session {
            access: self.access,
            refresh: self.refresh,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}
