//! OAuth 2.0 endpoints of the bank's identity server
//!
//! All grants post URL-encoded forms to `{auth_url}/token`; introspection
//! posts to `{auth_url}/introspect`. Grants are never retried by the
//! transport, so an authorization code is only ever spent once.

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::{Method, StatusCode};
use tochka_core::{TokenError, TokenRefresher};
use tochka_domain::constants::{
    AUTHORIZE_SCOPE, CLIENT_CREDENTIALS_SCOPE, DEFAULT_RESPONSE_TYPE, REFRESH_SCOPE,
};
use tochka_domain::TokenGrant;
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::http::HttpClient;

/// Options for [`OAuthClient::authorization_url`]
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    /// Overrides the configured redirect URI.
    pub redirect_uri: Option<String>,
    /// Defaults to `code id_token`.
    pub response_type: Option<String>,
    /// Defaults to `accounts cards customers sbp payments`.
    pub scope: Option<String>,
    /// Echoed back on the redirect.
    pub state: Option<String>,
}

impl AuthorizationOptions {
    /// Set the opaque `state` returned with the redirect.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Redirect somewhere other than the configured URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}

/// Client for the token and introspection endpoints
#[derive(Clone)]
pub struct OAuthClient {
    http: HttpClient,
    auth_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: Option<String>,
}

impl OAuthClient {
    /// Client for the identity server at `auth_url`; `redirect_uri` is the
    /// default for authorization URLs and code exchanges.
    pub fn new(
        http: HttpClient,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Option<String>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// `client_credentials` grant; the token is used to create consents.
    #[instrument(skip(self))]
    pub async fn client_credentials(&self) -> Result<TokenGrant, ApiError> {
        self.token(&[("grant_type", "client_credentials"), ("scope", CLIENT_CREDENTIALS_SCOPE)])
            .await
    }

    /// `authorization_code` grant for the code the customer was redirected with.
    #[instrument(skip(self, code))]
    pub async fn authorization_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<TokenGrant, ApiError> {
        let redirect_uri = redirect_uri
            .or(self.redirect_uri.as_deref())
            .ok_or_else(|| ApiError::Config("redirect_uri is not configured".to_string()))?;

        self.token(&[
            ("grant_type", "authorization_code"),
            ("scope", CLIENT_CREDENTIALS_SCOPE),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// `refresh_token` grant.
    #[instrument(skip_all)]
    pub async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        self.token(&[
            ("grant_type", "refresh_token"),
            ("scope", REFRESH_SCOPE),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    /// Whether the identity server still accepts `access_token`.
    #[instrument(skip_all)]
    pub async fn introspect(&self, access_token: &str) -> Result<bool, ApiError> {
        let url = format!("{}/introspect", self.auth_url);
        let request = self.http.request(Method::POST, &url).form(&[("access_token", access_token)]);
        let response = self.http.send(request).await?;

        let active = response.status() == StatusCode::OK;
        debug!(status = %response.status(), active, "Token introspected");
        Ok(active)
    }

    /// URL the customer opens to sign `consent_id`.
    ///
    /// # Errors
    /// [`ApiError::Config`] when the auth URL is invalid or no redirect URI is
    /// known.
    pub fn authorization_url(
        &self,
        consent_id: &str,
        options: &AuthorizationOptions,
    ) -> Result<String, ApiError> {
        let redirect_uri = options
            .redirect_uri
            .as_deref()
            .or(self.redirect_uri.as_deref())
            .ok_or_else(|| ApiError::Config("redirect_uri is not configured".to_string()))?;

        let mut url = Url::parse(&format!("{}/authorize", self.auth_url))
            .map_err(|e| ApiError::Config(format!("invalid auth URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.client_id)
                .append_pair(
                    "response_type",
                    options.response_type.as_deref().unwrap_or(DEFAULT_RESPONSE_TYPE),
                )
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", options.scope.as_deref().unwrap_or(AUTHORIZE_SCOPE))
                .append_pair("consent_id", consent_id);
            if let Some(state) = &options.state {
                query.append_pair("state", state);
            }
        }

        Ok(url.into())
    }

    async fn token(&self, params: &[(&str, &str)]) -> Result<TokenGrant, ApiError> {
        let url = format!("{}/token", self.auth_url);
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        form.extend_from_slice(params);

        let request = self.http.request(Method::POST, &url).form(&form);
        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if status != StatusCode::OK {
            warn!(%status, "Token request rejected");
            return Err(ApiError::from_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("token response: {e}")))
    }
}

/// Customer code carried in the `sub` claim of an `id_token`
///
/// The signature is not verified.
pub fn id_token_subject(id_token: &str) -> Result<String, ApiError> {
    #[derive(serde::Deserialize)]
    struct Claims {
        sub: String,
    }

    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::InvalidInput("id_token is not a JWT".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::InvalidInput(format!("id_token payload: {e}")))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::InvalidInput(format!("id_token claims: {e}")))?;

    Ok(claims.sub)
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[async_trait]
impl TokenRefresher for OAuthClient {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenError> {
        self.refresh_grant(refresh_token).await.map_err(|err| TokenError::RefreshFailed(err.to_string()))
    }
}
