//! Bank API client
//!
//! Joins paths to the configured base URL, attaches the customer's bearer
//! token (refreshing it through the [`TokenManager`] when it has expired),
//! and unwraps the `Data` member of the response envelope.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tochka_core::{TokenError, TokenManager, TokenStore};
use tochka_domain::constants::DEFAULT_USER_AGENT;
use tochka_domain::{
    Config, ConsentsResponse, CustomerMode, CustomerTokens, Envelope, Permission, RequestEnvelope,
    TokenGrant, TokenKind,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::customer::CustomerApi;
use super::errors::ApiError;
use super::oauth::{id_token_subject, AuthorizationOptions, OAuthClient};
use crate::http::HttpClient;

/// Who authorizes a request
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// No `Authorization` header.
    None,
    /// A token obtained elsewhere, e.g. the client-credentials token.
    Bearer(String),
    /// The live access token of this customer.
    Customer(String),
}

/// A single call to the bank API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    auth: RequestAuth,
}

impl ApiRequest {
    /// Unauthenticated request; `path` is relative to the base URL.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, auth: RequestAuth::None }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`; never retried.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send `data` wrapped in the `{"Data": ..}` envelope.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`] if `data` does not serialize to JSON.
    pub fn json<T: Serialize>(mut self, data: T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(RequestEnvelope::new(data))
            .map_err(|e| ApiError::InvalidInput(format!("request body: {e}")))?;
        self.body = Some(body);
        Ok(self)
    }

    /// Choose who authorizes the request.
    #[must_use]
    pub fn auth(mut self, auth: RequestAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Path as given, before joining to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// When the consents being requested stop being valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentExpiration {
    At(DateTime<Utc>),
    In(Duration),
}

impl ConsentExpiration {
    fn resolve(self) -> DateTime<Utc> {
        match self {
            Self::At(at) => at,
            Self::In(ttl) => chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// How [`TochkaClient::exchange_code`] learns whose tokens it receives
#[derive(Debug, Clone)]
pub enum CustomerIdentity {
    /// Customer code known in advance.
    Code(String),
    /// `id_token` returned on the redirect; its `sub` claim is the customer.
    IdToken(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsentRequest<'a> {
    permissions: &'a [Permission],
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date_time: Option<String>,
}

/// Tochka Bank API client
pub struct TochkaClient {
    http: HttpClient,
    oauth: Arc<OAuthClient>,
    tokens: Arc<TokenManager>,
    base_url: String,
    customer_mode: CustomerMode,
    deadline: Duration,
    active_customer: RwLock<Option<String>>,
}

impl TochkaClient {
    /// Create a client whose token cache is persisted in `store`
    ///
    /// The store is read on the first token access;
    /// [`TochkaClient::initialize`] reads it eagerly and selects the customer.
    ///
    /// # Errors
    /// [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.http.timeout())
            .max_attempts(config.http.max_attempts)
            .user_agent(config.http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        let oauth = Arc::new(OAuthClient::new(
            http.clone(),
            config.client.auth_url.clone(),
            config.client.client_id.clone(),
            config.client.client_secret.clone(),
            config.client.redirect_uri.clone(),
        ));
        let tokens = Arc::new(TokenManager::new(store, oauth.clone(), config.safety_margin()));
        let attempts = u32::try_from(config.http.max_attempts.max(1)).unwrap_or(u32::MAX);

        Ok(Self {
            http,
            oauth,
            tokens,
            base_url: config.client.base_url.trim_end_matches('/').to_string(),
            customer_mode: config.client.customer_mode,
            deadline: config.http.timeout().saturating_mul(attempts.saturating_add(1)),
            active_customer: RwLock::new(None),
        })
    }

    /// Load the token cache
    ///
    /// In single-customer mode a cache holding exactly one authorized
    /// customer selects it; entries with only a client token are ignored.
    /// Returns the number of customers loaded.
    pub async fn initialize(&self) -> Result<usize, ApiError> {
        let count = self.tokens.load().await?;
        if self.customer_mode == CustomerMode::Single {
            let customers = self.tokens.authorized_customers().await;
            if let [only] = customers.as_slice() {
                info!(customer = %only, "Selected the only cached customer");
                *self.active_customer.write().await = Some(only.clone());
            }
        }
        Ok(count)
    }

    /// The token cache shared with every customer handle.
    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// The identity server client.
    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub const fn customer_mode(&self) -> CustomerMode {
        self.customer_mode
    }

    /// The customer requests are bound to in single-customer mode.
    pub async fn active_customer(&self) -> Option<String> {
        self.active_customer.read().await.clone()
    }

    /// Bind handles without an explicit code to `customer`.
    pub async fn set_active_customer(&self, customer: impl Into<String>) {
        *self.active_customer.write().await = Some(customer.into());
    }

    /// Endpoints bound to the active customer.
    pub fn api(&self) -> CustomerApi<'_> {
        CustomerApi::new(self, None)
    }

    /// Endpoints bound to `customer_code`.
    pub fn customer(&self, customer_code: impl Into<String>) -> CustomerApi<'_> {
        CustomerApi::new(self, Some(customer_code.into()))
    }

    /// Customer a handle without an explicit code acts for.
    pub(crate) async fn resolve_customer(&self, explicit: Option<&str>) -> Result<String, ApiError> {
        if let Some(customer) = explicit {
            return Ok(customer.to_string());
        }
        match self.customer_mode {
            CustomerMode::Multi => Err(TokenError::NoCustomerSelected.into()),
            CustomerMode::Single => {
                self.active_customer().await.ok_or_else(|| TokenError::NoCustomerSelected.into())
            }
        }
    }

    /// Join `path` to the base URL; absolute URLs are used as-is.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Execute `request` and parse the `Data` of a 200 response as `T`
    ///
    /// # Errors
    /// - [`ApiError::Unauthorized`] / [`ApiError::Server`] / [`ApiError::Status`]
    ///   for any other status
    /// - [`ApiError::Token`] when the customer has no usable token
    /// - [`ApiError::Decode`] when the body does not match `T`
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let url = self.resolve_url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        match &request.auth {
            RequestAuth::None => {}
            RequestAuth::Bearer(token) => builder = builder.bearer_auth(token),
            RequestAuth::Customer(customer) => {
                let token = self.tokens.access_token(customer).await?;
                builder = builder.bearer_auth(token);
            }
        }

        debug!(url = %url, "Sending API request");
        let response = tokio::time::timeout(self.deadline, self.http.send(builder))
            .await
            .map_err(|_| ApiError::Timeout(self.deadline))??;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if status != StatusCode::OK {
            warn!(%status, url = %url, "API request failed");
            return Err(ApiError::from_response(status, &body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("{}: {e}", request.path)))?;
        debug!(url = %url, "API request successful");
        Ok(envelope.data)
    }

    /// Obtain a `client_credentials` token for creating consents.
    pub async fn request_client_token(&self) -> Result<TokenGrant, ApiError> {
        self.oauth.client_credentials().await
    }

    /// Ask the bank for a consent covering `permissions`
    ///
    /// The customer then signs it at [`TochkaClient::authorization_url`].
    #[instrument(skip(self, client_token, permissions), fields(permissions = permissions.len()))]
    pub async fn create_consents(
        &self,
        client_token: &str,
        permissions: &[Permission],
        expiration: Option<ConsentExpiration>,
    ) -> Result<ConsentsResponse, ApiError> {
        let body = ConsentRequest {
            permissions,
            expiration_date_time: expiration
                .map(|e| e.resolve().to_rfc3339_opts(SecondsFormat::Secs, false)),
        };
        let request = ApiRequest::post("/v1.0/consents")
            .json(body)?
            .auth(RequestAuth::Bearer(client_token.to_string()));

        let consents: ConsentsResponse = self.execute(request).await?;
        info!(consent_id = %consents.consent_id, "Consent created");
        Ok(consents)
    }

    /// URL the customer opens to sign `consent_id`.
    pub fn authorization_url(
        &self,
        consent_id: &str,
        options: &AuthorizationOptions,
    ) -> Result<String, ApiError> {
        self.oauth.authorization_url(consent_id, options)
    }

    /// Exchange the redirect `code` for the customer's tokens and cache them
    ///
    /// In single-customer mode the customer becomes the active one.
    #[instrument(skip(self, code, identity))]
    pub async fn exchange_code(
        &self,
        code: &str,
        identity: CustomerIdentity,
        redirect_uri: Option<&str>,
    ) -> Result<CustomerTokens, ApiError> {
        let customer = match identity {
            CustomerIdentity::Code(customer) => customer,
            CustomerIdentity::IdToken(id_token) => id_token_subject(&id_token)?,
        };

        let grant = self.oauth.authorization_code(code, redirect_uri).await?;
        let tokens = self.tokens.set_grant(&customer, &grant).await?;

        if self.customer_mode == CustomerMode::Single {
            self.set_active_customer(customer.clone()).await;
        }
        info!(customer = %customer, "Customer authorized");
        Ok(tokens)
    }

    /// Refresh and cache `customer`'s tokens.
    pub async fn refresh(&self, customer: &str) -> Result<CustomerTokens, ApiError> {
        Ok(self.tokens.refresh(customer).await?)
    }

    /// Raw `refresh_token` grant; the cache is not touched.
    pub async fn refresh_with(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        self.oauth.refresh_grant(refresh_token).await
    }

    /// Whether the identity server still accepts `access_token`.
    pub async fn introspect(&self, access_token: &str) -> Result<bool, ApiError> {
        self.oauth.introspect(access_token).await
    }

    /// Introspect the cached access token of `customer`.
    pub async fn introspect_customer(&self, customer: &str) -> Result<bool, ApiError> {
        let tokens = self.tokens.get(customer, false).await?;
        let access =
            tokens.access.ok_or_else(|| TokenError::NoAccessToken(customer.to_string()))?;
        self.introspect(&access.secret).await
    }

    /// Cached client-credentials token, requested anew once expired.
    pub(crate) async fn client_token_for(&self, customer: &str) -> Result<String, ApiError> {
        if let Some(secret) = self.tokens.get(customer, true).await?.live_secret(TokenKind::Client) {
            return Ok(secret.to_string());
        }
        let grant = self.request_client_token().await?;
        self.tokens
            .set(customer, TokenKind::Client, grant.access_token.clone(), grant.expires_in())
            .await?;
        Ok(grant.access_token)
    }
}

impl std::fmt::Debug for TochkaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TochkaClient")
            .field("base_url", &self.base_url)
            .field("customer_mode", &self.customer_mode)
            .field("oauth", &self.oauth)
            .finish_non_exhaustive()
    }
}
