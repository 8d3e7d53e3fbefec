//! Main Encore client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, ErrorBody, LoginRequest, LoginResponse};
use async_trait::async_trait;
use encore_core::{Account, AccountApi, Registration};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the Encore music service.
///
/// Holds the base URL and the bearer token obtained at login. Cloning is
/// cheap and clones share the token.
///
/// # Example
///
/// ```ignore
/// use encore_client::{ClientConfig, EncoreClient};
///
/// let client = EncoreClient::new(ClientConfig::new("http://localhost:5000"))?;
/// client.login("listener@example.com", "hunter22").await?;
///
/// let liked = client.get_liked_songs().await?;
/// println!("{} liked songs", liked.len());
/// ```
#[derive(Clone)]
pub struct EncoreClient {
    pub(crate) http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl EncoreClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let normalized_config = ClientConfig {
            url,
            token: config.token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Encore/{} (Terminal)", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has a token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.token.is_some()
    }

    /// Get the current token.
    pub async fn token(&self) -> Option<String> {
        self.config.read().await.token.clone()
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        self.config.write().await.token = Some(token.into());
    }

    /// Clear the stored token (logout).
    pub async fn logout(&self) {
        self.config.write().await.token = None;
        info!("Logged out");
    }

    /// Login with email and password.
    ///
    /// On success, the token is stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("/api/auth/login").await;
        debug!(url = %url, email = %email, "Attempting login");

        let request = LoginRequest { email, password };
        let response = send(self.http.post(&url).json(&request)).await?;

        let status = response.status();
        if status.as_u16() == 401 {
            let message = error_message(response).await;
            warn!(status = %status, error = %message, "Login failed: invalid credentials");
            return Err(ClientError::AuthFailed(message));
        }

        let login: LoginResponse = parse_json(response, "login response").await?;
        info!(name = ?login.name, is_admin = login.is_admin, "Login successful");

        self.config.write().await.token = Some(login.token.clone());
        Ok(login)
    }

    /// Create an account.
    ///
    /// Email and password are checked locally with the server's rules
    /// first. On success the issued token is stored, as after `login`.
    pub async fn register(&self, registration: &Registration) -> Result<LoginResponse> {
        validate_registration(registration)?;

        let url = self.endpoint("/api/auth/register").await;
        debug!(url = %url, email = %registration.email, "Registering account");

        let response = send(self.http.post(&url).json(registration)).await?;

        let status = response.status();
        if status.as_u16() == 400 {
            let message = error_message(response).await;
            warn!(status = %status, error = %message, "Registration rejected");
            return Err(ClientError::RegistrationFailed(message));
        }

        let login: LoginResponse = parse_json(response, "register response").await?;
        info!(name = ?login.name, "Account created");

        self.config.write().await.token = Some(login.token.clone());
        Ok(login)
    }

    /// Absolute URL for an API path.
    pub(crate) async fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.read().await.url, path)
    }

    /// Absolute URL plus the token, failing fast when signed out.
    pub(crate) async fn authorized(&self, path: &str) -> Result<(String, String)> {
        let config = self.config.read().await;
        let token = config.token.clone().ok_or(ClientError::AuthRequired)?;
        let url = format!("{}{}", config.url, path);
        drop(config);

        Ok((url, token))
    }

    /// Attach the token when there is one; public endpoints accept both.
    pub(crate) async fn with_optional_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for EncoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoreClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl AccountApi for EncoreClient {
    async fn register(&self, registration: &Registration) -> encore_core::Result<Account> {
        Ok(Self::register(self, registration).await?.into())
    }

    async fn login(&self, email: &str, password: &str) -> encore_core::Result<Account> {
        Ok(Self::login(self, email, password).await?.into())
    }
}

/// Lowercase `local@domain.tld` and a password of at least 8 characters.
pub(crate) fn validate_registration(registration: &Registration) -> Result<()> {
    if !is_valid_email(&registration.email) {
        return Err(ClientError::InvalidInput(
            "Email must be lowercase and valid".to_string(),
        ));
    }

    if registration.password.chars().count() < 8 {
        return Err(ClientError::InvalidInput(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_lowercase());

    local_ok && host_ok && tld_ok
}

/// Send a request, classifying transport failures.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    })
}

/// Decode a successful JSON response or turn a failed one into an error.
pub(crate) async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Map non-2xx statuses to errors, passing successful responses through.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 {
        Err(ClientError::AuthRequired)
    } else {
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }
}

/// `message` field of a JSON error body, or the raw text.
async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message)
}
