mod models;

use crate::common::{Credentials, Token};
use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use models::*;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const TOKEN_PATH: &str = "/oauth2/token";

/// A token with less validity left than this is re-issued before use
pub const REFRESH_MARGIN: Duration = Duration::seconds(180);

/// True when `token` has strictly less than [`REFRESH_MARGIN`] left at `now`.
pub fn needs_refresh(token: &Token, now: DateTime<Utc>) -> bool {
    token.remaining(now) < REFRESH_MARGIN
}

/// Acquires and refreshes bearer tokens with the OAuth2 client-credentials grant.
///
/// The token slot is guarded by an async mutex held across the exchange, so
/// concurrent callers share a single token request.
pub struct TokenManager {
    http_client: Client,
    token_url: String,
    credentials: Credentials,
    token: Mutex<Option<Arc<Token>>>,
}

impl TokenManager {
    pub fn new(
        oauth_url: &str,
        credentials: Credentials,
        timeout: std::time::Duration,
    ) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            token_url: format!("{}{}", oauth_url.trim_end_matches('/'), TOKEN_PATH),
            credentials,
            token: Mutex::new(None),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    /// Perform a fresh token exchange and replace the held token
    pub async fn acquire(&self) -> Result<Arc<Token>, AuthError> {
        let mut slot = self.token.lock().await;
        let token = Arc::new(self.exchange().await?);
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Return the held token, re-acquiring it first when it is missing or
    /// within [`REFRESH_MARGIN`] of expiry
    pub async fn ensure_fresh(&self) -> Result<Arc<Token>, AuthError> {
        let mut slot = self.token.lock().await;

        if let Some(token) = slot.as_ref() {
            let now = Utc::now();
            if !needs_refresh(token, now) {
                return Ok(token.clone());
            }
            tracing::debug!(
                remaining_secs = token.remaining(now).num_seconds(),
                "Refreshing token"
            );
        } else {
            tracing::debug!("No token held, acquiring one");
        }

        let token = Arc::new(self.exchange().await?);
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Currently held token, if any
    pub async fn current(&self) -> Option<Arc<Token>> {
        self.token.lock().await.clone()
    }

    /// Drop the held token so the next request re-authenticates
    pub async fn invalidate(&self) {
        if self.token.lock().await.take().is_some() {
            tracing::debug!("Token invalidated");
        }
    }

    async fn exchange(&self) -> Result<Token, AuthError> {
        tracing::debug!(token_url = %self.token_url, "Requesting client-credentials token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(self.credentials.client_secret()))
            .form(&CLIENT_CREDENTIALS_FORM)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "Token endpoint rejected credentials");
            return Err(AuthError::Authentication(format!(
                "Invalid credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(AuthError::Communication(format!(
                "Token endpoint returned {}",
                status
            )));
        }

        let body = response.json::<TokenResponse>().await?;
        let token = Token::issue(body.access_token, body.expires_in, Utc::now());

        tracing::debug!(
            expires_at = %token.expires_at,
            token_type = body.token_type.as_deref().unwrap_or("unknown"),
            scope = body.scope.as_deref().unwrap_or(""),
            "Successfully acquired token"
        );

        Ok(token)
    }
}
