pub mod decode;
pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::decode::{DecodeError, DecodeErrorKind};
pub use crate::endpoints::vehicles::{
    Capabilities, Capability, ChargeState, Information, Location, Odometer, SmartChargingPolicy,
    Vehicle, VehiclesResponse, decode_vehicles,
};
pub use crate::error::{EnodeApiError, ErrorKind};

use crate::endpoints::Request as ApiRequest;
use enode_auth::{Settings, TokenManager};
use repositories::*;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Authenticated client for the Enode REST API.
///
/// Every call first makes sure the bearer token is fresh, then runs under the
/// configured timeout (10 seconds by default). No retries happen here; the
/// polling interval is the retry mechanism.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenManager>,
}

impl Client {
    pub fn new(
        base_url: &str,
        tokens: Arc<TokenManager>,
        timeout: Duration,
    ) -> Result<Self, EnodeApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EnodeApiError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Build the token manager and client described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, EnodeApiError> {
        let tokens = TokenManager::new(
            &settings.oauth_url,
            settings.credentials(),
            settings.request_timeout(),
        )?;
        Self::new(&settings.api_url, Arc::new(tokens), settings.request_timeout())
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, EnodeApiError>
    where
        R: ApiRequest,
    {
        let url = format!("{}{}", self.base_url, request.endpoint());
        let mut builder = self.http.request(request.method(), &url);
        if let Some(query) = request.query() {
            builder = builder.query(query);
        }

        let value = self.execute(builder, HeaderMap::new(), None).await?;
        let response = decode::from_value::<R::Response>(&value)?;
        Ok(response)
    }

    /// Fetch every vehicle visible to the client (first page only)
    pub async fn vehicles(&self) -> Result<VehiclesResponse, EnodeApiError> {
        let response = self.send(Request::vehicles().list()).await?;
        tracing::debug!(count = response.data.len(), "Fetched vehicles");
        Ok(response)
    }

    /// Authenticated call returning the raw JSON body
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, EnodeApiError> {
        self.request_with_headers(method, url, HeaderMap::new(), body)
            .await
    }

    /// Like [`Client::request`]; any `Authorization` in `headers` is replaced
    pub async fn request_with_headers(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> Result<Value, EnodeApiError> {
        self.execute(self.http.request(method, url), headers, body)
            .await
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        mut headers: HeaderMap,
        body: Option<&Value>,
    ) -> Result<Value, EnodeApiError> {
        let token = self.tokens.ensure_fresh().await?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token()))
            .map_err(|e| EnodeApiError::Client(format!("Unusable access token - {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = builder.headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "Enode API rejected the access token");
            self.tokens.invalidate().await;
            return Err(EnodeApiError::Authentication(format!(
                "Invalid credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EnodeApiError::Communication(format!(
                "Enode API returned {}: {}",
                status, detail
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

pub struct Request;

impl Request {
    pub fn vehicles() -> VehicleRepository {
        VehicleRepository::new()
    }
}
