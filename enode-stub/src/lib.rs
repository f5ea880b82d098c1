//! In-process stand-in for the Enode OAuth and vehicles endpoints.
//!
//! Binds to `127.0.0.1:0`, issues client-credentials tokens for one fixed
//! credential pair and serves a configurable `/vehicles` payload. Every
//! request is counted and its interesting headers recorded so tests can
//! assert on what the client actually sent.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::http::StatusCode;

/// What the client sent to the token endpoint
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct StubState {
    client_id: String,
    client_secret: String,
    access_token: RwLock<String>,
    expires_in: AtomicU32,
    token_status: RwLock<Option<StatusCode>>,
    vehicles_status: RwLock<Option<StatusCode>>,
    vehicles_delay: RwLock<Duration>,
    vehicles_payload: RwLock<Value>,
    issued_token: RwLock<Option<String>>,
    token_requests: AtomicUsize,
    vehicle_requests: AtomicUsize,
    last_token_request: RwLock<Option<TokenRequest>>,
    last_vehicles_authorization: RwLock<Option<String>>,
    last_vehicles_query: RwLock<Option<String>>,
}

impl StubState {
    fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            access_token: RwLock::new("tok".to_string()),
            expires_in: AtomicU32::new(3600),
            token_status: RwLock::new(None),
            vehicles_status: RwLock::new(None),
            vehicles_delay: RwLock::new(Duration::ZERO),
            vehicles_payload: RwLock::new(vehicles_page(Vec::new())),
            issued_token: RwLock::new(None),
            token_requests: AtomicUsize::new(0),
            vehicle_requests: AtomicUsize::new(0),
            last_token_request: RwLock::new(None),
            last_vehicles_authorization: RwLock::new(None),
            last_vehicles_query: RwLock::new(None),
        }
    }

    pub async fn set_access_token(&self, token: &str) {
        *self.access_token.write().await = token.to_string();
    }

    pub fn set_expires_in(&self, seconds: u32) {
        self.expires_in.store(seconds, Ordering::SeqCst);
    }

    /// Force every token request to answer with `status`
    pub async fn fail_token(&self, status: Option<StatusCode>) {
        *self.token_status.write().await = status;
    }

    /// Force every vehicles request to answer with `status`
    pub async fn fail_vehicles(&self, status: Option<StatusCode>) {
        *self.vehicles_status.write().await = status;
    }

    pub async fn delay_vehicles(&self, delay: Duration) {
        *self.vehicles_delay.write().await = delay;
    }

    pub async fn set_vehicles(&self, payload: Value) {
        *self.vehicles_payload.write().await = payload;
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn vehicle_requests(&self) -> usize {
        self.vehicle_requests.load(Ordering::SeqCst)
    }

    pub async fn last_token_request(&self) -> Option<TokenRequest> {
        self.last_token_request.read().await.clone()
    }

    pub async fn last_vehicles_authorization(&self) -> Option<String> {
        self.last_vehicles_authorization.read().await.clone()
    }

    pub async fn last_vehicles_query(&self) -> Option<String> {
        self.last_vehicles_query.read().await.clone()
    }

    fn expected_basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(pair)
        )
    }
}

pub fn app(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/oauth2/token", post(issue_token))
        .route("/vehicles", get(list_vehicles))
        .with_state(state)
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn error_body(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

async fn issue_token(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let request = TokenRequest {
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body,
    };
    *state.last_token_request.write().await = Some(request.clone());

    if let Some(status) = *state.token_status.read().await {
        return error_body(status, "forced_failure");
    }
    if request.authorization.as_deref() != Some(state.expected_basic_auth().as_str()) {
        return error_body(StatusCode::UNAUTHORIZED, "invalid_client");
    }
    if request.body != "grant_type=client_credentials" {
        return error_body(StatusCode::BAD_REQUEST, "unsupported_grant_type");
    }

    let access_token = state.access_token.read().await.clone();
    *state.issued_token.write().await = Some(access_token.clone());

    Json(json!({
        "access_token": access_token,
        "expires_in": state.expires_in.load(Ordering::SeqCst),
        "scope": "",
        "token_type": "bearer",
    }))
    .into_response()
}

async fn list_vehicles(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    state.vehicle_requests.fetch_add(1, Ordering::SeqCst);

    let authorization = header_value(&headers, header::AUTHORIZATION);
    *state.last_vehicles_authorization.write().await = authorization.clone();
    *state.last_vehicles_query.write().await = query;

    let delay = *state.vehicles_delay.read().await;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = *state.vehicles_status.read().await {
        return error_body(status, "forced_failure");
    }

    let expected = state
        .issued_token
        .read()
        .await
        .as_ref()
        .map(|token| format!("Bearer {}", token));
    if expected.is_none() || authorization != expected {
        return error_body(StatusCode::UNAUTHORIZED, "invalid_token");
    }

    Json(state.vehicles_payload.read().await.clone()).into_response()
}

/// A running stub bound to a random local port
pub struct StubServer {
    addr: SocketAddr,
    pub state: Arc<StubState>,
}

impl StubServer {
    /// Start a stub accepting `client_id`/`client_secret`
    pub async fn start(client_id: &str, client_secret: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StubState::new(client_id, client_secret));

        let router = app(state.clone());
        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self { addr, state })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// URL of a local port nothing listens on
pub fn closed_port_url() -> std::io::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

/// One vehicle object shaped like the Enode `/vehicles` response
pub fn vehicle(id: &str, battery_level: u8, is_charging: bool) -> Value {
    json!({
        "id": id,
        "userId": "user-1",
        "vendor": "XPENG",
        "isReachable": true,
        "lastSeen": "2024-05-01T11:58:00Z",
        "information": {
            "displayName": "Daily driver",
            "vin": format!("LMVXPENG{}", id.to_uppercase()),
            "brand": "XPENG",
            "model": "G6",
            "year": 2024
        },
        "chargeState": {
            "chargeRate": if is_charging { json!(7.4) } else { Value::Null },
            "chargeTimeRemaining": if is_charging { json!(95) } else { Value::Null },
            "isFullyCharged": false,
            "isPluggedIn": is_charging,
            "isCharging": is_charging,
            "batteryLevel": battery_level,
            "range": 380,
            "batteryCapacity": 87.5,
            "chargeLimit": 90,
            "lastUpdated": "2024-05-01T11:57:30Z",
            "powerDeliveryState": if is_charging { "PLUGGED_IN:CHARGING" } else { "UNPLUGGED" },
            "maxCurrent": 16
        },
        "smartChargingPolicy": {
            "deadline": null,
            "isEnabled": false,
            "minimumChargeLimit": 20
        },
        "location": {
            "id": null,
            "latitude": 52.3676,
            "longitude": 4.9041,
            "lastUpdated": "2024-05-01T11:50:00Z"
        },
        "odometer": {
            "distance": 12045.5,
            "lastUpdated": "2024-05-01T11:50:00Z"
        },
        "capabilities": {
            "information": { "interventionIds": [], "isCapable": true },
            "chargeState": { "interventionIds": [], "isCapable": true },
            "location": { "interventionIds": [], "isCapable": true },
            "odometer": { "interventionIds": [], "isCapable": true },
            "setMaxCurrent": {
                "interventionIds": ["4eaeb363-296d-4ccc-a973-7805e6f400bd"],
                "isCapable": false
            },
            "startCharging": { "interventionIds": [], "isCapable": true },
            "stopCharging": { "interventionIds": [], "isCapable": true },
            "smartCharging": { "interventionIds": [], "isCapable": true }
        },
        "scopes": ["vehicle:read:data", "vehicle:read:location"]
    })
}

/// Wrap vehicles in the paginated response envelope
pub fn vehicles_page(vehicles: Vec<Value>) -> Value {
    json!({
        "data": vehicles,
        "pagination": { "after": null, "before": null }
    })
}
