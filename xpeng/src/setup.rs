use crate::coordinator::{Coordinator, UpdateError};
use crate::entities::{entities_for, slugify_with, Entity};
use crate::DOMAIN;
use enode_api::{Client, EnodeApiError, ErrorKind};
use enode_auth::{AuthError, Settings, TokenManager};
use std::sync::Arc;
use thiserror::Error;

/// Why a set of credentials could not be set up
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid authentication: {0}")]
    InvalidAuth(String),

    #[error("Cannot connect: {0}")]
    CannotConnect(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl SetupError {
    /// Key shown to the user next to the credentials form
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvalidAuth(_) => "invalid_auth",
            Self::CannotConnect(_) => "cannot_connect",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<AuthError> for SetupError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Authentication(msg) => Self::InvalidAuth(msg),
            AuthError::Communication(msg) => Self::CannotConnect(msg),
            AuthError::Client(msg) | AuthError::Configuration(msg) => Self::Unknown(msg),
        }
    }
}

impl From<EnodeApiError> for SetupError {
    fn from(err: EnodeApiError) -> Self {
        match err.kind() {
            ErrorKind::Authentication => Self::InvalidAuth(err.to_string()),
            ErrorKind::Communication => Self::CannotConnect(err.to_string()),
            ErrorKind::Client => Self::Unknown(err.to_string()),
        }
    }
}

impl From<UpdateError> for SetupError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::AuthFailed(err) | UpdateError::UpdateFailed(err) => err.into(),
        }
    }
}

/// Id a configuration entry is stored under: the client id slug
pub fn entry_unique_id(client_id: &str) -> String {
    slugify_with(client_id, "-")
}

/// Check `settings` with a single token exchange.
///
/// Returns the id the configuration is stored under.
pub async fn validate_credentials(settings: &Settings) -> Result<String, SetupError> {
    settings.validate().map_err(SetupError::Unknown)?;

    let tokens = TokenManager::new(
        &settings.oauth_url,
        settings.credentials(),
        settings.request_timeout(),
    )?;

    match tokens.acquire().await {
        Ok(_) => Ok(entry_unique_id(&settings.client_id)),
        Err(err) => {
            match &err {
                AuthError::Authentication(_) => {
                    tracing::warn!(error = %err, "Credentials rejected")
                }
                AuthError::Communication(_) => {
                    tracing::error!(error = %err, "Cannot reach Enode")
                }
                _ => tracing::error!(error = %err, "Unexpected error validating credentials"),
            }
            Err(err.into())
        }
    }
}

/// A running configuration: the poller and the entities it feeds
pub struct Integration {
    pub unique_id: String,
    pub coordinator: Arc<Coordinator<Client>>,
    pub entities: Vec<Entity>,
}

/// Authenticate, perform the first refresh and build the entity list.
///
/// The entity list is fixed here; vehicles added to the account later show
/// up only after setting up again.
pub async fn setup_entry(settings: &Settings) -> Result<Integration, SetupError> {
    settings.validate().map_err(SetupError::Unknown)?;

    let client = Client::from_settings(settings)?;
    client.tokens().acquire().await?;

    let span = tracing::info_span!(
        "coordinator",
        domain = DOMAIN,
        client_id = %settings.client_id
    );
    let coordinator = Arc::new(Coordinator::new(client, span));
    let snapshot = coordinator.refresh().await?;

    let entities = entities_for(&snapshot);
    tracing::info!(
        vehicles = snapshot.len(),
        entities = entities.len(),
        "Integration set up"
    );

    Ok(Integration {
        unique_id: entry_unique_id(&settings.client_id),
        coordinator,
        entities,
    })
}
