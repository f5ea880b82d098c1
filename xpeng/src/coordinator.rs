use crate::store::{FleetSnapshot, SnapshotStore};
use chrono::{DateTime, Utc};
use enode_api::{Client, EnodeApiError, ErrorKind, VehiclesResponse};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, Span};

/// Anything that can produce the current vehicle list
pub trait VehicleSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<VehiclesResponse, EnodeApiError>> + Send;
}

impl VehicleSource for Client {
    fn fetch(&self) -> impl Future<Output = Result<VehiclesResponse, EnodeApiError>> + Send {
        self.vehicles()
    }
}

/// Why a refresh produced no new snapshot
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Credentials were rejected; the host must re-authenticate
    #[error("Authentication failed: {0}")]
    AuthFailed(#[source] EnodeApiError),

    #[error("Update failed: {0}")]
    UpdateFailed(#[source] EnodeApiError),
}

impl UpdateError {
    pub fn source_kind(&self) -> ErrorKind {
        match self {
            Self::AuthFailed(err) | Self::UpdateFailed(err) => err.kind(),
        }
    }
}

impl From<EnodeApiError> for UpdateError {
    fn from(err: EnodeApiError) -> Self {
        match err.kind() {
            ErrorKind::Authentication => Self::AuthFailed(err),
            ErrorKind::Communication | ErrorKind::Client => Self::UpdateFailed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStatus {
    /// Outcome of the most recent refresh; `false` before the first one
    pub last_update_success: bool,
    /// When the last successful refresh finished
    pub last_update_at: Option<DateTime<Utc>>,
}

/// Polls a [`VehicleSource`] and publishes each result to a [`SnapshotStore`].
pub struct Coordinator<S> {
    source: S,
    store: SnapshotStore,
    status: RwLock<UpdateStatus>,
    poll: Mutex<()>,
    span: Span,
}

impl<S: VehicleSource> Coordinator<S> {
    /// `span` is the logging handle every refresh runs under
    pub fn new(source: S, span: Span) -> Self {
        Self {
            source,
            store: SnapshotStore::new(),
            status: RwLock::new(UpdateStatus::default()),
            poll: Mutex::new(()),
            span,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn snapshot(&self) -> Option<Arc<FleetSnapshot>> {
        self.store.current()
    }

    pub async fn status(&self) -> UpdateStatus {
        *self.status.read().await
    }

    pub async fn last_update_success(&self) -> bool {
        self.status.read().await.last_update_success
    }

    /// Fetch once and replace the snapshot; on failure the store is left as is
    pub async fn refresh(&self) -> Result<Arc<FleetSnapshot>, UpdateError> {
        let _poll = self.poll.lock().await;

        let result = self.source.fetch().instrument(self.span.clone()).await;
        let mut status = self.status.write().await;

        match result {
            Ok(response) => {
                let now = Utc::now();
                let snapshot = self.store.replace(FleetSnapshot::new(response, now));
                status.last_update_success = true;
                status.last_update_at = Some(now);
                tracing::debug!(
                    parent: &self.span,
                    vehicles = snapshot.len(),
                    "Fleet snapshot updated"
                );
                Ok(snapshot)
            }
            Err(err) => {
                status.last_update_success = false;
                let err = UpdateError::from(err);
                match &err {
                    UpdateError::AuthFailed(_) => {
                        tracing::error!(parent: &self.span, error = %err, "Credentials rejected")
                    }
                    UpdateError::UpdateFailed(_) => {
                        tracing::warn!(parent: &self.span, error = %err, "Error fetching vehicles")
                    }
                }
                Err(err)
            }
        }
    }

    /// Refresh every `interval` until `shutdown` resolves.
    ///
    /// The first tick is skipped because setup already performed a refresh.
    /// A failed refresh is retried on the next tick.
    pub async fn run(&self, interval: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        tokio::pin!(shutdown);
        tracing::info!(parent: &self.span, interval_secs = interval.as_secs(), "Polling started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    // Failures are already logged by refresh
                    let _ = self.refresh().await;
                }
            }
        }

        tracing::info!(parent: &self.span, "Polling stopped");
    }
}
