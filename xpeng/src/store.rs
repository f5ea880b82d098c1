use chrono::{DateTime, Utc};
use enode_api::endpoints::Pagination;
use enode_api::{Vehicle, VehiclesResponse};
use std::sync::Arc;
use tokio::sync::watch;

/// The decoded vehicle list of one successful poll, in API order
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub pagination: Pagination,
    pub fetched_at: DateTime<Utc>,
}

impl FleetSnapshot {
    pub fn new(response: VehiclesResponse, fetched_at: DateTime<Utc>) -> Self {
        Self {
            vehicles: response.data,
            pagination: response.pagination,
            fetched_at,
        }
    }

    pub fn empty() -> Self {
        Self {
            vehicles: Vec::new(),
            pagination: Pagination::default(),
            fetched_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Lookup by the vehicle's stable id
    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }
}

/// Holds the latest [`FleetSnapshot`] and notifies subscribers on replacement.
///
/// Snapshots are never mutated in place; readers keep whichever `Arc` they
/// were handed and never observe a half-written list.
pub struct SnapshotStore {
    tx: watch::Sender<Option<Arc<FleetSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Swap in `snapshot` and wake every subscriber
    pub fn replace(&self, snapshot: FleetSnapshot) -> Arc<FleetSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(Some(snapshot.clone()));
        snapshot
    }

    /// Latest snapshot; `None` until the first successful poll
    pub fn current(&self) -> Option<Arc<FleetSnapshot>> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<FleetSnapshot>>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
