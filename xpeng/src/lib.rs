pub mod coordinator;
pub mod entities;
pub mod logging;
pub mod setup;
pub mod store;

/// Integration domain; first half of every device identifier
pub const DOMAIN: &str = "xpeng";

pub use coordinator::{Coordinator, UpdateError, UpdateStatus, VehicleSource};
pub use entities::{entities_for, DisplayValue, Entity, EntityState, Platform, VehicleView};
pub use setup::{setup_entry, validate_credentials, Integration, SetupError};
pub use store::{FleetSnapshot, SnapshotStore};
