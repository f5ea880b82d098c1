//! Host-facing projections of vehicle state.
//!
//! An [`Entity`] never holds vehicle data. It remembers which vehicle it
//! belongs to (by stable id) and which [`VehicleView`] it renders, and reads
//! the value from whatever snapshot it is handed. A vehicle absent from that
//! snapshot makes its entities unavailable.

pub mod binary_sensor;
pub mod device_tracker;
pub mod icons;
pub mod sensor;

use crate::store::FleetSnapshot;
use crate::DOMAIN;
use enode_api::Vehicle;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Sensor,
    BinarySensor,
    DeviceTracker,
}

/// A rendered entity value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Position { latitude: f64, longitude: f64 },
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Text(value) => f.write_str(value),
            Self::Position {
                latitude,
                longitude,
            } => write!(f, "{}, {}", latitude, longitude),
        }
    }
}

/// One way of looking at a vehicle: what to show and how to describe it
pub trait VehicleView: Send + Sync {
    fn entity_name(&self) -> &'static str;

    fn platform(&self) -> Platform;

    fn value(&self, vehicle: &Vehicle) -> DisplayValue;

    fn icon(&self, _vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        None
    }

    fn device_class(&self) -> Option<&'static str> {
        None
    }

    fn state_class(&self) -> Option<&'static str> {
        None
    }

    fn unit(&self) -> Option<&'static str> {
        None
    }

    fn attributes(&self, _vehicle: &Vehicle) -> Vec<(&'static str, DisplayValue)> {
        Vec::new()
    }
}

/// Device registry entry shared by all entities of one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: (&'static str, String),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl DeviceInfo {
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            identifiers: (DOMAIN, vehicle.id.clone()),
            name: display_name(vehicle),
            manufacturer: vehicle.information.brand.clone(),
            model: vehicle.information.model.clone(),
            serial_number: vehicle.information.vin.clone(),
        }
    }
}

/// The state an available entity reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub value: DisplayValue,
    pub icon: Option<Cow<'static, str>>,
    pub attributes: Vec<(&'static str, DisplayValue)>,
}

pub struct Entity {
    vehicle_id: String,
    view: Box<dyn VehicleView>,
    name: String,
    unique_id: String,
    device: DeviceInfo,
}

impl Entity {
    pub fn new(vehicle: &Vehicle, view: Box<dyn VehicleView>) -> Self {
        let name = format!("{} {}", display_name(vehicle), view.entity_name());
        let unique_id = slugify(&format!("{} {}", vehicle.id, view.entity_name()));

        Self {
            vehicle_id: vehicle.id.clone(),
            name,
            unique_id,
            device: DeviceInfo::for_vehicle(vehicle),
            view,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn view(&self) -> &dyn VehicleView {
        self.view.as_ref()
    }

    pub fn available(&self, snapshot: &FleetSnapshot) -> bool {
        snapshot.get(&self.vehicle_id).is_some()
    }

    /// Current state, or `None` when the vehicle is not in `snapshot`
    pub fn state(&self, snapshot: &FleetSnapshot) -> Option<EntityState> {
        let vehicle = snapshot.get(&self.vehicle_id)?;
        Some(EntityState {
            value: self.view.value(vehicle),
            icon: self.view.icon(vehicle),
            attributes: self.view.attributes(vehicle),
        })
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("platform", &self.view.platform())
            .finish()
    }
}

/// Every entity for every vehicle in `snapshot`, vehicle by vehicle in API order
pub fn entities_for(snapshot: &FleetSnapshot) -> Vec<Entity> {
    snapshot
        .iter()
        .flat_map(|vehicle| {
            tracing::debug!(vehicle_id = %vehicle.id, "Setting up entities");
            views()
                .into_iter()
                .map(move |view| Entity::new(vehicle, view))
        })
        .collect()
}

fn views() -> Vec<Box<dyn VehicleView>> {
    vec![
        Box::new(sensor::Battery),
        Box::new(sensor::BatteryTarget),
        Box::new(sensor::Range),
        Box::new(sensor::ChargeRate),
        Box::new(binary_sensor::Charging),
        Box::new(binary_sensor::PluggedIn),
        Box::new(device_tracker::Location),
    ]
}

fn display_name(vehicle: &Vehicle) -> String {
    format!("{} {}", vehicle.information.brand, vehicle.information.model)
}

/// Lowercase alphanumeric runs joined by `_`
pub fn slugify(text: &str) -> String {
    slugify_with(text, "_")
}

/// Lowercase alphanumeric runs joined by `separator`
pub fn slugify_with(text: &str, separator: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(separator)
}
