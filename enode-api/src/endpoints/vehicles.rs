use super::{Pagination, Request};
use crate::decode::{self, DecodeError, datetime, nullable, or_default, percentage};
use crate::macros::setter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Stable Enode vehicle id
    pub id: String,
    pub user_id: String,
    pub vendor: String,
    pub is_reachable: bool,
    #[serde(deserialize_with = "datetime")]
    pub last_seen: Option<DateTime<Utc>>,
    pub information: Information,
    pub charge_state: ChargeState,
    pub smart_charging_policy: SmartChargingPolicy,
    pub location: Location,
    pub odometer: Odometer,
    pub capabilities: Capabilities,
    /// Permissions granted by the vehicle owner
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    #[serde(deserialize_with = "nullable")]
    pub display_name: Option<String>,
    pub vin: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeState {
    /// Current charge rate in kW
    #[serde(deserialize_with = "nullable")]
    pub charge_rate: Option<f64>,
    /// Minutes until the charge limit is reached
    #[serde(deserialize_with = "nullable")]
    pub charge_time_remaining: Option<i64>,
    pub is_fully_charged: bool,
    pub is_plugged_in: bool,
    pub is_charging: bool,
    /// State of charge, 0-100
    #[serde(deserialize_with = "percentage")]
    pub battery_level: u8,
    /// Estimated range in km
    pub range: f64,
    /// Usable battery capacity in kWh
    pub battery_capacity: f64,
    #[serde(deserialize_with = "percentage")]
    pub charge_limit: u8,
    #[serde(deserialize_with = "datetime")]
    pub last_updated: Option<DateTime<Utc>>,
    pub power_delivery_state: String,
    /// Maximum charge current in A
    #[serde(deserialize_with = "nullable")]
    pub max_current: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChargingPolicy {
    #[serde(deserialize_with = "datetime")]
    pub deadline: Option<DateTime<Utc>>,
    pub is_enabled: bool,
    #[serde(deserialize_with = "percentage")]
    pub minimum_charge_limit: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(deserialize_with = "nullable")]
    pub id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(deserialize_with = "datetime")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odometer {
    /// Total distance in km
    #[serde(deserialize_with = "nullable")]
    pub distance: Option<f64>,
    #[serde(deserialize_with = "datetime")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Whether the vehicle supports one remote feature, and what blocks it if not.
///
/// The one lenient group: an absent or `null` `interventionIds` reads as
/// empty and an absent or `null` `isCapable` reads as not capable. Values of
/// the wrong type are still rejected.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capability {
    #[serde(deserialize_with = "or_default")]
    pub intervention_ids: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub is_capable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub information: Capability,
    pub charge_state: Capability,
    pub location: Capability,
    pub odometer: Capability,
    pub set_max_current: Capability,
    pub start_charging: Capability,
    pub stop_charging: Capability,
    pub smart_charging: Capability,
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVehicles {
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<String>,
}

impl ListVehicles {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt page_size: u32);
    setter!(opt after: String);
    setter!(opt before: String);
}

impl Request for ListVehicles {
    type Query = Self;
    type Response = VehiclesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/vehicles".into()
    }

    fn query(&self) -> Option<&Self> {
        let empty = self.page_size.is_none() && self.after.is_none() && self.before.is_none();
        (!empty).then_some(self)
    }
}

// Responses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclesResponse {
    pub data: Vec<Vehicle>,
    pub pagination: Pagination,
}

/// Decode a raw `/vehicles` response body
pub fn decode_vehicles(value: &Value) -> Result<VehiclesResponse, DecodeError> {
    decode::from_value(value)
}
