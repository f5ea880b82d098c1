use super::{DisplayValue, Platform, VehicleView};
use enode_api::Vehicle;
use std::borrow::Cow;

pub struct Charging;

impl VehicleView for Charging {
    fn entity_name(&self) -> &'static str {
        "charging"
    }

    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Bool(vehicle.charge_state.is_charging)
    }

    fn icon(&self, _vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed("mdi:ev-station"))
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("battery_charging")
    }
}

pub struct PluggedIn;

impl VehicleView for PluggedIn {
    fn entity_name(&self) -> &'static str {
        "plugged in"
    }

    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Bool(vehicle.charge_state.is_plugged_in)
    }

    fn icon(&self, _vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed("mdi:ev-station"))
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("plug")
    }
}
