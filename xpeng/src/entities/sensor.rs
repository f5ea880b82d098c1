use super::icons::icon_for_battery_level;
use super::{DisplayValue, Platform, VehicleView};
use enode_api::Vehicle;
use std::borrow::Cow;

const MEASUREMENT: &str = "measurement";

/// State of charge, as shown in the Xpeng app and on the car display
pub struct Battery;

impl VehicleView for Battery {
    fn entity_name(&self) -> &'static str {
        "battery"
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Integer(vehicle.charge_state.battery_level.into())
    }

    fn icon(&self, vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        let charge = &vehicle.charge_state;
        Some(icon_for_battery_level(Some(charge.battery_level), charge.is_charging).into())
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("battery")
    }

    fn state_class(&self) -> Option<&'static str> {
        Some(MEASUREMENT)
    }

    fn unit(&self) -> Option<&'static str> {
        Some("%")
    }

    fn attributes(&self, vehicle: &Vehicle) -> Vec<(&'static str, DisplayValue)> {
        vec![("raw_soc", self.value(vehicle))]
    }
}

/// Configured charge limit
pub struct BatteryTarget;

impl VehicleView for BatteryTarget {
    fn entity_name(&self) -> &'static str {
        "battery target"
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Integer(vehicle.charge_state.charge_limit.into())
    }

    fn icon(&self, vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        Some(icon_for_battery_level(Some(vehicle.charge_state.charge_limit), false).into())
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("battery")
    }

    fn state_class(&self) -> Option<&'static str> {
        Some(MEASUREMENT)
    }

    fn unit(&self) -> Option<&'static str> {
        Some("%")
    }
}

pub struct Range;

impl VehicleView for Range {
    fn entity_name(&self) -> &'static str {
        "range"
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Float(vehicle.charge_state.range)
    }

    fn icon(&self, _vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed("mdi:gauge"))
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("distance")
    }

    fn state_class(&self) -> Option<&'static str> {
        Some(MEASUREMENT)
    }

    fn unit(&self) -> Option<&'static str> {
        Some("km")
    }
}

/// Charging power; reported as 0 when the API has no rate
pub struct ChargeRate;

impl VehicleView for ChargeRate {
    fn entity_name(&self) -> &'static str {
        "charge rate"
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Float(vehicle.charge_state.charge_rate.unwrap_or(0.0))
    }

    fn icon(&self, _vehicle: &Vehicle) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed("mdi:flash"))
    }

    fn device_class(&self) -> Option<&'static str> {
        Some("power")
    }

    fn state_class(&self) -> Option<&'static str> {
        Some(MEASUREMENT)
    }

    fn unit(&self) -> Option<&'static str> {
        Some("kW")
    }
}
