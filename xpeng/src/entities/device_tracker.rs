use super::{DisplayValue, Platform, VehicleView};
use enode_api::Vehicle;

/// Where the tracker's position comes from
pub const SOURCE_TYPE: &str = "gps";

/// Last reported GPS position.
///
/// Never forces an update; the coordinator's poll drives every change.
pub struct Location;

impl VehicleView for Location {
    fn entity_name(&self) -> &'static str {
        "location tracker"
    }

    fn platform(&self) -> Platform {
        Platform::DeviceTracker
    }

    fn value(&self, vehicle: &Vehicle) -> DisplayValue {
        DisplayValue::Position {
            latitude: vehicle.location.latitude,
            longitude: vehicle.location.longitude,
        }
    }

    fn attributes(&self, _vehicle: &Vehicle) -> Vec<(&'static str, DisplayValue)> {
        vec![("source_type", DisplayValue::Text(SOURCE_TYPE.to_string()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enode_api::decode_vehicles;

    #[test]
    fn position_comes_from_location() {
        let payload: serde_json::Value = serde_json::from_str(include_str!(
            "../../../enode-api/tests/fixtures/vehicles.json"
        ))
        .unwrap();
        let vehicles = decode_vehicles(&payload).unwrap().data;

        assert_eq!(
            Location.value(&vehicles[0]),
            DisplayValue::Position {
                latitude: 52.3676,
                longitude: 4.9041
            }
        );
        assert_eq!(
            Location.attributes(&vehicles[1]),
            vec![("source_type", DisplayValue::Text("gps".into()))]
        );
    }
}
