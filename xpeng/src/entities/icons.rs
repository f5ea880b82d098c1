/// Material Design icon for a battery at `battery_level` percent.
///
/// Charging above 10% uses the 20-step charging icons, charging at or below
/// uses the outline. Otherwise 5% and below is an alert, 95% and above is
/// the full battery, and everything in between rounds to the nearest 10-step
/// icon (ties go down).
pub fn icon_for_battery_level(battery_level: Option<u8>, charging: bool) -> String {
    let icon = "mdi:battery";
    let Some(level) = battery_level else {
        return format!("{icon}-unknown");
    };
    let level = f64::from(level);

    if charging && level > 10.0 {
        format!("{icon}-charging-{}", bucket(level, 20.0))
    } else if charging {
        format!("{icon}-outline")
    } else if level <= 5.0 {
        format!("{icon}-alert")
    } else if level < 95.0 {
        format!("{icon}-{}", bucket(level, 10.0))
    } else {
        icon.to_string()
    }
}

fn bucket(level: f64, step: f64) -> u32 {
    ((level / step - 0.01).round() * step) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level() {
        assert_eq!(icon_for_battery_level(None, false), "mdi:battery-unknown");
        assert_eq!(icon_for_battery_level(None, true), "mdi:battery-unknown");
    }

    #[test]
    fn discharging_levels() {
        assert_eq!(icon_for_battery_level(Some(0), false), "mdi:battery-alert");
        assert_eq!(icon_for_battery_level(Some(5), false), "mdi:battery-alert");
        assert_eq!(icon_for_battery_level(Some(6), false), "mdi:battery-10");
        assert_eq!(icon_for_battery_level(Some(45), false), "mdi:battery-40");
        assert_eq!(icon_for_battery_level(Some(72), false), "mdi:battery-70");
        assert_eq!(icon_for_battery_level(Some(94), false), "mdi:battery-90");
        assert_eq!(icon_for_battery_level(Some(95), false), "mdi:battery");
        assert_eq!(icon_for_battery_level(Some(100), false), "mdi:battery");
    }

    #[test]
    fn charging_levels() {
        assert_eq!(icon_for_battery_level(Some(3), true), "mdi:battery-outline");
        assert_eq!(icon_for_battery_level(Some(10), true), "mdi:battery-outline");
        assert_eq!(icon_for_battery_level(Some(11), true), "mdi:battery-charging-20");
        assert_eq!(icon_for_battery_level(Some(50), true), "mdi:battery-charging-40");
        assert_eq!(icon_for_battery_level(Some(72), true), "mdi:battery-charging-80");
        assert_eq!(icon_for_battery_level(Some(100), true), "mdi:battery-charging-100");
    }
}
