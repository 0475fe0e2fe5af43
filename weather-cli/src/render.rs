use weather_core::{
    AppState, FetchError, UnitPreference, WeatherReading, condition_to_icon_key,
    display_temperature, units::mps_to_mph,
};

pub fn reading(reading: &WeatherReading, unit: UnitPreference) -> String {
    let icon = condition_to_icon_key(&reading.condition_main);

    let mut lines = vec![
        format!("{}  {}", icon.glyph(), display_temperature(reading.temperature_celsius, unit)),
        reading.condition_description.clone(),
        location_line(reading),
        format!("Lat: {:.2}, Lon: {:.2}", reading.latitude, reading.longitude),
    ];

    let details = details_line(reading, unit);
    if !details.is_empty() {
        lines.push(details);
    }

    if let Some(at) = reading.observed_at {
        lines.push(format!("Observed {}", at.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.join("\n")
}

fn location_line(reading: &WeatherReading) -> String {
    match (reading.location_name.is_empty(), reading.country_code.is_empty()) {
        (false, false) => format!("{}, {}", reading.location_name, reading.country_code),
        (false, true) => reading.location_name.clone(),
        (true, false) => reading.country_code.clone(),
        (true, true) => "Unknown location".to_string(),
    }
}

fn details_line(reading: &WeatherReading, unit: UnitPreference) -> String {
    let mut parts = Vec::new();

    if let Some(feels) = reading.feels_like_celsius {
        parts.push(format!("Feels like {}", display_temperature(feels, unit)));
    }
    if let Some(humidity) = reading.humidity_pct {
        parts.push(format!("Humidity {humidity}%"));
    }
    if let Some(mps) = reading.wind_speed_mps {
        parts.push(match unit {
            UnitPreference::Metric => format!("Wind {mps:.1} m/s"),
            UnitPreference::Imperial => format!("Wind {:.1} mph", mps_to_mph(mps)),
        });
    }

    parts.join(" · ")
}

/// Error card: message, targeted hint and the mode-specific reminders.
pub fn error(err: &FetchError, uses_gps: bool, permission_denied: bool) -> String {
    let mut lines = vec!["Oops!".to_string(), err.to_string(), err.hint().to_string()];

    if !uses_gps && !matches!(err, FetchError::PlaceNotFound) {
        lines.push("Make sure your city/country selection is valid.".to_string());
    }
    if uses_gps && permission_denied && !matches!(err, FetchError::PermissionDenied) {
        lines.push("Please grant location permission to use GPS.".to_string());
    }

    lines.join("\n")
}

pub fn state(state: &AppState) -> String {
    let header = if state.uses_gps() {
        "Location: GPS".to_string()
    } else {
        format!("Location: {}, {}", state.city, state.country)
    };

    let body = if state.loading {
        "Loading weather...".to_string()
    } else if let Some(r) = &state.reading {
        reading(r, state.unit)
    } else if let Some(err) = &state.error {
        error(err, state.uses_gps(), state.needs_permission_hint())
    } else {
        "Unable to load weather data. Please try again.".to_string()
    };

    format!("{header}\n\n{body}\n")
}

/// Label for the unit toggle, e.g. "Switch to Fahrenheit".
pub fn unit_toggle_label(unit: UnitPreference) -> String {
    format!("Switch to {}", unit.toggle().scale_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherReading {
        WeatherReading {
            location_name: "Delhi".into(),
            country_code: "IN".into(),
            latitude: 28.6667,
            longitude: 77.2167,
            temperature_celsius: 31.05,
            condition_main: "Haze".into(),
            condition_description: "haze".into(),
            feels_like_celsius: None,
            humidity_pct: Some(52),
            wind_speed_mps: Some(2.0),
            observed_at: None,
        }
    }

    #[test]
    fn metric_card() {
        let out = reading(&sample(), UnitPreference::Metric);
        assert!(out.starts_with("🌫️  31°C"));
        assert!(out.contains("Delhi, IN"));
        assert!(out.contains("Lat: 28.67, Lon: 77.22"));
        assert!(out.contains("Humidity 52% · Wind 2.0 m/s"));
    }

    #[test]
    fn imperial_card_converts_at_render_time() {
        let out = reading(&sample(), UnitPreference::Imperial);
        assert!(out.contains("88°F"));
        assert!(out.contains("Wind 4.5 mph"));
    }

    #[test]
    fn manual_errors_remind_about_selection() {
        let out = error(&FetchError::NetworkFailure, false, false);
        assert!(out.contains("Make sure your city/country selection is valid."));
    }

    #[test]
    fn gps_errors_mention_permission_when_denied_before() {
        let out = error(&FetchError::NetworkFailure, true, true);
        assert!(out.contains("Please grant location permission to use GPS."));
    }

    #[test]
    fn toggle_label_names_other_scale() {
        assert_eq!(unit_toggle_label(UnitPreference::Metric), "Switch to Fahrenheit");
        assert_eq!(unit_toggle_label(UnitPreference::Imperial), "Switch to Celsius");
    }

    #[test]
    fn loading_state_shows_spinner_text() {
        let state = AppState { loading: true, ..AppState::default() };
        assert!(super::state(&state).contains("Loading weather..."));
    }
}
