//! OpenWeatherMap current-weather wire format and response interpretation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::FetchError,
    http::HttpResponse,
    model::{FetchOutcome, WeatherReading},
    units::{UnitPreference, fahrenheit_to_celsius, mph_to_mps},
};

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    sys: OwSys,
    wind: Option<OwWind>,
    dt: Option<i64>,
}

/// Map a raw upstream response into a reading or a classified error.
pub(crate) fn interpret(res: &HttpResponse, unit: UnitPreference) -> FetchOutcome {
    let value: Value = serde_json::from_str(&res.body).map_err(|e| {
        tracing::warn!(status = res.status, error = %e, "upstream body is not JSON");
        FetchError::NetworkFailure
    })?;

    let cod = body_status(&value);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty());

    // Either side reporting a failure fails the request; `cod` is preferred when both do.
    let failed = cod
        .filter(|s| !is_success(*s))
        .or_else(|| (!res.is_success()).then_some(res.status));

    if let Some(status) = failed {
        let err = if res.status == 401 || cod == Some(401) {
            FetchError::InvalidApiKey
        } else {
            classify(status, message)
        };
        tracing::warn!(
            status,
            upstream_message = message,
            error = %err,
            "upstream rejected weather request"
        );
        return Err(err);
    }

    let parsed: OwCurrentResponse = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "upstream success body is malformed");
        FetchError::UnknownApiError(format!("malformed response: {e}"))
    })?;

    Ok(normalize(parsed, unit))
}

/// The `cod` field comes back as a number on success and as a string on errors.
fn body_status(value: &Value) -> Option<u16> {
    match value.get("cod")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// `message` is already trimmed and non-empty.
fn classify(status: u16, message: Option<&str>) -> FetchError {
    match message {
        Some(msg) if msg.to_lowercase().contains("not found") => FetchError::PlaceNotFound,
        Some(msg) => FetchError::UnknownApiError(msg.to_string()),
        None if status == 404 => FetchError::PlaceNotFound,
        None => FetchError::UnknownApiError(format!("request failed with status {status}")),
    }
}

fn normalize(parsed: OwCurrentResponse, unit: UnitPreference) -> WeatherReading {
    let to_celsius = |t: f64| match unit {
        UnitPreference::Metric => t,
        UnitPreference::Imperial => fahrenheit_to_celsius(t),
    };
    let to_mps = |s: f64| match unit {
        UnitPreference::Metric => s,
        UnitPreference::Imperial => mph_to_mps(s),
    };

    let (condition_main, condition_description) = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_else(|| ("Unknown".to_string(), "unknown".to_string()));

    WeatherReading {
        location_name: parsed.name,
        country_code: parsed.sys.country.unwrap_or_default(),
        latitude: parsed.coord.lat,
        longitude: parsed.coord.lon,
        temperature_celsius: to_celsius(parsed.main.temp),
        condition_main,
        condition_description,
        feels_like_celsius: parsed.main.feels_like.map(to_celsius),
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.map(|w| to_mps(w.speed)),
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> HttpResponse {
        HttpResponse { status, body: body.to_string() }
    }

    fn london(temp: f64) -> Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "main": { "temp": temp, "feels_like": temp - 1.0, "humidity": 81 },
            "wind": { "speed": 4.6 },
            "dt": 1_700_000_000,
            "sys": { "country": "GB" },
            "name": "London",
            "cod": 200
        })
    }

    #[test]
    fn metric_success_maps_all_fields() {
        let reading = interpret(&response(200, london(12.5)), UnitPreference::Metric).unwrap();

        assert_eq!(reading.location_name, "London");
        assert_eq!(reading.country_code, "GB");
        assert_eq!(reading.latitude, 51.5085);
        assert_eq!(reading.longitude, -0.1257);
        assert_eq!(reading.temperature_celsius, 12.5);
        assert_eq!(reading.condition_main, "Rain");
        assert_eq!(reading.condition_description, "light rain");
        assert_eq!(reading.feels_like_celsius, Some(11.5));
        assert_eq!(reading.humidity_pct, Some(81));
        assert_eq!(reading.wind_speed_mps, Some(4.6));
        assert_eq!(reading.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn imperial_success_is_stored_in_celsius() {
        let reading = interpret(&response(200, london(50.0)), UnitPreference::Imperial).unwrap();

        assert!((reading.temperature_celsius - 10.0).abs() < 1e-9);
        let wind = reading.wind_speed_mps.unwrap();
        assert!((wind - 4.6 * 0.44704).abs() < 1e-9);
    }

    #[test]
    fn city_not_found_message() {
        let body = json!({ "cod": "404", "message": "city not found" });
        assert_eq!(
            interpret(&response(404, body), UnitPreference::Metric),
            Err(FetchError::PlaceNotFound)
        );
    }

    #[test]
    fn unauthorized_wins_over_message_text() {
        let body = json!({ "cod": 401, "message": "city not found" });
        assert_eq!(
            interpret(&response(401, body), UnitPreference::Metric),
            Err(FetchError::InvalidApiKey)
        );

        let body = json!({ "cod": 401, "message": "Invalid API key. Please see https://openweathermap.org/faq#error401" });
        assert_eq!(
            interpret(&response(401, body), UnitPreference::Metric),
            Err(FetchError::InvalidApiKey)
        );
    }

    #[test]
    fn http_unauthorized_wins_over_body_cod_and_message() {
        let body = json!({ "cod": "404", "message": "city not found" });
        assert_eq!(
            interpret(&response(401, body), UnitPreference::Metric),
            Err(FetchError::InvalidApiKey)
        );
    }

    #[test]
    fn blank_message_on_404_is_place_not_found() {
        let body = json!({ "cod": "404", "message": "  " });
        assert_eq!(
            interpret(&response(404, body), UnitPreference::Metric),
            Err(FetchError::PlaceNotFound)
        );
    }

    #[test]
    fn failing_http_status_is_reported_when_cod_claims_success() {
        let body = json!({ "cod": 200 });
        assert_eq!(
            interpret(&response(503, body), UnitPreference::Metric),
            Err(FetchError::UnknownApiError("request failed with status 503".into()))
        );

        let body = json!({ "cod": 200, "message": "" });
        assert_eq!(
            interpret(&response(404, body), UnitPreference::Metric),
            Err(FetchError::PlaceNotFound)
        );
    }

    #[test]
    fn body_cod_overrides_http_status() {
        let body = json!({ "cod": "401", "message": "nope" });
        assert_eq!(
            interpret(&response(200, body), UnitPreference::Metric),
            Err(FetchError::InvalidApiKey)
        );
    }

    #[test]
    fn other_errors_keep_message() {
        let body = json!({ "cod": "429", "message": "too many requests" });
        assert_eq!(
            interpret(&response(429, body), UnitPreference::Metric),
            Err(FetchError::UnknownApiError("too many requests".into()))
        );

        let body = json!({ "cod": 500 });
        assert_eq!(
            interpret(&response(500, body), UnitPreference::Metric),
            Err(FetchError::UnknownApiError("request failed with status 500".into()))
        );
    }

    #[test]
    fn non_json_body_is_network_failure() {
        let res = HttpResponse { status: 502, body: "<html>bad gateway</html>".into() };
        assert_eq!(interpret(&res, UnitPreference::Metric), Err(FetchError::NetworkFailure));
    }

    #[test]
    fn malformed_success_body_is_unknown_error() {
        let body = json!({ "cod": 200, "name": "London" });
        match interpret(&response(200, body), UnitPreference::Metric) {
            Err(FetchError::UnknownApiError(msg)) => assert!(msg.contains("malformed response")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_country_and_weather_fall_back() {
        let body = json!({
            "coord": { "lon": 0.0, "lat": 0.0 },
            "weather": [],
            "main": { "temp": 27.0 },
            "name": "",
            "cod": 200
        });
        let reading = interpret(&response(200, body), UnitPreference::Metric).unwrap();
        assert_eq!(reading.country_code, "");
        assert_eq!(reading.condition_main, "Unknown");
        assert_eq!(reading.wind_speed_mps, None);
    }
}
