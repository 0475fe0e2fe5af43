use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// How the location for a fetch is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSelector {
    /// Ask the device for its current position.
    Gps,
    /// Free-text place query built from a country code and city name.
    Manual { country: String, city: String },
}

impl LocationSelector {
    pub fn manual(country: impl Into<String>, city: impl Into<String>) -> Self {
        LocationSelector::Manual { country: country.into(), city: city.into() }
    }

    /// The `q` parameter for manual lookups, e.g. `London,GB`.
    pub fn place_query(&self) -> Option<String> {
        match self {
            LocationSelector::Gps => None,
            LocationSelector::Manual { country, city } => Some(format!("{city},{country}")),
        }
    }
}

/// Normalized current-weather snapshot. Temperatures are Celsius, speeds m/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_celsius: f64,
    pub condition_main: String,
    pub condition_description: String,

    pub feels_like_celsius: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

pub type FetchOutcome = Result<WeatherReading, FetchError>;
