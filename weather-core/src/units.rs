use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unit system requested from the upstream API and used for display.
///
/// Readings are always stored in metric units; this only decides the
/// `units` query parameter and how temperatures are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    /// Human label for the scale, e.g. for a "Switch to ..." button.
    pub fn scale_name(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "Celsius",
            UnitPreference::Imperial => "Fahrenheit",
        }
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for UnitPreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(UnitPreference::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

const MPS_PER_MPH: f64 = 0.44704;

pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPS_PER_MPH
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps / MPS_PER_MPH
}

/// Render a Celsius value in the requested unit, rounded to a whole degree.
pub fn display_temperature(celsius: f64, unit: UnitPreference) -> String {
    let value = match unit {
        UnitPreference::Metric => celsius,
        UnitPreference::Imperial => celsius_to_fahrenheit(celsius),
    };
    // `+ 0.0` folds -0 into 0 so we never print "-0°C".
    format!("{}{}", value.round() + 0.0, unit.temperature_symbol())
}
