use serde::{Deserialize, Serialize};

/// Local icon set keyed by the upstream `weather[0].main` category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKey {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    /// Mist, smoke, haze, dust, fog, sand, ash, squall, tornado.
    Atmosphere,
    Default,
}

impl IconKey {
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKey::Clear => "☀️",
            IconKey::Clouds => "☁️",
            IconKey::Rain => "🌧️",
            IconKey::Snow => "❄️",
            IconKey::Thunderstorm => "⛈️",
            IconKey::Atmosphere => "🌫️",
            IconKey::Default => "🌡️",
        }
    }
}

pub fn condition_to_icon_key(main: &str) -> IconKey {
    match main.trim().to_lowercase().as_str() {
        "clear" => IconKey::Clear,
        "clouds" => IconKey::Clouds,
        "rain" | "drizzle" => IconKey::Rain,
        "snow" => IconKey::Snow,
        "thunderstorm" => IconKey::Thunderstorm,
        "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall" | "tornado" => {
            IconKey::Atmosphere
        }
        _ => IconKey::Default,
    }
}
