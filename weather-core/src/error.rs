use serde::{Deserialize, Serialize};

/// Every way a single fetch can fail. Returned as data, never panics past the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FetchError {
    #[error("Location access denied.")]
    PermissionDenied,

    #[error("Current location could not be determined.")]
    LocationUnavailable,

    #[error("Invalid API key.")]
    InvalidApiKey,

    #[error("City not found: the selected city/country combination could not be found.")]
    PlaceNotFound,

    #[error("Failed to fetch weather data.")]
    NetworkFailure,

    #[error("Weather service error: {0}")]
    UnknownApiError(String),
}

impl FetchError {
    /// Follow-up guidance a caller can show next to the error.
    pub fn hint(&self) -> &'static str {
        match self {
            FetchError::PermissionDenied => {
                "Grant location permission or switch to manual selection."
            }
            FetchError::LocationUnavailable => {
                "Make sure location services are available or switch to manual selection."
            }
            FetchError::InvalidApiKey => {
                "Double-check your OpenWeatherMap API key.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
            }
            FetchError::PlaceNotFound => "Make sure your city/country selection is valid.",
            FetchError::NetworkFailure => "Check your internet connection and try again.",
            FetchError::UnknownApiError(_) => "Please try again later.",
        }
    }
}

/// Failure of the underlying HTTP transport (DNS, timeout, refused connection, ...).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http transport failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coordinate acquisition failure reported by a location provider.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("location service unavailable: {0}")]
    Unavailable(String),

    #[error("location request timed out")]
    Timeout,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_errors_get_manual_selection_hint() {
        assert!(FetchError::PermissionDenied.hint().contains("manual selection"));
        assert!(FetchError::LocationUnavailable.hint().contains("manual selection"));
        assert!(!FetchError::InvalidApiKey.hint().contains("manual selection"));
    }

    #[test]
    fn unknown_error_keeps_upstream_message() {
        let err = FetchError::UnknownApiError("internal error".into());
        assert_eq!(err.to_string(), "Weather service error: internal error");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(FetchError::PlaceNotFound).unwrap();
        assert_eq!(json["kind"], "place_not_found");

        let json = serde_json::to_value(FetchError::UnknownApiError("boom".into())).unwrap();
        assert_eq!(json["kind"], "unknown_api_error");
        assert_eq!(json["message"], "boom");
    }
}
