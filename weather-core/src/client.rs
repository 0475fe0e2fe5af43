use anyhow::Context;
use reqwest::Url;
use std::{sync::Arc, time::Duration};

use crate::{
    config::{Config, validate_api_key},
    error::{FetchError, LocationError},
    http::HttpFetcher,
    location::LocationProvider,
    model::{Coordinates, FetchOutcome, LocationSelector},
    units::UnitPreference,
};

mod openweather;

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolves a location, performs a single current-weather request and
/// normalizes the answer. Never retries.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: Option<String>,
    endpoint: Url,
    location: Arc<dyn LocationProvider>,
    http: Arc<dyn HttpFetcher>,
    location_timeout: Duration,
}

impl WeatherClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        location: Arc<dyn LocationProvider>,
        http: Arc<dyn HttpFetcher>,
    ) -> anyhow::Result<Self> {
        let endpoint = Url::parse(base_url)
            .with_context(|| format!("Invalid weather endpoint url: {base_url}"))?;

        Ok(Self {
            api_key,
            endpoint,
            location,
            http,
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
        })
    }

    /// Build a client from stored config, letting the environment override the API key.
    pub fn from_config(
        config: &Config,
        location: Arc<dyn LocationProvider>,
        http: Arc<dyn HttpFetcher>,
    ) -> anyhow::Result<Self> {
        Self::new(config.api_key_from_env(), config.base_url(), location, http)
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }

    pub async fn fetch_weather(
        &self,
        selector: &LocationSelector,
        unit: UnitPreference,
    ) -> FetchOutcome {
        let api_key = validate_api_key(self.api_key.as_deref()).inspect_err(|_| {
            tracing::warn!("API key missing or too short; skipping request");
        })?;

        let url = match selector.place_query() {
            Some(query) => self.request_url(&[("q", query)], api_key, unit),
            None => {
                let coords = self.resolve_coordinates().await?;
                self.request_url(
                    &[("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())],
                    api_key,
                    unit,
                )
            }
        };

        tracing::debug!(?selector, %unit, "requesting current weather");

        let res = self.http.get(&url).await.map_err(|e| {
            tracing::warn!(error = %e, "weather request failed in transport");
            FetchError::NetworkFailure
        })?;

        let outcome = openweather::interpret(&res, unit);
        if let Ok(reading) = &outcome {
            tracing::info!(
                location = %reading.location_name,
                country = %reading.country_code,
                temperature_c = reading.temperature_celsius,
                "weather reading received"
            );
        }
        outcome
    }

    async fn resolve_coordinates(&self) -> Result<Coordinates, FetchError> {
        let permission = self.location.request_foreground_permission().await;
        if !permission.is_granted() {
            tracing::info!("location permission denied");
            return Err(FetchError::PermissionDenied);
        }

        let acquired =
            tokio::time::timeout(self.location_timeout, self.location.current_coordinates())
                .await
                .unwrap_or(Err(LocationError::Timeout));

        acquired.map_err(|e| {
            tracing::warn!(
                error = %e,
                timeout = ?self.location_timeout,
                "could not determine current location"
            );
            FetchError::LocationUnavailable
        })
    }

    fn request_url(
        &self,
        location: &[(&str, String)],
        api_key: &str,
        unit: UnitPreference,
    ) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in location {
                query.append_pair(name, value);
            }
            query
                .append_pair("appid", api_key)
                .append_pair("units", unit.as_api_str());
        }
        url
    }
}
