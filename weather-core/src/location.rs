//! Location collaborators used for GPS-mode fetches.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

use crate::{error::LocationError, http::HttpFetcher, model::Coordinates};

pub const IP_LOCATION_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

impl From<bool> for Permission {
    fn from(granted: bool) -> Self {
        if granted { Permission::Granted } else { Permission::Denied }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// May suspend until the user answers the permission prompt.
    async fn request_foreground_permission(&self) -> Permission;

    async fn current_coordinates(&self) -> Result<Coordinates, LocationError>;
}

/// Always-granted provider returning preconfigured coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_foreground_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// Approximate position from the public IP address.
///
/// Permission is decided up front by whoever builds the provider.
#[derive(Debug, Clone)]
pub struct IpLocation {
    http: Arc<dyn HttpFetcher>,
    endpoint: String,
    consent: Permission,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocation {
    pub fn new(http: Arc<dyn HttpFetcher>, consent: Permission) -> Self {
        Self::with_endpoint(http, IP_LOCATION_URL, consent)
    }

    pub fn with_endpoint(
        http: Arc<dyn HttpFetcher>,
        endpoint: impl Into<String>,
        consent: Permission,
    ) -> Self {
        Self { http, endpoint: endpoint.into(), consent }
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn request_foreground_permission(&self) -> Permission {
        self.consent
    }

    async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| LocationError::Unavailable(format!("bad ip lookup endpoint: {e}")))?;

        let res = self.http.get(&url).await?;
        if !res.is_success() {
            return Err(LocationError::Unavailable(format!(
                "ip lookup failed with status {}",
                res.status
            )));
        }

        let parsed: IpApiResponse = serde_json::from_str(&res.body)
            .map_err(|e| LocationError::Unavailable(format!("malformed ip lookup body: {e}")))?;

        match (parsed.status.as_str(), parsed.lat, parsed.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(LocationError::Unavailable(
                parsed.message.unwrap_or_else(|| "ip lookup returned no position".to_string()),
            )),
        }
    }
}
