//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The location- and unit-aware current weather client
//! - Injectable location and HTTP collaborators
//! - Screen state with a pure reducer and stale-response guard
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod icon;
pub mod location;
pub mod model;
pub mod state;
pub mod units;

pub use client::WeatherClient;
pub use config::Config;
pub use error::{FetchError, LocationError, TransportError};
pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};
pub use icon::{IconKey, condition_to_icon_key};
pub use location::{FixedLocation, IpLocation, LocationProvider, Permission};
pub use model::{Coordinates, FetchOutcome, LocationSelector, WeatherReading};
pub use state::{AppState, Event, FetchCommand, reduce};
pub use units::{UnitPreference, display_temperature};
