//! Screen state as a single immutable record plus a pure reducer.
//!
//! Every user input bumps the fetch generation and asks the caller to run a
//! fetch. Completed fetches only land if their generation is still current,
//! so a late answer for a superseded selection is dropped.

use crate::{
    catalog,
    error::FetchError,
    model::{FetchOutcome, LocationSelector, WeatherReading},
    units::UnitPreference,
};

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationMode {
    Gps,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub mode: LocationMode,
    /// Manual selection, kept while in GPS mode so switching back restores it.
    pub country: String,
    pub city: String,
    pub unit: UnitPreference,
    pub generation: Generation,
    pub loading: bool,
    pub reading: Option<WeatherReading>,
    pub error: Option<FetchError>,
    /// Last known answer to the location permission prompt.
    pub permission_granted: Option<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        let country = catalog::DEFAULT_COUNTRY.to_string();
        let city = catalog::default_city(&country).unwrap_or_default().to_string();
        Self {
            mode: LocationMode::Gps,
            country,
            city,
            unit: UnitPreference::default(),
            generation: 0,
            loading: false,
            reading: None,
            error: None,
            permission_granted: None,
        }
    }
}

impl AppState {
    pub fn with_unit(mut self, unit: UnitPreference) -> Self {
        self.unit = unit;
        self
    }

    pub fn selector(&self) -> LocationSelector {
        match self.mode {
            LocationMode::Gps => LocationSelector::Gps,
            LocationMode::Manual => LocationSelector::manual(&self.country, &self.city),
        }
    }

    pub fn uses_gps(&self) -> bool {
        self.mode == LocationMode::Gps
    }

    /// Whether the UI should suggest granting location permission.
    pub fn needs_permission_hint(&self) -> bool {
        self.uses_gps() && self.permission_granted == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ModeChanged { use_gps: bool },
    CountryChanged(String),
    CityChanged(String),
    UnitChanged(UnitPreference),
    Refresh,
    FetchCompleted { generation: Generation, outcome: FetchOutcome },
}

/// Instruction for the caller to run `fetch_weather` and report back with
/// [`Event::FetchCompleted`] carrying the same generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCommand {
    pub generation: Generation,
    pub selector: LocationSelector,
    pub unit: UnitPreference,
}

pub fn reduce(state: &AppState, event: Event) -> (AppState, Option<FetchCommand>) {
    let mut next = state.clone();

    match event {
        Event::ModeChanged { use_gps } => {
            next.mode = if use_gps { LocationMode::Gps } else { LocationMode::Manual };
        }
        Event::CountryChanged(country) => {
            next.city = catalog::default_city(&country).unwrap_or_default().to_string();
            next.country = country;
        }
        Event::CityChanged(city) => {
            next.city = city;
        }
        Event::UnitChanged(unit) => {
            next.unit = unit;
        }
        Event::Refresh => {}
        Event::FetchCompleted { generation, outcome } => {
            if generation != state.generation {
                tracing::debug!(
                    generation,
                    current = state.generation,
                    "dropping stale weather outcome"
                );
                return (next, None);
            }
            apply_outcome(&mut next, outcome);
            return (next, None);
        }
    }

    next.generation = state.generation.wrapping_add(1);
    next.loading = true;
    next.error = None;

    let cmd = FetchCommand {
        generation: next.generation,
        selector: next.selector(),
        unit: next.unit,
    };
    (next, Some(cmd))
}

fn apply_outcome(state: &mut AppState, outcome: FetchOutcome) {
    state.loading = false;

    if state.uses_gps() {
        match &outcome {
            Err(FetchError::PermissionDenied) => state.permission_granted = Some(false),
            Err(FetchError::InvalidApiKey) => {}
            _ => state.permission_granted = Some(true),
        }
    }

    match outcome {
        Ok(reading) => {
            state.reading = Some(reading);
            state.error = None;
        }
        Err(err) => {
            state.reading = None;
            state.error = Some(err);
        }
    }
}
