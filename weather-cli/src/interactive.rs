use anyhow::Result;
use inquire::{InquireError, Select};
use std::{fmt, sync::Arc};
use tokio::sync::mpsc;
use weather_core::{
    AppState, Event, FetchCommand, UnitPreference, WeatherClient, catalog, reduce,
};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    UseGps,
    UseManual,
    ChangeCountry,
    ChangeCity,
    ToggleUnit(UnitPreference),
    Refresh,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::UseGps => f.write_str("Use GPS location"),
            MenuItem::UseManual => f.write_str("Choose a city instead"),
            MenuItem::ChangeCountry => f.write_str("Change country"),
            MenuItem::ChangeCity => f.write_str("Change city"),
            MenuItem::ToggleUnit(unit) => f.write_str(&render::unit_toggle_label(*unit)),
            MenuItem::Refresh => f.write_str("Refresh"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

fn menu(state: &AppState) -> Vec<MenuItem> {
    let mut items = if state.uses_gps() {
        vec![MenuItem::UseManual]
    } else {
        vec![MenuItem::ChangeCountry, MenuItem::ChangeCity, MenuItem::UseGps]
    };
    items.extend([MenuItem::ToggleUnit(state.unit), MenuItem::Refresh, MenuItem::Quit]);
    items
}

/// Menu loop. Each choice becomes an [`Event`]; fetches run on spawned tasks
/// and report back through a channel, where the reducer drops stale ones.
pub async fn run(client: WeatherClient, unit: UnitPreference) -> Result<()> {
    let client = Arc::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let mut state = AppState::default().with_unit(unit);
    let mut pending = Some(Event::Refresh);

    loop {
        // A fetch abandoned with Ctrl-C may have finished while the menu was open.
        if drain_completed(&mut rx, &mut state) {
            println!("{}", render::state(&state));
        }

        if let Some(event) = pending.take() {
            let (next, cmd) = reduce(&state, event);
            state = next;
            if let Some(cmd) = cmd {
                spawn_fetch(client.clone(), cmd, tx.clone());
            }
        }

        if state.loading {
            println!("Loading weather... (Ctrl-C to stop waiting)");
        }
        while state.loading {
            tokio::select! {
                Some(event) = rx.recv() => state = reduce(&state, event).0,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(generation = state.generation, "stopped waiting for fetch");
                    break;
                }
            }
        }

        drain_completed(&mut rx, &mut state);
        if !state.loading {
            println!("{}", render::state(&state));
        }

        match tokio::task::block_in_place(|| choose(&state))? {
            Some(event) => pending = Some(event),
            None => break,
        }
    }

    Ok(())
}

/// Apply every fetch result already queued, without waiting.
/// Returns true when this finished the fetch the state was loading.
fn drain_completed(rx: &mut mpsc::UnboundedReceiver<Event>, state: &mut AppState) -> bool {
    let was_loading = state.loading;
    while let Ok(event) = rx.try_recv() {
        *state = reduce(state, event).0;
    }
    was_loading && !state.loading
}

fn spawn_fetch(client: Arc<WeatherClient>, cmd: FetchCommand, tx: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let outcome = client.fetch_weather(&cmd.selector, cmd.unit).await;
        // Receiver gone means the session ended; nothing left to update.
        let _ = tx.send(Event::FetchCompleted { generation: cmd.generation, outcome });
    });
}

/// Prompt for the next action. `None` means quit.
fn choose(state: &AppState) -> Result<Option<Event>> {
    let item = match Select::new("What next?", menu(state)).prompt() {
        Ok(item) => item,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let event = match item {
        MenuItem::UseGps => Event::ModeChanged { use_gps: true },
        MenuItem::UseManual => Event::ModeChanged { use_gps: false },
        MenuItem::ChangeCountry => match pick_country(&state.country)? {
            Some(code) => Event::CountryChanged(code),
            None => return choose(state),
        },
        MenuItem::ChangeCity => match pick_city(&state.country, &state.city)? {
            Some(city) => Event::CityChanged(city),
            None => return choose(state),
        },
        MenuItem::ToggleUnit(unit) => Event::UnitChanged(unit.toggle()),
        MenuItem::Refresh => Event::Refresh,
        MenuItem::Quit => return Ok(None),
    };

    Ok(Some(event))
}

fn pick_country(current: &str) -> Result<Option<String>> {
    let countries = catalog::countries();
    let labels: Vec<String> =
        countries.iter().map(|c| format!("{} ({})", c.label, c.code)).collect();
    let cursor = countries.iter().position(|c| c.code == current).unwrap_or(0);

    match Select::new("Select country", labels).with_starting_cursor(cursor).raw_prompt() {
        Ok(choice) => Ok(countries.get(choice.index).map(|c| c.code.to_string())),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn pick_city(country: &str, current: &str) -> Result<Option<String>> {
    let cities = catalog::cities_for(country).to_vec();
    if cities.is_empty() {
        println!("No cities available for {country}.");
        return Ok(None);
    }
    let cursor = cities.iter().position(|c| *c == current).unwrap_or(0);

    match Select::new("Select city", cities).with_starting_cursor(cursor).prompt() {
        Ok(city) => Ok(Some(city.to_string())),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::FetchError;

    #[test]
    fn gps_menu_offers_manual_switch() {
        let items = menu(&AppState::default());
        assert_eq!(items[0], MenuItem::UseManual);
        assert!(!items.contains(&MenuItem::ChangeCity));
        assert!(items.contains(&MenuItem::ToggleUnit(UnitPreference::Metric)));
    }

    #[test]
    fn manual_menu_offers_dependent_pickers() {
        let (state, _) = reduce(&AppState::default(), Event::ModeChanged { use_gps: false });
        let items = menu(&state);
        assert_eq!(&items[..3], &[MenuItem::ChangeCountry, MenuItem::ChangeCity, MenuItem::UseGps]);
    }

    #[test]
    fn queued_result_of_abandoned_fetch_still_lands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (mut state, cmd) = reduce(&AppState::default(), Event::Refresh);
        let generation = cmd.unwrap().generation;

        assert!(!drain_completed(&mut rx, &mut state));
        assert!(state.loading);

        tx.send(Event::FetchCompleted { generation, outcome: Err(FetchError::NetworkFailure) })
            .unwrap();

        assert!(drain_completed(&mut rx, &mut state));
        assert!(!state.loading);
        assert_eq!(state.error, Some(FetchError::NetworkFailure));
    }

    #[test]
    fn draining_drops_stale_results() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (state, first) = reduce(&AppState::default(), Event::Refresh);
        let (mut state, _second) = reduce(&state, Event::Refresh);

        tx.send(Event::FetchCompleted {
            generation: first.unwrap().generation,
            outcome: Err(FetchError::NetworkFailure),
        })
        .unwrap();

        assert!(!drain_completed(&mut rx, &mut state));
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn toggle_label_follows_unit() {
        assert_eq!(MenuItem::ToggleUnit(UnitPreference::Imperial).to_string(), "Switch to Celsius");
    }
}
