use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use weather_core::{
    Config, FixedLocation, IpLocation, LocationProvider, LocationSelector, Permission,
    ReqwestFetcher, UnitPreference, WeatherClient, condition_to_icon_key, config::validate_api_key,
};

use crate::{interactive, permission::PromptedLocation, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for your location or a chosen city")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store your OpenWeatherMap API key.
    Configure,

    /// Show current weather once.
    Show(ShowArgs),

    /// Browse weather interactively, switching location mode and units.
    Interactive {
        /// Unit system to start with; defaults to the configured one.
        #[arg(long)]
        units: Option<UnitPreference>,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Use the current location (the default when no place is given).
    #[arg(long, conflicts_with_all = ["country", "city"])]
    pub gps: bool,

    /// Country code, e.g. "GB".
    #[arg(long, requires = "city")]
    pub country: Option<String>,

    /// City name, e.g. "London".
    #[arg(long, requires = "country")]
    pub city: Option<String>,

    /// "metric" or "imperial"; defaults to the configured unit.
    #[arg(long)]
    pub units: Option<UnitPreference>,

    /// Print the reading as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    fn selector(&self) -> LocationSelector {
        match (&self.country, &self.city) {
            (Some(country), Some(city)) if !self.gps => {
                LocationSelector::manual(country.trim().to_uppercase(), city.trim())
            }
            _ => LocationSelector::Gps,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
            Command::Interactive { units } => {
                let config = Config::load()?;
                let unit = units.unwrap_or_else(|| config.units());
                interactive::run(build_client(&config)?, unit).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("API key prompt was cancelled")?;

    validate_api_key(Some(key.as_str())).map_err(|e| anyhow!("{e} {}", e.hint()))?;

    config.set_api_key(key);
    let path = config.save()?;
    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let unit = args.units.unwrap_or_else(|| config.units());
    let selector = args.selector();
    let client = build_client(&config)?;

    match client.fetch_weather(&selector, unit).await {
        Ok(reading) if args.json => {
            let out = serde_json::json!({
                "unit": unit,
                "icon": condition_to_icon_key(&reading.condition_main),
                "reading": reading,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Ok(reading) => {
            println!("{}", render::reading(&reading, unit));
            Ok(())
        }
        Err(err) if args.json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": err }))?);
            Err(anyhow!(err))
        }
        Err(err) => {
            let uses_gps = selector == LocationSelector::Gps;
            Err(anyhow!("{}", render::error(&err, uses_gps, false)))
        }
    }
}

/// Wire the client: fixed home coordinates when configured, otherwise an IP
/// lookup behind a one-time permission prompt.
pub fn build_client(config: &Config) -> anyhow::Result<WeatherClient> {
    let http = Arc::new(ReqwestFetcher::new(config.timeout())?);

    let location: Arc<dyn LocationProvider> = match config.home {
        Some(home) => Arc::new(FixedLocation::new(home)),
        None => Arc::new(PromptedLocation::new(IpLocation::new(http.clone(), Permission::Granted))),
    };

    WeatherClient::from_config(config, location, http)
}
