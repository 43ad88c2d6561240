use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Select, Text, validator::Validation};
use std::sync::Arc;
use weather_core::{
    AutoRefresh, Config, PersistedState, PlaceSpec, WeatherApiProvider, WeatherProvider,
    WeatherStore, ensure_loaded, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// More log output (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, language and default place.
    Configure,

    /// Current conditions plus today's hourly and the weekly outlook.
    Show {
        /// Place name; defaults to the last search or the configured place.
        place: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true, conflicts_with = "place")]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Hourly temperature chart and weekly range bars.
    Forecast {
        place: Option<String>,
    },

    /// Place suggestions for a partial name.
    Search {
        query: String,
    },

    /// Recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Show or change preferences.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Keep showing the weather, refreshing it in the background.
    Watch {
        place: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Flip one preference.
    Toggle {
        setting: SettingKey,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettingKey {
    Unit,
    AutoTheme,
    Notifications,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, lat, lon } => {
                let config = Config::load()?;
                let store = open_store(&config, true)?;
                let spec = match (place, lat, lon) {
                    (_, Some(lat), Some(lon)) => Some(PlaceSpec::coordinates(lat, lon)),
                    (Some(place), _, _) => Some(PlaceSpec::Name(place)),
                    _ => None,
                };
                load(&store, &config, spec).await?;
                print!("{}", render::dashboard(&store.snapshot(), config.locale()));
                Ok(())
            }
            Command::Forecast { place } => {
                let config = Config::load()?;
                let store = open_store(&config, true)?;
                load(&store, &config, place.map(PlaceSpec::Name)).await?;
                print!("{}", render::forecast(&store.snapshot(), config.locale()));
                Ok(())
            }
            Command::Search { query } => {
                let config = Config::load()?;
                let store = open_store(&config, true)?;
                let hits = store.suggest_places(&query).await?;
                if hits.is_empty() {
                    println!("No places found for '{query}'.");
                }
                for hit in hits {
                    println!("{}  ({:.2}, {:.2})", hit.display_name(), hit.lat, hit.lon);
                }
                Ok(())
            }
            Command::History { clear } => {
                let config = Config::load()?;
                let store = open_store(&config, false)?;
                if clear {
                    store.clear_history();
                    println!("Search history cleared.");
                } else {
                    print!("{}", render::history(&store.snapshot().search_history));
                }
                Ok(())
            }
            Command::Settings { action } => {
                let config = Config::load()?;
                let store = open_store(&config, false)?;
                let settings = match action {
                    Some(SettingsAction::Toggle { setting: SettingKey::Unit }) => {
                        store.toggle_unit()
                    }
                    Some(SettingsAction::Toggle { setting: SettingKey::AutoTheme }) => {
                        store.toggle_auto_theme()
                    }
                    Some(SettingsAction::Toggle { setting: SettingKey::Notifications }) => {
                        store.toggle_notifications()
                    }
                    None => store.snapshot().settings,
                };
                print!("{}", render::settings(&settings));
                Ok(())
            }
            Command::Watch { place } => watch(place).await,
        }
    }
}

/// Store backed by the configured provider and the on-disk preferences.
///
/// Commands that never hit the network still work without an API key.
fn open_store(config: &Config, needs_network: bool) -> Result<WeatherStore> {
    let provider: Arc<dyn WeatherProvider> = match provider_from_config(config) {
        Ok(provider) => provider,
        Err(_) if !needs_network => Arc::new(WeatherApiProvider::new(String::new())),
        Err(err) => return Err(err),
    };

    let storage = PersistedState::default_path()?;
    tracing::debug!(path = %storage.display(), "using preference storage");
    Ok(WeatherStore::new(provider).with_storage(storage).with_locale(config.locale()))
}

/// Fetch `spec`, or fall back to the last search / configured place with retries.
async fn load(store: &WeatherStore, config: &Config, spec: Option<PlaceSpec>) -> Result<()> {
    match spec {
        Some(spec) => store.fetch(spec).await?,
        None => {
            let place = store
                .snapshot()
                .search_history
                .latest()
                .map_or_else(|| config.default_place.clone(), str::to_owned);
            ensure_loaded(store, &place, config.max_load_attempts).await?;
        }
    }
    Ok(())
}

async fn watch(place: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let store = Arc::new(open_store(&config, true)?);
    let mut updates = store.subscribe();

    load(&store, &config, place.map(PlaceSpec::Name)).await?;
    print!("{}", render::dashboard(&updates.borrow_and_update(), config.locale()));

    let _refresher = AutoRefresh::spawn(store.clone(), config.refresh_interval());
    println!(
        "\nRefreshing every {} min. Press Ctrl-C to stop.",
        config.refresh_interval().as_secs() / 60
    );

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.is_loading {
                    continue;
                }
                println!();
                match &state.error {
                    Some(err) => eprintln!("Refresh failed: {err}"),
                    None => print!("{}", render::dashboard(&state, config.locale())),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("WeatherAPI.com API key:")
        .with_default(config.api_key.as_deref().unwrap_or_default())
        .with_validator(|input: &str| {
            Ok(if input.trim().is_empty() {
                Validation::Invalid("The API key cannot be empty.".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read API key")?;

    let languages = vec!["id", "en", "de", "fr", "es", "nl"];
    let start = languages.iter().position(|l| *l == config.language).unwrap_or(0);
    let language = Select::new("Language:", languages)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read language")?;

    let default_place = Text::new("Default place:")
        .with_default(&config.default_place)
        .prompt()
        .context("Failed to read default place")?;

    config.set_api_key(api_key.trim().to_string());
    config.language = language.to_string();
    config.default_place = default_place.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
