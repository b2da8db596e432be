use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::Select;
use simpleweather_core::{
    Command as SessionCommand, Config, FileStore, HttpTransport, Localizer, Session, UiUpdate,
    Units,
    i18n::SUPPORTED_LANGUAGES,
    provider::{Endpoints, GeocodeResolver},
};

use crate::{format, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "simpleweather", version, about = "Open-Meteo weather client")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for a city and print current weather and the 5-day forecast.
    Show {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// Interactive mode: read commands from stdin, print every update.
    Watch,

    /// Choose language and units interactively.
    Configure,

    /// List saved favorites.
    Favorites,

    /// Resolve a place name to coordinates.
    Lookup {
        /// Place name.
        place: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let store = match &self.config {
            Some(path) => FileStore::new(path),
            None => FileStore::default_location()?,
        };
        let config = Config::load_from(store.path())?;

        match self.command {
            Command::Show { city } => show(config, store, &city).await,
            Command::Watch => {
                let language = config.language.clone();
                let transport = Arc::new(HttpTransport::new(&config.network)?);
                let handle = Session::spawn(config, transport, Box::new(store))?;
                watch::run(handle, &language).await
            }
            Command::Configure => configure(config, &store),
            Command::Favorites => {
                if config.favorites.is_empty() {
                    println!("No favorites yet.");
                }
                for city in &config.favorites {
                    println!("{city}");
                }
                Ok(())
            }
            Command::Lookup { place } => lookup(&config, &place).await,
        }
    }
}

/// Run one search through a session and print the result.
async fn show(mut config: Config, store: FileStore, city: &str) -> Result<()> {
    // Only the requested city should be fetched.
    config.last_city = None;
    // Geocode, then current and daily, each bounded by the request timeout.
    let deadline = config.network.timeout() * 3 + Duration::from_secs(1);
    let l10n = Localizer::new(&config.language);

    let transport = Arc::new(HttpTransport::new(&config.network)?);
    let mut handle = Session::spawn(config, transport, Box::new(store))?;
    handle
        .commands
        .send(SessionCommand::Search(city.to_string()))
        .context("Session stopped before the search was sent")?;

    let outcome = tokio::time::timeout(deadline, async {
        let (mut weather, mut forecast) = (None, None);
        while let Some(update) = handle.updates.recv().await {
            match update {
                UiUpdate::Weather(view) => weather = Some(view),
                UiUpdate::Forecast(days) => forecast = Some(days),
                UiUpdate::Notice(notice) => bail!(format::notice(&notice)),
                _ => {}
            }
            if let (Some(weather), Some(forecast)) = (&weather, &forecast) {
                println!("{}", format::weather(weather, &l10n));
                println!("{}", format::forecast(forecast, &l10n));
                return Ok::<(), anyhow::Error>(());
            }
        }
        bail!("Session stopped unexpectedly")
    })
    .await;

    let _ = handle.commands.send(SessionCommand::Shutdown);
    handle.task.await?;

    match outcome {
        Ok(result) => result,
        Err(_) => bail!("No complete answer for `{city}` within {}s", deadline.as_secs()),
    }
}

fn configure(mut config: Config, store: &FileStore) -> Result<()> {
    let languages: Vec<&str> = SUPPORTED_LANGUAGES.to_vec();
    let start = languages
        .iter()
        .position(|code| *code == config.language)
        .unwrap_or(0);
    let language = Select::new("Language:", languages)
        .with_starting_cursor(start)
        .prompt()
        .context("Language selection cancelled")?;

    let choices = vec![Units::Celsius, Units::Fahrenheit];
    let start = choices.iter().position(|u| *u == config.units).unwrap_or(0);
    let labels: Vec<&str> = choices.iter().map(|u| format::units(*u)).collect();
    let picked = Select::new("Units:", labels)
        .with_starting_cursor(start)
        .prompt()
        .context("Units selection cancelled")?;

    config.language = language.to_string();
    config.units = if picked == format::units(Units::Fahrenheit) {
        Units::Fahrenheit
    } else {
        Units::Celsius
    };

    config.save_to(store.path())?;
    println!("Saved to {}", store.path().display());
    Ok(())
}

async fn lookup(config: &Config, place: &str) -> Result<()> {
    let endpoints =
        Endpoints::from_config(&config.network).context("Invalid geocoding URL in config")?;
    let transport = HttpTransport::new(&config.network)?;
    let resolver = GeocodeResolver::new(endpoints.geocoding);

    let found = resolver
        .resolve(&transport, place, &config.language)
        .await
        .with_context(|| format!("Lookup for `{place}` failed"))?;

    println!(
        "{}  ({:.4}, {:.4})",
        found.display_identity(),
        found.latitude,
        found.longitude
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["simpleweather", "show", "Paris", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Show { ref city } if city == "Paris"));
    }

    #[test]
    fn lookup_requires_a_place() {
        assert!(Cli::try_parse_from(["simpleweather", "lookup"]).is_err());
    }

    #[test]
    fn config_override() {
        let cli =
            Cli::try_parse_from(["simpleweather", "--config", "/tmp/sw.toml", "favorites"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sw.toml")));
        assert!(matches!(cli.command, Command::Favorites));
    }
}
