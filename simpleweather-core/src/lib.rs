//! Core library for the `simpleweather` client.
//!
//! This crate defines:
//! - Open-Meteo geocoding and forecast requests, chained geocode → data
//! - Routing of completions by URL shape, with pending explicit searches tracked
//! - The suggestion debouncer and the periodic refresh timer
//! - The orchestrator holding favorites, units, language and the active city
//! - A session actor that drives all of the above on one task
//!
//! It is used by `simpleweather-cli`; any front end that can send
//! [`session::Command`]s and render [`view::UiUpdate`]s can reuse it.

pub mod classifier;
pub mod config;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod i18n;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod provider;
pub mod scheduler;
pub mod session;
pub mod transport;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{Config, FileStore, SettingsStore};
pub use error::{FavoriteError, FetchError, InputError, TransportError};
pub use i18n::Localizer;
pub use model::{Condition, DayForecast, ResolvedPlace, Units, WeatherSnapshot};
pub use orchestrator::{FavoriteOutcome, Orchestrator};
pub use session::{Command, Session, SessionHandle};
pub use transport::{HttpTransport, Transport};
pub use view::{DayView, Notice, Severity, UiUpdate, WeatherView};
