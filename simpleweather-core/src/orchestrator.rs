//! Composition root: owns all shared state and turns UI operations and
//! transport completions into requests and [`UiUpdate`]s.
//!
//! Every method runs on the session's single event-loop task. Handlers must
//! not assume anything about what happened between a request being issued
//! and its completion arriving: the active city, language or units may all
//! have changed. Results are applied unconditionally, last write wins.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    classifier::{PendingSearchSet, ResponseClassifier, Route},
    config::{Config, SettingsStore},
    error::{FavoriteError, FetchError, InputError, TransportError},
    favorites::FavoritesList,
    i18n::Localizer,
    model::{DayForecast, PlaceQuery, Units, WeatherSnapshot},
    pipeline::{PipelineKind, Pipelines},
    provider::{Endpoints, forecast, geocoding},
    transport::{Completion, Dispatcher, RequestId, Transport},
    view::{DayView, Notice, UiUpdate, WeatherView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    AlreadyPresent,
}

/// Receiving ends handed to whoever drives the orchestrator.
#[derive(Debug)]
pub struct Channels {
    pub completions: mpsc::UnboundedReceiver<Completion>,
    pub updates: mpsc::UnboundedReceiver<UiUpdate>,
}

pub struct Orchestrator {
    dispatcher: Dispatcher,
    classifier: ResponseClassifier,
    pipelines: Pipelines,
    l10n: Localizer,
    config: Config,
    store: Box<dyn SettingsStore>,
    updates: mpsc::UnboundedSender<UiUpdate>,

    pending_searches: PendingSearchSet,
    active_city: Option<String>,
    favorites: FavoritesList,
    units: Units,
    weather: Option<WeatherSnapshot>,
    forecast: Vec<DayForecast>,
    handled: u64,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("active_city", &self.active_city)
            .field("language", &self.l10n.language())
            .field("units", &self.units)
            .field("pending_searches", &self.pending_searches.len())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Box<dyn SettingsStore>,
    ) -> Result<(Self, Channels)> {
        let l10n = Localizer::new(&config.language);
        Self::with_localizer(config, transport, store, l10n)
    }

    /// Like [`Orchestrator::new`], rendering through `l10n` and any extra
    /// catalogs it carries. The configured language is selected when `l10n`
    /// has a catalog for it.
    pub fn with_localizer(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Box<dyn SettingsStore>,
        mut l10n: Localizer,
    ) -> Result<(Self, Channels)> {
        if l10n.has_catalog(&config.language) {
            l10n.set_language(&config.language);
        }

        let endpoints = Endpoints::from_config(&config.network)
            .context("Invalid endpoint URL in network configuration")?;
        let (dispatcher, completions) = Dispatcher::new(transport);
        let (updates_tx, updates) = mpsc::unbounded_channel();

        let orchestrator = Self {
            dispatcher,
            classifier: ResponseClassifier::new(endpoints.clone()),
            pipelines: Pipelines::new(&endpoints, config.network.cache_places),
            l10n,
            favorites: FavoritesList::from_entries(config.favorites.iter().cloned()),
            units: config.units,
            active_city: None,
            config,
            store,
            updates: updates_tx,
            pending_searches: PendingSearchSet::default(),
            weather: None,
            forecast: Vec::new(),
            handled: 0,
        };

        Ok((orchestrator, Channels { completions, updates }))
    }

    // ----------------------------------------------------------------------
    // Operations
    // ----------------------------------------------------------------------

    /// Start an explicit search. The outcome arrives later through the classifier.
    pub fn search(&mut self, text: &str) -> Result<RequestId, InputError> {
        let query = PlaceQuery::new(text);
        if query.is_blank() {
            let notice = Notice::warning(
                &self.l10n,
                "Search/error_title",
                self.l10n.tr("Search/error_empty"),
            );
            self.emit(UiUpdate::Notice(notice));
            return Err(InputError::EmptySearch);
        }

        let url = self
            .pipelines
            .geocoder()
            .place_url(query.trimmed(), self.l10n.language());
        let id = self.dispatcher.issue(url);
        self.pending_searches.insert(id);

        info!(%id, query = query.trimmed(), "Search issued");
        Ok(id)
    }

    /// Look up suggestions for `text`. Called by the debouncer, never cancelled.
    pub fn request_suggestions(&mut self, text: &str) -> RequestId {
        let url = self
            .pipelines
            .geocoder()
            .suggestions_url(text, self.l10n.language());
        self.dispatcher.issue(url)
    }

    /// Make `identity` the active city and fetch its weather and forecast.
    pub fn set_active_city(&mut self, identity: &str) {
        info!(city = identity, "Active city changed");
        self.active_city = Some(identity.to_string());
        self.persist();
        self.emit(UiUpdate::ActiveCity(identity.to_string()));
        self.fetch_current(identity);
        self.fetch_forecast(identity);
    }

    /// Re-activate the persisted last city, if any.
    pub fn restore_last_city(&mut self) -> bool {
        match self.config.last_city.clone() {
            Some(city) if !city.is_empty() => {
                self.set_active_city(&city);
                true
            }
            _ => false,
        }
    }

    /// Fetch both pipelines for the active city. Returns `false` when there is none.
    ///
    /// Overlapping refreshes for the same city are not de-duplicated.
    pub fn refresh(&mut self) -> bool {
        let Some(city) = self.active_city.clone() else {
            return false;
        };
        debug!(city = %city, "Refreshing");
        self.fetch_current(&city);
        self.fetch_forecast(&city);
        true
    }

    pub fn fetch_current(&mut self, identity: &str) -> RequestId {
        let language = self.l10n.language().to_string();
        self.pipelines
            .start(PipelineKind::Current, identity, &language, &mut self.dispatcher)
    }

    pub fn fetch_forecast(&mut self, identity: &str) -> RequestId {
        let language = self.l10n.language().to_string();
        self.pipelines
            .start(PipelineKind::Forecast, identity, &language, &mut self.dispatcher)
    }

    pub fn toggle_units(&mut self) {
        self.set_units(self.units.toggled());
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = units;
        self.persist();
        self.emit(UiUpdate::Units(units));
        self.redisplay();
    }

    pub fn set_language(&mut self, language: &str) {
        if !self.l10n.set_language(language) {
            warn!(language, "No translations loaded for language, keys will show as-is");
        }
        self.persist();
        self.emit(UiUpdate::Language(language.to_string()));
        self.redisplay();
    }

    pub fn toggle_language(&mut self) {
        let next = self.l10n.toggled_language();
        self.set_language(next);
    }

    pub fn add_favorite(&mut self, identity: &str) -> FavoriteOutcome {
        if !self.favorites.add(identity) {
            let notice = Notice::info(
                &self.l10n,
                "Favorites/info_title",
                self.l10n.tr("Favorites/already_added"),
            );
            self.emit(UiUpdate::Notice(notice));
            return FavoriteOutcome::AlreadyPresent;
        }

        self.persist();
        self.emit_favorites();
        FavoriteOutcome::Added
    }

    /// Add the active city to favorites.
    pub fn add_active_to_favorites(&mut self) -> Result<FavoriteOutcome, FavoriteError> {
        let Some(city) = self.active_city.clone() else {
            let notice = Notice::warning(
                &self.l10n,
                "Favorites/info_title",
                self.l10n.tr("Favorites/select_first"),
            );
            self.emit(UiUpdate::Notice(notice));
            return Err(FavoriteError::NoActiveCity);
        };
        Ok(self.add_favorite(&city))
    }

    pub fn remove_favorite(&mut self, identity: &str) -> bool {
        if !self.favorites.remove(identity) {
            return false;
        }
        self.persist();
        self.emit_favorites();
        true
    }

    // ----------------------------------------------------------------------
    // Completions
    // ----------------------------------------------------------------------

    pub fn handle_completion(&mut self, completion: Completion) {
        self.handled += 1;

        if self.pipelines.owns(completion.id) {
            self.pipelines.advance(completion, &mut self.dispatcher);
            return;
        }

        let route = self
            .classifier
            .route(completion.id, &completion.url, &mut self.pending_searches);
        debug!(id = %completion.id, ?route, "Completion routed");

        match route {
            Route::SearchResult => self.on_search_finished(completion.result),
            Route::Suggestions => self.on_suggestions(completion.result),
            Route::CurrentWeather => {
                let origin = self.pipelines.take_origin(completion.id);
                self.on_weather(origin, completion.result);
            }
            Route::Forecast => {
                self.pipelines.take_origin(completion.id);
                self.on_forecast(completion.result);
            }
            Route::Discard => {}
        }
    }

    fn on_search_finished(&mut self, result: Result<String, TransportError>) {
        match geocoding::finish(result) {
            Ok(place) => {
                let identity = place.display_identity();
                self.pipelines.remember(&identity, place);
                self.set_active_city(&identity);
            }
            Err(FetchError::Transport(reason)) => {
                warn!(error = %reason, "Search request failed");
                let message = format!("{}{}", self.l10n.tr("Search/failed_to_find"), reason);
                let notice = Notice::warning(&self.l10n, "Search/network_error", message);
                self.emit(UiUpdate::Notice(notice));
            }
            Err(err) => {
                info!(error = %err, "Search found nothing");
                let notice = Notice::warning(
                    &self.l10n,
                    "Search/error_title",
                    self.l10n.tr("Search/city_not_found"),
                );
                self.emit(UiUpdate::Notice(notice));
            }
        }
    }

    fn on_suggestions(&mut self, result: Result<String, TransportError>) {
        let places = match result
            .map_err(FetchError::from)
            .and_then(|body| geocoding::parse_places(&body))
        {
            Ok(places) => places,
            Err(err) => {
                debug!(error = %err, "Suggestion lookup failed");
                return;
            }
        };

        let mut names = Vec::with_capacity(places.len());
        for place in places {
            let identity = place.display_identity();
            self.pipelines.remember(&identity, place);
            names.push(identity);
        }
        self.emit(UiUpdate::Suggestions(names));
    }

    fn on_weather(&mut self, origin: Option<String>, result: Result<String, TransportError>) {
        let city = origin
            .or_else(|| self.active_city.clone())
            .unwrap_or_default();

        let snapshot = match result
            .map_err(FetchError::from)
            .and_then(|body| forecast::parse_current(&body, &city))
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(city = %city, error = %err, "Weather fetch failed, keeping previous data");
                return;
            }
        };

        debug!(
            city = %snapshot.city,
            temp = snapshot.temperature_c,
            condition = %snapshot.description,
            "Weather updated"
        );
        let view = WeatherView::render(&snapshot, self.units, &self.l10n);
        self.weather = Some(snapshot);
        self.emit(UiUpdate::Weather(view));
    }

    fn on_forecast(&mut self, result: Result<String, TransportError>) {
        let days = match result
            .map_err(FetchError::from)
            .and_then(|body| forecast::parse_daily(&body))
        {
            Ok(days) => days,
            Err(err) => {
                warn!(error = %err, "Forecast fetch failed, keeping previous data");
                return;
            }
        };

        let views = DayView::render_all(&days, self.units, &self.l10n);
        self.forecast = days;
        self.emit(UiUpdate::Forecast(views));
    }

    // ----------------------------------------------------------------------
    // State
    // ----------------------------------------------------------------------

    /// Re-render the retained snapshot and forecast without any request.
    fn redisplay(&mut self) {
        if let Some(snapshot) = &self.weather {
            let view = WeatherView::render(snapshot, self.units, &self.l10n);
            self.emit(UiUpdate::Weather(view));
        }
        if !self.forecast.is_empty() {
            let views = DayView::render_all(&self.forecast, self.units, &self.l10n);
            self.emit(UiUpdate::Forecast(views));
        }
    }

    fn persist(&mut self) {
        self.config.favorites = self.favorites.as_slice().to_vec();
        self.config.last_city = self.active_city.clone();
        self.config.language = self.l10n.language().to_string();
        self.config.units = self.units;

        if let Err(err) = self.store.save(&self.config) {
            warn!(error = %format!("{err:#}"), "Failed to save settings");
        }
    }

    fn emit_favorites(&self) {
        self.emit(UiUpdate::Favorites(self.favorites.as_slice().to_vec()));
    }

    fn emit(&self, update: UiUpdate) {
        // Nobody listening is not an error; state is still updated.
        let _ = self.updates.send(update);
    }

    pub fn active_city(&self) -> Option<&str> {
        self.active_city.as_deref()
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.as_slice()
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn forecast(&self) -> &[DayForecast] {
        &self.forecast
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn language(&self) -> &str {
        self.l10n.language()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.l10n
    }

    pub fn pending_searches(&self) -> usize {
        self.pending_searches.len()
    }

    pub fn weather_view(&self) -> Option<WeatherView> {
        self.weather
            .as_ref()
            .map(|snapshot| WeatherView::render(snapshot, self.units, &self.l10n))
    }

    pub fn forecast_view(&self) -> Vec<DayView> {
        DayView::render_all(&self.forecast, self.units, &self.l10n)
    }

    /// Requests issued whose completion has not been handled yet.
    pub fn in_flight(&self) -> u64 {
        self.dispatcher.issued() - self.handled
    }

    /// Total requests issued since start.
    pub fn requests_issued(&self) -> u64 {
        self.dispatcher.issued()
    }
}
