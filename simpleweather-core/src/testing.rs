//! Test doubles shared by the unit tests.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::{
    config::{Config, SettingsStore},
    error::TransportError,
    orchestrator::Orchestrator,
    provider::query_param,
    transport::{Completion, Transport},
    view::UiUpdate,
};

type Responder = Box<dyn Fn(&Url) -> Result<String, TransportError> + Send + Sync>;

/// Answers requests from a closure and records every URL it was asked for.
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<Url>>,
    responder: Responder,
}

impl fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    /// Every request succeeds with an empty JSON object.
    pub(crate) fn new() -> Self {
        Self::with_responder(|_| Ok("{}".to_string()))
    }

    pub(crate) fn with_responder(
        responder: impl Fn(&Url) -> Result<String, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Mimics the geocoding and forecast endpoints for a handful of places.
    pub(crate) fn open_meteo() -> Self {
        Self::with_responder(|url| Ok(open_meteo_body(url)))
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Url) -> bool) -> usize {
        self.requests.lock().unwrap().iter().filter(|u| pred(u)).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(url.clone());
        (self.responder)(url)
    }
}

pub(crate) fn is_geocode(url: &Url) -> bool {
    url.host_str() == Some("geocoding-api.open-meteo.com")
}

pub(crate) fn is_current(url: &Url) -> bool {
    !is_geocode(url) && query_param(url, "current").is_some()
}

pub(crate) fn is_daily(url: &Url) -> bool {
    !is_geocode(url) && query_param(url, "daily").is_some()
}

pub(crate) const PARIS_GEOCODE: &str = r#"{"results":[{"id":2988507,"name":"Paris","latitude":48.85,"longitude":2.35,"country":"France"}]}"#;

pub(crate) const OSLO_GEOCODE: &str =
    r#"{"results":[{"name":"Oslo","latitude":59.91,"longitude":10.75,"country":"Norway"}]}"#;

pub(crate) const PAR_SUGGESTIONS: &str = r#"{"results":[
    {"name":"Paris","latitude":48.85,"longitude":2.35,"country":"France"},
    {"name":"Parma","latitude":44.8,"longitude":10.33,"country":"Italy"}
]}"#;

pub(crate) const NO_RESULTS: &str = r#"{"generationtime_ms":0.5}"#;

pub(crate) const CURRENT_CLOUDY: &str = r#"{"latitude":48.86,"longitude":2.34,"current":{
    "time":"2026-10-18T12:00","temperature_2m":15.2,"relative_humidity_2m":71,
    "apparent_temperature":13.9,"weather_code":2,"wind_speed_10m":4.1}}"#;

pub(crate) const DAILY_FIVE: &str = r#"{"daily":{
    "time":["2026-10-18","2026-10-19","2026-10-20","2026-10-21","2026-10-22"],
    "temperature_2m_max":[16.0,17.5,12.1,9.0,10.4],
    "temperature_2m_min":[8.2,9.1,6.0,1.5,2.0],
    "weather_code":[2,61,0,71,95]}}"#;

pub(crate) fn open_meteo_body(url: &Url) -> String {
    if is_geocode(url) {
        let name = query_param(url, "name").unwrap_or_default();
        let count = query_param(url, "count").unwrap_or_default();
        return match (name.as_str(), count.as_str()) {
            (_, "10") if name.starts_with("Par") => PAR_SUGGESTIONS,
            ("Paris", _) => PARIS_GEOCODE,
            ("Oslo", _) => OSLO_GEOCODE,
            _ => NO_RESULTS,
        }
        .to_string();
    }
    if is_current(url) {
        return CURRENT_CLOUDY.to_string();
    }
    if is_daily(url) {
        return DAILY_FIVE.to_string();
    }
    "{}".to_string()
}

/// Keeps every saved config in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    saved: Arc<Mutex<Vec<Config>>>,
}

impl MemoryStore {
    pub(crate) fn last(&self) -> Option<Config> {
        self.saved.lock().unwrap().last().cloned()
    }

    pub(crate) fn saves(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

impl SettingsStore for MemoryStore {
    fn save(&mut self, config: &Config) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(config.clone());
        Ok(())
    }
}

/// Feed completions to the orchestrator until nothing is in flight.
pub(crate) async fn settle(
    orchestrator: &mut Orchestrator,
    completions: &mut mpsc::UnboundedReceiver<Completion>,
) {
    while orchestrator.in_flight() > 0 {
        let completion = completions
            .recv()
            .await
            .expect("dispatcher dropped with requests in flight");
        orchestrator.handle_completion(completion);
    }
}

pub(crate) fn drain_updates(updates: &mut mpsc::UnboundedReceiver<UiUpdate>) -> Vec<UiUpdate> {
    let mut out = Vec::new();
    while let Ok(update) = updates.try_recv() {
        out.push(update);
    }
    out
}
