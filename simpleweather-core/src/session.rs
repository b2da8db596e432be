//! Session actor: one task owns the orchestrator and its timers and
//! serializes UI commands, transport completions and timer ticks.

use std::sync::Arc;

use anyhow::Result;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, info};

use crate::{
    config::{Config, SettingsStore},
    debounce::SuggestionDebouncer,
    i18n::Localizer,
    orchestrator::{Channels, Orchestrator},
    scheduler::RefreshScheduler,
    transport::{Completion, Transport},
    view::UiUpdate,
};

/// Operations the UI layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Explicit search for the typed text.
    Search(String),
    /// The search field changed; feeds the suggestion debouncer.
    InputChanged(String),
    /// A suggestion or favorite was picked.
    SelectCity(String),
    Refresh,
    ToggleUnits,
    SetLanguage(String),
    ToggleLanguage,
    AddFavorite(String),
    /// Add whatever city is currently active.
    FavoriteActive,
    RemoveFavorite(String),
    Shutdown,
}

/// The UI side of a running session.
#[derive(Debug)]
pub struct SessionHandle {
    pub commands: mpsc::UnboundedSender<Command>,
    pub updates: mpsc::UnboundedReceiver<UiUpdate>,
    pub task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Session {
    orchestrator: Orchestrator,
    debouncer: SuggestionDebouncer,
    scheduler: RefreshScheduler,
}

impl Session {
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Box<dyn SettingsStore>,
    ) -> Result<(Self, Channels)> {
        let l10n = Localizer::new(&config.language);
        Self::with_localizer(config, transport, store, l10n)
    }

    /// Build a session whose orchestrator renders through `l10n`.
    pub fn with_localizer(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Box<dyn SettingsStore>,
        l10n: Localizer,
    ) -> Result<(Self, Channels)> {
        let debouncer = SuggestionDebouncer::new(config.timing.suggestion_debounce());
        let scheduler = RefreshScheduler::new(config.timing.refresh_interval(), Instant::now());
        let (orchestrator, channels) = Orchestrator::with_localizer(config, transport, store, l10n)?;

        Ok((
            Self {
                orchestrator,
                debouncer,
                scheduler,
            },
            channels,
        ))
    }

    /// Build a session and run it on its own task. Must be called inside a tokio runtime.
    pub fn spawn(
        config: Config,
        transport: Arc<dyn Transport>,
        store: Box<dyn SettingsStore>,
    ) -> Result<SessionHandle> {
        let (session, channels) = Self::new(config, transport, store)?;
        Ok(session.start(channels))
    }

    /// Run this session on its own task. Must be called inside a tokio runtime.
    pub fn start(self, channels: Channels) -> SessionHandle {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(command_rx, channels.completions));

        SessionHandle {
            commands,
            updates: channels.updates,
            task,
        }
    }

    /// Run until `Shutdown` arrives or every command sender is dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        if self.orchestrator.restore_last_city() {
            info!(city = ?self.orchestrator.active_city(), "Restored last city");
        }

        loop {
            let suggest_at = self.debouncer.deadline();
            let refresh_at = self.scheduler.deadline();

            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Some(completion) = completions.recv() => {
                    self.orchestrator.handle_completion(completion);
                }
                _ = sleep_until(suggest_at.unwrap_or(refresh_at)), if suggest_at.is_some() => {
                    if let Some(text) = self.debouncer.fire(Instant::now()) {
                        let id = self.orchestrator.request_suggestions(&text);
                        debug!(%id, text, "Suggestion lookup issued");
                    }
                }
                _ = sleep_until(refresh_at) => {
                    if self.scheduler.poll(Instant::now()) && !self.orchestrator.refresh() {
                        debug!("Refresh tick with no active city");
                    }
                }
            }
        }

        info!("Session stopped");
    }

    /// Returns `false` when the session should stop.
    fn handle_command(&mut self, command: Command) -> bool {
        debug!(?command, "Command");

        match command {
            Command::Search(text) => {
                // Failures are already reported as a notice.
                let _ = self.orchestrator.search(&text);
            }
            Command::InputChanged(text) => self.debouncer.input_changed(&text, Instant::now()),
            Command::SelectCity(identity) => self.orchestrator.set_active_city(&identity),
            Command::Refresh => {
                self.orchestrator.refresh();
            }
            Command::ToggleUnits => self.orchestrator.toggle_units(),
            Command::SetLanguage(code) => self.orchestrator.set_language(&code),
            Command::ToggleLanguage => self.orchestrator.toggle_language(),
            Command::AddFavorite(identity) => {
                self.orchestrator.add_favorite(&identity);
            }
            Command::FavoriteActive => {
                let _ = self.orchestrator.add_active_to_favorites();
            }
            Command::RemoveFavorite(identity) => {
                self.orchestrator.remove_favorite(&identity);
            }
            Command::Shutdown => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        provider::query_param,
        testing::{MemoryStore, ScriptedTransport, drain_updates, is_current, is_daily, is_geocode},
    };
    use tokio::time::sleep;

    fn english() -> Config {
        Config {
            language: "en".into(),
            ..Config::default()
        }
    }

    fn spawn(config: Config) -> (SessionHandle, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::open_meteo());
        let handle =
            Session::spawn(config, transport.clone(), Box::new(MemoryStore::default())).unwrap();
        (handle, transport)
    }

    fn is_suggestion_lookup(url: &url::Url) -> bool {
        is_geocode(url) && query_param(url, "count").as_deref() == Some("10")
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_sends_one_lookup() {
        let (mut handle, transport) = spawn(english());

        for (text, pause) in [("Pa", 0), ("Par", 100), ("Pari", 100), ("Paris", 400)] {
            sleep(Duration::from_millis(pause)).await;
            handle.commands.send(Command::InputChanged(text.into())).unwrap();
        }
        sleep(Duration::from_millis(499)).await;
        assert_eq!(transport.count(is_suggestion_lookup), 0);

        sleep(Duration::from_millis(100)).await;
        let lookups: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(is_suggestion_lookup)
            .collect();
        assert_eq!(lookups.len(), 1);
        assert_eq!(query_param(&lookups[0], "name").as_deref(), Some("Paris"));

        let updates = drain_updates(&mut handle.updates);
        assert!(updates.iter().any(|u| matches!(u, UiUpdate::Suggestions(names) if names.len() == 2)));
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_cancels_pending_lookup() {
        let (handle, transport) = spawn(english());

        handle.commands.send(Command::InputChanged("Pa".into())).unwrap();
        sleep(Duration::from_millis(200)).await;
        handle.commands.send(Command::InputChanged("P".into())).unwrap();
        sleep(Duration::from_secs(2)).await;

        assert_eq!(transport.count(is_suggestion_lookup), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_tick_refetches_active_city() {
        let (handle, transport) = spawn(english());

        handle.commands.send(Command::SelectCity("Oslo, Norway".into())).unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.count(is_current), 1);
        assert_eq!(transport.count(is_daily), 1);

        sleep(Duration::from_secs(600)).await;
        assert_eq!(transport.count(is_current), 2);
        assert_eq!(transport.count(is_daily), 2);
        // Coordinates came from the cache on the tick.
        assert_eq!(transport.count(is_geocode), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_without_city_is_quiet() {
        let (handle, transport) = spawn(english());

        sleep(Duration::from_secs(1300)).await;
        assert!(transport.requests().is_empty());
        assert!(!handle.task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn restores_last_city_on_start() {
        let config = Config {
            last_city: Some("Paris, France".into()),
            ..english()
        };
        let (mut handle, _transport) = spawn(config);

        sleep(Duration::from_millis(10)).await;
        let updates = drain_updates(&mut handle.updates);
        assert_eq!(updates[0], UiUpdate::ActiveCity("Paris, France".into()));
        assert!(updates.iter().any(|u| matches!(u, UiUpdate::Weather(v) if v.city == "Paris, France")));
    }

    #[tokio::test(start_paused = true)]
    async fn session_renders_with_injected_catalog() {
        let mut l10n = Localizer::new("ru");
        l10n.insert_catalog("de", [("WeatherConditions/cloudy", "Bewölkt")]);
        let config = Config {
            language: "de".into(),
            last_city: Some("Paris, France".into()),
            ..Config::default()
        };
        let (session, channels) = Session::with_localizer(
            config,
            Arc::new(ScriptedTransport::open_meteo()),
            Box::new(MemoryStore::default()),
            l10n,
        )
        .unwrap();
        let mut handle = session.start(channels);

        sleep(Duration::from_millis(10)).await;
        let updates = drain_updates(&mut handle.updates);
        assert!(updates.iter().any(|u| matches!(u, UiUpdate::Weather(v) if v.description == "Bewölkt")));
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let (handle, _transport) = spawn(english());

        handle.commands.send(Command::Shutdown).unwrap();
        handle.task.await.unwrap();
    }

    #[tokio::test]
    async fn dropping_commands_stops_the_task() {
        let (handle, _transport) = spawn(english());
        let SessionHandle { commands, task, .. } = handle;

        drop(commands);
        task.await.unwrap();
    }
}
