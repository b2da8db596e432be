//! Coalesces bursts of input-changed events into one suggestion lookup.

use std::time::Duration;

use tokio::time::Instant;

/// Minimum trimmed length before a lookup is scheduled.
pub const MIN_SUGGESTION_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Pending { deadline: Instant, text: String },
}

/// Two-state debouncer. Every input event restarts the quiet period; the lookup
/// fires once the input has been quiet for the whole period.
#[derive(Debug, Clone)]
pub struct SuggestionDebouncer {
    quiet: Duration,
    state: State,
}

impl SuggestionDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            state: State::Idle,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record an input change at `now`, replacing anything scheduled.
    pub fn input_changed(&mut self, text: &str, now: Instant) {
        let text = text.trim();
        self.state = if text.chars().count() >= MIN_SUGGESTION_CHARS {
            State::Pending {
                deadline: now + self.quiet,
                text: text.to_string(),
            }
        } else {
            State::Idle
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Pending { deadline, .. } => Some(*deadline),
            State::Idle => None,
        }
    }

    /// If the quiet period has elapsed by `now`, return the text to look up and go idle.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        if self.deadline().is_none_or(|deadline| now < deadline) {
            return None;
        }

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending { text, .. } => Some(text),
            State::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Replay `(offset_ms, text)` events and poll every millisecond up to `until_ms`.
    fn replay(events: &[(u64, &str)], until_ms: u64) -> Vec<(u64, String)> {
        let t0 = Instant::now();
        let mut debouncer = SuggestionDebouncer::new(QUIET);
        let mut fired = Vec::new();

        for tick in 0..=until_ms {
            let now = t0 + ms(tick);
            for (_, text) in events.iter().filter(|(at, _)| *at == tick) {
                debouncer.input_changed(text, now);
            }
            if let Some(text) = debouncer.fire(now) {
                fired.push((tick, text));
            }
        }

        fired
    }

    #[test]
    fn burst_fires_once_after_last_event() {
        let fired = replay(&[(0, "Be"), (100, "Ber"), (200, "Berl"), (600, "Berli")], 2000);

        assert_eq!(fired, vec![(1100, "Berli".to_string())]);
    }

    #[test]
    fn quiet_gap_fires_for_each_burst() {
        let fired = replay(&[(0, "Os"), (700, "Oslo")], 2000);

        assert_eq!(fired, vec![(500, "Os".to_string()), (1200, "Oslo".to_string())]);
    }

    #[test]
    fn short_input_cancels_pending_lookup() {
        let fired = replay(&[(0, "Rom"), (100, "R")], 2000);
        assert!(fired.is_empty());
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let now = Instant::now();
        let mut debouncer = SuggestionDebouncer::new(QUIET);

        debouncer.input_changed("  a  ", now);
        assert!(!debouncer.is_pending());

        debouncer.input_changed("  ab ", now);
        assert_eq!(debouncer.deadline(), Some(now + QUIET));
        assert_eq!(debouncer.fire(now + QUIET), Some("ab".to_string()));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn does_not_fire_early() {
        let now = Instant::now();
        let mut debouncer = SuggestionDebouncer::new(QUIET);

        debouncer.input_changed("Lisbon", now);
        assert_eq!(debouncer.fire(now + ms(499)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn idle_never_fires() {
        let mut debouncer = SuggestionDebouncer::new(QUIET);
        assert_eq!(debouncer.fire(Instant::now() + ms(10_000)), None);
    }
}
