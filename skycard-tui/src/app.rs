//! Application core — the fetch/display state machine and event loop.
//!
//! All state lives here and is mutated only from the loop in [`App::run`]:
//! keystrokes and ticks arrive from the [`EventReader`], fetch results come
//! back over an mpsc channel from spawned lookup tasks. Every fetch carries a
//! monotonic sequence stamp; a response whose stamp is no longer the latest
//! is stale and dropped, so overlapping lookups can never race the card.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use skycard_core::{FetchError, WeatherProvider, WeatherSnapshot};

use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::ui;

/// Cosmetic pause before a successful snapshot replaces the card, so the
/// spinner is visible even on a fast network.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);
/// Lifetime of the transient error banner. A newer failure resets it.
pub const ERROR_TTL: Duration = Duration::from_secs(2);
/// How long the search bar shakes after an empty submit.
pub const SHAKE_DURATION: Duration = Duration::from_millis(500);
/// Banner text for any lookup failure, network or otherwise.
pub const ERROR_MESSAGE: &str = "Not found";

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Messages delivered back to the event loop by spawned fetch tasks.
#[derive(Debug)]
pub enum Msg {
    /// A fetch settled, successfully or not. `seq` identifies which
    /// issued request this answers.
    Settled {
        seq: u64,
        result: Result<WeatherSnapshot, FetchError>,
    },
}

/// A successful response held back until its reveal deadline passes.
#[derive(Debug)]
pub struct PendingReveal {
    snapshot: WeatherSnapshot,
    reveal_at: Instant,
}

/// The single tagged UI state. The spinner and the error banner are
/// mutually exclusive by construction.
#[derive(Debug)]
pub enum Phase {
    Idle,
    Loading {
        query: String,
        pending: Option<PendingReveal>,
    },
    Failed {
        message: String,
        expires_at: Instant,
    },
}

/// Top-level widget state and event loop.
pub struct App {
    provider: Arc<dyn WeatherProvider>,
    /// Draft text in the search bar, held verbatim.
    input: Input,
    /// Last submitted query.
    query: String,
    /// Stamp of the latest issued fetch.
    seq: u64,
    phase: Phase,
    /// Last successful snapshot; survives later loads and failures.
    snapshot: Option<WeatherSnapshot>,
    shake_until: Option<Instant>,
    throbber: ThrobberState,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: Option<mpsc::UnboundedReceiver<Msg>>,
    running: bool,
}

impl App {
    pub fn new(provider: Arc<dyn WeatherProvider>, initial_query: String) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            provider,
            input: Input::default(),
            query: initial_query,
            seq: 0,
            phase: Phase::Idle,
            snapshot: None,
            shake_until: None,
            throbber: ThrobberState::default(),
            msg_tx,
            msg_rx: Some(msg_rx),
            running: true,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self, mut tui: Tui) -> Result<()> {
        let mut msg_rx = self
            .msg_rx
            .take()
            .ok_or_else(|| anyhow!("event loop already running"))?;

        tui.enter()?;
        let mut events = EventReader::new(TICK_INTERVAL);

        // Initial lookup for the default location.
        self.start_fetch();
        info!(query = %self.query, "event loop started");

        while self.running {
            tokio::select! {
                Some(event) = events.next() => match event {
                    Event::Key(key) => self.handle_key(key, Instant::now()),
                    Event::Resize(_, _) => {}
                    Event::Tick => self.on_tick(Instant::now()),
                },
                Some(Msg::Settled { seq, result }) = msg_rx.recv() => {
                    self.on_settled(seq, result, Instant::now());
                }
                else => break,
            }

            tui.draw(|frame| ui::draw(frame, self))?;
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Enter => self.submit(now),
            _ => {
                self.input.handle_event(&CtEvent::Key(key));
            }
        }
    }

    /// Submit the draft. An empty draft shakes the search bar and changes
    /// nothing else; a non-empty draft becomes the query and starts a fetch.
    /// The draft is NOT cleared here — it empties when the request settles.
    pub fn submit(&mut self, now: Instant) {
        if self.input.value().is_empty() {
            self.shake_until = Some(now + SHAKE_DURATION);
            return;
        }

        self.query = self.input.value().to_string();
        self.start_fetch();
    }

    /// State transition for issuing a fetch; returns the sequence stamp the
    /// response must carry to still count.
    fn begin_fetch(&mut self) -> u64 {
        self.seq += 1;
        self.phase = Phase::Loading {
            query: self.query.clone(),
            pending: None,
        };
        self.seq
    }

    /// Issue the fetch for the current query as a background task. The task
    /// is never aborted; its result is discarded instead if superseded.
    fn start_fetch(&mut self) {
        let seq = self.begin_fetch();
        let provider = Arc::clone(&self.provider);
        let query = self.query.clone();
        let tx = self.msg_tx.clone();

        debug!(seq, %query, "starting lookup");
        tokio::spawn(async move {
            let result = provider.fetch_current(&query).await;
            // A closed receiver means the app is shutting down.
            let _ = tx.send(Msg::Settled { seq, result });
        });
    }

    /// A fetch settled. Stale stamps are dropped outright; the latest stamp
    /// clears the draft and either schedules the reveal or raises the
    /// banner. Loading ends synchronously on failure — the banner's expiry
    /// is a separate concern.
    pub fn on_settled(
        &mut self,
        seq: u64,
        result: Result<WeatherSnapshot, FetchError>,
        now: Instant,
    ) {
        if seq != self.seq {
            debug!(seq, latest = self.seq, "dropping stale response");
            return;
        }

        self.input.reset();

        match result {
            Ok(snapshot) => {
                debug!(seq, location = %snapshot.location_name, "lookup succeeded");
                self.phase = Phase::Loading {
                    query: self.query.clone(),
                    pending: Some(PendingReveal {
                        snapshot,
                        reveal_at: now + REVEAL_DELAY,
                    }),
                };
            }
            Err(err) => {
                warn!(seq, error = %err, "lookup failed");
                self.phase = Phase::Failed {
                    message: ERROR_MESSAGE.to_string(),
                    expires_at: now + ERROR_TTL,
                };
            }
        }
    }

    /// Deadline checks, driven by the periodic tick: reveal a held
    /// snapshot, expire the banner, stop the shake.
    pub fn on_tick(&mut self, now: Instant) {
        if let Phase::Loading { pending, .. } = &mut self.phase {
            self.throbber.calc_next();

            if pending.as_ref().is_some_and(|p| now >= p.reveal_at) {
                let revealed = pending.take();
                if let Some(reveal) = revealed {
                    self.snapshot = Some(reveal.snapshot);
                    self.phase = Phase::Idle;
                }
            }
        }

        if let Phase::Failed { expires_at, .. } = &self.phase {
            if now >= *expires_at {
                self.phase = Phase::Idle;
            }
        }

        if self.shake_until.is_some_and(|until| now >= until) {
            self.shake_until = None;
        }
    }

    // ── Accessors for the renderer ──────────────────────────────────

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// The query an in-flight lookup is for, if any.
    pub fn loading_query(&self) -> Option<&str> {
        match &self.phase {
            Phase::Loading { query, .. } => Some(query),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_until.is_some()
    }

    pub fn throbber_state(&mut self) -> &mut ThrobberState {
        &mut self.throbber
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct StubProvider;

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch_current(&self, location: &str) -> Result<WeatherSnapshot, FetchError> {
            Ok(sample(location))
        }
    }

    fn sample(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: name.to_string(),
            country: "AT".to_string(),
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            temperature_c: 20.7,
            feels_like_c: 19.9,
            humidity_pct: 40,
            wind_speed_mps: 3.1,
            visibility_m: 10_000,
            observation_time: Utc::now(),
        }
    }

    fn app() -> App {
        App::new(Arc::new(StubProvider), "Vienna".to_string())
    }

    fn failure() -> FetchError {
        FetchError::Malformed("stub failure")
    }

    #[test]
    fn empty_submit_shakes_and_issues_no_fetch() {
        let mut app = app();
        let now = Instant::now();

        app.submit(now);

        assert!(app.is_shaking());
        assert_eq!(app.seq, 0);
        assert_eq!(app.query, "Vienna");
        assert!(matches!(app.phase, Phase::Idle));

        // Shake is one-shot: gone after its 500ms window.
        app.on_tick(now + SHAKE_DURATION);
        assert!(!app.is_shaking());
    }

    #[tokio::test]
    async fn submit_sets_query_and_keeps_draft_until_settle() {
        let mut app = app();
        let now = Instant::now();

        app.input = Input::new("London".to_string());
        app.submit(now);

        assert_eq!(app.query, "London");
        assert_eq!(app.seq, 1);
        assert!(app.is_loading());
        // Draft survives submit; only settling clears it.
        assert_eq!(app.input.value(), "London");

        app.on_settled(1, Ok(sample("London")), now);
        assert_eq!(app.input.value(), "");
    }

    #[test]
    fn success_is_held_back_for_the_reveal_delay() {
        let mut app = app();
        let now = Instant::now();

        let seq = app.begin_fetch();
        app.on_settled(seq, Ok(sample("Vienna")), now);

        // Still behind the spinner until the artificial delay passes.
        assert!(app.is_loading());
        assert!(app.snapshot().is_none());

        app.on_tick(now + REVEAL_DELAY - Duration::from_millis(100));
        assert!(app.is_loading());

        app.on_tick(now + REVEAL_DELAY);
        assert!(!app.is_loading());
        assert_eq!(
            app.snapshot().map(|s| s.location_name.as_str()),
            Some("Vienna")
        );
    }

    #[test]
    fn failure_clears_loading_synchronously_and_banner_expires() {
        let mut app = app();
        let now = Instant::now();
        app.snapshot = Some(sample("Vienna"));

        let seq = app.begin_fetch();
        app.on_settled(seq, Err(failure()), now);

        // No timer involved: the transition itself ends the loading state.
        assert!(!app.is_loading());
        assert_eq!(app.error_message(), Some(ERROR_MESSAGE));
        // The stale snapshot is kept, not cleared, by a failed lookup.
        assert!(app.snapshot().is_some());

        app.on_tick(now + ERROR_TTL - Duration::from_millis(100));
        assert_eq!(app.error_message(), Some(ERROR_MESSAGE));

        app.on_tick(now + ERROR_TTL);
        assert_eq!(app.error_message(), None);
        assert!(matches!(app.phase, Phase::Idle));
    }

    #[test]
    fn a_newer_failure_resets_the_banner_deadline() {
        let mut app = app();
        let t0 = Instant::now();

        let seq = app.begin_fetch();
        app.on_settled(seq, Err(failure()), t0);

        let t1 = t0 + Duration::from_secs(1);
        let seq = app.begin_fetch();
        app.on_settled(seq, Err(failure()), t1);

        // Old deadline (t0 + 2s) must not clear the newer banner.
        app.on_tick(t0 + ERROR_TTL);
        assert_eq!(app.error_message(), Some(ERROR_MESSAGE));

        app.on_tick(t1 + ERROR_TTL);
        assert_eq!(app.error_message(), None);
    }

    #[test]
    fn stale_responses_are_dropped_regardless_of_arrival_order() {
        let mut app = app();
        let now = Instant::now();

        app.query = "Paris".to_string();
        let paris_seq = app.begin_fetch();
        app.query = "London".to_string();
        let london_seq = app.begin_fetch();

        // Newer response lands first, then the superseded one trickles in.
        app.on_settled(london_seq, Ok(sample("London")), now);
        app.on_settled(paris_seq, Ok(sample("Paris")), now);

        app.on_tick(now + REVEAL_DELAY);
        assert_eq!(
            app.snapshot().map(|s| s.location_name.as_str()),
            Some("London")
        );

        // Same outcome when the stale response arrives first.
        app.query = "Oslo".to_string();
        let oslo_seq = app.begin_fetch();
        app.query = "Lima".to_string();
        let lima_seq = app.begin_fetch();

        app.on_settled(oslo_seq, Ok(sample("Oslo")), now);
        assert!(app.snapshot().map(|s| s.location_name.as_str()) != Some("Oslo"));

        app.on_settled(lima_seq, Ok(sample("Lima")), now);
        app.on_tick(now + REVEAL_DELAY);
        assert_eq!(
            app.snapshot().map(|s| s.location_name.as_str()),
            Some("Lima")
        );
    }

    #[test]
    fn stale_settle_does_not_clear_the_draft() {
        let mut app = app();
        let now = Instant::now();

        let old_seq = app.begin_fetch();
        app.begin_fetch();
        app.input = Input::new("half-typed".to_string());

        app.on_settled(old_seq, Err(failure()), now);

        assert_eq!(app.input.value(), "half-typed");
        // A stale failure must not raise the banner either.
        assert_eq!(app.error_message(), None);
    }
}
