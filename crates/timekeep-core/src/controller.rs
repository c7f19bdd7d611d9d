//! Glue between the engines, the history store, and the configuration.
//!
//! The controller owns the two engine state objects -- there are no globals.
//! UI events map onto its methods; a periodic callback drives [`tick`]
//! (Controller::tick) for both engines on the same thread as input handling.
//! Stop and expiry paths append to history before returning, so the history
//! file always reflects the last finished session.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::{Event, TimerView};
use crate::format::format_duration;
use crate::storage::{Config, HistoryStore};
use crate::timer::{Countdown, Phase, Stopwatch};

/// Name given to sessions flushed to history on process shutdown.
pub const EXIT_AUTOSAVE_NAME: &str = "auto-saved on exit";

pub struct Controller {
    config: Config,
    stopwatch: Stopwatch,
    countdown: Countdown,
    history: HistoryStore,
}

impl Controller {
    /// Fresh engines; the countdown is preloaded with the configured default
    /// target.
    pub fn new(config: Config, history: HistoryStore) -> Self {
        let countdown = Countdown::with_target_ms(config.default_target_ms());
        Self {
            config,
            stopwatch: Stopwatch::new(),
            countdown,
            history,
        }
    }

    /// Reassemble from previously persisted engine state.
    pub fn from_parts(
        config: Config,
        stopwatch: Stopwatch,
        countdown: Countdown,
        history: HistoryStore,
    ) -> Self {
        Self {
            config,
            stopwatch,
            countdown,
            history,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// True while either engine is not idle.
    pub fn any_active(&self) -> bool {
        self.stopwatch.phase() != Phase::Idle || self.countdown.phase() != Phase::Idle
    }

    /// Build a full display snapshot using the configured formats.
    pub fn snapshot(&self) -> Event {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Event {
        Event::Snapshot {
            stopwatch: TimerView {
                phase: self.stopwatch.phase(),
                text: format_duration(self.stopwatch.elapsed_ms(), self.config.stopwatch_mode()),
                value_ms: self.stopwatch.elapsed_ms(),
                warning: false,
            },
            countdown: TimerView {
                phase: self.countdown.phase(),
                text: format_duration(self.countdown.remaining_ms(), self.config.countdown_mode()),
                value_ms: self.countdown.remaining_ms(),
                warning: self.countdown.near_expiry(),
            },
            at: now,
        }
    }

    // ── Stopwatch ────────────────────────────────────────────────────

    pub fn stopwatch_start(&mut self) -> Option<Event> {
        self.stopwatch.start()
    }

    pub fn stopwatch_pause(&mut self) -> Option<Event> {
        self.stopwatch.pause()
    }

    pub fn stopwatch_resume(&mut self) -> Option<Event> {
        self.stopwatch.resume()
    }

    pub fn stopwatch_stop(&mut self) -> Result<Option<Event>> {
        self.stopwatch_stop_at(Utc::now())
    }

    pub fn stopwatch_stop_at(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let Some(record) = self.stopwatch.stop_at(now) else {
            return Ok(None);
        };
        let record = self.history.append(record)?;
        Ok(Some(Event::StopwatchStopped { record, at: now }))
    }

    // ── Countdown ────────────────────────────────────────────────────

    pub fn countdown_set_target(&mut self, hours: i64, minutes: i64, seconds: i64) -> Result<Event> {
        let target_ms = self.countdown.set_target(hours, minutes, seconds)?;
        Ok(Event::CountdownConfigured {
            target_ms,
            at: Utc::now(),
        })
    }

    pub fn countdown_start(&mut self) -> Option<Event> {
        self.countdown.start()
    }

    pub fn countdown_pause(&mut self) -> Option<Event> {
        self.countdown.pause()
    }

    pub fn countdown_resume(&mut self) -> Option<Event> {
        self.countdown.resume()
    }

    pub fn countdown_stop(&mut self) -> Result<Option<Event>> {
        self.countdown_stop_at(Utc::now())
    }

    pub fn countdown_stop_at(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let Some(record) = self.countdown.stop_at(now) else {
            return Ok(None);
        };
        let record = self.history.append(record)?;
        Ok(Some(Event::CountdownStopped { record, at: now }))
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Drive both engines. Returns the expiry event when the countdown
    /// reaches zero (its record is already in history at that point).
    pub fn tick(&mut self) -> Result<Option<Event>> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        self.stopwatch.tick_at(now);
        if let Some(record) = self.countdown.tick_at(now) {
            let record = self.history.append(record)?;
            return Ok(Some(Event::CountdownExpired { record, at: now }));
        }
        Ok(None)
    }

    // ── Shutdown ─────────────────────────────────────────────────────

    /// Force any non-idle engine through its stop transition so the session
    /// lands in history before the process exits.
    pub fn flush_running(&mut self) -> Result<Vec<Event>> {
        self.flush_running_at(Utc::now())
    }

    pub fn flush_running_at(&mut self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        if let Some(record) = self.stopwatch.stop_at(now) {
            let record = self.history.append(record.named(EXIT_AUTOSAVE_NAME))?;
            events.push(Event::StopwatchStopped { record, at: now });
        }
        if let Some(record) = self.countdown.stop_at(now) {
            let record = self.history.append(record.named(EXIT_AUTOSAVE_NAME))?;
            events.push(Event::CountdownStopped { record, at: now });
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TimerKind;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn t(offset_ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::milliseconds(offset_ms)
    }

    fn controller_in(dir: &tempfile::TempDir) -> Controller {
        let history = HistoryStore::load(dir.path().join("history.json")).unwrap();
        Controller::new(Config::default(), history)
    }

    #[test]
    fn stopwatch_stop_lands_in_history_with_auto_name() {
        let dir = tempdir().unwrap();
        let mut ctl = controller_in(&dir);

        ctl.stopwatch.start_at(t(0));
        let event = ctl.stopwatch_stop_at(t(4_000)).unwrap().unwrap();
        let Event::StopwatchStopped { record, .. } = event else {
            panic!("expected StopwatchStopped");
        };
        assert_eq!(record.name, "Stopwatch1");
        assert_eq!(record.duration_ms, 4_000);
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn expiry_appends_and_notifies_once() {
        let dir = tempdir().unwrap();
        let mut ctl = controller_in(&dir);

        ctl.countdown.set_target(0, 0, 10).unwrap();
        ctl.countdown.start_at(t(0));

        assert!(ctl.tick_at(t(5_000)).unwrap().is_none());
        let event = ctl.tick_at(t(10_050)).unwrap().unwrap();
        let Event::CountdownExpired { record, .. } = event else {
            panic!("expected CountdownExpired");
        };
        assert_eq!(record.duration_ms, 10_000);
        assert_eq!(record.original_ms, 10_000);

        // No second notification from later ticks.
        assert!(ctl.tick_at(t(11_000)).unwrap().is_none());
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn flush_tags_interrupted_sessions() {
        let dir = tempdir().unwrap();
        let mut ctl = controller_in(&dir);

        ctl.stopwatch.start_at(t(0));
        ctl.countdown.set_target(0, 1, 0).unwrap();
        ctl.countdown.start_at(t(0));
        ctl.tick_at(t(2_000)).unwrap();

        let events = ctl.flush_running_at(t(2_000)).unwrap();
        assert_eq!(events.len(), 2);
        assert!(!ctl.any_active());
        assert_eq!(ctl.history().len(), 2);
        for record in ctl.history().records() {
            assert_eq!(record.name, EXIT_AUTOSAVE_NAME);
        }
        let countdown = ctl
            .history()
            .records()
            .iter()
            .find(|r| r.kind == TimerKind::Countdown)
            .unwrap();
        assert_eq!(countdown.duration_ms, 2_000);
        assert_eq!(countdown.original_ms, 60_000);
    }

    #[test]
    fn flush_with_nothing_running_is_empty() {
        let dir = tempdir().unwrap();
        let mut ctl = controller_in(&dir);
        assert!(ctl.flush_running_at(t(0)).unwrap().is_empty());
        assert!(ctl.history().is_empty());
    }

    #[test]
    fn snapshot_formats_per_config() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.display.stopwatch_format = "mm:ss".into();
        config.display.countdown_format = "ss".into();
        let history = HistoryStore::load(dir.path().join("history.json")).unwrap();
        let mut ctl = Controller::from_parts(
            config,
            Stopwatch::new(),
            Countdown::with_target_ms(9_000),
            history,
        );

        ctl.stopwatch.start_at(t(0));
        ctl.countdown.start_at(t(0));
        ctl.tick_at(t(4_000)).unwrap();

        let Event::Snapshot { stopwatch, countdown, .. } = ctl.snapshot_at(t(4_000)) else {
            panic!("expected Snapshot");
        };
        assert_eq!(stopwatch.text, "00:04");
        assert_eq!(stopwatch.phase, Phase::Running);
        assert!(!stopwatch.warning);
        assert_eq!(countdown.text, "05");
        assert!(countdown.warning);
    }

    #[test]
    fn new_controller_uses_configured_default_target() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.countdown.default_secs = 90;
        let history = HistoryStore::load(dir.path().join("history.json")).unwrap();
        let ctl = Controller::new(config, history);
        assert_eq!(ctl.countdown().remaining_ms(), 90_000);
    }

    #[test]
    fn set_target_validation_leaves_engine_alone() {
        let dir = tempdir().unwrap();
        let mut ctl = controller_in(&dir);
        assert!(ctl.countdown_set_target(0, 0, 0).is_err());
        assert_eq!(ctl.countdown().remaining_ms(), 30_000);
    }
}
