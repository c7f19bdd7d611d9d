//! Stopwatch engine.
//!
//! A wall-clock-based state machine. It does not use internal threads -- the
//! caller is responsible for calling `tick()` periodically while running.
//! Elapsed time is always recomputed from the anchor timestamp, never by
//! adding tick deltas, so slow or missed ticks cannot accumulate drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |    \      |
//!           +---stop----+--> Idle (emits a TimerRecord)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{elapsed_ms_between, Phase};
use crate::events::Event;
use crate::storage::{TimerKind, TimerRecord};

/// Up-counting timer measuring elapsed wall-clock time across run/pause
/// segments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    phase: Phase,
    /// Anchor of the current run segment. Pushed forward on resume so the
    /// elapsed value stays continuous across pauses.
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    /// Elapsed milliseconds as of the last tick (or the frozen value while
    /// paused).
    #[serde(default)]
    elapsed_ms: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // Each command has an `_at` variant taking the current instant
    // explicitly; the plain variant passes `Utc::now()`. A command that does
    // not apply in the current phase is a no-op returning `None`.

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(Utc::now())
    }

    pub fn start_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Running;
                self.started_at = Some(now);
                self.elapsed_ms = 0;
                Some(Event::StopwatchStarted { at: now })
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(Utc::now())
    }

    pub fn pause_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Running => {
                self.elapsed_ms = elapsed_ms_between(self.started_at?, now);
                self.phase = Phase::Paused;
                Some(Event::StopwatchPaused {
                    elapsed_ms: self.elapsed_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.resume_at(Utc::now())
    }

    pub fn resume_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Paused => {
                // Re-anchor so future elapsed continues from the frozen value.
                self.started_at = Some(now - chrono::Duration::milliseconds(self.elapsed_ms as i64));
                self.phase = Phase::Running;
                Some(Event::StopwatchResumed {
                    elapsed_ms: self.elapsed_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Stop and emit the completed session. Stopping from `Paused` keeps the
    /// frozen elapsed value, so the record's wall-clock span may exceed its
    /// duration.
    pub fn stop(&mut self) -> Option<TimerRecord> {
        self.stop_at(Utc::now())
    }

    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Option<TimerRecord> {
        let started_at = self.started_at?;
        let duration_ms = match self.phase {
            Phase::Running => elapsed_ms_between(started_at, now),
            Phase::Paused => self.elapsed_ms,
            Phase::Idle => return None,
        };
        *self = Self::default();
        Some(TimerRecord::new(
            TimerKind::Stopwatch,
            started_at,
            now,
            duration_ms,
            0,
        ))
    }

    /// Call periodically while running. Recomputes elapsed time from the
    /// anchor and returns the current value.
    pub fn tick(&mut self) -> u64 {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> u64 {
        if self.phase == Phase::Running {
            if let Some(started_at) = self.started_at {
                self.elapsed_ms = elapsed_ms_between(started_at, now);
            }
        }
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(offset_ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::milliseconds(offset_ms)
    }

    #[test]
    fn start_run_stop_yields_exact_span() {
        let mut sw = Stopwatch::new();
        assert!(sw.start_at(t(0)).is_some());
        assert!(sw.is_running());

        sw.tick_at(t(1_500));
        assert_eq!(sw.elapsed_ms(), 1_500);

        let record = sw.stop_at(t(5_000)).unwrap();
        assert_eq!(record.kind, TimerKind::Stopwatch);
        assert_eq!(record.duration_ms, 5_000);
        assert_eq!(record.started_at, t(0));
        assert_eq!(record.ended_at, t(5_000));
        // No pause involved: span equals duration exactly.
        assert_eq!((record.ended_at - record.started_at).num_milliseconds(), 5_000);
        assert_eq!(record.original_ms, 0);
        assert_eq!(sw.phase(), Phase::Idle);
        assert_eq!(sw.elapsed_ms(), 0);
    }

    #[test]
    fn pause_excludes_paused_time() {
        let mut sw = Stopwatch::new();
        sw.start_at(t(0));
        sw.pause_at(t(2_000));
        assert!(sw.is_paused());
        assert_eq!(sw.elapsed_ms(), 2_000);

        // Ticks while paused leave the frozen value alone.
        sw.tick_at(t(9_000));
        assert_eq!(sw.elapsed_ms(), 2_000);

        sw.resume_at(t(10_000));
        let record = sw.stop_at(t(13_000)).unwrap();
        // 2s before the pause + 3s after it.
        assert_eq!(record.duration_ms, 5_000);
    }

    #[test]
    fn stop_while_paused_keeps_frozen_value() {
        let mut sw = Stopwatch::new();
        sw.start_at(t(0));
        sw.pause_at(t(2_000));
        let record = sw.stop_at(t(60_000)).unwrap();
        assert_eq!(record.duration_ms, 2_000);
        assert_eq!(record.ended_at, t(60_000));
        // Span exceeds duration because of the pause.
        assert!((record.ended_at - record.started_at).num_milliseconds() > 2_000);
    }

    #[test]
    fn mismatched_triggers_are_noops() {
        let mut sw = Stopwatch::new();
        assert!(sw.pause_at(t(0)).is_none());
        assert!(sw.resume_at(t(0)).is_none());
        assert!(sw.stop_at(t(0)).is_none());

        sw.start_at(t(0));
        assert!(sw.start_at(t(100)).is_none());
        assert!(sw.resume_at(t(100)).is_none());

        sw.pause_at(t(200));
        assert!(sw.pause_at(t(300)).is_none());
        assert!(sw.start_at(t(300)).is_none());
    }

    #[test]
    fn tick_recomputes_from_anchor() {
        let mut sw = Stopwatch::new();
        sw.start_at(t(0));
        // Sparse, irregular ticks still land on the wall-clock answer.
        assert_eq!(sw.tick_at(t(50)), 50);
        assert_eq!(sw.tick_at(t(7_777)), 7_777);
        assert_eq!(sw.tick_at(t(60_000)), 60_000);
    }

    #[test]
    fn restart_after_stop_zeroes() {
        let mut sw = Stopwatch::new();
        sw.start_at(t(0));
        sw.stop_at(t(1_000));
        sw.start_at(t(5_000));
        assert_eq!(sw.tick_at(t(5_400)), 400);
    }

    #[test]
    fn state_survives_serde() {
        let mut sw = Stopwatch::new();
        sw.start_at(t(0));
        sw.tick_at(t(1_234));
        let json = serde_json::to_string(&sw).unwrap();
        let mut restored: Stopwatch = serde_json::from_str(&json).unwrap();
        assert!(restored.is_running());
        assert_eq!(restored.tick_at(t(2_000)), 2_000);
    }
}
