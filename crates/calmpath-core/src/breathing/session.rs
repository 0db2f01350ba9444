//! Breathing session state machine.
//!
//! The session does not own a clock. The caller (see [`super::Pacer`]) is
//! responsible for calling `tick()` once per second while it runs.
//!
//! ## State Transitions
//!
//! ```text
//! Inhale(1..=4) -> Hold(1..=7) -> Exhale(1..=8) -> Inhale(1) ... -> idle
//! ```
//!
//! After the third full cycle the session stops itself and resets to
//! `Inhale/1/0`. A manual `stop()` resets the same way.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{Phase, MAX_CYCLES};
use crate::events::Event;

/// One guided breathing exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingSession {
    phase: Phase,
    /// 1-indexed: the first displayed second is 1.
    seconds_into_phase: u32,
    cycles_completed: u32,
    is_running: bool,
}

/// Everything a hosting view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingSnapshot {
    pub phase: Phase,
    pub prompt: String,
    pub seconds_into_phase: u32,
    pub phase_duration_secs: u32,
    pub cycles_completed: u32,
    pub max_cycles: u32,
    pub is_running: bool,
    /// 0.0 .. 100.0 fill of the phase progress bar.
    pub progress_pct: f64,
}

impl BreathingSession {
    /// An idle session resting on the first second of Inhale.
    pub fn new() -> Self {
        Self {
            phase: Phase::Inhale,
            seconds_into_phase: 1,
            cycles_completed: 0,
            is_running: false,
        }
    }

    /// Rebuild a session from raw parts, clamping anything out of range.
    pub fn from_parts(
        phase: Phase,
        seconds_into_phase: u32,
        cycles_completed: u32,
        is_running: bool,
    ) -> Self {
        let mut session = Self {
            phase,
            seconds_into_phase,
            cycles_completed,
            is_running,
        };
        session.normalize();
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_into_phase(&self) -> u32 {
        self.seconds_into_phase
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Fraction of the current phase already shown, in `(0, 1]`.
    ///
    /// The first second of a phase yields `1 / duration`, the last yields
    /// exactly `1.0`.
    pub fn progress_fraction(&self) -> f64 {
        let duration = self.phase.duration_secs();
        let secs = self.seconds_into_phase.clamp(1, duration);
        f64::from(secs) / f64::from(duration)
    }

    pub fn snapshot(&self) -> BreathingSnapshot {
        BreathingSnapshot {
            phase: self.phase,
            prompt: self.phase.prompt().to_string(),
            seconds_into_phase: self.seconds_into_phase,
            phase_duration_secs: self.phase.duration_secs(),
            cycles_completed: self.cycles_completed,
            max_cycles: MAX_CYCLES,
            is_running: self.is_running,
            progress_pct: self.progress_fraction() * 100.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Reset to `Inhale/1/0` and begin running. Calling it mid-session
    /// restarts from scratch.
    pub fn start(&mut self) -> Event {
        self.reset();
        self.is_running = true;
        tracing::info!("breathing session started");
        Event::BreathingStarted {
            phase: self.phase,
            at: Utc::now(),
        }
    }

    /// Abort the session. Returns `None` if it was not running.
    ///
    /// The reported event carries where the user stopped; the session itself
    /// is reset so the next start is clean.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        let event = Event::BreathingStopped {
            phase: self.phase,
            seconds_into_phase: self.seconds_into_phase,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        };
        self.reset();
        tracing::info!("breathing session stopped by user");
        Some(event)
    }

    /// Advance by one second. A no-op (no events) while not running.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running {
            return Vec::new();
        }
        self.normalize();

        if self.seconds_into_phase < self.phase.duration_secs() {
            self.seconds_into_phase += 1;
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.phase == Phase::Exhale {
            let completed = self.cycles_completed + 1;
            events.push(Event::CycleCompleted {
                cycles_completed: completed,
                at: Utc::now(),
            });
            if completed >= MAX_CYCLES {
                self.reset();
                tracing::info!(cycles = completed, "breathing session finished");
                events.push(Event::BreathingFinished {
                    cycles: completed,
                    at: Utc::now(),
                });
                return events;
            }
            self.cycles_completed = completed;
        }

        self.phase = self.phase.next();
        self.seconds_into_phase = 1;
        tracing::debug!(
            phase = %self.phase,
            cycles_completed = self.cycles_completed,
            "breathing phase advanced"
        );
        events.push(Event::PhaseAdvanced {
            phase: self.phase,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset(&mut self) {
        self.phase = Phase::Inhale;
        self.seconds_into_phase = 1;
        self.cycles_completed = 0;
        self.is_running = false;
    }

    /// Pull an illegal state back to a safe one.
    fn normalize(&mut self) {
        if self.seconds_into_phase == 0 || self.seconds_into_phase > self.phase.duration_secs() {
            tracing::warn!(
                phase = %self.phase,
                seconds = self.seconds_into_phase,
                "breathing count out of range, resetting to inhale"
            );
            self.phase = Phase::Inhale;
            self.seconds_into_phase = 1;
        }
        if self.cycles_completed >= MAX_CYCLES {
            self.cycles_completed = 0;
        }
    }
}

impl Default for BreathingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_n(session: &mut BreathingSession, n: usize) -> Vec<Event> {
        (0..n).flat_map(|_| session.tick()).collect()
    }

    #[test]
    fn new_session_is_idle_on_inhale() {
        let session = BreathingSession::new();
        assert!(!session.is_running());
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.seconds_into_phase(), 1);
        assert_eq!(session.cycles_completed(), 0);
    }

    #[test]
    fn tick_while_idle_is_noop() {
        let mut session = BreathingSession::new();
        assert!(session.tick().is_empty());
        assert_eq!(session, BreathingSession::new());
    }

    #[test]
    fn counts_up_within_inhale() {
        let mut session = BreathingSession::new();
        session.start();
        for expected in 2..=4 {
            assert!(session.tick().is_empty());
            assert_eq!(session.seconds_into_phase(), expected);
            assert_eq!(session.phase(), Phase::Inhale);
        }
    }

    #[test]
    fn fourth_tick_moves_to_hold() {
        let mut session = BreathingSession::new();
        session.start();
        let events = tick_n(&mut session, 4);
        assert_eq!(session.phase(), Phase::Hold);
        assert_eq!(session.seconds_into_phase(), 1);
        assert!(matches!(
            events.as_slice(),
            [Event::PhaseAdvanced { phase: Phase::Hold, cycles_completed: 0, .. }]
        ));
    }

    #[test]
    fn start_mid_session_restarts() {
        let mut session = BreathingSession::new();
        session.start();
        tick_n(&mut session, 25);
        session.start();
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.seconds_into_phase(), 1);
        assert_eq!(session.cycles_completed(), 0);
        assert!(session.is_running());
    }

    #[test]
    fn stop_resets_and_reports_position() {
        let mut session = BreathingSession::new();
        session.start();
        tick_n(&mut session, 6);
        let event = session.stop().unwrap();
        match event {
            Event::BreathingStopped {
                phase,
                seconds_into_phase,
                cycles_completed,
                ..
            } => {
                assert_eq!(phase, Phase::Hold);
                assert_eq!(seconds_into_phase, 3);
                assert_eq!(cycles_completed, 0);
            }
            other => panic!("Expected BreathingStopped, got {other:?}"),
        }
        assert_eq!(session, BreathingSession::new());
        assert!(session.stop().is_none());
    }

    #[test]
    fn first_second_shows_a_sliver_of_progress() {
        let mut session = BreathingSession::new();
        session.start();
        assert_eq!(session.progress_fraction(), 0.25);
        tick_n(&mut session, 3);
        assert_eq!(session.progress_fraction(), 1.0);
    }

    #[test]
    fn from_parts_clamps_out_of_range_count() {
        let session = BreathingSession::from_parts(Phase::Hold, 0, 1, true);
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.seconds_into_phase(), 1);
        assert_eq!(session.cycles_completed(), 1);

        let session = BreathingSession::from_parts(Phase::Inhale, 9, 7, true);
        assert_eq!(session.seconds_into_phase(), 1);
        assert_eq!(session.cycles_completed(), 0);
    }

    #[test]
    fn tick_recovers_from_corrupt_deserialized_state() {
        let json = r#"{"phase":"exhale","seconds_into_phase":42,"cycles_completed":1,"is_running":true}"#;
        let mut session: BreathingSession = serde_json::from_str(json).unwrap();
        session.tick();
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.seconds_into_phase(), 2);
    }

    #[test]
    fn snapshot_reports_percent() {
        let mut session = BreathingSession::new();
        session.start();
        tick_n(&mut session, 5);
        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Hold);
        assert_eq!(snap.prompt, "Hold...");
        assert_eq!(snap.seconds_into_phase, 2);
        assert_eq!(snap.phase_duration_secs, 7);
        assert!((snap.progress_pct - 200.0 / 7.0).abs() < 1e-9);
    }
}
