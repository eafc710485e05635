//! Programmatic front end over one session, its reference and the run log.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{TireCompound, Track};
use crate::engineer::EngineerCall;
use crate::error::{SessionError, SessionResult};
use crate::history::RunHistory;
use crate::reference::ReferenceCurve;
use crate::scoring::{self, RunRecord};
use crate::session::{LapRecord, Session, SessionState, Stint, TickOutcome};
use crate::RACE_LAPS;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(600);
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(2000);

/// Clamp an operator supplied interval to the allowed range.
pub fn clamp_tick_interval(ms: u64) -> Duration {
    Duration::from_millis(ms).clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
}

/// Result of a controller tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Lap(LapRecord),
    /// The race ended and was scored; the record is already in the log.
    Finished(RunRecord),
}

/// Point-in-time view for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub track: &'static str,
    pub state: SessionState,
    pub current_lap: u32,
    pub race_laps: u32,
    pub grip: f64,
    pub tire: TireCompound,
    pub elapsed: f64,
    pub live_delta: f64,
    pub pit_stops: usize,
    pub engineer: EngineerCall,
}

/// Owns the selected track, its reference curve, the live session and the
/// log of finished runs.
#[derive(Debug, Clone)]
pub struct SimulationController {
    reference: ReferenceCurve,
    session: Session,
    runs: RunHistory,
    tick_interval: Duration,
}

impl SimulationController {
    pub fn new(track: &'static Track, starting_tire: TireCompound) -> Self {
        Self {
            reference: ReferenceCurve::compute(track, RACE_LAPS),
            session: Session::new(track, RACE_LAPS, starting_tire),
            runs: RunHistory::new(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Switch circuits. Recomputes the reference and resets the session, so
    /// it is refused while a race is in progress.
    pub fn select_track(&mut self, code: &str) -> SessionResult<&'static Track> {
        let track = Track::from_code(code)?;
        if self.session.state().is_in_race() {
            return Err(SessionError::InvalidTransition {
                action: "select track",
                state: self.session.state(),
            });
        }
        self.reference = ReferenceCurve::compute(track, RACE_LAPS);
        self.session = Session::new(track, RACE_LAPS, self.session.starting_tire());
        info!(track = track.code, reference = self.reference.total(), "track selected");
        Ok(track)
    }

    pub fn select_starting_tire(&mut self, tire: TireCompound) -> SessionResult {
        self.session.select_starting_tire(tire)
    }

    pub fn start(&mut self) -> SessionResult {
        self.session.start()
    }

    pub fn pause(&mut self) -> SessionResult {
        self.session.pause()
    }

    pub fn resume(&mut self) -> SessionResult {
        self.session.resume()
    }

    pub fn request_pit(&mut self) -> SessionResult {
        self.session.request_pit()
    }

    pub fn confirm_pit(&mut self, tire: TireCompound) -> SessionResult<LapRecord> {
        self.session.confirm_pit(tire)
    }

    pub fn abort(&mut self) -> SessionResult {
        self.session.abort()
    }

    pub fn reset(&mut self) -> SessionResult {
        self.session.reset()
    }

    /// Drive one lap, or score the session if the last lap is done.
    pub fn tick(&mut self) -> SessionResult<TickEvent> {
        match self.session.tick()? {
            TickOutcome::Lap(record) => Ok(TickEvent::Lap(record)),
            TickOutcome::Finished => {
                let stored = self.runs.push(scoring::score(&self.session, &self.reference));
                info!(
                    run = stored.id,
                    track = stored.track,
                    delta = stored.delta,
                    tier = %stored.tier,
                    "run classified"
                );
                Ok(TickEvent::Finished(stored))
            }
        }
    }

    /// Set the tick interval, clamped to 100..=2000 ms. Returns the value used.
    pub fn set_tick_interval(&mut self, ms: u64) -> Duration {
        self.tick_interval = clamp_tick_interval(ms);
        debug!(interval_ms = self.tick_interval.as_millis() as u64, "tick interval set");
        self.tick_interval
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn track(&self) -> &'static Track {
        self.session.track()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn current_lap(&self) -> u32 {
        self.session.current_lap()
    }

    pub fn grip(&self) -> f64 {
        self.session.grip()
    }

    pub fn tire(&self) -> TireCompound {
        self.session.tire()
    }

    pub fn elapsed(&self) -> f64 {
        self.session.elapsed()
    }

    pub fn live_delta(&self) -> f64 {
        self.session.live_delta(&self.reference)
    }

    pub fn history(&self) -> &[LapRecord] {
        self.session.history()
    }

    pub fn stints(&self) -> Vec<Stint> {
        self.session.stints()
    }

    pub fn engineer_call(&self) -> EngineerCall {
        EngineerCall::for_grip(self.session.grip())
    }

    pub fn reference(&self) -> &ReferenceCurve {
        &self.reference
    }

    pub fn runs(&self) -> &RunHistory {
        &self.runs
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            track: self.track().code,
            state: self.state(),
            current_lap: self.current_lap().min(RACE_LAPS),
            race_laps: RACE_LAPS,
            grip: self.grip(),
            tire: self.tire(),
            elapsed: self.elapsed(),
            live_delta: self.live_delta(),
            pit_stops: self.session.pit_stops(),
            engineer: self.engineer_call(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MONACO, SILVERSTONE};
    use crate::scoring::Tier;

    fn finish(controller: &mut SimulationController) -> RunRecord {
        loop {
            if let TickEvent::Finished(record) = controller.tick().unwrap() {
                return record;
            }
        }
    }

    #[test]
    fn interval_is_clamped() {
        let mut controller = SimulationController::new(&MONACO, TireCompound::Medium);
        assert_eq!(controller.tick_interval(), Duration::from_millis(600));
        assert_eq!(controller.set_tick_interval(5), Duration::from_millis(100));
        assert_eq!(controller.set_tick_interval(9_000), Duration::from_millis(2000));
        assert_eq!(controller.set_tick_interval(750), Duration::from_millis(750));
    }

    #[test]
    fn select_track_recomputes_reference_and_resets() {
        let mut controller = SimulationController::new(&MONACO, TireCompound::Hard);
        let monaco_total = controller.reference().total();
        let track = controller.select_track("silverstone").unwrap();
        assert_eq!(track.code, "SILVERSTONE");
        assert_eq!(controller.reference().track_code(), "SILVERSTONE");
        assert_ne!(controller.reference().total(), monaco_total);
        assert_eq!(controller.tire(), TireCompound::Hard);
    }

    #[test]
    fn select_track_rejected_mid_race() {
        let mut controller = SimulationController::new(&MONACO, TireCompound::Medium);
        controller.start().unwrap();
        controller.tick().unwrap();
        assert!(matches!(
            controller.select_track("SPA"),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert_eq!(controller.track().code, "MONACO");
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn unknown_track_is_a_catalog_error() {
        let mut controller = SimulationController::new(&MONACO, TireCompound::Medium);
        assert!(matches!(
            controller.select_track("IMOLA"),
            Err(SessionError::Catalog(_))
        ));
    }

    #[test]
    fn finishing_logs_a_run() {
        let mut controller = SimulationController::new(&SILVERSTONE, TireCompound::Medium);
        controller.start().unwrap();
        let record = finish(&mut controller);
        assert_eq!(record.id, 1);
        assert_eq!(controller.runs().latest(), Some(&record));
        // No stop on worn mediums is far off the one-stop benchmark.
        assert_eq!(record.tier, Tier::Rookie);
        assert_eq!(controller.state(), SessionState::Finished);
    }

    #[test]
    fn aborted_runs_are_not_logged() {
        let mut controller = SimulationController::new(&SILVERSTONE, TireCompound::Medium);
        controller.start().unwrap();
        controller.tick().unwrap();
        controller.abort().unwrap();
        assert!(controller.runs().is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn abort_after_finish_keeps_the_logged_run() {
        let mut controller = SimulationController::new(&SILVERSTONE, TireCompound::Medium);
        controller.start().unwrap();
        let record = finish(&mut controller);

        controller.abort().unwrap();
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.history().is_empty());
        assert_eq!(controller.runs().len(), 1);
        assert_eq!(controller.runs().latest(), Some(&record));
    }

    #[test]
    fn snapshot_caps_lap_display_at_race_length() {
        let mut controller = SimulationController::new(&MONACO, TireCompound::Hard);
        controller.start().unwrap();
        finish(&mut controller);
        let snap = controller.snapshot();
        assert_eq!(snap.current_lap, RACE_LAPS);
        assert_eq!(snap.state, SessionState::Finished);
        assert_eq!(snap.pit_stops, 0);
    }
}
