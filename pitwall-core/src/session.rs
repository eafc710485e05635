//! Session state machine for a single simulated race.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{TireCompound, Track};
use crate::degradation::{lap_pace, next_grip, MAX_GRIP};
use crate::error::{SessionError, SessionResult};
use crate::reference::ReferenceCurve;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Fresh session, nothing driven yet.
    Idle,
    /// Laps advance on every tick.
    Running,
    /// Mid-race but the clock is held.
    Paused,
    /// Car is in the box waiting for a compound.
    AwaitingPitSelection,
    /// All laps driven; ready to be scored.
    Finished,
}

impl SessionState {
    /// True for every state between `start` and the chequered flag.
    pub fn is_in_race(self) -> bool {
        matches!(
            self,
            SessionState::Running | SessionState::Paused | SessionState::AwaitingPitSelection
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::AwaitingPitSelection => "awaiting pit selection",
            SessionState::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// One entry in the session history.
///
/// A pit record shares the lap number of the lap it precedes: it carries the
/// newly fitted compound and a pace of zero, and the driving record for the
/// same lap number follows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapRecord {
    pub lap: u32,
    /// Seconds; zero for a pit record, whose cost is the track's pit loss.
    pub pace: f64,
    pub tire: TireCompound,
    pub pit: bool,
}

/// Laps driven on one set of tires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stint {
    pub compound: TireCompound,
    pub start_lap: u32,
    pub laps: u32,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A lap was driven and appended to history.
    Lap(LapRecord),
    /// No laps remained; the session is now finished.
    Finished,
}

/// Mutable state of one simulated race on one track.
#[derive(Debug, Clone)]
pub struct Session {
    track: &'static Track,
    race_laps: u32,
    current_lap: u32,
    grip: f64,
    tire: TireCompound,
    starting_tire: TireCompound,
    history: Vec<LapRecord>,
    state: SessionState,
}

impl Session {
    pub fn new(track: &'static Track, race_laps: u32, starting_tire: TireCompound) -> Self {
        Self {
            track,
            race_laps,
            current_lap: 1,
            grip: MAX_GRIP,
            tire: starting_tire,
            starting_tire,
            history: Vec::new(),
            state: SessionState::Idle,
        }
    }

    fn reject(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state,
        }
    }

    pub fn track(&self) -> &'static Track {
        self.track
    }

    pub fn race_laps(&self) -> u32 {
        self.race_laps
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Lap that the next tick will drive; `race_laps + 1` once all are done.
    pub fn current_lap(&self) -> u32 {
        self.current_lap
    }

    pub fn grip(&self) -> f64 {
        self.grip
    }

    pub fn tire(&self) -> TireCompound {
        self.tire
    }

    pub fn starting_tire(&self) -> TireCompound {
        self.starting_tire
    }

    pub fn history(&self) -> &[LapRecord] {
        &self.history
    }

    pub fn laps_remaining(&self) -> u32 {
        (self.race_laps + 1).saturating_sub(self.current_lap)
    }

    pub fn pit_stops(&self) -> usize {
        self.history.iter().filter(|r| r.pit).count()
    }

    /// Choose the compound for lap 1. Only allowed before the start.
    pub fn select_starting_tire(&mut self, tire: TireCompound) -> SessionResult {
        if self.state != SessionState::Idle {
            return Err(self.reject("select starting tire"));
        }
        self.starting_tire = tire;
        self.tire = tire;
        Ok(())
    }

    pub fn start(&mut self) -> SessionResult {
        if self.state != SessionState::Idle {
            return Err(self.reject("start"));
        }
        self.state = SessionState::Running;
        info!(track = self.track.code, tire = %self.tire, "session started");
        Ok(())
    }

    /// Advance the race by one lap, or finish it if no laps remain.
    pub fn tick(&mut self) -> SessionResult<TickOutcome> {
        if self.state != SessionState::Running {
            return Err(self.reject("tick"));
        }

        if self.current_lap > self.race_laps {
            self.state = SessionState::Finished;
            info!(
                track = self.track.code,
                elapsed = self.elapsed(),
                stops = self.pit_stops(),
                "session finished"
            );
            return Ok(TickOutcome::Finished);
        }

        let record = LapRecord {
            lap: self.current_lap,
            pace: lap_pace(self.track, self.tire, self.grip),
            tire: self.tire,
            pit: false,
        };
        self.history.push(record);
        self.grip = next_grip(self.track, self.tire, self.grip);
        self.current_lap += 1;

        debug!(
            lap = record.lap,
            pace = record.pace,
            grip = self.grip,
            tire = %record.tire,
            "lap completed"
        );
        Ok(TickOutcome::Lap(record))
    }

    pub fn pause(&mut self) -> SessionResult {
        if self.state != SessionState::Running {
            return Err(self.reject("pause"));
        }
        self.state = SessionState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> SessionResult {
        if self.state != SessionState::Paused {
            return Err(self.reject("resume"));
        }
        self.state = SessionState::Running;
        Ok(())
    }

    /// Call the car in. Grip and lap are frozen until a compound is chosen.
    /// At most one stop per lap slot: the car must drive a lap between stops.
    pub fn request_pit(&mut self) -> SessionResult {
        let just_pitted = self.history.last().is_some_and(|r| r.pit);
        if self.state != SessionState::Running
            || self.current_lap > self.race_laps
            || just_pitted
        {
            return Err(self.reject("request pit"));
        }
        self.state = SessionState::AwaitingPitSelection;
        Ok(())
    }

    /// Fit `tire` and release the car.
    pub fn confirm_pit(&mut self, tire: TireCompound) -> SessionResult<LapRecord> {
        if self.state != SessionState::AwaitingPitSelection {
            return Err(self.reject("confirm pit"));
        }
        let record = LapRecord {
            lap: self.current_lap,
            pace: 0.0,
            tire,
            pit: true,
        };
        self.history.push(record);
        self.tire = tire;
        self.grip = MAX_GRIP;
        self.state = SessionState::Running;
        info!(lap = record.lap, tire = %tire, pit_loss = self.track.pit_loss, "pit stop");
        Ok(record)
    }

    /// Throw away the race in progress.
    pub fn abort(&mut self) -> SessionResult {
        if self.state == SessionState::Idle {
            return Err(self.reject("abort"));
        }
        info!(lap = self.current_lap, "session aborted");
        self.clear();
        Ok(())
    }

    pub fn reset(&mut self) -> SessionResult {
        if !matches!(self.state, SessionState::Idle | SessionState::Finished) {
            return Err(self.reject("reset"));
        }
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.history.clear();
        self.current_lap = 1;
        self.grip = MAX_GRIP;
        self.tire = self.starting_tire;
        self.state = SessionState::Idle;
    }

    /// Total race time so far: every lap pace plus one pit loss per stop.
    pub fn elapsed(&self) -> f64 {
        let pit_loss = self.track.pit_loss;
        self.history
            .iter()
            .fold(0.0, |acc, r| acc + r.pace + if r.pit { pit_loss } else { 0.0 })
    }

    /// Gap to the reference after the last completed lap; negative is ahead.
    /// Zero until a lap has been completed.
    pub fn live_delta(&self, reference: &ReferenceCurve) -> f64 {
        if self.current_lap < 2 {
            return 0.0;
        }
        match reference.at_lap(self.current_lap - 1) {
            Some(benchmark) => self.elapsed() - benchmark,
            None => 0.0,
        }
    }

    pub fn stints(&self) -> Vec<Stint> {
        let mut stints: Vec<Stint> = Vec::new();
        for record in &self.history {
            if record.pit || stints.is_empty() {
                stints.push(Stint {
                    compound: record.tire,
                    start_lap: record.lap,
                    laps: 0,
                });
            }
            if !record.pit {
                if let Some(stint) = stints.last_mut() {
                    stint.laps += 1;
                }
            }
        }
        stints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MONACO, SILVERSTONE, SPA};
    use crate::RACE_LAPS;

    fn running(track: &'static Track, tire: TireCompound) -> Session {
        let mut session = Session::new(track, RACE_LAPS, tire);
        session.start().unwrap();
        session
    }

    #[test]
    fn new_session_is_idle_on_lap_one() {
        let session = Session::new(&SILVERSTONE, RACE_LAPS, TireCompound::Medium);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_lap(), 1);
        assert_eq!(session.grip(), 100.0);
        assert!(session.history().is_empty());
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn tick_appends_one_lap() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        let outcome = session.tick().unwrap();
        let TickOutcome::Lap(record) = outcome else {
            panic!("expected a lap, got {outcome:?}");
        };
        assert_eq!(record.lap, 1);
        assert!((record.pace - 87.7).abs() < 1e-9);
        assert!(!record.pit);
        assert_eq!(session.current_lap(), 2);
        assert!((session.grip() - 97.025).abs() < 1e-9);
    }

    #[test]
    fn tick_past_the_last_lap_finishes() {
        let mut session = running(&MONACO, TireCompound::Hard);
        for _ in 0..RACE_LAPS {
            assert!(matches!(session.tick().unwrap(), TickOutcome::Lap(_)));
        }
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.tick().unwrap(), TickOutcome::Finished);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.history().len(), RACE_LAPS as usize);
    }

    #[test]
    fn tick_requires_running() {
        let mut session = Session::new(&MONACO, RACE_LAPS, TireCompound::Soft);
        assert!(session.tick().is_err());
        session.start().unwrap();
        session.pause().unwrap();
        assert_eq!(
            session.tick(),
            Err(SessionError::InvalidTransition {
                action: "tick",
                state: SessionState::Paused
            })
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn pause_and_resume_toggle() {
        let mut session = running(&MONACO, TireCompound::Soft);
        session.pause().unwrap();
        assert!(session.pause().is_err());
        session.resume().unwrap();
        assert!(session.resume().is_err());
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn pit_stop_shares_the_slot_of_the_next_lap() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        session.tick().unwrap();
        session.tick().unwrap();
        session.request_pit().unwrap();
        assert!(session.tick().is_err());

        let pit = session.confirm_pit(TireCompound::Hard).unwrap();
        assert_eq!(pit.lap, 3);
        assert_eq!(pit.pace, 0.0);
        assert!(pit.pit);
        assert_eq!(session.grip(), 100.0);
        assert_eq!(session.tire(), TireCompound::Hard);

        let TickOutcome::Lap(lap) = session.tick().unwrap() else {
            panic!("expected lap");
        };
        assert_eq!(lap.lap, 3);
        assert_eq!(lap.tire, TireCompound::Hard);
    }

    #[test]
    fn request_pit_is_rejected_outside_running() {
        let mut session = Session::new(&SILVERSTONE, RACE_LAPS, TireCompound::Medium);
        assert!(session.request_pit().is_err());
        session.start().unwrap();
        session.request_pit().unwrap();
        assert!(session.request_pit().is_err());
        assert!(session.pause().is_err());
    }

    #[test]
    fn one_stop_per_lap_slot() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        session.tick().unwrap();
        session.request_pit().unwrap();
        session.confirm_pit(TireCompound::Soft).unwrap();

        assert_eq!(
            session.request_pit(),
            Err(SessionError::InvalidTransition {
                action: "request pit",
                state: SessionState::Running
            })
        );
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.history().iter().filter(|r| r.pit).count(), 1);
        assert_eq!(session.tire(), TireCompound::Soft);

        let TickOutcome::Lap(lap) = session.tick().unwrap() else {
            panic!("expected lap");
        };
        assert_eq!(lap.lap, 2);
        session.request_pit().unwrap();
        let pit = session.confirm_pit(TireCompound::Hard).unwrap();
        assert_eq!(pit.lap, 3);
    }

    #[test]
    fn no_pit_once_every_lap_is_driven() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        for _ in 0..RACE_LAPS {
            session.tick().unwrap();
        }
        assert!(session.request_pit().is_err());
    }

    #[test]
    fn elapsed_includes_pit_loss() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        session.tick().unwrap();
        session.request_pit().unwrap();
        session.confirm_pit(TireCompound::Soft).unwrap();
        session.tick().unwrap();
        let paces: f64 = session.history().iter().map(|r| r.pace).sum();
        assert!((session.elapsed() - paces - 23.0).abs() < 1e-9);
    }

    #[test]
    fn abort_discards_and_returns_to_idle() {
        let mut session = running(&SILVERSTONE, TireCompound::Soft);
        session.tick().unwrap();
        session.request_pit().unwrap();
        session.abort().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.history().is_empty());
        assert_eq!(session.tire(), TireCompound::Soft);
        assert!(session.abort().is_err());
    }

    #[test]
    fn abort_from_paused_restores_the_grid() {
        let mut session = running(&SPA, TireCompound::Medium);
        session.tick().unwrap();
        session.request_pit().unwrap();
        session.confirm_pit(TireCompound::Hard).unwrap();
        session.tick().unwrap();
        session.pause().unwrap();

        session.abort().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.tire(), TireCompound::Medium);
        assert_eq!(session.grip(), 100.0);
        assert_eq!(session.current_lap(), 1);
        assert!(session.history().is_empty());
    }

    #[test]
    fn abort_from_finished_clears_the_car() {
        let mut session = running(&MONACO, TireCompound::Hard);
        for _ in 0..=RACE_LAPS {
            session.tick().unwrap();
        }
        assert_eq!(session.state(), SessionState::Finished);

        session.abort().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_lap(), 1);
        assert!(session.history().is_empty());
    }

    #[test]
    fn reset_after_a_stop_restores_starting_compound() {
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        for _ in 0..5 {
            session.tick().unwrap();
        }
        session.request_pit().unwrap();
        session.confirm_pit(TireCompound::Soft).unwrap();
        while session.tick().unwrap() != TickOutcome::Finished {}
        assert_eq!(session.tire(), TireCompound::Soft);

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.tire(), TireCompound::Medium);
        assert_eq!(session.starting_tire(), TireCompound::Medium);
        assert_eq!(session.grip(), 100.0);
        assert_eq!(session.current_lap(), 1);
        assert!(session.history().is_empty());
        assert_eq!(session.elapsed(), 0.0);
    }

    #[test]
    fn reset_only_from_idle_or_finished() {
        let mut session = running(&MONACO, TireCompound::Medium);
        assert!(session.reset().is_err());
        for _ in 0..=RACE_LAPS {
            session.tick().unwrap();
        }
        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_lap(), 1);
        assert!(session.reset().is_ok());
    }

    #[test]
    fn starting_tire_locked_once_running() {
        let mut session = Session::new(&MONACO, RACE_LAPS, TireCompound::Medium);
        session.select_starting_tire(TireCompound::Soft).unwrap();
        assert_eq!(session.tire(), TireCompound::Soft);
        session.start().unwrap();
        assert!(session.select_starting_tire(TireCompound::Hard).is_err());
        assert_eq!(session.starting_tire(), TireCompound::Soft);
    }

    #[test]
    fn live_delta_is_zero_before_first_lap() {
        let reference = ReferenceCurve::compute(&SILVERSTONE, RACE_LAPS);
        let mut session = running(&SILVERSTONE, TireCompound::Medium);
        assert_eq!(session.live_delta(&reference), 0.0);
        session.tick().unwrap();
        // Same compound and grip as the benchmark's first lap.
        assert!(session.live_delta(&reference).abs() < 1e-9);
    }

    #[test]
    fn stints_split_on_pit_records() {
        let mut session = running(&SILVERSTONE, TireCompound::Soft);
        for _ in 0..4 {
            session.tick().unwrap();
        }
        session.request_pit().unwrap();
        session.confirm_pit(TireCompound::Hard).unwrap();
        for _ in 0..3 {
            session.tick().unwrap();
        }
        assert_eq!(
            session.stints(),
            vec![
                Stint {
                    compound: TireCompound::Soft,
                    start_lap: 1,
                    laps: 4
                },
                Stint {
                    compound: TireCompound::Hard,
                    start_lap: 5,
                    laps: 3
                },
            ]
        );
    }

    #[test]
    fn state_display_reads_naturally() {
        let err = SessionError::InvalidTransition {
            action: "request pit",
            state: SessionState::Idle,
        };
        assert_eq!(err.to_string(), "cannot request pit while session is idle");
    }
}
