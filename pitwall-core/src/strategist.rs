//! Automated pit wall operators.

use crate::catalog::{TireCompound, Track};
use crate::controller::SimulationController;
use crate::engineer::EngineerCall;
use crate::session::LapRecord;

/// What a strategist wants to do before the next lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitCall {
    StayOut,
    Box(TireCompound),
}

/// Read-only view of the race handed to a strategist before each lap.
#[derive(Debug, Clone, Copy)]
pub struct RaceView<'a> {
    pub track: &'static Track,
    /// Lap about to be driven.
    pub lap: u32,
    /// Laps still to drive, including `lap`.
    pub laps_remaining: u32,
    pub grip: f64,
    pub tire: TireCompound,
    pub elapsed: f64,
    pub live_delta: f64,
    pub engineer: EngineerCall,
    pub history: &'a [LapRecord],
}

impl<'a> RaceView<'a> {
    pub fn of(controller: &'a SimulationController) -> Self {
        let session = controller.session();
        Self {
            track: controller.track(),
            lap: session.current_lap(),
            laps_remaining: session.laps_remaining(),
            grip: session.grip(),
            tire: session.tire(),
            elapsed: controller.elapsed(),
            live_delta: controller.live_delta(),
            engineer: controller.engineer_call(),
            history: session.history(),
        }
    }

    pub fn pit_stops(&self) -> usize {
        self.history.iter().filter(|r| r.pit).count()
    }
}

/// Trait implemented by every strategy crate.
pub trait Strategist: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decide whether to box before `view.lap` is driven.
    fn call(&self, view: &RaceView<'_>) -> PitCall;
}
