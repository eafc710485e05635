//! Lap-by-lap race strategy simulation.
//!
//! A single car runs [`RACE_LAPS`] laps on a catalog track. Tires lose grip
//! every lap, the operator (or a [`Strategist`]) decides when to box, and the
//! finishing time is scored against a fixed one-stop reference strategy.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod degradation;
pub mod engineer;
pub mod error;
pub mod history;
pub mod live;
pub mod reference;
pub mod scoring;
pub mod session;
pub mod strategist;
pub mod timer;

use serde::Serialize;

pub use catalog::{TireCompound, Track, TRACKS};
pub use controller::{SimulationController, Snapshot, TickEvent};
pub use error::{CatalogError, ConfigError, LiveError, SessionError, SessionResult};
pub use scoring::{RunRecord, Tier};
pub use session::{LapRecord, SessionState, Stint};
pub use strategist::{PitCall, RaceView, Strategist};

/// Laps in every simulated race.
pub const RACE_LAPS: u32 = 25;

/// Everything a strategist did over one race.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    pub strategist: &'static str,
    pub run: RunRecord,
    pub elapsed: f64,
    pub stints: Vec<Stint>,
    pub history: Vec<LapRecord>,
}

/// Run one complete race on `controller` with `strategist` making every pit
/// call. The strategist is asked once before each lap.
///
/// The controller must be idle; its session is reset afterwards so it can be
/// reused, and the run stays in its history log.
pub fn simulate_strategy(
    controller: &mut SimulationController,
    strategist: &dyn Strategist,
) -> SessionResult<StrategyReport> {
    controller.start()?;

    let run = loop {
        if controller.current_lap() <= RACE_LAPS {
            let call = strategist.call(&RaceView::of(controller));
            if let PitCall::Box(tire) = call {
                controller.request_pit()?;
                controller.confirm_pit(tire)?;
            }
        }
        if let TickEvent::Finished(run) = controller.tick()? {
            break run;
        }
    };

    let report = StrategyReport {
        strategist: strategist.name(),
        run,
        elapsed: controller.elapsed(),
        stints: controller.stints(),
        history: controller.history().to_vec(),
    };
    controller.reset()?;
    Ok(report)
}
