use std::path::Path;

use anyhow::{Context, Result};
use grip_watch_strategy::GripWatchStrategy;
use no_stop_strategy::NoStopStrategy;
use one_stop_strategy::OneStopStrategy;
use pitwall_core::config::{PlannedStop, SimConfig};
use pitwall_core::live::{LiveSession, SessionEvent};
use pitwall_core::{simulate_strategy, SimulationController, Strategist, TireCompound, Track};
use tracing::{info, warn};

use crate::output;
use crate::StrategyChoice;

pub fn tracks(json: bool) -> Result<()> {
    output::print_catalog(json)
}

pub fn reference(code: &str, json: bool) -> Result<()> {
    let track = Track::from_code(code)?;
    let controller = SimulationController::new(track, TireCompound::Medium);
    output::print_reference(track, controller.reference(), json)
}

pub fn race(
    code: &str,
    tire: TireCompound,
    choice: StrategyChoice,
    stop_lap: Option<u32>,
    stop_tire: TireCompound,
    json: bool,
) -> Result<()> {
    let track = Track::from_code(code)?;
    let one_stop = match stop_lap {
        Some(lap) => OneStopStrategy::new(lap, stop_tire),
        None => OneStopStrategy::mirror_reference(track),
    };

    let strategists: Vec<&dyn Strategist> = match choice {
        StrategyChoice::NoStop => vec![&NoStopStrategy],
        StrategyChoice::OneStop => vec![&one_stop],
        StrategyChoice::GripWatch => vec![&GripWatchStrategy],
        StrategyChoice::All => vec![&NoStopStrategy, &one_stop, &GripWatchStrategy],
    };

    let mut controller = SimulationController::new(track, tire);
    let mut reports = Vec::with_capacity(strategists.len());
    for strategist in strategists {
        let report = simulate_strategy(&mut controller, strategist)
            .with_context(|| format!("strategist {} failed", strategist.name()))?;
        info!(strategist = report.strategist, delta = report.run.delta, "race simulated");
        reports.push(report);
    }

    output::print_reports(&reports, controller.runs(), json)
}

/// Command line values that win over the config file.
pub struct RunOverrides {
    pub track: Option<String>,
    pub tire: Option<TireCompound>,
    pub pit: Vec<PlannedStop>,
    pub interval_ms: Option<u64>,
}

pub async fn run(config_path: Option<&Path>, overrides: RunOverrides, json: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(track) = overrides.track {
        config.track = track;
    }
    if let Some(tire) = overrides.tire {
        config.starting_tire = tire;
    }
    if !overrides.pit.is_empty() {
        config.pit_plan = overrides.pit;
    }
    if let Some(ms) = overrides.interval_ms {
        config.tick_interval_ms = ms;
    }

    let controller = config.build_controller()?;
    output::print_run_header(&controller, &config, json);

    let (handle, mut events, task) = LiveSession::spawn(controller);
    handle.plan_stops(config.pit_plan.clone())?;
    handle.start()?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::LapCompleted { record, snapshot } => {
                        output::print_lap(&record, &snapshot, json);
                    }
                    SessionEvent::PitStop(record) => output::print_pit(&record, json),
                    SessionEvent::Finished(run) => {
                        output::print_finish(&run, json);
                        break;
                    }
                    SessionEvent::Rejected(err) => warn!(error = %err, "pit wall command rejected"),
                    SessionEvent::StateChanged(state) => info!(%state, "session state"),
                }
            }
            _ = &mut ctrl_c => {
                warn!("interrupted, aborting session");
                handle.abort()?;
                break;
            }
        }
    }

    handle.shutdown()?;
    let controller = task.await.context("live session task failed")?;
    output::print_stints(&controller, json);
    Ok(())
}
