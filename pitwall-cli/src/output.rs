//! Human and JSON rendering for CLI commands.

use anyhow::Result;
use pitwall_core::config::SimConfig;
use pitwall_core::history::RunHistory;
use pitwall_core::reference::ReferenceCurve;
use pitwall_core::{
    LapRecord, RunRecord, SimulationController, Snapshot, StrategyReport, TireCompound, Track,
    TRACKS,
};
use serde_json::json;

pub fn print_catalog(json: bool) -> Result<()> {
    if json {
        let tracks: Vec<_> = TRACKS
            .iter()
            .map(|t| {
                json!({
                    "code": t.code,
                    "name": t.name,
                    "country": t.country,
                    "degradation": t.degradation,
                    "base_pace": t.base_pace,
                    "pit_loss": t.pit_loss,
                    "optimal_stop": t.optimal_stop,
                })
            })
            .collect();
        let tires: Vec<_> = TireCompound::ALL
            .iter()
            .map(|c| {
                json!({
                    "compound": c,
                    "wear_rate": c.wear_rate(),
                    "pace_penalty": c.pace_penalty(),
                    "color": c.color(),
                    "label": c.label(),
                })
            })
            .collect();
        let catalog = json!({ "tracks": tracks, "tires": tires });
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("TRACKS");
    for t in &TRACKS {
        println!(
            "  {:<12} {:<18} {}  deg {:.1}  pace {:.1}s  pit {:.1}s  stop L{}",
            t.code, t.name, t.country, t.degradation, t.base_pace, t.pit_loss, t.optimal_stop
        );
    }
    println!("TIRES");
    for c in TireCompound::ALL {
        println!(
            "  {:<7} wear {:>4.1}  +{:.1}s  {}",
            c.to_string(),
            c.wear_rate(),
            c.pace_penalty(),
            c.label()
        );
    }
    Ok(())
}

pub fn print_reference(track: &Track, curve: &ReferenceCurve, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(curve)?);
        return Ok(());
    }
    println!("REFERENCE {} - MEDIUM, box after lap {}", track, track.optimal_stop);
    for (i, cumulative) in curve.as_slice().iter().enumerate() {
        let lap = i as u32 + 1;
        let marker = if lap == track.optimal_stop { "  << BOX" } else { "" };
        println!("  L{:>2}  {:>9.3}s{}", lap, cumulative, marker);
    }
    println!("  TOTAL {:.3}s", curve.total());
    Ok(())
}

pub fn print_reports(reports: &[StrategyReport], runs: &RunHistory, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "reports": reports, "runs": runs }))?
        );
        return Ok(());
    }
    for report in reports {
        println!(
            "{:<11} {:>9.3}s  {:+.3}s  {}",
            report.strategist, report.elapsed, report.run.delta, report.run.tier
        );
        for stint in &report.stints {
            println!("    {} from L{} for {} laps", stint.compound, stint.start_lap, stint.laps);
        }
    }
    println!("STINT_HISTORY");
    for run in runs.iter() {
        println!("  {}", run);
    }
    Ok(())
}

pub fn print_run_header(controller: &SimulationController, config: &SimConfig, json: bool) {
    if json {
        return;
    }
    println!(
        "{} on {} - reference {:.3}s, {} ms/lap",
        controller.tire(),
        controller.track(),
        controller.reference().total(),
        controller.tick_interval().as_millis()
    );
    for stop in &config.pit_plan {
        println!("  plan: box before L{} for {}", stop.lap, stop.tire);
    }
}

pub fn print_lap(record: &LapRecord, snapshot: &Snapshot, json: bool) {
    if json {
        println!("{}", json!({ "event": "lap", "record": record, "snapshot": snapshot }));
        return;
    }
    println!(
        "L{:>2}/{}  {:>7.3}s  {}  grip {:>5.1}%  delta {:+.3}s  > ENGINEER: {}",
        record.lap,
        snapshot.race_laps,
        record.pace,
        record.tire.initial(),
        snapshot.grip,
        snapshot.live_delta,
        snapshot.engineer
    );
}

pub fn print_pit(record: &LapRecord, json: bool) {
    if json {
        println!("{}", json!({ "event": "pit", "record": record }));
        return;
    }
    println!("BOX_BOX  before L{} -> {}", record.lap, record.tire);
}

pub fn print_finish(run: &RunRecord, json: bool) {
    if json {
        println!("{}", json!({ "event": "finished", "run": run }));
        return;
    }
    println!("CLASSIFIED  delta {:+.3}s  rating {}", run.delta, run.tier);
}

pub fn print_stints(controller: &SimulationController, json: bool) {
    if json {
        return;
    }
    for stint in controller.stints() {
        let last_lap = stint.start_lap + stint.laps.saturating_sub(1);
        println!("  stint {} L{}-L{}", stint.compound, stint.start_lap, last_lap);
    }
}

pub fn print_error_human(e: &anyhow::Error) {
    eprintln!("error: {e:#}");
}

pub fn print_error_json(e: &anyhow::Error) {
    let chain: Vec<String> = e.chain().map(|c| c.to_string()).collect();
    println!("{}", json!({ "error": e.to_string(), "causes": chain }));
}
