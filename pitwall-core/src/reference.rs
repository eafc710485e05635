//! Fixed one-stop benchmark strategy used as the scoring baseline.

use serde::Serialize;

use crate::catalog::{TireCompound, Track};
use crate::degradation::{lap_pace, next_grip, MAX_GRIP};

/// Compound the benchmark runs for both stints.
pub const REFERENCE_COMPOUND: TireCompound = TireCompound::Medium;

/// Cumulative elapsed time of the benchmark, one entry per lap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceCurve {
    track: &'static str,
    cumulative: Vec<f64>,
}

impl ReferenceCurve {
    /// Run the benchmark over `laps` laps of `track`.
    ///
    /// The benchmark does not search for a better stop; it boxes after the
    /// track's configured `optimal_stop` lap, paying the pit loss on that lap
    /// and starting the next lap on fresh tires.
    pub fn compute(track: &'static Track, laps: u32) -> Self {
        let mut cumulative = Vec::with_capacity(laps as usize);
        let mut total = 0.0;
        let mut grip = MAX_GRIP;

        for lap in 1..=laps {
            total += lap_pace(track, REFERENCE_COMPOUND, grip);
            if lap == track.optimal_stop {
                total += track.pit_loss;
                grip = MAX_GRIP;
            } else {
                grip = next_grip(track, REFERENCE_COMPOUND, grip);
            }
            cumulative.push(total);
        }

        Self {
            track: track.code,
            cumulative,
        }
    }

    pub fn track_code(&self) -> &'static str {
        self.track
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Cumulative time at the end of `lap` (1-based).
    pub fn at_lap(&self, lap: u32) -> Option<f64> {
        let idx = (lap as usize).checked_sub(1)?;
        self.cumulative.get(idx).copied()
    }

    /// Finishing time of the benchmark.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cumulative
    }
}
