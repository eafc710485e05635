//! Simulation settings, loadable from a JSON file.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{TireCompound, Track};
use crate::controller::{SimulationController, DEFAULT_TICK_INTERVAL};
use crate::error::{CatalogError, ConfigError};
use crate::RACE_LAPS;

/// A pit stop the operator plans to make before `lap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStop {
    pub lap: u32,
    pub tire: TireCompound,
}

impl FromStr for PlannedStop {
    type Err = CatalogError;

    /// Parses `LAP:TIRE`, e.g. `12:HARD` or `8:s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lap, tire) = s
            .split_once(':')
            .ok_or_else(|| CatalogError::InvalidStop(s.to_string()))?;
        let lap = lap
            .trim()
            .parse::<u32>()
            .map_err(|_| CatalogError::InvalidStop(s.to_string()))?;
        Ok(Self {
            lap,
            tire: tire.parse()?,
        })
    }
}

impl fmt::Display for PlannedStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lap, self.tire)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub track: String,
    pub starting_tire: TireCompound,
    pub tick_interval_ms: u64,
    pub pit_plan: Vec<PlannedStop>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            track: "SILVERSTONE".to_string(),
            starting_tire: TireCompound::Medium,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            pit_plan: Vec::new(),
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Fails if the configured track is not in the catalog, or a planned
    /// stop falls outside the race or shares its lap with another stop.
    pub fn validate(&self) -> Result<&'static Track, CatalogError> {
        let track = Track::from_code(&self.track)?;
        for (i, stop) in self.pit_plan.iter().enumerate() {
            if !(1..=RACE_LAPS).contains(&stop.lap) {
                return Err(CatalogError::StopOutOfRange {
                    lap: stop.lap,
                    race_laps: RACE_LAPS,
                });
            }
            if self.pit_plan[..i].iter().any(|s| s.lap == stop.lap) {
                return Err(CatalogError::DuplicateStop(stop.lap));
            }
        }
        Ok(track)
    }

    pub fn build_controller(&self) -> Result<SimulationController, ConfigError> {
        let track = self.validate()?;
        let mut controller = SimulationController::new(track, self.starting_tire);
        controller.set_tick_interval(self.tick_interval_ms);
        Ok(controller)
    }
}
