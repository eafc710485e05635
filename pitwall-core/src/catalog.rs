//! Static circuit and tire compound catalogs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A circuit the simulation can run on.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique short code, e.g. `SILVERSTONE`.
    pub code: &'static str,
    pub name: &'static str,
    /// Multiplier on tire wear; higher wears tires faster.
    pub degradation: f64,
    /// Lap time in seconds on fresh SOFT tires.
    pub base_pace: f64,
    /// Seconds lost driving through the pit lane.
    pub pit_loss: f64,
    /// Lap after which the reference strategy boxes.
    pub optimal_stop: u32,
    pub country: &'static str,
}

pub const MONACO: Track = Track {
    code: "MONACO",
    name: "Monaco",
    degradation: 0.4,
    base_pace: 72.0,
    pit_loss: 19.0,
    optimal_stop: 16,
    country: "MC",
};

pub const SPA: Track = Track {
    code: "SPA",
    name: "Spa-Francorchamps",
    degradation: 1.4,
    base_pace: 104.0,
    pit_loss: 25.0,
    optimal_stop: 10,
    country: "BE",
};

pub const SILVERSTONE: Track = Track {
    code: "SILVERSTONE",
    name: "Silverstone",
    degradation: 1.7,
    base_pace: 87.0,
    pit_loss: 23.0,
    optimal_stop: 12,
    country: "GB",
};

/// Every circuit in the catalog, in display order.
pub static TRACKS: [Track; 3] = [MONACO, SPA, SILVERSTONE];

impl Track {
    /// Look up a circuit by its short code (case-insensitive).
    pub fn from_code(code: &str) -> Result<&'static Track, CatalogError> {
        TRACKS
            .iter()
            .find(|t| t.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| CatalogError::UnknownTrack(code.to_string()))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

/// Tire compounds available at a pit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TireCompound {
    Soft,
    Medium,
    Hard,
}

impl TireCompound {
    pub const ALL: [TireCompound; 3] =
        [TireCompound::Soft, TireCompound::Medium, TireCompound::Hard];

    /// Nominal life consumed per lap, before track scaling.
    pub fn wear_rate(self) -> f64 {
        match self {
            TireCompound::Soft => 14.0,
            TireCompound::Medium => 7.0,
            TireCompound::Hard => 3.0,
        }
    }

    /// Seconds per lap slower than SOFT.
    pub fn pace_penalty(self) -> f64 {
        match self {
            TireCompound::Soft => 0.0,
            TireCompound::Medium => 0.7,
            TireCompound::Hard => 1.4,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TireCompound::Soft => "#ef4444",
            TireCompound::Medium => "#facc15",
            TireCompound::Hard => "#f8fafc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TireCompound::Soft => "Maximum Grip / High Wear",
            TireCompound::Medium => "Balanced Performance",
            TireCompound::Hard => "High Durability / Low Pace",
        }
    }

    /// Single letter shown on the pit board.
    pub fn initial(self) -> char {
        match self {
            TireCompound::Soft => 'S',
            TireCompound::Medium => 'M',
            TireCompound::Hard => 'H',
        }
    }
}

impl fmt::Display for TireCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TireCompound::Soft => write!(f, "SOFT"),
            TireCompound::Medium => write!(f, "MEDIUM"),
            TireCompound::Hard => write!(f, "HARD"),
        }
    }
}

impl FromStr for TireCompound {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SOFT" | "S" => Ok(TireCompound::Soft),
            "MEDIUM" | "M" => Ok(TireCompound::Medium),
            "HARD" | "H" => Ok(TireCompound::Hard),
            _ => Err(CatalogError::UnknownTire(s.to_string())),
        }
    }
}
