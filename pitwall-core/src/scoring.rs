//! Scoring a finished session against the reference curve.

use std::fmt;

use serde::Serialize;

use crate::reference::ReferenceCurve;
use crate::session::Session;

/// Deltas below this are ELITE.
pub const ELITE_THRESHOLD: f64 = 1.5;
/// Deltas below this (and not ELITE) are PRO.
pub const PRO_THRESHOLD: f64 = 6.0;

/// Performance tier for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Elite,
    Pro,
    Rookie,
}

impl Tier {
    /// Map a signed delta (seconds, negative = faster) to a tier.
    pub fn classify(delta: f64) -> Self {
        if delta < ELITE_THRESHOLD {
            Tier::Elite
        } else if delta < PRO_THRESHOLD {
            Tier::Pro
        } else {
            Tier::Rookie
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Elite => write!(f, "ELITE"),
            Tier::Pro => write!(f, "PRO"),
            Tier::Rookie => write!(f, "ROOKIE"),
        }
    }
}

/// Outcome of one completed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    /// Sequence number assigned by the run history log.
    pub id: u64,
    pub track: &'static str,
    /// Finishing time minus the reference total, in seconds.
    pub delta: f64,
    pub tier: Tier,
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:<12} {:+.3}s {}", self.id, self.track, self.delta, self.tier)
    }
}

/// Finishing time minus the benchmark's finishing time.
pub fn final_delta(session: &Session, reference: &ReferenceCurve) -> f64 {
    session.elapsed() - reference.total()
}

/// Score a session. `id` is filled in by the log when the record is stored.
pub fn score(session: &Session, reference: &ReferenceCurve) -> RunRecord {
    let delta = final_delta(session, reference);
    RunRecord {
        id: 0,
        track: session.track().code,
        delta,
        tier: Tier::classify(delta),
    }
}
