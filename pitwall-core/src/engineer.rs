//! Pit wall radio call derived from tire grip.

use std::fmt;

use serde::Serialize;

/// Below this grip the engineer calls the car in.
pub const BOX_GRIP_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineerCall {
    MatchingPace,
    BoxBox,
}

impl EngineerCall {
    pub fn for_grip(grip: f64) -> Self {
        if grip < BOX_GRIP_THRESHOLD {
            EngineerCall::BoxBox
        } else {
            EngineerCall::MatchingPace
        }
    }
}

impl fmt::Display for EngineerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineerCall::MatchingPace => write!(f, "MATCHING PACE."),
            EngineerCall::BoxBox => write!(f, "TIRES FALLING OFF. BOX."),
        }
    }
}
