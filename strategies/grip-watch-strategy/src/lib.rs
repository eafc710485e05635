use pitwall_core::engineer::EngineerCall;
use pitwall_core::{PitCall, RaceView, Strategist, TireCompound};

/// GripWatchStrategy listens to the race engineer: once grip drops far enough
/// for a "box" call it pits, unless the race is nearly over.
///
/// Compound choice depends on how many laps the new set has to last:
/// - 8 or fewer laps left → SOFT
/// - 16 or fewer → MEDIUM
/// - otherwise → HARD
pub struct GripWatchStrategy;

/// Not worth the pit loss this close to the flag.
pub const MIN_LAPS_TO_BOX: u32 = 4;

pub fn compound_for(laps_remaining: u32) -> TireCompound {
    match laps_remaining {
        0..=8 => TireCompound::Soft,
        9..=16 => TireCompound::Medium,
        _ => TireCompound::Hard,
    }
}

impl Strategist for GripWatchStrategy {
    fn name(&self) -> &'static str {
        "grip-watch"
    }

    fn call(&self, view: &RaceView<'_>) -> PitCall {
        if view.engineer == EngineerCall::BoxBox && view.laps_remaining >= MIN_LAPS_TO_BOX {
            PitCall::Box(compound_for(view.laps_remaining))
        } else {
            PitCall::StayOut
        }
    }
}
