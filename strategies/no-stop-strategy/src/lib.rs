use pitwall_core::{PitCall, RaceView, Strategist};

/// NoStopStrategy keeps the starting set on for the whole race, whatever the
/// engineer says. Useful as the worst-case baseline for high-wear tracks.
pub struct NoStopStrategy;

impl Strategist for NoStopStrategy {
    fn name(&self) -> &'static str {
        "no-stop"
    }

    fn call(&self, _view: &RaceView<'_>) -> PitCall {
        PitCall::StayOut
    }
}
