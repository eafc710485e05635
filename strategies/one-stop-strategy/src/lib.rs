use pitwall_core::{PitCall, RaceView, Strategist, TireCompound, Track};

/// OneStopStrategy boxes exactly once, before driving `lap`, and fits
/// `compound` for the rest of the race.
pub struct OneStopStrategy {
    pub lap: u32,
    pub compound: TireCompound,
}

impl OneStopStrategy {
    pub fn new(lap: u32, compound: TireCompound) -> Self {
        Self { lap, compound }
    }

    /// Same plan as the reference: fresh mediums straight after the track's
    /// optimal stop lap.
    pub fn mirror_reference(track: &Track) -> Self {
        Self::new(track.optimal_stop + 1, TireCompound::Medium)
    }
}

impl Strategist for OneStopStrategy {
    fn name(&self) -> &'static str {
        "one-stop"
    }

    fn call(&self, view: &RaceView<'_>) -> PitCall {
        if view.lap == self.lap && view.pit_stops() == 0 {
            PitCall::Box(self.compound)
        } else {
            PitCall::StayOut
        }
    }
}
