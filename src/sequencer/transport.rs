use super::clock::PlaybackClock;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
}

/// Play/stop. Both transitions rewind the clock, so there is no pause:
/// play always starts again from bar 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transport {
    state: TransportState,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn play(&mut self, clock: &mut PlaybackClock) {
        self.state = TransportState::Playing;
        clock.reset();
    }

    pub fn stop(&mut self, clock: &mut PlaybackClock) {
        self.state = TransportState::Stopped;
        clock.reset();
    }
}
