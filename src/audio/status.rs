use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// What the audio thread last reported, readable from any thread.
///
/// Written only by the engine, after it applies commands and after each
/// render. Readers see the state as of the last callback.
#[derive(Debug, Default)]
pub struct EngineStatus {
    playing: AtomicBool,
    position: AtomicUsize,
    block_length: AtomicUsize,
    recording_ready: AtomicBool,
    load_failed: AtomicBool,
}

impl EngineStatus {
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn position(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    pub fn block_length(&self) -> usize {
        self.block_length.load(Ordering::Acquire)
    }

    pub fn recording_ready(&self) -> bool {
        self.recording_ready.load(Ordering::Acquire)
    }

    /// The recording could not be decoded; the engine will stay silent.
    pub fn load_failed(&self) -> bool {
        self.load_failed.load(Ordering::Acquire)
    }

    /// Set by whoever loads the recording when it gives up.
    pub fn mark_load_failed(&self) {
        self.load_failed.store(true, Ordering::Release);
    }

    /// Bar under the playhead, for the position indicator.
    pub fn current_bar(&self) -> usize {
        match self.block_length() {
            0 => 0,
            len => self.position() / len,
        }
    }

    pub(crate) fn publish(&self, playing: bool, position: usize) {
        self.position.store(position, Ordering::Release);
        self.playing.store(playing, Ordering::Release);
    }

    pub(crate) fn set_block_length(&self, block_length: usize) {
        self.block_length.store(block_length, Ordering::Release);
    }

    pub(crate) fn set_recording_ready(&self, ready: bool) {
        self.recording_ready.store(ready, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_bar_without_block_length() {
        let status = EngineStatus::default();
        status.publish(true, 12345);
        assert_eq!(status.current_bar(), 0);
        status.set_block_length(1000);
        assert_eq!(status.current_bar(), 12);
        assert!(status.is_playing());
    }

    #[test]
    fn test_load_failed_is_sticky() {
        let status = EngineStatus::default();
        assert!(!status.load_failed());
        status.mark_load_failed();
        status.publish(false, 0);
        assert!(status.load_failed());
        assert!(!status.recording_ready());
    }
}
