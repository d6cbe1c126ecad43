use std::sync::Arc;

use crate::audio_api::AudioCommand;
use crate::sequencer::{Pattern, PlaybackClock, Transport};

use super::frame::StereoFrame;
use super::recording::SourceRecording;
use super::status::EngineStatus;

/// The render side of the sequencer. Lives on the audio thread.
///
/// Owns the transport and the playhead outright; the pattern is shared with
/// the control thread through per-cell atomics. Nothing in here locks,
/// allocates or fails once constructed: any missing data renders as silence.
pub struct Engine {
    pattern: Arc<Pattern>,
    clock: PlaybackClock,
    transport: Transport,
    recording: Option<Arc<SourceRecording>>,
    status: Arc<EngineStatus>,
}

impl Engine {
    pub fn new(pattern: Arc<Pattern>, block_length: usize) -> Self {
        let clock = PlaybackClock::new(block_length, pattern.bar_count());
        let status = Arc::new(EngineStatus::default());
        status.set_block_length(block_length);
        Self {
            pattern,
            clock,
            transport: Transport::new(),
            recording: None,
            status,
        }
    }

    pub fn status(&self) -> Arc<EngineStatus> {
        Arc::clone(&self.status)
    }

    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn current_bar(&self) -> usize {
        self.clock.current_bar()
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::LoadRecording(recording) => self.set_recording(recording),
            AudioCommand::Play => self.play(),
            AudioCommand::Stop => self.stop(),
        }
    }

    pub fn set_recording(&mut self, recording: Arc<SourceRecording>) {
        self.recording = Some(recording);
        self.status.set_recording_ready(true);
    }

    pub fn play(&mut self) {
        self.transport.play(&mut self.clock);
        self.publish();
    }

    pub fn stop(&mut self) {
        self.transport.stop(&mut self.clock);
        self.publish();
    }

    /// Fill `frame_count` frames of both outputs (clamped to the shorter
    /// slice) and move the playhead by the same amount while playing.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], frame_count: usize) {
        let n = frame_count.min(left.len()).min(right.len());
        let (left, right) = (&mut left[..n], &mut right[..n]);

        if !self.audible() {
            left.fill(0.0);
            right.fill(0.0);
            return;
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let frame = self.next_frame();
            *l = frame.left;
            *r = frame.right;
        }
        self.publish();
    }

    /// Same as `render`, for an interleaved stereo buffer.
    pub fn render_frames(&mut self, out: &mut [StereoFrame]) {
        if !self.audible() {
            out.fill(StereoFrame::zero());
            return;
        }
        for frame in out.iter_mut() {
            *frame = self.next_frame();
        }
        self.publish();
    }

    /// Mix one frame and step the playhead. Silence, with the playhead held,
    /// while stopped or before the recording has arrived.
    pub fn next_frame(&mut self) -> StereoFrame {
        if !self.transport.is_playing() {
            return StereoFrame::zero();
        }
        let Some(recording) = self.recording.as_deref() else {
            return StereoFrame::zero();
        };
        let block_length = self.clock.block_length();
        if block_length == 0 {
            return StereoFrame::zero();
        }

        let bar = self.clock.current_bar();
        let offset = self.clock.bar_offset();
        let mut mix = StereoFrame::zero();
        for channel in 0..self.pattern.channel_count() {
            if !self.pattern.is_on(channel, bar) {
                continue;
            }
            // a recording shorter than the grid just leaves that block silent
            let index = channel
                .checked_mul(block_length)
                .and_then(|start| start.checked_add(offset));
            if let Some(sample) = index.and_then(|i| recording.frame(i)) {
                mix += sample;
            }
        }
        self.clock.advance(1);
        mix
    }

    fn audible(&self) -> bool {
        self.transport.is_playing() && self.recording.is_some() && self.clock.block_length() > 0
    }

    /// Push transport state and playhead to `EngineStatus`. Done after each
    /// block, not per frame.
    pub fn publish(&self) {
        self.status
            .publish(self.transport.is_playing(), self.clock.position());
    }
}
