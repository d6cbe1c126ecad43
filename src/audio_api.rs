use std::sync::Arc;

pub use crate::audio::SourceRecording;

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't touch the disk (it would stall the callback), so the
    // recording is decoded elsewhere and handed over ready to play.
    LoadRecording(Arc<SourceRecording>),

    // Both rewind the playhead to bar 0. The engine applies the flag and the
    // rewind together, before it renders the next block.
    Play,
    Stop,
}
