// barmix: a bar-by-bar remix sequencer.
//
// One stereo recording holds a block per channel, laid out back to back. The
// engine loops a channel x bar pattern over those blocks and mixes whichever
// blocks are switched on for the current bar.

pub mod audio;
pub mod audio_api;
pub mod config;
pub mod error;
pub mod loader;
pub mod sequencer;

pub use audio::{start_audio, AudioHandle, Engine, EngineStatus, SourceRecording, StereoFrame};
pub use audio_api::AudioCommand;
pub use config::SessionConfig;
pub use error::{ConfigError, PatternError};
pub use sequencer::{block_length, check_grid, Pattern, PlaybackClock, Transport, TransportState};
