use thiserror::Error;

/// Misuse of the pattern accessors by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("block ({channel}, {bar}) is outside the {channels}x{bars} pattern")]
    IndexOutOfRange {
        channel: usize,
        bar: usize,
        channels: usize,
        bars: usize,
    },
}

/// Static session configuration that can't drive the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bpm must be a positive number, got {0}")]
    InvalidBpm(f64),
    #[error("beats per bar must be at least 1")]
    InvalidBeatsPerBar,
    #[error("sample rate must be non-zero")]
    InvalidSampleRate,
    #[error("a bar at {bpm} bpm and {sample_rate} Hz is shorter than one sample")]
    EmptyBlock { bpm: f64, sample_rate: u32 },
    #[error("a bar at {bpm} bpm and {sample_rate} Hz is too long to count in samples")]
    BlockTooLong { bpm: f64, sample_rate: u32 },
    #[error("{channels} channels x {bars} bars of {block_length} samples can't be addressed")]
    GridTooLarge {
        block_length: usize,
        channels: usize,
        bars: usize,
    },
    #[error("pattern needs at least one channel and one bar")]
    EmptyPattern,
    #[error("channel {channel} has {found} bars, expected {expected}")]
    RaggedPattern {
        channel: usize,
        expected: usize,
        found: usize,
    },
    #[error("channel {channel} has invalid step {step:?} (use 1/x for on, 0/. for off)")]
    InvalidStep { channel: usize, step: char },
    #[error("buffer size must be non-zero")]
    InvalidBufferSize,
}
