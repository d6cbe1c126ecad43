use crate::error::ConfigError;

/// Samples in one bar: floor(sample_rate * 60 / (bpm / beats_per_bar)).
pub fn block_length(sample_rate: u32, bpm: f64, beats_per_bar: u32) -> Result<usize, ConfigError> {
    if sample_rate == 0 {
        return Err(ConfigError::InvalidSampleRate);
    }
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(ConfigError::InvalidBpm(bpm));
    }
    if beats_per_bar == 0 {
        return Err(ConfigError::InvalidBeatsPerBar);
    }
    // multiply first so whole-number tempos divide exactly
    let samples = (sample_rate as f64 * 60.0 * beats_per_bar as f64 / bpm).floor();
    if samples < 1.0 {
        return Err(ConfigError::EmptyBlock { bpm, sample_rate });
    }
    // `as usize` saturates, so anything this large has to be refused here
    if samples >= usize::MAX as f64 {
        return Err(ConfigError::BlockTooLong { bpm, sample_rate });
    }
    Ok(samples as usize)
}

/// The whole recording grid (`channels` blocks) and the whole loop (`bars`
/// blocks) must be addressable as sample indices.
pub fn check_grid(block_length: usize, channels: usize, bars: usize) -> Result<(), ConfigError> {
    let fits = block_length.checked_mul(channels).is_some()
        && block_length.checked_mul(bars).is_some();
    if !fits {
        return Err(ConfigError::GridTooLarge {
            block_length,
            channels,
            bars,
        });
    }
    Ok(())
}

/// Sample-accurate playhead over one loop of the pattern.
///
/// Keeps `0 <= position < loop_length` whenever the loop is non-empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackClock {
    position: usize,
    block_length: usize,
    loop_length: usize,
}

impl PlaybackClock {
    pub fn new(block_length: usize, bars: usize) -> Self {
        Self {
            position: 0,
            block_length,
            // saturates rather than panics; check_grid rejects such grids up front
            loop_length: block_length.saturating_mul(bars),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn block_length(&self) -> usize {
        self.block_length
    }

    pub fn loop_length(&self) -> usize {
        self.loop_length
    }

    /// Bar under the playhead; 0 until a block length is known.
    pub fn current_bar(&self) -> usize {
        if self.block_length == 0 {
            return 0;
        }
        self.position / self.block_length
    }

    /// Offset of the playhead inside the current bar.
    pub fn bar_offset(&self) -> usize {
        if self.block_length == 0 {
            return 0;
        }
        self.position % self.block_length
    }

    /// Move forward, looping back into bar 0 past the end.
    pub fn advance(&mut self, samples: usize) {
        if self.loop_length == 0 {
            return;
        }
        let step = samples % self.loop_length;
        let room = self.loop_length - self.position;
        self.position = if step >= room {
            step - room
        } else {
            self.position + step
        };
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}
