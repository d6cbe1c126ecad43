use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ConfigError, PatternError};

/// The channel x bar grid of block flags.
///
/// Cells are individual atomics in one flat, fixed-size slice so the control
/// thread can flip a block while the audio thread is reading the grid, without
/// either side taking a lock. A reader may see a flip one render block late.
#[derive(Debug)]
pub struct Pattern {
    cells: Box<[AtomicBool]>, // row-major: channel * bars + bar
    channels: usize,
    bars: usize,
}

impl Pattern {
    /// All blocks off.
    pub fn new(channels: usize, bars: usize) -> Result<Self, ConfigError> {
        if channels == 0 || bars == 0 {
            return Err(ConfigError::EmptyPattern);
        }
        let cells = (0..channels * bars).map(|_| AtomicBool::new(false)).collect();
        Ok(Self { cells, channels, bars })
    }

    /// Build from one row of flags per channel. Every row must have the same
    /// number of bars.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, ConfigError> {
        let bars = rows.first().map(Vec::len).unwrap_or(0);
        let pattern = Self::new(rows.len(), bars)?;
        for (channel, row) in rows.iter().enumerate() {
            if row.len() != bars {
                return Err(ConfigError::RaggedPattern {
                    channel,
                    expected: bars,
                    found: row.len(),
                });
            }
            for (bar, &on) in row.iter().enumerate() {
                pattern.cells[channel * bars + bar].store(on, Ordering::Relaxed);
            }
        }
        Ok(pattern)
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn bar_count(&self) -> usize {
        self.bars
    }

    pub fn get(&self, channel: usize, bar: usize) -> Result<bool, PatternError> {
        let idx = self.index(channel, bar)?;
        Ok(self.cells[idx].load(Ordering::Relaxed))
    }

    /// Last write wins. The audio thread picks it up on its next render.
    pub fn set(&self, channel: usize, bar: usize, value: bool) -> Result<(), PatternError> {
        let idx = self.index(channel, bar)?;
        self.cells[idx].store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Flip a block and return its new value.
    pub fn toggle(&self, channel: usize, bar: usize) -> Result<bool, PatternError> {
        let idx = self.index(channel, bar)?;
        Ok(!self.cells[idx].fetch_xor(true, Ordering::Relaxed))
    }

    /// Render-path read: anything outside the grid is simply off.
    #[inline]
    pub(crate) fn is_on(&self, channel: usize, bar: usize) -> bool {
        if channel >= self.channels || bar >= self.bars {
            return false;
        }
        self.cells[channel * self.bars + bar].load(Ordering::Relaxed)
    }

    fn index(&self, channel: usize, bar: usize) -> Result<usize, PatternError> {
        if channel >= self.channels || bar >= self.bars {
            return Err(PatternError::IndexOutOfRange {
                channel,
                bar,
                channels: self.channels,
                bars: self.bars,
            });
        }
        Ok(channel * self.bars + bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let pattern = Pattern::new(5, 16).unwrap();
        for channel in 0..5 {
            for bar in 0..16 {
                for value in [true, false] {
                    pattern.set(channel, bar, value).unwrap();
                    assert_eq!(pattern.get(channel, bar), Ok(value));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let pattern = Pattern::new(2, 4).unwrap();
        let err = PatternError::IndexOutOfRange { channel: 2, bar: 0, channels: 2, bars: 4 };
        assert_eq!(pattern.get(2, 0), Err(err));
        assert!(pattern.set(0, 4, true).is_err());
        assert!(pattern.toggle(9, 9).is_err());
        assert!(!pattern.is_on(2, 0));
    }

    #[test]
    fn test_from_rows_layout() {
        let rows = vec![vec![true, false, false], vec![false, false, true]];
        let pattern = Pattern::from_rows(&rows).unwrap();
        assert_eq!(pattern.channel_count(), 2);
        assert_eq!(pattern.bar_count(), 3);
        assert_eq!(pattern.get(0, 0), Ok(true));
        assert_eq!(pattern.get(1, 0), Ok(false));
        assert_eq!(pattern.get(1, 2), Ok(true));
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert_eq!(Pattern::from_rows(&[]).unwrap_err(), ConfigError::EmptyPattern);
        assert_eq!(Pattern::from_rows(&[vec![]]).unwrap_err(), ConfigError::EmptyPattern);
        let ragged = vec![vec![true, true], vec![true]];
        assert_eq!(
            Pattern::from_rows(&ragged).unwrap_err(),
            ConfigError::RaggedPattern { channel: 1, expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_toggle() {
        let pattern = Pattern::new(1, 1).unwrap();
        assert_eq!(pattern.toggle(0, 0), Ok(true));
        assert_eq!(pattern.toggle(0, 0), Ok(false));
        assert_eq!(pattern.get(0, 0), Ok(false));
    }
}
