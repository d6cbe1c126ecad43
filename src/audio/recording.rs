use std::path::Path;

use anyhow::Context;

use super::frame::StereoFrame;

/// The decoded source recording. Read-only once handed to the engine.
///
/// Channel `c`'s block lives at frames `[c * block_length, (c + 1) * block_length)`.
#[derive(Clone, Debug)]
pub struct SourceRecording {
    frames: Vec<StereoFrame>,
    sample_rate: u32,
}

impl SourceRecording {
    pub fn from_frames(frames: Vec<StereoFrame>, sample_rate: u32) -> Self {
        Self { frames, sample_rate }
    }

    /// Decode a WAV file and bring it to `target_rate`.
    pub fn load_wav(path: &Path, target_rate: u32) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let spec = reader.spec();
        let file_channels = spec.channels as usize;
        if file_channels == 0 {
            anyhow::bail!("{} has no audio channels", path.display());
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
            #[allow(unreachable_patterns)]
            _ => anyhow::bail!("unsupported sample format: {:?}", spec.sample_format),
        };

        // mono plays on both sides; anything wider keeps its first two channels
        let frames: Vec<StereoFrame> = samples
            .chunks_exact(file_channels)
            .map(|c| StereoFrame {
                left: c[0],
                right: if file_channels > 1 { c[1] } else { c[0] },
            })
            .collect();

        let frames = resample_linear(&frames, spec.sample_rate, target_rate);
        Ok(Self {
            frames,
            sample_rate: target_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `None` past the end of the recording.
    #[inline]
    pub fn frame(&self, index: usize) -> Option<StereoFrame> {
        self.frames.get(index).copied()
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate || source_rate == 0 || frames.is_empty() {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let last = frames[frames.len() - 1];

    (0..out_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos.floor() as usize;
            if idx + 1 >= frames.len() {
                return last;
            }
            let frac = (src_pos - idx as f64) as f32;
            let a = frames[idx];
            let b = frames[idx + 1];
            StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            }
        })
        .collect()
}
