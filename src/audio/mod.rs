use std::sync::Arc;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};

use crate::audio_api::AudioCommand;
use crate::config::SessionConfig;
use crate::sequencer::{block_length, check_grid, Pattern};

mod effect;
mod engine;
mod frame;
mod recording;
mod status;

pub use effect::{Compressor, CompressorSettings, Effect};
pub use engine::Engine;
pub use frame::StereoFrame;
pub use recording::SourceRecording;
pub use status::EngineStatus;

/// Control-side handle to a running output stream.
///
/// Transport changes are queued and applied by the audio thread before its
/// next block; pattern edits go straight into the shared grid.
pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    pattern: Arc<Pattern>,
    status: Arc<EngineStatus>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        match self.tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => warn!("audio command queue full, dropped {cmd:?}"),
            Err(TrySendError::Disconnected(_)) => error!("audio thread is gone"),
        }
    }

    pub fn play(&self) {
        self.send(AudioCommand::Play);
    }

    pub fn stop(&self) {
        self.send(AudioCommand::Stop);
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    pub fn current_bar(&self) -> usize {
        self.status.current_bar()
    }

    pub fn recording_ready(&self) -> bool {
        self.status.recording_ready()
    }

    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    pub fn status(&self) -> &Arc<EngineStatus> {
        &self.status
    }

    /// Device rate; the recording must be resampled to this before loading.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sender(&self) -> Sender<AudioCommand> {
        self.tx.clone()
    }
}

pub fn start_audio(config: &SessionConfig, pattern: Arc<Pattern>) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(64);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let supported = device.default_output_config().context("no default output config")?;

    let sample_rate: u32 = supported.sample_rate();
    let channels = supported.channels() as usize;
    if channels < 2 {
        anyhow::bail!("output device has {channels} channel(s), stereo is required");
    }

    let block_length = block_length(sample_rate, config.bpm, config.beats_per_bar)?;
    check_grid(block_length, pattern.channel_count(), pattern.bar_count())?;
    info!(
        "output {sample_rate} Hz x{channels}, block {block_length} samples, loop {} samples",
        block_length * pattern.bar_count()
    );

    let engine = Engine::new(Arc::clone(&pattern), block_length);
    let status = engine.status();
    let compressor = config
        .compressor
        .enabled
        .then(|| Compressor::new(config.compressor.settings(), sample_rate));

    match supported.sample_format() {
        cpal::SampleFormat::F32 => {
            let buffer_size = pick_buffer_size(config.buffer_frames, supported.buffer_size());
            let mut stream_config: cpal::StreamConfig = supported.into();
            stream_config.buffer_size = buffer_size;
            info!("using stream config {stream_config:?}");

            let output_stream =
                build_output_stream_f32(&device, &stream_config, rx, engine, compressor, channels)?;
            output_stream.play().context("failed to play output stream")?;

            Ok(AudioHandle {
                tx,
                pattern,
                status,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        format => anyhow::bail!("unsupported sample format {format:?} (only f32 supported for now)"),
    }
}

/// Ask for `requested` frames per callback, kept inside what the device
/// reports. Devices that don't report a range get their own default.
fn pick_buffer_size(requested: u32, supported: &cpal::SupportedBufferSize) -> cpal::BufferSize {
    match *supported {
        cpal::SupportedBufferSize::Range { min, max } if min <= max => {
            let frames = requested.clamp(min, max);
            if frames != requested {
                warn!("buffer of {requested} frames not supported ({min}-{max}), using {frames}");
            }
            cpal::BufferSize::Fixed(frames)
        }
        _ => {
            warn!("device reports no buffer size range, using its default instead of {requested}");
            cpal::BufferSize::Default
        }
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    mut engine: Engine,
    mut compressor: Option<Compressor>,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            // transport changes land before any sample of this block
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            fill_output(data, channels, &mut engine, &mut compressor);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// Render one interleaved device buffer: engine first, then the compressor.
fn fill_output(
    data: &mut [f32],
    channels: usize,
    engine: &mut Engine,
    compressor: &mut Option<Compressor>,
) {
    if channels == 2 {
        let n_frames = data.len() / 2;
        // SAFETY: StereoFrame is repr(C) with two f32 fields, so it has the
        // layout of an interleaved [f32; 2]
        let frames: &mut [StereoFrame] = unsafe {
            std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut StereoFrame, n_frames)
        };
        engine.render_frames(frames);
        if let Some(comp) = compressor.as_mut() {
            comp.process(frames);
        }
        return;
    }

    // wider devices get left/right on their first two outputs
    for out in data.chunks_exact_mut(channels) {
        let mut frame = engine.next_frame();
        if let Some(comp) = compressor.as_mut() {
            frame = comp.process_frame(frame);
        }
        out[0] = frame.left;
        out[1] = frame.right;
        out[2..].fill(0.0);
    }
    engine.publish();
}
