// Decodes the source recording off the audio thread and hands it to the engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{error, info, warn};

use crate::audio::{EngineStatus, SourceRecording};
use crate::audio_api::AudioCommand;

/// Decode the recording at `path` and check it against the grid it has to
/// fill. A recording shorter than `channels * block_length` still loads; the
/// missing blocks just play as silence.
pub fn load(
    path: &Path,
    target_rate: u32,
    channels: usize,
    block_length: usize,
) -> anyhow::Result<SourceRecording> {
    let recording = SourceRecording::load_wav(path, target_rate)?;
    info!(
        "loaded {} ({} frames at {} Hz)",
        path.display(),
        recording.len(),
        recording.sample_rate()
    );
    let expected = channels * block_length;
    if recording.len() < expected {
        warn!(
            "{} is {} frames short of {} channels x {} samples; missing blocks will be silent",
            path.display(),
            expected - recording.len(),
            channels,
            block_length
        );
    }
    Ok(recording)
}

/// Load in the background. On failure the engine never gets a recording
/// and stays silent; `status` is marked so the UI can say so. No retry.
pub fn spawn(
    path: PathBuf,
    target_rate: u32,
    channels: usize,
    block_length: usize,
    tx: Sender<AudioCommand>,
    status: Arc<EngineStatus>,
) -> JoinHandle<()> {
    thread::spawn(move || match load(&path, target_rate, channels, block_length) {
        Ok(recording) => {
            if tx.send(AudioCommand::LoadRecording(Arc::new(recording))).is_err() {
                warn!("audio thread went away before the recording was ready");
            }
        }
        Err(e) => {
            error!("could not load {}: {e:#}", path.display());
            status.mark_load_failed();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::StereoFrame;

    fn write_wav(path: &Path, frames: usize) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(0.25f32).unwrap();
            writer.write_sample(-0.25f32).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_spawn_delivers_recording() {
        let path = std::env::temp_dir().join(format!("barmix-loader-{}.wav", std::process::id()));
        write_wav(&path, 32);
        let (tx, rx) = crossbeam_channel::bounded(1);
        let status = Arc::new(EngineStatus::default());
        spawn(path.clone(), 8000, 2, 16, tx, Arc::clone(&status)).join().unwrap();
        std::fs::remove_file(&path).ok();
        assert!(!status.load_failed());

        match rx.try_recv().unwrap() {
            AudioCommand::LoadRecording(rec) => {
                assert_eq!(rec.len(), 32);
                assert_eq!(rec.frame(31), Some(StereoFrame::new(0.25, -0.25)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_short_recording_still_loads() {
        let path = std::env::temp_dir().join(format!("barmix-short-{}.wav", std::process::id()));
        write_wav(&path, 10);
        let rec = load(&path, 8000, 4, 16).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(rec.len(), 10);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let path = std::env::temp_dir().join("barmix-missing-recording.wav");
        let (tx, rx) = crossbeam_channel::bounded(1);
        let status = Arc::new(EngineStatus::default());
        spawn(path, 8000, 1, 16, tx, Arc::clone(&status)).join().unwrap();
        assert!(rx.try_recv().is_err());
        assert!(status.load_failed());
        assert!(!status.recording_ready());
    }
}
