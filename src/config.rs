// Static session setup: which recording to play, at what tempo, and the
// pattern to start from. Read once at startup; edits made while playing are
// never written back.

use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

use crate::audio::CompressorSettings;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "barmix.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Recording with one block per channel, back to back. Relative to the
    /// session directory.
    pub source: PathBuf,
    pub bpm: f64,
    pub beats_per_bar: u32,
    pub buffer_frames: u32, // requested hardware block size
    pub channels: Vec<ChannelConfig>,
    pub compressor: CompressorConfig,
}

/// One track of the recording. `steps` has one character per bar:
/// `1` or `x` plays the block, `0` or `.` mutes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    pub steps: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    pub enabled: bool,
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let channel = |name: &str, steps: &str| ChannelConfig {
            name: name.to_string(),
            steps: steps.to_string(),
        };
        Self {
            source: PathBuf::from("music/demo.wav"),
            bpm: 100.0,
            beats_per_bar: 4,
            buffer_frames: 4096,
            channels: vec![
                channel("Bass", "0000000011111111"),
                channel("Guitar", "0000000011111111"),
                channel("Synth", "1111111111111111"),
                channel("Vox", "0000111100001111"),
                channel("Drums", "1111111111111111"),
            ],
            compressor: CompressorConfig::default(),
        }
    }
}

impl Default for CompressorConfig {
    fn default() -> Self {
        let settings = CompressorSettings::default();
        Self {
            enabled: true,
            threshold_db: settings.threshold_db,
            ratio: settings.ratio,
            attack_ms: settings.attack_ms,
            release_ms: settings.release_ms,
        }
    }
}

impl CompressorConfig {
    pub fn settings(&self) -> CompressorSettings {
        CompressorSettings {
            threshold_db: self.threshold_db,
            ratio: self.ratio,
            attack_ms: self.attack_ms,
            release_ms: self.release_ms,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid session config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    /// Parse every channel's step string into pattern rows.
    pub fn pattern_rows(&self) -> Result<Vec<Vec<bool>>, ConfigError> {
        let rows = self
            .channels
            .iter()
            .enumerate()
            .map(|(channel, c)| parse_steps(channel, &c.steps))
            .collect::<Result<Vec<_>, _>>()?;

        let bars = rows.first().map(Vec::len).unwrap_or(0);
        if bars == 0 {
            return Err(ConfigError::EmptyPattern);
        }
        if let Some((channel, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != bars) {
            return Err(ConfigError::RaggedPattern {
                channel,
                expected: bars,
                found: row.len(),
            });
        }
        Ok(rows)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(ConfigError::InvalidBpm(self.bpm));
        }
        if self.beats_per_bar == 0 {
            return Err(ConfigError::InvalidBeatsPerBar);
        }
        if self.buffer_frames == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        self.pattern_rows()?;
        Ok(())
    }
}

fn parse_steps(channel: usize, steps: &str) -> Result<Vec<bool>, ConfigError> {
    steps
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|step| match step {
            '1' | 'x' | 'X' => Ok(true),
            '0' | '.' => Ok(false),
            _ => Err(ConfigError::InvalidStep { channel, step }),
        })
        .collect()
}

// <session_dir>/barmix.json
fn config_path(session_dir: &Path) -> PathBuf {
    session_dir.join(CONFIG_FILE)
}

/// Load the session config, falling back to the built-in demo session when
/// the directory has none.
pub fn load_config(session_dir: &Path) -> anyhow::Result<SessionConfig> {
    let path = config_path(session_dir);
    if !path.exists() {
        info!("no {} in {}, using the demo session", CONFIG_FILE, session_dir.display());
        return Ok(SessionConfig::default());
    }
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = SessionConfig::from_json(&data)
        .with_context(|| format!("in {}", path.display()))?;
    info!("loaded session config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_demo_session() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        let rows = config.pattern_rows().unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 16));
        assert!(!rows[3][3]);
        assert!(rows[3][4]);
        assert_eq!(config.channel_names()[4], "Drums");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SessionConfig::from_json(
            r#"{
                "bpm": 120,
                "channels": [
                    { "name": "Kick", "steps": "x... x..." },
                    { "name": "Hat",  "steps": "..x. ..x." }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.beats_per_bar, 4);
        assert_eq!(config.buffer_frames, 4096);
        assert!(config.compressor.enabled);
        let rows = config.pattern_rows().unwrap();
        assert_eq!(rows[0], vec![true, false, false, false, true, false, false, false]);
        assert!(rows[1][2]);
    }

    #[test]
    fn test_invalid_step_character() {
        let mut config = SessionConfig::default();
        config.channels[1].steps = "00001111000o1111".to_string();
        assert_eq!(
            config.pattern_rows().unwrap_err(),
            ConfigError::InvalidStep { channel: 1, step: 'o' }
        );
    }

    #[test]
    fn test_ragged_and_empty_patterns() {
        let mut config = SessionConfig::default();
        config.channels[2].steps = "111".to_string();
        assert!(matches!(
            config.pattern_rows(),
            Err(ConfigError::RaggedPattern { channel: 2, expected: 16, found: 3 })
        ));
        config.channels.clear();
        assert_eq!(config.pattern_rows().unwrap_err(), ConfigError::EmptyPattern);
    }

    #[test]
    fn test_rejects_bad_tempo() {
        assert!(SessionConfig::from_json(r#"{ "bpm": 0 }"#).is_err());
        assert!(SessionConfig::from_json(r#"{ "beats_per_bar": 0 }"#).is_err());
        assert!(SessionConfig::from_json(r#"{ "buffer_frames": 0 }"#).is_err());
    }

    #[test]
    fn test_missing_file_uses_default() {
        let dir = std::env::temp_dir().join(format!("barmix-no-config-{}", std::process::id()));
        let config = load_config(&dir).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = std::env::temp_dir().join(format!("barmix-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            config_path(&dir),
            r#"{ "source": "stems.wav", "channels": [{ "name": "A", "steps": "10" }] }"#,
        )
        .unwrap();
        let config = load_config(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(config.source, PathBuf::from("stems.wav"));
        assert_eq!(config.pattern_rows().unwrap(), vec![vec![true, false]]);
    }
}
