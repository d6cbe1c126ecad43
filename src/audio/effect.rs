use super::frame::StereoFrame;

/// Post-mix processing that runs in the output callback, after the engine.
pub trait Effect: Send {
    fn process_frame(&mut self, frame: StereoFrame) -> StereoFrame;

    fn process(&mut self, buf: &mut [StereoFrame]) {
        for f in buf.iter_mut() {
            *f = self.process_frame(*f);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressorSettings {
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
}

impl Default for CompressorSettings {
    // the mix is purely additive, so overlapping blocks go well past full scale
    fn default() -> Self {
        Self {
            threshold_db: -16.0,
            ratio: 4.0,
            attack_ms: 3.0,
            release_ms: 250.0,
        }
    }
}

/// Stereo-linked, hard-knee, feed-forward compressor.
///
/// Gain reduction is tracked in dB and smoothed with separate attack and
/// release time constants.
pub struct Compressor {
    threshold_db: f32,
    ratio: f32,
    attack_coeff: f32,
    release_coeff: f32,
    reduction_db: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings, sample_rate: u32) -> Self {
        Self {
            threshold_db: settings.threshold_db,
            ratio: settings.ratio.max(1.0),
            attack_coeff: time_coeff(settings.attack_ms, sample_rate),
            release_coeff: time_coeff(settings.release_ms, sample_rate),
            reduction_db: 0.0,
        }
    }

    /// Current gain reduction, in dB (>= 0).
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    fn target_reduction(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        if over <= 0.0 {
            return 0.0;
        }
        over - over / self.ratio
    }
}

impl Effect for Compressor {
    fn process_frame(&mut self, frame: StereoFrame) -> StereoFrame {
        let level_db = 20.0 * frame.peak().max(1e-9).log10();
        let target = self.target_reduction(level_db);
        let coeff = if target > self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = target + coeff * (self.reduction_db - target);
        frame.scaled(10f32.powf(-self.reduction_db / 20.0))
    }
}

// one-pole smoothing coefficient; 0 means "jump immediately"
fn time_coeff(ms: f32, sample_rate: u32) -> f32 {
    let samples = ms * 0.001 * sample_rate as f32;
    if samples <= 0.0 {
        return 0.0;
    }
    (-1.0 / samples).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_signal_passes_untouched() {
        let mut comp = Compressor::new(CompressorSettings::default(), 44100);
        // -20 dBFS sits below the -16 dB threshold
        let quiet = StereoFrame::new(0.1, -0.1);
        for _ in 0..1000 {
            assert_eq!(comp.process_frame(quiet), quiet);
        }
        assert_eq!(comp.reduction_db(), 0.0);
    }

    #[test]
    fn test_loud_signal_settles_at_ratio() {
        let mut comp = Compressor::new(CompressorSettings::default(), 44100);
        let mut buf = vec![StereoFrame::new(1.0, 1.0); 44100];
        comp.process(&mut buf);
        // 0 dBFS is 16 dB over; 4:1 leaves 4 dB of it, so 12 dB of reduction
        assert!((comp.reduction_db() - 12.0).abs() < 0.01);
        let expected = 10f32.powf(-12.0 / 20.0);
        assert!((buf[44099].left - expected).abs() < 1e-3);
    }

    #[test]
    fn test_release_recovers() {
        let settings = CompressorSettings { release_ms: 10.0, ..Default::default() };
        let mut comp = Compressor::new(settings, 1000);
        for _ in 0..100 {
            comp.process_frame(StereoFrame::new(2.0, 0.0));
        }
        assert!(comp.reduction_db() > 10.0);
        for _ in 0..1000 {
            comp.process_frame(StereoFrame::zero());
        }
        assert!(comp.reduction_db() < 0.01);
    }

    #[test]
    fn test_zero_attack_is_instant() {
        let settings = CompressorSettings { attack_ms: 0.0, ..Default::default() };
        let mut comp = Compressor::new(settings, 44100);
        comp.process_frame(StereoFrame::new(1.0, 0.0));
        assert!((comp.reduction_db() - 12.0).abs() < 1e-4);
    }
}
