//! Configuration parameters for an analysis run
//!
//! The host supplies a flat set of scalars before each run; the worker takes
//! a snapshot at start and never observes live parameter changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Frequency window and sensitivity for one drum band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// High-pass cutoff for band isolation, in Hz
    pub freq_low_hz: f32,

    /// Low-pass cutoff for band isolation, in Hz
    pub freq_high_hz: f32,

    /// Onset sensitivity in [0, 1]: 0 = least sensitive, 1 = most sensitive
    pub sensitivity: f32,
}

impl BandConfig {
    /// True when the window cannot isolate anything (low >= high).
    pub fn is_degenerate(&self) -> bool {
        self.freq_low_hz >= self.freq_high_hz
    }
}

/// Tempo multiplier applied to the detected BPM candidate
///
/// Lets the user resolve half/double-time ambiguity that a single global
/// autocorrelation peak cannot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BpmMultiplier {
    /// Halve the detected tempo
    Half,
    /// Keep the detected tempo
    #[default]
    Normal,
    /// Double the detected tempo
    Double,
}

impl BpmMultiplier {
    /// Multiplication factor for the detected BPM.
    pub fn factor(&self) -> f32 {
        match self {
            BpmMultiplier::Half => 0.5,
            BpmMultiplier::Normal => 1.0,
            BpmMultiplier::Double => 2.0,
        }
    }
}

/// Analysis configuration snapshot
///
/// Immutable for the duration of one run. Detector threshold constants are
/// carried here with their tuned defaults rather than hard-coded, so hosts
/// can adjust them without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Kick band window + sensitivity (default 40-120 Hz, 0.5)
    pub kick: BandConfig,

    /// Snare band window + sensitivity (default 200-8000 Hz, 0.5)
    pub snare: BandConfig,

    /// Hihat band window + sensitivity (default 5000-16000 Hz, 0.5)
    pub hihat: BandConfig,

    /// Run the tempo estimator
    pub detect_bpm: bool,

    /// Run the key estimator
    pub detect_key: bool,

    /// Run kick onset detection
    pub detect_kick: bool,

    /// Run snare onset detection
    pub detect_snare: bool,

    /// Run hihat onset detection
    pub detect_hihat: bool,

    /// Half/normal/double-time selection applied to the BPM candidate
    pub bpm_multiplier: BpmMultiplier,

    /// Destination directory for the serialized MIDI clips
    pub clip_dir: PathBuf,

    /// Standard-deviation multiplier in the adaptive onset threshold:
    /// `mean + (1 - sensitivity) * onset_threshold_sigma * stddev`
    pub onset_threshold_sigma: f32,

    /// Base of the absolute strength floor, as a fraction of the loudest
    /// transient in the band
    pub onset_floor_base: f32,

    /// Sensitivity-scaled extent of the strength floor:
    /// `floor = peak * (onset_floor_base + (1 - sensitivity) * onset_floor_range)`
    pub onset_floor_range: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kick: BandConfig {
                freq_low_hz: 40.0,
                freq_high_hz: 120.0,
                sensitivity: 0.5,
            },
            snare: BandConfig {
                freq_low_hz: 200.0,
                freq_high_hz: 8000.0,
                sensitivity: 0.5,
            },
            hihat: BandConfig {
                freq_low_hz: 5000.0,
                freq_high_hz: 16000.0,
                sensitivity: 0.5,
            },
            detect_bpm: true,
            detect_key: true,
            detect_kick: true,
            detect_snare: true,
            detect_hihat: true,
            bpm_multiplier: BpmMultiplier::Normal,
            clip_dir: std::env::temp_dir(),
            onset_threshold_sigma: 6.0,
            onset_floor_base: 0.05,
            onset_floor_range: 0.50,
        }
    }
}
