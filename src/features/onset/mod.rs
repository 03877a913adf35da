//! Drum onset detection
//!
//! One parameterized detector (band-pass isolation + adaptive energy-based
//! peak picking) invoked once per drum band with that band's frequency
//! window, sensitivity, and refractory gap.

pub mod band_detector;

pub use band_detector::{detect_band_onsets, OnsetTuning};

use serde::{Deserialize, Serialize};

/// Analysis frame size for the onset function, in samples
///
/// Smaller than the tempo estimator's frame: percussive transients need the
/// faster temporal resolution.
pub const ONSET_FRAME_SIZE: usize = 256;

/// Hop size for the onset function, in samples
pub const ONSET_HOP_SIZE: usize = 128;

/// Trailing window for the adaptive threshold statistics, in frames (~500 ms)
pub const THRESHOLD_WINDOW_FRAMES: usize = 40;

/// Minimum inter-onset gap for the kick band, in milliseconds
pub const KICK_MIN_GAP_MS: f32 = 80.0;

/// Minimum inter-onset gap for the snare band, in milliseconds
pub const SNARE_MIN_GAP_MS: f32 = 60.0;

/// Minimum inter-onset gap for the hihat band, in milliseconds
pub const HIHAT_MIN_GAP_MS: f32 = 30.0;

/// A single detected onset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnsetEvent {
    /// Temporal center of the detecting window, in samples from capture start
    pub sample_offset: usize,

    /// Onset function value at detection (half-wave rectified energy delta)
    pub strength: f32,
}
