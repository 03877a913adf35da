//! Per-band onset detection
//!
//! Band-pass isolates one drum band, computes a small-frame onset function,
//! then picks peaks against two gates at once:
//! - an adaptive threshold (trailing mean + sensitivity-scaled stddev)
//! - an absolute strength floor anchored to the loudest transient in the
//!   band, which keeps low-sensitivity settings from firing on quiet-passage
//!   noise
//!
//! Accepted onsets open a refractory window sized to the instrument's
//! plausible repetition rate, suppressing double triggers on decay ripple.

use super::{OnsetEvent, ONSET_FRAME_SIZE, ONSET_HOP_SIZE, THRESHOLD_WINDOW_FRAMES};
use crate::config::BandConfig;
use crate::preprocessing::filters::band_isolate;

const EPSILON: f32 = 1e-10;

/// Tuned detector constants, carried from configuration
#[derive(Debug, Clone, Copy)]
pub struct OnsetTuning {
    /// Stddev multiplier in the adaptive threshold
    pub threshold_sigma: f32,
    /// Base of the absolute strength floor (fraction of band peak)
    pub floor_base: f32,
    /// Sensitivity-scaled extent of the strength floor
    pub floor_range: f32,
}

impl Default for OnsetTuning {
    fn default() -> Self {
        Self {
            threshold_sigma: 6.0,
            floor_base: 0.05,
            floor_range: 0.50,
        }
    }
}

/// Detect onsets in one drum band.
///
/// Filtering is destructive, so the caller hands over its own mono copy.
///
/// # Arguments
///
/// * `mono` - Fresh mono downmix for this band; filtered in place
/// * `sample_rate` - Sample rate in Hz
/// * `band` - Frequency window + sensitivity for this band
/// * `min_gap_ms` - Refractory period between accepted onsets
/// * `tuning` - Threshold/floor constants
///
/// # Returns
///
/// Ordered onsets with strictly increasing sample offsets. Degenerate input
/// (empty signal, inverted frequency window) yields an empty list, not an
/// error: a silent band is a valid musical input.
pub fn detect_band_onsets(
    mono: &mut [f32],
    sample_rate: f32,
    band: &BandConfig,
    min_gap_ms: f32,
    tuning: &OnsetTuning,
) -> Vec<OnsetEvent> {
    if mono.is_empty() || sample_rate <= 0.0 || band.is_degenerate() {
        return Vec::new();
    }

    log::debug!(
        "Onset detection: band {:.0}-{:.0} Hz, sensitivity {:.2}, gap {:.0} ms",
        band.freq_low_hz,
        band.freq_high_hz,
        band.sensitivity,
        min_gap_ms
    );

    // Step 1: isolate the band
    band_isolate(mono, band.freq_low_hz, band.freq_high_hz, sample_rate);

    // Step 2: framed RMS energy and half-wave rectified delta
    if mono.len() < ONSET_FRAME_SIZE {
        return Vec::new();
    }
    let num_frames = (mono.len() - ONSET_FRAME_SIZE) / ONSET_HOP_SIZE + 1;
    if num_frames < 2 {
        return Vec::new();
    }

    let mut energies = Vec::with_capacity(num_frames);
    for i in 0..num_frames {
        let start = i * ONSET_HOP_SIZE;
        let frame = &mono[start..start + ONSET_FRAME_SIZE];
        let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
        energies.push((sum_sq / ONSET_FRAME_SIZE as f32).sqrt());
    }

    // onset_fn[j] belongs to frame j+1 (the frame whose energy rose)
    let onset_fn: Vec<f32> = energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();

    let peak = onset_fn.iter().copied().fold(0.0f32, f32::max);
    if peak <= EPSILON {
        log::debug!("Band is silent, no onsets");
        return Vec::new();
    }

    // Step 3: gates
    let sensitivity = band.sensitivity.clamp(0.0, 1.0);
    let floor = peak * (tuning.floor_base + (1.0 - sensitivity) * tuning.floor_range);
    let sigma_scale = (1.0 - sensitivity) * tuning.threshold_sigma;

    let gap_frames = ((min_gap_ms / 1000.0) * sample_rate / ONSET_HOP_SIZE as f32)
        .round()
        .max(1.0) as usize;

    let mut onsets = Vec::new();
    let mut next_allowed = 0usize;

    for j in 0..onset_fn.len() {
        if j < next_allowed {
            continue;
        }

        let value = onset_fn[j];
        if value <= floor {
            continue;
        }

        // Strict local maximum: above the previous value, at least the next
        let prev = if j > 0 { onset_fn[j - 1] } else { 0.0 };
        let next = if j + 1 < onset_fn.len() {
            onset_fn[j + 1]
        } else {
            0.0
        };
        if !(value > prev && value >= next) {
            continue;
        }

        // Adaptive threshold over the trailing statistics window
        let window_start = j.saturating_sub(THRESHOLD_WINDOW_FRAMES - 1);
        let window = &onset_fn[window_start..=j];
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        let variance =
            window.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>() / window.len() as f32;
        let threshold = mean + sigma_scale * variance.sqrt();

        if value <= threshold {
            continue;
        }

        // Detecting frame is j+1; report its temporal center
        let detecting_frame = j + 1;
        let sample_offset = detecting_frame * ONSET_HOP_SIZE + ONSET_FRAME_SIZE / 2;
        onsets.push(OnsetEvent {
            sample_offset,
            strength: value,
        });
        next_allowed = j + gap_frames;
    }

    log::debug!("Detected {} onsets in band", onsets.len());

    onsets
}
