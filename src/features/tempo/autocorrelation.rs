//! Generalized autocorrelation BPM estimation
//!
//! Finds the dominant periodicity of the onset strength signal using an
//! FFT-accelerated autocorrelation with the phase discarded:
//!
//! 1. Compress the OSS by square root
//! 2. Zero-pad to the next power of two and forward-FFT
//! 3. Replace each bin with its squared magnitude (drops phase, which
//!    emphasizes periodic structure over waveform shape)
//! 4. Inverse-FFT; the real part at lag `k` is the autocorrelation value
//! 5. Pick the best-scoring lag whose implied tempo lies in the search range

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Estimate a single global BPM from an onset strength signal.
///
/// `bpm = 60 * sample_rate / (lag * hop_size)`; only lags whose implied
/// tempo falls in `[min_bpm, max_bpm]` are considered, and lag 0 (the
/// trivial self-correlation) is excluded.
///
/// # Arguments
///
/// * `oss` - Onset strength signal (one value per frame)
/// * `sample_rate` - Audio sample rate in Hz
/// * `hop_size` - Hop size the OSS was computed with, in samples
/// * `min_bpm` - Lower edge of the tempo search range
/// * `max_bpm` - Upper edge of the tempo search range
///
/// # Returns
///
/// Detected BPM, or 0.0 when no lag in the search range exists (OSS too
/// short). A flat autocorrelation (silence) still yields an arbitrary
/// low-confidence lag; that is accepted, not specially handled.
pub fn estimate_bpm(
    oss: &[f32],
    sample_rate: f32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> f32 {
    if oss.len() < 2 || hop_size == 0 || sample_rate <= 0.0 {
        return 0.0;
    }

    log::debug!(
        "Estimating BPM: {} OSS frames, hop={}, range=[{:.0}, {:.0}] BPM",
        oss.len(),
        hop_size,
        min_bpm,
        max_bpm
    );

    // Square-root compression, zero-padded to the next power of two
    let fft_size = oss.len().next_power_of_two();
    let mut spectrum: Vec<Complex<f32>> = oss
        .iter()
        .map(|&v| Complex::new(v.max(0.0).sqrt(), 0.0))
        .collect();
    spectrum.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut spectrum);

    // Squared magnitude: the "generalized" step, phase discarded
    for bin in spectrum.iter_mut() {
        *bin = Complex::new(bin.norm_sqr(), 0.0);
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut spectrum);

    // spectrum[k].re now holds (unnormalized) autocorrelation at lag k frames
    let scale = 1.0 / fft_size as f32;

    let mut best_bpm = 0.0f32;
    let mut best_score = f32::NEG_INFINITY;

    for lag_frames in 1..fft_size / 2 {
        let lag_samples = lag_frames as f32 * hop_size as f32;
        let bpm = 60.0 * sample_rate / lag_samples;

        if bpm < min_bpm || bpm > max_bpm {
            continue;
        }

        let score = spectrum[lag_frames].re * scale;
        if score > best_score {
            best_score = score;
            best_bpm = bpm;
        }
    }

    log::debug!("BPM candidate: {:.2} (score {:.4})", best_bpm, best_score);

    best_bpm
}
