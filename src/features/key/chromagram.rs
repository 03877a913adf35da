//! STFT chromagram extraction
//!
//! Accumulates Hann-windowed short-time spectra into a single 12-bin
//! pitch-class profile (PCP) over the whole capture. Bins below 32 Hz are
//! ignored; every remaining bin up to Nyquist maps to the nearest equal-
//! tempered pitch class via `round(12 * log2(f / 440) + 69) mod 12`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// How many frames between cancellation polls inside the frame loop
const CANCEL_POLL_INTERVAL: usize = 64;

/// Accumulate a 12-bin pitch-class profile across all STFT frames.
///
/// # Arguments
///
/// * `samples` - Mono audio, already pre-filtered by the caller
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - STFT frame size (typically 4096)
/// * `hop_size` - STFT hop (typically 2048, 50% overlap)
/// * `poll_cancel` - Checked every few frames; a `true` return aborts
///
/// # Returns
///
/// `Some(pcp)` with unnormalized accumulated magnitudes, or `None` when the
/// cancellation poll fired. Inputs shorter than one frame produce an
/// all-zero profile.
pub fn compute_pitch_class_profile(
    samples: &[f32],
    sample_rate: f32,
    frame_size: usize,
    hop_size: usize,
    poll_cancel: &mut impl FnMut() -> bool,
) -> Option<[f32; 12]> {
    let mut pcp = [0.0f32; 12];

    if frame_size == 0 || hop_size == 0 || sample_rate <= 0.0 || samples.len() < frame_size {
        return Some(pcp);
    }

    // Hann window and per-bin pitch-class mapping are frame-invariant
    let window: Vec<f32> = (0..frame_size)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / frame_size as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect();

    let bin_to_pitch_class = pitch_class_map(sample_rate, frame_size);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut frame_buf = vec![Complex::new(0.0f32, 0.0f32); frame_size];

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    log::debug!(
        "Chromagram: {} frames ({} samples, frame={}, hop={})",
        num_frames,
        samples.len(),
        frame_size,
        hop_size
    );

    for frame_idx in 0..num_frames {
        if frame_idx % CANCEL_POLL_INTERVAL == 0 && poll_cancel() {
            return None;
        }

        let start = frame_idx * hop_size;
        for (i, slot) in frame_buf.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] * window[i], 0.0);
        }
        fft.process(&mut frame_buf);

        // Positive-frequency bins only; DC and sub-32 Hz bins are unmapped
        for (bin, pc) in bin_to_pitch_class.iter().enumerate() {
            if let Some(pc) = pc {
                pcp[*pc] += frame_buf[bin].norm();
            }
        }
    }

    Some(pcp)
}

/// Map each positive-frequency FFT bin to a pitch class, or `None` for bins
/// outside the mapped range.
fn pitch_class_map(sample_rate: f32, frame_size: usize) -> Vec<Option<usize>> {
    let nyquist = sample_rate * 0.5;
    let bin_width = sample_rate / frame_size as f32;

    (0..=frame_size / 2)
        .map(|bin| {
            let freq = bin as f32 * bin_width;
            if freq < super::CHROMA_MIN_FREQ_HZ || freq > nyquist {
                return None;
            }
            let midi = (12.0 * (freq / 440.0).log2() + 69.0).round() as i32;
            Some(midi.rem_euclid(12) as usize)
        })
        .collect()
}
