//! Onset strength signal
//!
//! Per-frame measure of increasing energy, used as the periodicity proxy for
//! tempo estimation: sliding RMS frames, then a half-wave rectified
//! frame-to-frame delta.

/// Compute the onset strength signal of a mono buffer.
///
/// One value per frame: `OSS[n] = max(0, RMS[n] - RMS[n-1])`, with the
/// pre-signal energy taken as zero (so the first frame contributes its full
/// RMS).
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `frame_size` - Sliding frame size (typically 2048)
/// * `hop_size` - Hop between frames (typically 512)
///
/// # Returns
///
/// Onset strength values, one per complete frame; empty when the input is
/// shorter than one frame
pub fn onset_strength_signal(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    if frame_size == 0 || hop_size == 0 || samples.len() < frame_size {
        return Vec::new();
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut oss = Vec::with_capacity(num_frames);
    let mut prev_energy = 0.0f32;

    for i in 0..num_frames {
        let start = i * hop_size;
        let frame = &samples[start..start + frame_size];

        let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
        let energy = (sum_sq / frame_size as f32).sqrt();

        oss.push((energy - prev_energy).max(0.0));
        prev_energy = energy;
    }

    oss
}
