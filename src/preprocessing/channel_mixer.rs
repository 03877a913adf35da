//! Channel mixing utilities (stereo to mono conversion)

use crate::capture::CaptureBuffer;

/// Mix a stereo capture down to mono by averaging the two channels.
///
/// Returns a fresh buffer each call: downstream band filtering is
/// destructive, so every consumer gets its own copy.
///
/// # Arguments
///
/// * `capture` - Finalized stereo capture
///
/// # Returns
///
/// Mono samples, `(left + right) / 2` per sample
pub fn downmix_mono(capture: &CaptureBuffer) -> Vec<f32> {
    let left = capture.left();
    let right = capture.right();

    left.iter()
        .zip(right.iter())
        .map(|(&l, &r)| (l + r) * 0.5)
        .collect()
}
