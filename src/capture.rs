//! Capture buffer handed over by the host
//!
//! The host records into its own stereo buffer while capture is active and
//! hands the finalized result to the pipeline as a [`CaptureBuffer`]. The
//! pipeline only ever reads it; band filtering works on per-band mono copies.

use crate::error::AnalysisError;

/// Longest capture the host is expected to hand over, in seconds.
///
/// Hosts can use this to pre-allocate their recording buffers.
pub const MAX_CAPTURE_SECONDS: f32 = 30.0;

/// Shortest capture the pipeline will analyze, in seconds.
pub const MIN_CAPTURE_SECONDS: f32 = 2.0;

/// A finalized stereo capture: two equal-length channels plus the sample rate.
///
/// Never mutated after construction. The worker reads it through an `Arc`.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: f32,
}

impl CaptureBuffer {
    /// Build a capture buffer from two channels.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the channels differ in length
    /// or the sample rate is not positive.
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: f32) -> Result<Self, AnalysisError> {
        if left.len() != right.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Channel length mismatch: left={}, right={}",
                left.len(),
                right.len()
            )));
        }
        if sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid sample rate: {}",
                sample_rate
            )));
        }
        Ok(Self {
            left,
            right,
            sample_rate,
        })
    }

    /// Build a capture buffer from a single mono channel (duplicated to both sides).
    pub fn from_mono(samples: Vec<f32>, sample_rate: f32) -> Result<Self, AnalysisError> {
        let right = samples.clone();
        Self::new(samples, right, sample_rate)
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if no samples were captured.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Capture duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.len() as f32 / self.sample_rate
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }
}
