//! Key detection modules
//!
//! Detect the musical key of the capture using:
//! - A 100 Hz pre-filter (kick energy suppression)
//! - An STFT chromagram accumulated into a 12-bin pitch-class profile
//! - Krumhansl major/minor template correlation over all 12 rotations

pub mod chromagram;
pub mod detector;
pub mod templates;

pub use chromagram::compute_pitch_class_profile;
pub use detector::detect_key;
pub use templates::KeyTemplates;

/// STFT frame size for chroma extraction, in samples
pub const CHROMA_FRAME_SIZE: usize = 4096;

/// STFT hop size (50% overlap), in samples
pub const CHROMA_HOP_SIZE: usize = 2048;

/// Pre-filter cutoff suppressing kick-drum leakage, in Hz
pub const PRE_FILTER_CUTOFF_HZ: f32 = 100.0;

/// Lowest bin frequency mapped into the chromagram, in Hz
pub const CHROMA_MIN_FREQ_HZ: f32 = 32.0;
