//! Audio preprocessing modules
//!
//! Utilities for preparing the capture for analysis:
//! - Channel mixing (stereo to mono downmix)
//! - Filters (pre-filter high-pass, band-isolation Butterworth biquads)

pub mod channel_mixer;
pub mod filters;
