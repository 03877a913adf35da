//! Feature extraction modules
//!
//! The three independent musical descriptors:
//! - Tempo (OSS + generalized autocorrelation)
//! - Key (chromagram + Krumhansl template correlation)
//! - Drum onsets (per-band adaptive energy picker)

pub mod key;
pub mod onset;
pub mod tempo;
