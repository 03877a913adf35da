//! # Loopscout
//!
//! An offline audio-loop analysis engine. Feed it a finalized stereo
//! capture and it extracts three independent musical descriptors - tempo
//! (BPM), key (tonic + mode), and per-drum-band onset timing - then
//! serializes the onsets and the root chord into Standard MIDI File clips.
//!
//! ## Features
//!
//! - **Tempo**: onset-strength signal + generalized (phase-discarded)
//!   autocorrelation, 60-200 BPM with a half/double-time multiplier
//! - **Key**: STFT chromagram + Krumhansl template correlation over all
//!   24 major/minor candidates
//! - **Drum onsets**: kick/snare/hihat band isolation with adaptive
//!   thresholding and per-instrument refractory gaps
//! - **MIDI clips**: one General-MIDI drum clip per band plus a root chord
//!   clip, 480 PPQ
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use loopscout::{AnalysisConfig, Analyzer, CaptureBuffer};
//!
//! let capture = Arc::new(CaptureBuffer::from_mono(vec![0.0; 44100 * 4], 44100.0)?);
//! let handle = Analyzer::start(capture, AnalysisConfig::default())?;
//!
//! while !handle.is_completed() {
//!     println!("{}%", handle.progress_percent());
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//!
//! let result = handle.join();
//! println!("BPM: {:.1}, key: {}", result.bpm, result.key.label());
//! # Ok::<(), loopscout::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Capture -> Validate -> Tempo -> Key -> Onsets -> Serialize -> Done
//! ```
//!
//! One background worker runs the stages sequentially and polls a
//! cooperative cancellation flag between every sub-step. Progress and the
//! terminal error code travel through lock-free scalars; results are
//! published once, gated by the `completed` flag.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod pipeline;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{BandOnsets, ClipFlags, Key, KeyEstimate, ResultSet};
pub use capture::{CaptureBuffer, MAX_CAPTURE_SECONDS, MIN_CAPTURE_SECONDS};
pub use config::{AnalysisConfig, BandConfig, BpmMultiplier};
pub use error::AnalysisError;
pub use features::onset::OnsetEvent;
pub use pipeline::{AnalysisHandle, Analyzer, ErrorCode, RunState, Step};
