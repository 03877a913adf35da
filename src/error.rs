//! Error types for the analysis pipeline

use std::fmt;

/// Errors that can occur while starting or running an analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Capture buffer contains zero samples; the run is rejected before a worker is spawned
    EmptyCapture,

    /// Capture buffer is shorter than the minimum analysis duration
    BufferTooShort,

    /// The host requested cancellation mid-run
    Cancelled,

    /// Invalid input parameters (mismatched channel lengths, bad configuration)
    InvalidInput(String),

    /// MIDI clip could not be written; degraded to `clip_available = false`, never fatal
    MidiWrite(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptyCapture => write!(f, "Capture buffer is empty"),
            AnalysisError::BufferTooShort => {
                write!(f, "Capture shorter than the minimum analysis duration")
            }
            AnalysisError::Cancelled => write!(f, "Analysis cancelled"),
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::MidiWrite(msg) => write!(f, "MIDI write failed: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
