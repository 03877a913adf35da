//! Shared run state
//!
//! A small set of lock-free scalar fields forming the progress/result
//! channel between the worker and any observer. Every field has exactly one
//! writing side: the worker owns `step`, `progress`, `error` and
//! `completed`; the observer owns `cancel_requested`. That single-writer
//! discipline is what makes the plain atomics sufficient.
//!
//! `completed` is the only publication gate: the worker writes every result
//! field before storing it (release), and observers must see it true
//! (acquire) before reading results.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Ordinal stage indicator for observer display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Step {
    /// No run in progress yet
    Idle = 0,
    /// Tempo estimation
    Tempo = 1,
    /// Key estimation
    Key = 2,
    /// Per-band onset detection
    Onsets = 3,
    /// MIDI clip serialization
    Serialize = 4,
    /// Terminal state
    Done = 5,
}

impl Step {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Step::Tempo,
            2 => Step::Key,
            3 => Step::Onsets,
            4 => Step::Serialize,
            5 => Step::Done,
            _ => Step::Idle,
        }
    }

    /// Host-facing label for the stage.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Idle => "Idle",
            Step::Tempo => "Detecting BPM...",
            Step::Key => "Detecting key...",
            Step::Onsets => "Detecting drums...",
            Step::Serialize => "Writing MIDI...",
            Step::Done => "Done",
        }
    }
}

/// Terminal error classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Run completed normally (empty results are still success)
    None = 0,
    /// Capture shorter than the minimum analysis duration; no DSP ran
    BufferTooShort = 1,
    /// Zero samples captured
    Empty = 2,
    /// Host requested cancellation mid-run
    Cancelled = 3,
}

impl ErrorCode {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ErrorCode::BufferTooShort,
            2 => ErrorCode::Empty,
            3 => ErrorCode::Cancelled,
            _ => ErrorCode::None,
        }
    }
}

/// Lock-free progress/result channel between worker and observer
#[derive(Debug)]
pub struct RunState {
    step: AtomicU8,
    progress: AtomicU8,
    error: AtomicU8,
    cancel_requested: AtomicBool,
    completed: AtomicBool,
}

impl RunState {
    /// Fresh state in the `Idle` position.
    pub fn new() -> Self {
        Self {
            step: AtomicU8::new(Step::Idle as u8),
            progress: AtomicU8::new(0),
            error: AtomicU8::new(ErrorCode::None as u8),
            cancel_requested: AtomicBool::new(false),
            completed: AtomicBool::new(false),
        }
    }

    /// Reset to initial values at the start of a run.
    pub(crate) fn reset(&self) {
        self.step.store(Step::Idle as u8, Ordering::Relaxed);
        self.progress.store(0, Ordering::Relaxed);
        self.error.store(ErrorCode::None as u8, Ordering::Relaxed);
        self.completed.store(false, Ordering::Release);
    }

    /// Current stage.
    pub fn step(&self) -> Step {
        Step::from_u8(self.step.load(Ordering::Relaxed))
    }

    /// Progress in percent, monotonically non-decreasing within a run.
    pub fn progress_percent(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    /// Terminal error classification; meaningful once completed.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_u8(self.error.load(Ordering::Relaxed))
    }

    /// True once all result fields are final and safe to read.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    /// Observer-side: ask the worker to stop at its next checkpoint.
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Relaxed);
    }

    /// Worker-side cancellation poll.
    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Relaxed)
    }

    pub(crate) fn set_step(&self, step: Step) {
        self.step.store(step as u8, Ordering::Relaxed);
    }

    /// Raise progress; lower values are ignored so progress never runs
    /// backwards within a run.
    pub(crate) fn set_progress(&self, percent: u8) {
        self.progress.fetch_max(percent.min(100), Ordering::Relaxed);
    }

    /// Publish the terminal state. Must be the last store of the run.
    pub(crate) fn finish(&self, error: ErrorCode) {
        self.error.store(error as u8, Ordering::Relaxed);
        self.completed.store(true, Ordering::Release);
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
