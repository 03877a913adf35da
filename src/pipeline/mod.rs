//! Pipeline orchestration
//!
//! Runs the four analysis stages in order on one background worker:
//! tempo, key, band onsets, MIDI serialization. Between every sub-step the
//! worker polls the cancellation flag and aborts cooperatively; there is no
//! mid-stage rollback beyond "stop now".
//!
//! State machine: `Idle -> Validating -> Tempo -> Key -> Onsets ->
//! Serialize -> Done`, with a side exit to `Cancelled` from every
//! checkpoint and `BufferTooShort`/`Empty` out of validation.

pub mod state;

pub use state::{ErrorCode, RunState, Step};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::analysis::result::{KeyEstimate, ResultSet};
use crate::capture::{CaptureBuffer, MIN_CAPTURE_SECONDS};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::export::{
    write_chord_clip, write_drum_clip, HIHAT_NOTE, KICK_NOTE, SNARE_NOTE,
};
use crate::features::key::{
    compute_pitch_class_profile, detect_key, KeyTemplates, CHROMA_FRAME_SIZE, CHROMA_HOP_SIZE,
    PRE_FILTER_CUTOFF_HZ,
};
use crate::features::onset::{
    detect_band_onsets, OnsetTuning, HIHAT_MIN_GAP_MS, KICK_MIN_GAP_MS, SNARE_MIN_GAP_MS,
};
use crate::features::tempo::{
    estimate_bpm, onset_strength_signal, MAX_BPM, MIN_BPM, OSS_FRAME_SIZE, OSS_HOP_SIZE,
};
use crate::preprocessing::channel_mixer::downmix_mono;
use crate::preprocessing::filters::high_pass_single_pole;

/// Entry point for starting analysis runs
pub struct Analyzer;

impl Analyzer {
    /// Spawn the analysis worker for one run.
    ///
    /// The capture must be finalized (capture-inactive) before this is
    /// called; the worker only ever reads it.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyCapture` for a zero-sample buffer; the
    /// request is rejected on the calling thread without spawning a worker.
    pub fn start(
        buffer: Arc<CaptureBuffer>,
        config: AnalysisConfig,
    ) -> Result<AnalysisHandle, AnalysisError> {
        if buffer.is_empty() {
            return Err(AnalysisError::EmptyCapture);
        }

        let state = Arc::new(RunState::new());
        let worker_state = Arc::clone(&state);

        let worker = thread::Builder::new()
            .name("loopscout-analysis".to_string())
            .spawn(move || run(&buffer, &config, &worker_state))
            .map_err(|e| {
                AnalysisError::InvalidInput(format!("Failed to spawn analysis worker: {}", e))
            })?;

        Ok(AnalysisHandle {
            state,
            worker: Some(worker),
        })
    }
}

/// Handle to a running (or finished) analysis
///
/// Dropping the handle cancels the run and joins the worker, so overlapping
/// runs cannot exist: starting a new analysis requires giving this one up.
#[derive(Debug)]
pub struct AnalysisHandle {
    state: Arc<RunState>,
    worker: Option<JoinHandle<ResultSet>>,
}

impl AnalysisHandle {
    /// Shared run state for polling progress at UI cadence.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// True once results are final; the only gate observers may trust.
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Current progress in percent.
    pub fn progress_percent(&self) -> u8 {
        self.state.progress_percent()
    }

    /// Terminal error classification; meaningful once completed.
    pub fn error_code(&self) -> ErrorCode {
        self.state.error_code()
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn request_cancel(&self) {
        self.state.request_cancel();
    }

    /// Join the worker and take the result set.
    ///
    /// Blocks until the worker finishes; after `is_completed()` returns
    /// true the join is immediate.
    pub fn join(mut self) -> ResultSet {
        self.join_inner()
    }

    /// Join the worker, mapping the terminal error code to `AnalysisError`.
    ///
    /// A cancelled or too-short run becomes an `Err`; empty results from a
    /// normally completed run are still `Ok` (silence is valid input).
    ///
    /// # Errors
    ///
    /// `AnalysisError::Cancelled`, `AnalysisError::BufferTooShort` or
    /// `AnalysisError::EmptyCapture`, matching the run's `ErrorCode`.
    pub fn try_join(mut self) -> Result<ResultSet, AnalysisError> {
        let result = self.join_inner();
        match self.state.error_code() {
            ErrorCode::None => Ok(result),
            ErrorCode::BufferTooShort => Err(AnalysisError::BufferTooShort),
            ErrorCode::Empty => Err(AnalysisError::EmptyCapture),
            ErrorCode::Cancelled => Err(AnalysisError::Cancelled),
        }
    }

    fn join_inner(&mut self) -> ResultSet {
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or_else(|_| {
                log::warn!("Analysis worker panicked; returning empty results");
                ResultSet::default()
            }),
            None => ResultSet::default(),
        }
    }
}

impl Drop for AnalysisHandle {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.state.request_cancel();
            let _ = worker.join();
        }
    }
}

/// Execute the full pipeline on the calling thread.
///
/// This is the worker body; it is public so hosts and tests can run the
/// pipeline synchronously with a caller-owned `RunState`. All result fields
/// are written before `completed` is published.
pub fn run(buffer: &CaptureBuffer, config: &AnalysisConfig, state: &RunState) -> ResultSet {
    state.reset();
    let mut result = ResultSet::default();
    let sample_rate = buffer.sample_rate();

    // Validation: fail fast before any DSP
    if buffer.is_empty() {
        log::warn!("Zero samples captured, nothing to analyze");
        state.set_step(Step::Done);
        state.finish(ErrorCode::Empty);
        return result;
    }

    let min_samples = (sample_rate * MIN_CAPTURE_SECONDS) as usize;
    if buffer.len() < min_samples {
        log::warn!(
            "Capture too short: {} samples, need {}",
            buffer.len(),
            min_samples
        );
        state.set_step(Step::Done);
        state.finish(ErrorCode::BufferTooShort);
        return result;
    }

    log::debug!(
        "Analysis started: {} samples at {} Hz ({:.1} s)",
        buffer.len(),
        sample_rate,
        buffer.duration_seconds()
    );

    // Stage 1: tempo
    if cancelled(state) {
        return result;
    }
    state.set_step(Step::Tempo);
    state.set_progress(5);

    if config.detect_bpm {
        let mono = downmix_mono(buffer);
        let oss = onset_strength_signal(&mono, OSS_FRAME_SIZE, OSS_HOP_SIZE);
        state.set_progress(15);

        if cancelled(state) {
            return result;
        }

        let raw_bpm = estimate_bpm(&oss, sample_rate, OSS_HOP_SIZE, MIN_BPM, MAX_BPM);
        result.bpm = raw_bpm * config.bpm_multiplier.factor();
        log::debug!("BPM detected: {:.1}", result.bpm);
    }
    state.set_progress(25);

    // Stage 2: key
    if cancelled(state) {
        return result;
    }
    state.set_step(Step::Key);

    if config.detect_key {
        let mut mono = downmix_mono(buffer);
        high_pass_single_pole(&mut mono, PRE_FILTER_CUTOFF_HZ, sample_rate);
        state.set_progress(30);

        let mut poll = || state.cancel_requested();
        match compute_pitch_class_profile(
            &mono,
            sample_rate,
            CHROMA_FRAME_SIZE,
            CHROMA_HOP_SIZE,
            &mut poll,
        ) {
            None => {
                // Cancellation fired inside the frame loop
                state.finish(ErrorCode::Cancelled);
                return result;
            }
            Some(pcp) => {
                state.set_progress(45);
                let templates = KeyTemplates::new();
                match detect_key(&pcp, &templates) {
                    Some(key) => {
                        result.chord = Some(key.chord_tones());
                        result.key = KeyEstimate::Detected(key);
                        log::debug!("Key detected: {}", key.name());
                    }
                    None => {
                        result.key = KeyEstimate::Unknown;
                        log::debug!("Key unknown (silent or atonal capture)");
                    }
                }
            }
        }
    }
    state.set_progress(50);

    // Stage 3: band onsets
    if cancelled(state) {
        return result;
    }
    state.set_step(Step::Onsets);

    let tuning = OnsetTuning {
        threshold_sigma: config.onset_threshold_sigma,
        floor_base: config.onset_floor_base,
        floor_range: config.onset_floor_range,
    };

    if config.detect_kick {
        let mut mono = downmix_mono(buffer);
        result.onsets.kick =
            detect_band_onsets(&mut mono, sample_rate, &config.kick, KICK_MIN_GAP_MS, &tuning);
    }
    state.set_progress(58);
    if cancelled(state) {
        return result;
    }

    if config.detect_snare {
        let mut mono = downmix_mono(buffer);
        result.onsets.snare = detect_band_onsets(
            &mut mono,
            sample_rate,
            &config.snare,
            SNARE_MIN_GAP_MS,
            &tuning,
        );
    }
    state.set_progress(66);
    if cancelled(state) {
        return result;
    }

    if config.detect_hihat {
        let mut mono = downmix_mono(buffer);
        result.onsets.hihat = detect_band_onsets(
            &mut mono,
            sample_rate,
            &config.hihat,
            HIHAT_MIN_GAP_MS,
            &tuning,
        );
    }
    state.set_progress(75);

    // Stage 4: MIDI serialization
    if cancelled(state) {
        return result;
    }
    state.set_step(Step::Serialize);

    let clips = [
        (&result.onsets.kick, KICK_NOTE, "kick.mid"),
        (&result.onsets.snare, SNARE_NOTE, "snare.mid"),
        (&result.onsets.hihat, HIHAT_NOTE, "hihat.mid"),
    ];
    let mut written = [false; 3];

    for (i, (onsets, note, filename)) in clips.into_iter().enumerate() {
        if onsets.is_empty() {
            continue;
        }
        let dest = config.clip_dir.join(filename);
        match write_drum_clip(onsets, note, result.bpm, sample_rate, &dest) {
            Ok(()) => written[i] = true,
            Err(e) => log::warn!("Skipping {}: {}", filename, e),
        }
        state.set_progress(80 + 5 * i as u8);
    }
    result.clips.kick = written[0];
    result.clips.snare = written[1];
    result.clips.hihat = written[2];

    if let Some(chord) = result.chord {
        let dest = config.clip_dir.join("chord.mid");
        match write_chord_clip(chord, result.bpm, &dest) {
            Ok(()) => result.clips.chord = true,
            Err(e) => log::warn!("Skipping chord.mid: {}", e),
        }
    }
    state.set_progress(95);

    // Publish: every result field above is written before completed flips
    state.set_step(Step::Done);
    state.set_progress(100);
    state.finish(ErrorCode::None);
    log::debug!("Analysis complete");

    result
}

/// Checkpoint poll; on a positive result the terminal state is published
/// before the caller returns whatever was computed so far.
fn cancelled(state: &RunState) -> bool {
    if state.cancel_requested() {
        log::debug!("Cancellation observed at checkpoint");
        state.finish(ErrorCode::Cancelled);
        true
    } else {
        false
    }
}
