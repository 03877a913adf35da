//! MIDI clip export
//!
//! Serializes onset lists and the detected root chord into Standard MIDI
//! Files the host can drag into an arrangement.

pub mod midi_writer;

pub use midi_writer::{write_chord_clip, write_drum_clip};

/// Tick resolution of the serialized clips (pulses per quarter note)
pub const TICKS_PER_QUARTER: u16 = 480;

/// Fixed drum note length: one 16th
pub const DRUM_NOTE_TICKS: u32 = 120;

/// Fixed chord length: one 4/4 bar
pub const CHORD_NOTE_TICKS: u32 = 1920;

/// Tempo written when BPM detection was disabled or found nothing
pub const FALLBACK_BPM: f32 = 120.0;

/// General MIDI percussion channel (zero-based)
pub const DRUM_CHANNEL: u8 = 9;

/// Channel for the root chord clip
pub const CHORD_CHANNEL: u8 = 0;

/// General MIDI note number: acoustic bass drum
pub const KICK_NOTE: u8 = 36;

/// General MIDI note number: acoustic snare
pub const SNARE_NOTE: u8 = 38;

/// General MIDI note number: closed hihat
pub const HIHAT_NOTE: u8 = 42;
