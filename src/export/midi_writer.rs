//! Standard MIDI File assembly
//!
//! Single-track (format 0) files at 480 PPQ. Every clip starts with one
//! global tempo meta-event; timing converts sample offsets to ticks through
//! `seconds * bpm / 60 * PPQ`.

use std::path::Path;

use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use super::{
    CHORD_CHANNEL, CHORD_NOTE_TICKS, DRUM_CHANNEL, DRUM_NOTE_TICKS, FALLBACK_BPM,
    TICKS_PER_QUARTER,
};
use crate::error::AnalysisError;
use crate::features::onset::OnsetEvent;

/// An absolute-time note boundary, before delta conversion
struct NoteBoundary {
    tick: u32,
    /// Note-offs sort before note-ons at the same tick so back-to-back
    /// repeats of one drum note never cancel each other
    is_on: bool,
    note: u8,
    velocity: u8,
}

/// Write one drum clip: a tempo event plus one note-on/off pair per onset.
///
/// Velocity is the onset strength normalized against the loudest onset in
/// the list, mapped onto the full MIDI range.
///
/// # Arguments
///
/// * `onsets` - Detected onsets for one band (callers skip empty lists)
/// * `midi_note` - General MIDI drum note number for the band
/// * `bpm` - Detected tempo; 0.0 selects the 120 BPM fallback
/// * `sample_rate` - Capture sample rate, for offset-to-seconds conversion
/// * `dest` - Output `.mid` path
///
/// # Errors
///
/// Returns `AnalysisError::MidiWrite` when the destination cannot be
/// written. Callers treat this as non-fatal.
pub fn write_drum_clip(
    onsets: &[OnsetEvent],
    midi_note: u8,
    bpm: f32,
    sample_rate: f32,
    dest: &Path,
) -> Result<(), AnalysisError> {
    let bpm = effective_bpm(bpm);
    let max_strength = onsets.iter().map(|o| o.strength).fold(0.0f32, f32::max);

    let mut boundaries = Vec::with_capacity(onsets.len() * 2);
    for onset in onsets {
        let seconds = onset.sample_offset as f32 / sample_rate;
        let tick = (seconds * bpm / 60.0 * TICKS_PER_QUARTER as f32).round() as u32;

        let normalized = if max_strength > 0.0 {
            onset.strength / max_strength
        } else {
            0.0
        };
        let velocity = 1 + (normalized * 126.0).round() as u8;

        boundaries.push(NoteBoundary {
            tick,
            is_on: true,
            note: midi_note,
            velocity,
        });
        boundaries.push(NoteBoundary {
            tick: tick + DRUM_NOTE_TICKS,
            is_on: false,
            note: midi_note,
            velocity: 0,
        });
    }

    write_clip(boundaries, bpm, DRUM_CHANNEL, dest)
}

/// Write the root chord clip: three simultaneous notes held for one bar.
///
/// # Errors
///
/// Returns `AnalysisError::MidiWrite` when the destination cannot be
/// written. Callers treat this as non-fatal.
pub fn write_chord_clip(chord: [u8; 3], bpm: f32, dest: &Path) -> Result<(), AnalysisError> {
    let bpm = effective_bpm(bpm);

    let mut boundaries = Vec::with_capacity(6);
    for &note in &chord {
        boundaries.push(NoteBoundary {
            tick: 0,
            is_on: true,
            note,
            velocity: 96,
        });
        boundaries.push(NoteBoundary {
            tick: CHORD_NOTE_TICKS,
            is_on: false,
            note,
            velocity: 0,
        });
    }

    write_clip(boundaries, bpm, CHORD_CHANNEL, dest)
}

fn effective_bpm(bpm: f32) -> f32 {
    if bpm > 0.0 {
        bpm
    } else {
        FALLBACK_BPM
    }
}

/// Sort boundaries, convert to delta time, and save a format-0 SMF.
fn write_clip(
    mut boundaries: Vec<NoteBoundary>,
    bpm: f32,
    channel: u8,
    dest: &Path,
) -> Result<(), AnalysisError> {
    boundaries.sort_by_key(|b| (b.tick, b.is_on));

    let mut track = Vec::with_capacity(boundaries.len() + 2);

    let microseconds_per_quarter = (60_000_000.0 / bpm).round() as u32;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(microseconds_per_quarter))),
    });

    let mut last_tick = 0u32;
    for boundary in &boundaries {
        let delta = boundary.tick - last_tick;
        last_tick = boundary.tick;

        let message = if boundary.is_on {
            MidiMessage::NoteOn {
                key: u7::new(boundary.note.min(127)),
                vel: u7::new(boundary.velocity.min(127)),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(boundary.note.min(127)),
                vel: u7::new(0),
            }
        };

        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(channel.min(15)),
                message,
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ),
        tracks: vec![track],
    };

    smf.save(dest)
        .map_err(|e| AnalysisError::MidiWrite(format!("{}: {}", dest.display(), e)))?;

    log::debug!("Wrote MIDI clip {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::KICK_NOTE;

    fn onset(sample_offset: usize, strength: f32) -> OnsetEvent {
        OnsetEvent {
            sample_offset,
            strength,
        }
    }

    /// Decode note-on ticks and the tempo event back out of a written file
    fn read_clip(path: &Path) -> (u32, Vec<(u32, u8, u8)>) {
        let data = std::fs::read(path).unwrap();
        let smf = Smf::parse(&data).unwrap();
        assert_eq!(smf.tracks.len(), 1);

        let mut tempo = 0u32;
        let mut note_ons = Vec::new();
        let mut tick = 0u32;

        for event in &smf.tracks[0] {
            tick += event.delta.as_int();
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(us)) => tempo = us.as_int(),
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } => note_ons.push((tick, key.as_int(), vel.as_int())),
                _ => {}
            }
        }
        (tempo, note_ons)
    }

    #[test]
    fn test_drum_clip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("kick.mid");

        let sample_rate = 44100.0;
        let bpm = 120.0;
        let onsets = vec![
            onset(22050, 0.5),
            onset(44100, 1.0),
            onset(66150, 0.25),
        ];

        write_drum_clip(&onsets, KICK_NOTE, bpm, sample_rate, &dest).unwrap();
        let (tempo, note_ons) = read_clip(&dest);

        assert_eq!(tempo, 500_000); // 120 BPM
        assert_eq!(note_ons.len(), onsets.len());

        // Decode ticks back to sample offsets; one tick at 120 BPM / 480 PPQ
        // is ~46 samples at 44.1 kHz
        let samples_per_tick = 60.0 / bpm / TICKS_PER_QUARTER as f32 * sample_rate;
        for ((tick, note, _vel), original) in note_ons.iter().zip(&onsets) {
            assert_eq!(*note, KICK_NOTE);
            let decoded = *tick as f32 * samples_per_tick;
            assert!(
                (decoded - original.sample_offset as f32).abs() <= samples_per_tick,
                "Decoded {} samples, expected {}",
                decoded,
                original.sample_offset
            );
        }
    }

    #[test]
    fn test_drum_clip_velocity_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("snare.mid");

        let onsets = vec![onset(0, 1.0), onset(44100, 0.5)];
        write_drum_clip(&onsets, 38, 100.0, 44100.0, &dest).unwrap();

        let (_, note_ons) = read_clip(&dest);
        assert_eq!(note_ons[0].2, 127, "Loudest onset maps to full velocity");
        assert_eq!(note_ons[1].2, 64, "Half strength maps to mid velocity");
    }

    #[test]
    fn test_drum_clip_bpm_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("hihat.mid");

        write_drum_clip(&[onset(0, 1.0)], 42, 0.0, 44100.0, &dest).unwrap();
        let (tempo, _) = read_clip(&dest);
        assert_eq!(tempo, 500_000, "Undetected BPM falls back to 120");
    }

    #[test]
    fn test_chord_clip_three_simultaneous_notes() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("chord.mid");

        write_chord_clip([60, 64, 67], 120.0, &dest).unwrap();
        let (_, note_ons) = read_clip(&dest);

        assert_eq!(note_ons.len(), 3);
        assert!(note_ons.iter().all(|(tick, _, _)| *tick == 0));
        let notes: Vec<u8> = note_ons.iter().map(|(_, n, _)| *n).collect();
        assert_eq!(notes, vec![60, 64, 67]);
    }

    #[test]
    fn test_write_to_bad_path_is_error() {
        let result = write_drum_clip(
            &[onset(0, 1.0)],
            36,
            120.0,
            44100.0,
            Path::new("/nonexistent-dir/kick.mid"),
        );
        assert!(matches!(result, Err(AnalysisError::MidiWrite(_))));
    }
}
