//! Result set published by a completed run

use serde::{Deserialize, Serialize};

use crate::features::onset::OnsetEvent;

/// Musical key: tonic pitch class plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u8),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u8),
}

/// Pitch class names, sharps convention
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl Key {
    /// Tonic pitch class (0 = C, ..., 11 = B).
    pub fn tonic(&self) -> u8 {
        match self {
            Key::Major(t) | Key::Minor(t) => *t % 12,
        }
    }

    /// Display label, e.g. "C major" or "F# minor".
    pub fn name(&self) -> String {
        let tonic = NOTE_NAMES[self.tonic() as usize];
        match self {
            Key::Major(_) => format!("{} major", tonic),
            Key::Minor(_) => format!("{} minor", tonic),
        }
    }

    /// Root triad as MIDI notes, tonic placed in octave 4 (C4 = 60).
    ///
    /// Major: root, +4, +7. Minor: root, +3, +7.
    pub fn chord_tones(&self) -> [u8; 3] {
        let root = 60 + self.tonic();
        match self {
            Key::Major(_) => [root, root + 4, root + 7],
            Key::Minor(_) => [root, root + 3, root + 7],
        }
    }
}

/// Outcome of the key estimation stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEstimate {
    /// A key was detected
    Detected(Key),
    /// The capture was silent or atonal; not an error
    Unknown,
    /// The stage was disabled
    #[default]
    Skipped,
}

impl KeyEstimate {
    /// Display label for the host ("C major", "Unknown", "-").
    pub fn label(&self) -> String {
        match self {
            KeyEstimate::Detected(key) => key.name(),
            KeyEstimate::Unknown => "Unknown".to_string(),
            KeyEstimate::Skipped => "-".to_string(),
        }
    }
}

/// Detected onsets per drum band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandOnsets {
    /// Kick band onsets, strictly increasing offsets
    pub kick: Vec<OnsetEvent>,
    /// Snare band onsets, strictly increasing offsets
    pub snare: Vec<OnsetEvent>,
    /// Hihat band onsets, strictly increasing offsets
    pub hihat: Vec<OnsetEvent>,
}

/// Which MIDI clips were durably written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFlags {
    /// kick.mid exists
    pub kick: bool,
    /// snare.mid exists
    pub snare: bool,
    /// hihat.mid exists
    pub hihat: bool,
    /// chord.mid exists
    pub chord: bool,
}

/// Complete result set of one run
///
/// Written only by the worker, published by the `completed` flag; observers
/// must not read any field until `completed` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// BPM estimate; 0.0 when undetected or the stage was disabled
    pub bpm: f32,

    /// Key estimation outcome
    pub key: KeyEstimate,

    /// Root triad MIDI notes; `None` when the key is unknown or skipped
    pub chord: Option<[u8; 3]>,

    /// Per-band onset lists
    pub onsets: BandOnsets,

    /// Clip availability flags
    pub clips: ClipFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Major(0).name(), "C major");
        assert_eq!(Key::Minor(9).name(), "A minor");
        assert_eq!(Key::Major(6).name(), "F# major");
        assert_eq!(Key::Minor(11).name(), "B minor");
    }

    #[test]
    fn test_chord_tones_major() {
        assert_eq!(Key::Major(0).chord_tones(), [60, 64, 67]); // C E G
        assert_eq!(Key::Major(7).chord_tones(), [67, 71, 74]); // G B D
    }

    #[test]
    fn test_chord_tones_minor() {
        assert_eq!(Key::Minor(9).chord_tones(), [69, 72, 76]); // A C E
        assert_eq!(Key::Minor(0).chord_tones(), [60, 63, 67]); // C Eb G
    }

    #[test]
    fn test_key_estimate_labels() {
        assert_eq!(KeyEstimate::Detected(Key::Major(2)).label(), "D major");
        assert_eq!(KeyEstimate::Unknown.label(), "Unknown");
        assert_eq!(KeyEstimate::Skipped.label(), "-");
    }
}
