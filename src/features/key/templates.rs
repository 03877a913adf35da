//! Krumhansl key templates
//!
//! Tonal profiles for the 24 candidate keys (12 major + 12 minor), from the
//! probe-tone experiments of Krumhansl & Kessler.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in
//! Perceived Tonal Organization in a Spatial Representation of Musical Keys.
//! *Psychological Review*, 89(4), 334-368.

/// Major profile rooted at pitch class 0 (C)
const MAJOR_PROFILE: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Minor profile rooted at pitch class 0 (C)
const MINOR_PROFILE: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Reference profiles for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    major: [[f32; 12]; 12],
    minor: [[f32; 12]; 12],
}

impl KeyTemplates {
    /// Build the full rotation table from the two base profiles.
    pub fn new() -> Self {
        let mut major = [[0.0f32; 12]; 12];
        let mut minor = [[0.0f32; 12]; 12];

        for tonic in 0..12 {
            for pc in 0..12 {
                // Rotate so the profile's tonic lands on pitch class `tonic`
                major[tonic][pc] = MAJOR_PROFILE[(pc + 12 - tonic) % 12];
                minor[tonic][pc] = MINOR_PROFILE[(pc + 12 - tonic) % 12];
            }
        }

        Self { major, minor }
    }

    /// Major template with the given tonic pitch class (0 = C, ..., 11 = B).
    pub fn major(&self, tonic: usize) -> &[f32; 12] {
        &self.major[tonic % 12]
    }

    /// Minor template with the given tonic pitch class (0 = C, ..., 11 = B).
    pub fn minor(&self, tonic: usize) -> &[f32; 12] {
        &self.minor[tonic % 12]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}
