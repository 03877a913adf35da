//! Key detection
//!
//! Correlates the normalized pitch-class profile against the 24 Krumhansl
//! templates (12 rotations x 2 modes) and picks the best Pearson score.

use super::templates::KeyTemplates;
use crate::analysis::result::Key;

/// Near-zero norm guard: below this the capture is silent or atonal noise
const MIN_PCP_NORM: f32 = 1e-6;

/// Detect the key from an accumulated pitch-class profile.
///
/// The profile is normalized to unit Euclidean norm, then each of the 24
/// (rotation, template) candidates is scored with Pearson correlation; the
/// best score wins.
///
/// # Arguments
///
/// * `pcp` - Accumulated 12-bin pitch-class profile (unnormalized)
/// * `templates` - Krumhansl reference profiles
///
/// # Returns
///
/// `Some(key)` for tonal input, `None` when the profile norm is near zero
/// (silence guard) - an "Unknown" key, not an error
pub fn detect_key(pcp: &[f32; 12], templates: &KeyTemplates) -> Option<Key> {
    let norm = pcp.iter().map(|&v| v * v).sum::<f32>().sqrt();
    if norm < MIN_PCP_NORM {
        log::debug!("PCP norm {:.2e} below threshold, key unknown", norm);
        return None;
    }

    let mut normalized = [0.0f32; 12];
    for (dst, &src) in normalized.iter_mut().zip(pcp.iter()) {
        *dst = src / norm;
    }

    let mut best_key = Key::Major(0);
    let mut best_score = f32::NEG_INFINITY;

    for tonic in 0..12 {
        let major_score = pearson(&normalized, templates.major(tonic));
        if major_score > best_score {
            best_score = major_score;
            best_key = Key::Major(tonic as u8);
        }

        let minor_score = pearson(&normalized, templates.minor(tonic));
        if minor_score > best_score {
            best_score = minor_score;
            best_key = Key::Minor(tonic as u8);
        }
    }

    log::debug!("Detected key {} (r = {:.4})", best_key.name(), best_score);

    Some(best_key)
}

/// Pearson correlation coefficient between two 12-element profiles.
fn pearson(a: &[f32; 12], b: &[f32; 12]) -> f32 {
    let mean_a = a.iter().sum::<f32>() / 12.0;
    let mean_b = b.iter().sum::<f32>() / 12.0;

    let mut cov = 0.0f32;
    let mut var_a = 0.0f32;
    let mut var_b = 0.0f32;

    for i in 0..12 {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        cov / denom
    }
}
