//! Word-level stress and intonation.
//!
//! Assigns one stressed syllable per word and, for every phoneme, a target
//! fundamental frequency plus duration/amplitude scale factors from a
//! declination-line model: pitch starts near a peak and drifts toward a
//! floor across the word, the stressed phoneme is pinned to the peak and
//! lengthened, reduced vowels are squeezed, and word-final vowels get
//! phrase-final lengthening. Interrogative utterances add a terminal rise.

use super::phoneme::Phoneme;

/// Per-phoneme prosodic targets, computed once per word and consumed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProsodyEntry {
    /// Target fundamental frequency in Hz.
    pub pitch_hz: f64,
    /// Multiplier on the coarticulated duration.
    pub duration_scale: f64,
    /// Multiplier on the coarticulated amplitude.
    pub amp_scale: f64,
}

impl ProsodyEntry {
    /// Neutral prosody at the given pitch.
    pub fn neutral(pitch_hz: f64) -> Self {
        Self {
            pitch_hz,
            duration_scale: 1.0,
            amp_scale: 1.0,
        }
    }
}

const PEAK_FACTOR: f64 = 1.10;
const FLOOR_FACTOR: f64 = 0.72;
const PITCH_FLOOR_HZ: f64 = 70.0;
const CEIL_FACTOR: f64 = 1.40;

const STRESSED_DURATION: f64 = 1.35;
const STRESSED_AMP: f64 = 1.18;
const UNSTRESSED_DURATION: f64 = 0.78;
const UNSTRESSED_AMP: f64 = 0.88;
const REDUCED_DURATION: f64 = 0.60;
const REDUCED_AMP: f64 = 0.72;
const FINAL_LENGTHENING: f64 = 1.15;

/// Lax vowels that surrender two-vowel-word stress to the first syllable.
fn is_reduced_quality(ph: Phoneme) -> bool {
    matches!(ph, Phoneme::Ih | Phoneme::Uh | Phoneme::Er)
}

/// Tense nuclei that attract final stress in longer words.
fn is_strong_quality(ph: Phoneme) -> bool {
    use Phoneme::*;
    matches!(ph, Iy | Uw | Ey1 | Ay1 | Aw1 | Ow1 | Oy1)
}

/// Pick the stressed phoneme index for a word.
///
/// Counts full (non-reduced, non-glide-half, non-syllabic) vowels:
/// one vowel takes the stress; of two, the first is stressed unless the
/// second is a strong closing nucleus; three or more default to the
/// second-from-last, promoted to the last when it is a strong quality.
/// Words with no countable vowel fall back to the first vowel-class
/// phoneme, or index 0.
pub fn stress_index(phones: &[Phoneme]) -> usize {
    let full: Vec<usize> = phones
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_full_vowel())
        .map(|(i, _)| i)
        .collect();

    match full.len() {
        0 => phones.iter().position(|p| p.is_vowel()).unwrap_or(0),
        1 => full[0],
        2 => {
            if is_reduced_quality(phones[full[1]]) || !is_strong_quality(phones[full[1]]) {
                full[0]
            } else {
                full[1]
            }
        }
        n => {
            if is_strong_quality(phones[full[n - 1]]) {
                full[n - 1]
            } else {
                full[n - 2]
            }
        }
    }
}

/// Assign prosody for a whole word.
///
/// `interrogative` adds a progressive pitch rise over the final ~12% of the
/// word's phonemes (question intonation).
pub fn assign(phones: &[Phoneme], base_pitch_hz: f64, interrogative: bool) -> Vec<ProsodyEntry> {
    let n = phones.len();
    if n == 0 {
        return Vec::new();
    }

    let peak = base_pitch_hz * PEAK_FACTOR;
    let floor = (base_pitch_hz * FLOOR_FACTOR).max(PITCH_FLOOR_HZ);
    let ceiling = base_pitch_hz * CEIL_FACTOR;
    let stressed = stress_index(phones);

    let rise_count = if interrogative {
        ((n as f64 * 0.12).ceil() as usize).clamp(1, n)
    } else {
        0
    };

    let mut entries = Vec::with_capacity(n);
    for (i, &ph) in phones.iter().enumerate() {
        // Linear declination from peak to floor across the word
        let progress = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        let mut pitch = peak - (peak - floor) * progress;
        let mut duration_scale = 1.0;
        let mut amp_scale = 1.0;

        // Schwa is reduced unconditionally, even under fallback stress
        if ph.is_reduced() {
            duration_scale = REDUCED_DURATION;
            amp_scale = REDUCED_AMP;
        } else if i == stressed {
            pitch = peak;
            duration_scale = STRESSED_DURATION;
            amp_scale = STRESSED_AMP;
        } else if ph.is_full_vowel() {
            duration_scale = UNSTRESSED_DURATION;
            amp_scale = UNSTRESSED_AMP;
            pitch *= 0.97;
        }

        // Phrase-final lengthening on trailing vowel-class phonemes
        if i + 2 >= n && ph.is_vowel() {
            duration_scale *= FINAL_LENGTHENING;
        }

        // Question intonation: progressive terminal rise
        if rise_count > 0 && i + rise_count >= n {
            let step = (i + rise_count - (n - 1)) as f64 / rise_count as f64;
            pitch += base_pitch_hz * 0.35 * step;
        }

        entries.push(ProsodyEntry {
            pitch_hz: pitch.clamp(floor, ceiling),
            duration_scale,
            amp_scale,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use Phoneme::*;

    #[test]
    fn single_vowel_takes_the_stress() {
        // "cat": the lone vowel at index 1
        assert_eq!(stress_index(&[K, Ae, T]), 1);
    }

    #[test]
    fn glide_halves_do_not_count_as_nuclei() {
        // One diphthong = one countable vowel, stressed at its onset
        assert_eq!(stress_index(&[B, Ay1, Ay2, T]), 1);
    }

    #[test]
    fn two_vowel_words_prefer_the_first() {
        // "habit"-shaped: lax second vowel yields initial stress
        assert_eq!(stress_index(&[Hh, Ae, B, Ih, T]), 1);
        // Strong closing nucleus attracts the stress
        assert_eq!(stress_index(&[B, Ah, L, Uw, N]), 3);
    }

    #[test]
    fn words_without_vowels_fall_back() {
        assert_eq!(stress_index(&[S, T]), 0);
        // Syllabic nucleus is found by the vowel-class fallback
        assert_eq!(stress_index(&[T, En]), 1);
    }

    #[test]
    fn stressed_phoneme_is_pinned_to_the_peak() {
        let phones = [K, Ae, T, S];
        let entries = assign(&phones, 120.0, false);
        let stressed = entries[1];
        assert_eq!(stressed.pitch_hz, 120.0 * PEAK_FACTOR);
        assert_eq!(stressed.duration_scale, STRESSED_DURATION);
        assert_eq!(stressed.amp_scale, STRESSED_AMP);
    }

    #[test]
    fn reduced_vowels_are_squeezed() {
        let phones = [Dh, Ax];
        let entries = assign(&phones, 120.0, false);
        // The schwa draws fallback stress but stays reduced
        assert_eq!(entries[1].duration_scale, REDUCED_DURATION * FINAL_LENGTHENING);
        assert_eq!(entries[1].amp_scale, REDUCED_AMP);
    }

    #[test]
    fn declination_falls_across_unstressed_consonants() {
        let phones = [S, T, R, Ih, K, T, S];
        let entries = assign(&phones, 120.0, false);
        assert!(entries[0].pitch_hz > entries[6].pitch_hz);
    }

    #[test]
    fn all_pitches_stay_within_bounds() {
        let phones = [K, Ae, T, S, Ax, N, Iy];
        for interrogative in [false, true] {
            for entry in assign(&phones, 120.0, interrogative) {
                assert!(entry.pitch_hz >= (120.0 * FLOOR_FACTOR).max(PITCH_FLOOR_HZ));
                assert!(entry.pitch_hz <= 120.0 * CEIL_FACTOR);
            }
        }
    }

    #[test]
    fn questions_end_higher_than_statements() {
        let phones = [W, Ah, T, Ih, Z, Dh, Ae, T];
        let flat = assign(&phones, 120.0, false);
        let rising = assign(&phones, 120.0, true);
        assert!(rising.last().expect("nonempty").pitch_hz > flat.last().expect("nonempty").pitch_hz);
    }
}
