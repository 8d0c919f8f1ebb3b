//! Context-dependent phoneme adjustment.
//!
//! Derives an ephemeral copy of a phoneme's catalog entry with formants,
//! duration, and amplitude perturbed by its immediate neighbors: formant
//! transitions toward stop loci, pre-voicing vowel lengthening, nasal
//! assimilation, /r/ retroflexion, dark /l/, rounding and palatalization,
//! and /h/ borrowing the following vowel's pattern. Every derived value is
//! clamped to class-specific bounds before it reaches the filter bank; an
//! out-of-range formant would destabilize the resonators.

use super::phoneme::{Phoneme, PhonemeClass, PhonemeDef};

/// Clamp bounds for vowel-class output.
pub const VOWEL_F1: (f64, f64) = (200.0, 1000.0);
pub const VOWEL_F2: (f64, f64) = (500.0, 3000.0);
pub const VOWEL_F3: (f64, f64) = (1200.0, 3500.0);

/// Clamp bounds for consonant-class output (fricative bands reach higher).
pub const CONS_F1: (f64, f64) = (100.0, 4200.0);
pub const CONS_F2: (f64, f64) = (300.0, 7500.0);
pub const CONS_F3: (f64, f64) = (0.0, 3500.0);

/// Duration and amplitude bounds shared by all classes.
pub const DURATION_BOUNDS: (f64, f64) = (0.020, 0.500);
pub const AMP_BOUNDS: (f64, f64) = (0.05, 1.50);

/// F2 target of a dark (velarized) lateral.
const DARK_L_F2: f64 = 950.0;

fn clamp(x: f64, (lo, hi): (f64, f64)) -> f64 {
    x.clamp(lo, hi)
}

/// Second-formant locus of a stop or affricate neighbor, if any.
fn stop_locus(ph: Phoneme) -> Option<f64> {
    if ph.is_affricate() {
        return Some(ph.def().f2);
    }
    ph.stop_place().map(|p| p.locus_hz())
}

/// Build the context-adjusted definition for `cur` between `prev` and `next`.
///
/// The result is consumed immediately by the phone expander and never stored.
pub fn coarticulate(prev: Option<Phoneme>, cur: Phoneme, next: Option<Phoneme>) -> PhonemeDef {
    let mut def = cur.def();
    let prev_def = prev.map(|p| p.def());
    let next_def = next.map(|p| p.def());

    if def.class == PhonemeClass::Vowel {
        // Pre-voiced lengthening, pre-voiceless shortening
        if let (Some(n), Some(nd)) = (next, next_def) {
            if !n.is_vowel() {
                def.duration *= if nd.voiced { 1.18 } else { 0.88 };
            }
        }

        // Stop locus transitions pull F2; the following side dominates
        if let Some(locus) = next.and_then(stop_locus) {
            def.f2 += (locus - def.f2) * 0.15;
        }
        if let Some(locus) = prev.and_then(stop_locus) {
            def.f2 += (locus - def.f2) * 0.10;
        }

        // Nasal neighbors lower the whole pattern
        if prev.is_some_and(Phoneme::is_nasal) || next.is_some_and(Phoneme::is_nasal) {
            def.f1 *= 0.92;
            def.f2 *= 0.96;
            def.f3 *= 0.97;
        }

        // Rhotic coloring: F3 dives, F2 eases down
        let rhotic =
            |p: Option<Phoneme>| matches!(p, Some(Phoneme::R) | Some(Phoneme::Er));
        if rhotic(prev) || rhotic(next) {
            def.f3 *= 0.88;
            def.f2 *= 0.97;
        }

        // Dark /l/ pulls F2 toward the velarized target
        if prev == Some(Phoneme::L) || next == Some(Phoneme::L) {
            def.f2 += (DARK_L_F2 - def.f2) * 0.30;
        }

        // Rounding from /w/, fronting from /j/
        if prev == Some(Phoneme::W) || next == Some(Phoneme::W) {
            def.f1 *= 0.95;
            def.f2 *= 0.92;
        }
        if prev == Some(Phoneme::Y) || next == Some(Phoneme::Y) {
            def.f1 *= 0.95;
            def.f2 += (2100.0 - def.f2) * 0.15;
        }

        def.f1 = clamp(def.f1, VOWEL_F1);
        def.f2 = clamp(def.f2, VOWEL_F2);
        def.f3 = clamp(def.f3, VOWEL_F3);
    } else if cur == Phoneme::Hh {
        // /h/ is a voiceless copy of the following vowel
        if let (Some(n), Some(nd)) = (next, next_def) {
            if n.is_vowel() {
                def.f1 = nd.f1;
                def.f2 = nd.f2;
                def.f3 = nd.f3;
                def.amp = nd.amp * 0.55;
            }
        }
        def.f1 = clamp(def.f1, CONS_F1);
        def.f2 = clamp(def.f2, CONS_F2);
    } else if cur.is_nasal() || cur.is_sonorant() {
        // Sonorant consonants assimilate toward neighbor vowels, the
        // following side weighted more
        if let (Some(n), Some(nd)) = (next, next_def) {
            if n.is_vowel() {
                def.amp *= 1.08;
                def.f1 += (nd.f1 - def.f1) * 0.25;
                def.f2 += (nd.f2 - def.f2) * 0.25;
                if def.f3 > 0.0 && nd.f3 > 0.0 {
                    def.f3 += (nd.f3 - def.f3) * 0.25;
                }
            }
        }
        if let (Some(p), Some(pd)) = (prev, prev_def) {
            if p.is_vowel() {
                def.amp *= 1.04;
                def.f1 += (pd.f1 - def.f1) * 0.15;
                def.f2 += (pd.f2 - def.f2) * 0.15;
            }
        }

        // Coda /l/ darkens when no vowel follows
        if cur == Phoneme::L && !next.is_some_and(Phoneme::is_vowel) {
            def.f2 *= 0.80;
        }

        def.f1 = clamp(def.f1, CONS_F1);
        def.f2 = clamp(def.f2, CONS_F2);
        if def.f3 > 0.0 {
            def.f3 = clamp(def.f3, CONS_F3);
        }
    } else if cur.is_stop() {
        // Locus blends toward an adjacent vowel
        if let (Some(n), Some(nd)) = (next, next_def) {
            if n.is_vowel() {
                def.f2 += (nd.f2 - def.f2) * 0.20;
            }
        }
        if prev.is_some_and(Phoneme::is_vowel) && next.is_some_and(Phoneme::is_vowel) {
            def.amp *= 1.06;
        }
        def.f1 = clamp(def.f1, CONS_F1);
        def.f2 = clamp(def.f2, CONS_F2);
    } else {
        // Remaining fricatives keep their noise bands, bounded
        def.f1 = clamp(def.f1, CONS_F1);
        def.f2 = clamp(def.f2, CONS_F2);
    }

    def.duration = clamp(def.duration, DURATION_BOUNDS);
    def.amp = clamp(def.amp, AMP_BOUNDS);
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::formant::phoneme::ALL;

    #[test]
    fn all_triples_stay_inside_the_clamp_bounds() {
        let neighbors: Vec<Option<Phoneme>> =
            std::iter::once(None).chain(ALL.iter().map(|&p| Some(p))).collect();
        for &prev in &neighbors {
            for &cur in ALL {
                for &next in &neighbors {
                    let d = coarticulate(prev, cur, next);
                    assert!(
                        (DURATION_BOUNDS.0..=DURATION_BOUNDS.1).contains(&d.duration),
                        "duration out of bounds for ({prev:?}, {cur:?}, {next:?})"
                    );
                    assert!(
                        (AMP_BOUNDS.0..=AMP_BOUNDS.1).contains(&d.amp),
                        "amp out of bounds for ({prev:?}, {cur:?}, {next:?})"
                    );
                    if d.class == PhonemeClass::Vowel {
                        assert!((VOWEL_F1.0..=VOWEL_F1.1).contains(&d.f1));
                        assert!((VOWEL_F2.0..=VOWEL_F2.1).contains(&d.f2));
                        assert!((VOWEL_F3.0..=VOWEL_F3.1).contains(&d.f3));
                    } else {
                        assert!((CONS_F1.0..=CONS_F1.1).contains(&d.f1));
                        assert!((CONS_F2.0..=CONS_F2.1).contains(&d.f2));
                    }
                }
            }
        }
    }

    #[test]
    fn vowels_lengthen_before_voiced_codas() {
        let before_voiced = coarticulate(None, Phoneme::Ae, Some(Phoneme::D));
        let before_voiceless = coarticulate(None, Phoneme::Ae, Some(Phoneme::T));
        assert!(before_voiced.duration > before_voiceless.duration);
    }

    #[test]
    fn h_borrows_the_following_vowel() {
        let h = coarticulate(None, Phoneme::Hh, Some(Phoneme::Iy));
        let iy = Phoneme::Iy.def();
        assert_eq!(h.f1, iy.f1);
        assert_eq!(h.f2, iy.f2);
        assert!(h.amp < iy.amp);
        assert_eq!(h.class, PhonemeClass::Fricative);
    }

    #[test]
    fn rhotic_neighbor_lowers_f3() {
        let plain = coarticulate(None, Phoneme::Aa, None);
        let colored = coarticulate(None, Phoneme::Aa, Some(Phoneme::R));
        assert!(colored.f3 < plain.f3);
    }

    #[test]
    fn intervocalic_stops_gain_amplitude() {
        let flanked = coarticulate(Some(Phoneme::Ae), Phoneme::T, Some(Phoneme::Ih));
        let bare = coarticulate(None, Phoneme::T, None);
        assert!(flanked.amp > bare.amp);
    }

    #[test]
    fn coda_l_darkens() {
        let coda = coarticulate(Some(Phoneme::Ih), Phoneme::L, None);
        let onset = coarticulate(None, Phoneme::L, Some(Phoneme::Ih));
        assert!(coda.f2 < onset.f2);
    }
}
