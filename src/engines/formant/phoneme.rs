//! English phoneme inventory and acoustic catalog.
//!
//! Formant targets are male averages adapted from Peterson & Barney and
//! Hillenbrand; durations are scaled to a ~120 wpm baseline. All values are
//! tuning parameters, not contracts; they were chosen by ear against
//! reference recordings and may drift between releases.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Acoustic class of a phoneme, selecting the synthesis strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhonemeClass {
    /// Voiced vowel: three-formant synthesis from a glottal source.
    Vowel,
    /// Voiced/unvoiced consonant: low formants plus a lowpass stage.
    Consonant,
    /// Noisy fricative: bandpass-filtered, high-pass-shaped noise.
    Fricative,
    /// Plosive: burst transient, then voicing murmur or silence.
    Stop,
    /// Pause / silent segment.
    Silence,
}

/// Static acoustic definition of one phoneme.
#[derive(Debug, Clone, Copy)]
pub struct PhonemeDef {
    /// First three formant center frequencies in Hz (f3 may be 0 for
    /// non-vowels, meaning "unused").
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    /// Baseline duration in seconds before prosody and speed scaling.
    pub duration: f64,
    pub class: PhonemeClass,
    /// Relative acoustic prominence; vowels near 1.0, fricatives lower.
    pub amp: f64,
    pub voiced: bool,
}

impl PhonemeDef {
    /// A silent segment of the given duration.
    pub const fn silence(duration: f64) -> Self {
        Self {
            f1: 0.0,
            f2: 0.0,
            f3: 0.0,
            duration,
            class: PhonemeClass::Silence,
            amp: 0.0,
            voiced: false,
        }
    }
}

/// English phoneme symbols.
///
/// Diphthongs are split into onset and glide halves so the renderer gets a
/// smooth two-target formant trajectory. Syllabic consonants serve as
/// unstressed syllable nuclei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phoneme {
    // Tense and lax monophthongs
    Iy, // fleece
    Ih, // kit
    Eh, // dress
    Ae, // trap
    Ah, // strut
    Aa, // lot
    Ao, // thought
    Uh, // foot
    Uw, // goose
    Er, // nurse
    Ax, // schwa
    // Diphthong onset/glide pairs
    Ey1,
    Ey2,
    Ay1,
    Ay2,
    Aw1,
    Aw2,
    Ow1,
    Ow2,
    Oy1,
    Oy2,
    // Syllabic consonants
    El,
    En,
    Em,
    // Stops
    P,
    B,
    T,
    D,
    K,
    G,
    // Fricatives
    F,
    V,
    Th,
    Dh,
    S,
    Z,
    Sh,
    Zh,
    Hh,
    // Affricates
    Ch,
    Jh,
    // Nasals
    M,
    N,
    Ng,
    // Approximants and liquids
    L,
    R,
    W,
    Y,
}

/// Place of articulation for stops, indexing closure/burst parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPlace {
    Bilabial,
    Alveolar,
    Velar,
}

impl StopPlace {
    /// Closure hold before the release, in seconds.
    pub fn closure_secs(self) -> f64 {
        match self {
            StopPlace::Bilabial => 0.070,
            StopPlace::Alveolar => 0.060,
            StopPlace::Velar => 0.075,
        }
    }

    /// Voice onset time for the voiceless member of the pair, in seconds.
    pub fn vot_secs(self) -> f64 {
        match self {
            StopPlace::Bilabial => 0.055,
            StopPlace::Alveolar => 0.065,
            StopPlace::Velar => 0.075,
        }
    }

    /// Second-formant locus the transition points toward/from, in Hz.
    pub fn locus_hz(self) -> f64 {
        match self {
            StopPlace::Bilabial => 800.0,
            StopPlace::Alveolar => 1800.0,
            StopPlace::Velar => 2500.0,
        }
    }

    /// Noise band centers for the release burst, in Hz.
    pub fn burst_bands(self) -> (f64, f64) {
        match self {
            StopPlace::Bilabial => (500.0, 1400.0),
            StopPlace::Alveolar => (2400.0, 4200.0),
            StopPlace::Velar => (1600.0, 2900.0),
        }
    }
}

impl Phoneme {
    /// Syllable-nucleus test: vowels, diphthong halves, and syllabic
    /// consonants all anchor a syllable.
    pub fn is_vowel(self) -> bool {
        use Phoneme::*;
        matches!(
            self,
            Iy | Ih | Eh | Ae | Ah | Aa | Ao | Uh | Uw | Er | Ax
                | Ey1 | Ey2 | Ay1 | Ay2 | Aw1 | Aw2 | Ow1 | Ow2 | Oy1 | Oy2
                | El | En | Em
        )
    }

    /// Full-quality vowel: stressable, so neither reduced, a diphthong
    /// glide half, nor a syllabic consonant.
    pub fn is_full_vowel(self) -> bool {
        self.is_vowel() && !self.is_reduced() && !self.is_diphthong_glide() && !self.is_syllabic()
    }

    /// The reduced/schwa vowel.
    pub fn is_reduced(self) -> bool {
        self == Phoneme::Ax
    }

    /// Second half of a diphthong.
    pub fn is_diphthong_glide(self) -> bool {
        use Phoneme::*;
        matches!(self, Ey2 | Ay2 | Aw2 | Ow2 | Oy2)
    }

    pub fn is_syllabic(self) -> bool {
        use Phoneme::*;
        matches!(self, El | En | Em)
    }

    pub fn is_nasal(self) -> bool {
        use Phoneme::*;
        matches!(self, M | N | Ng | En | Em)
    }

    /// Oral plosive (affricates excluded).
    pub fn is_plosive(self) -> bool {
        use Phoneme::*;
        matches!(self, P | B | T | D | K | G)
    }

    pub fn is_affricate(self) -> bool {
        use Phoneme::*;
        matches!(self, Ch | Jh)
    }

    /// Plosives and affricates share closure-plus-release structure.
    pub fn is_stop(self) -> bool {
        self.is_plosive() || self.is_affricate()
    }

    pub fn is_fricative(self) -> bool {
        use Phoneme::*;
        matches!(self, F | V | Th | Dh | S | Z | Sh | Zh | Hh)
    }

    pub fn is_sonorant(self) -> bool {
        use Phoneme::*;
        self.is_nasal() || matches!(self, L | R | W | Y | El | En | Em)
    }

    /// Place of articulation for plosives; `None` for everything else.
    pub fn stop_place(self) -> Option<StopPlace> {
        use Phoneme::*;
        match self {
            P | B => Some(StopPlace::Bilabial),
            T | D => Some(StopPlace::Alveolar),
            K | G => Some(StopPlace::Velar),
            _ => None,
        }
    }

    /// Acoustic definition from the catalog.
    pub fn def(self) -> PhonemeDef {
        catalog().get(&self).copied().unwrap_or(PhonemeDef::silence(0.04))
    }

    /// Lowercase ASCII name used by the pronunciation lexicon format.
    pub fn name(self) -> &'static str {
        use Phoneme::*;
        match self {
            Iy => "iy",
            Ih => "ih",
            Eh => "eh",
            Ae => "ae",
            Ah => "ah",
            Aa => "aa",
            Ao => "ao",
            Uh => "uh",
            Uw => "uw",
            Er => "er",
            Ax => "ax",
            Ey1 => "ey1",
            Ey2 => "ey2",
            Ay1 => "ay1",
            Ay2 => "ay2",
            Aw1 => "aw1",
            Aw2 => "aw2",
            Ow1 => "ow1",
            Ow2 => "ow2",
            Oy1 => "oy1",
            Oy2 => "oy2",
            El => "el",
            En => "en",
            Em => "em",
            P => "p",
            B => "b",
            T => "t",
            D => "d",
            K => "k",
            G => "g",
            F => "f",
            V => "v",
            Th => "th",
            Dh => "dh",
            S => "s",
            Z => "z",
            Sh => "sh",
            Zh => "zh",
            Hh => "hh",
            Ch => "ch",
            Jh => "jh",
            M => "m",
            N => "n",
            Ng => "ng",
            L => "l",
            R => "r",
            W => "w",
            Y => "y",
        }
    }

    /// Parse a lexicon phoneme name. Inverse of [`Phoneme::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|ph| ph.name() == name)
    }
}

/// Every phoneme, in catalog order.
pub const ALL: &[Phoneme] = &[
    Phoneme::Iy,
    Phoneme::Ih,
    Phoneme::Eh,
    Phoneme::Ae,
    Phoneme::Ah,
    Phoneme::Aa,
    Phoneme::Ao,
    Phoneme::Uh,
    Phoneme::Uw,
    Phoneme::Er,
    Phoneme::Ax,
    Phoneme::Ey1,
    Phoneme::Ey2,
    Phoneme::Ay1,
    Phoneme::Ay2,
    Phoneme::Aw1,
    Phoneme::Aw2,
    Phoneme::Ow1,
    Phoneme::Ow2,
    Phoneme::Oy1,
    Phoneme::Oy2,
    Phoneme::El,
    Phoneme::En,
    Phoneme::Em,
    Phoneme::P,
    Phoneme::B,
    Phoneme::T,
    Phoneme::D,
    Phoneme::K,
    Phoneme::G,
    Phoneme::F,
    Phoneme::V,
    Phoneme::Th,
    Phoneme::Dh,
    Phoneme::S,
    Phoneme::Z,
    Phoneme::Sh,
    Phoneme::Zh,
    Phoneme::Hh,
    Phoneme::Ch,
    Phoneme::Jh,
    Phoneme::M,
    Phoneme::N,
    Phoneme::Ng,
    Phoneme::L,
    Phoneme::R,
    Phoneme::W,
    Phoneme::Y,
];

macro_rules! def {
    ($f1:expr, $f2:expr, $f3:expr, $dur:expr, $class:ident, $amp:expr, $voiced:expr) => {
        PhonemeDef {
            f1: $f1,
            f2: $f2,
            f3: $f3,
            duration: $dur,
            class: PhonemeClass::$class,
            amp: $amp,
            voiced: $voiced,
        }
    };
}

/// English acoustic catalog, in (phoneme, f1, f2, f3, duration, class, amp,
/// voiced) order.
static CATALOG_TABLE: &[(Phoneme, PhonemeDef)] = &[
    // Tense vowels
    (Phoneme::Iy, def!(270.0, 2290.0, 3010.0, 0.200, Vowel, 1.00, true)), // fleece
    (Phoneme::Uw, def!(310.0, 870.0, 2240.0, 0.180, Vowel, 0.96, true)),  // goose
    (Phoneme::Ey1, def!(530.0, 1840.0, 2480.0, 0.120, Vowel, 1.00, true)), // face onset
    (Phoneme::Ey2, def!(270.0, 2290.0, 3010.0, 0.110, Vowel, 0.95, true)), // face glide
    (Phoneme::Ow1, def!(570.0, 840.0, 2410.0, 0.120, Vowel, 0.98, true)), // goat onset
    (Phoneme::Ow2, def!(310.0, 870.0, 2240.0, 0.100, Vowel, 0.92, true)), // goat glide
    // Lax vowels
    (Phoneme::Ih, def!(400.0, 1920.0, 2550.0, 0.155, Vowel, 0.97, true)), // kit
    (Phoneme::Eh, def!(580.0, 1800.0, 2610.0, 0.155, Vowel, 0.98, true)), // dress
    (Phoneme::Ae, def!(800.0, 1720.0, 2410.0, 0.190, Vowel, 1.02, true)), // trap
    (Phoneme::Ah, def!(640.0, 1190.0, 2390.0, 0.160, Vowel, 0.99, true)), // strut
    (Phoneme::Ao, def!(560.0, 840.0, 2410.0, 0.190, Vowel, 0.99, true)),  // thought
    (Phoneme::Aa, def!(730.0, 980.0, 2580.0, 0.195, Vowel, 1.00, true)),  // lot
    (Phoneme::Uh, def!(490.0, 1020.0, 2240.0, 0.150, Vowel, 0.95, true)), // foot
    (Phoneme::Er, def!(490.0, 1350.0, 1690.0, 0.200, Vowel, 0.97, true)), // nurse
    // Schwa: reduced, shorter
    (Phoneme::Ax, def!(500.0, 1500.0, 2500.0, 0.080, Vowel, 0.82, true)),
    // Remaining diphthongs: price, mouth, choice
    (Phoneme::Ay1, def!(730.0, 980.0, 2580.0, 0.130, Vowel, 1.00, true)),
    (Phoneme::Ay2, def!(270.0, 2290.0, 3010.0, 0.110, Vowel, 0.88, true)),
    (Phoneme::Aw1, def!(800.0, 1200.0, 2400.0, 0.130, Vowel, 1.00, true)),
    (Phoneme::Aw2, def!(310.0, 870.0, 2240.0, 0.110, Vowel, 0.88, true)),
    (Phoneme::Oy1, def!(560.0, 840.0, 2410.0, 0.130, Vowel, 0.99, true)),
    (Phoneme::Oy2, def!(270.0, 2290.0, 3010.0, 0.110, Vowel, 0.88, true)),
    // Syllabic consonants
    (Phoneme::El, def!(380.0, 1100.0, 2400.0, 0.120, Consonant, 0.80, true)),
    (Phoneme::En, def!(280.0, 1200.0, 2500.0, 0.110, Consonant, 0.78, true)),
    (Phoneme::Em, def!(280.0, 900.0, 2200.0, 0.110, Consonant, 0.78, true)),
    // Stops: burst parameters live on StopPlace, f2 doubles as the locus
    (Phoneme::P, def!(200.0, 800.0, 0.0, 0.080, Stop, 0.75, false)),
    (Phoneme::B, def!(200.0, 800.0, 0.0, 0.080, Stop, 0.78, true)),
    (Phoneme::T, def!(200.0, 1800.0, 0.0, 0.075, Stop, 0.78, false)),
    (Phoneme::D, def!(200.0, 1800.0, 0.0, 0.075, Stop, 0.80, true)),
    (Phoneme::K, def!(200.0, 2500.0, 0.0, 0.085, Stop, 0.76, false)),
    (Phoneme::G, def!(200.0, 2500.0, 0.0, 0.085, Stop, 0.78, true)),
    // Fricatives: bands chosen to stay clear of Nyquist at 16 kHz
    (Phoneme::F, def!(3000.0, 6500.0, 0.0, 0.120, Fricative, 0.40, false)),
    (Phoneme::V, def!(2500.0, 6000.0, 0.0, 0.110, Fricative, 0.44, true)),
    (Phoneme::Th, def!(1800.0, 6000.0, 0.0, 0.130, Fricative, 0.32, false)),
    (Phoneme::Dh, def!(1600.0, 5500.0, 0.0, 0.120, Fricative, 0.36, true)),
    (Phoneme::S, def!(3500.0, 7000.0, 0.0, 0.140, Fricative, 0.50, false)),
    (Phoneme::Z, def!(3000.0, 6500.0, 0.0, 0.130, Fricative, 0.52, true)),
    (Phoneme::Sh, def!(1800.0, 4500.0, 0.0, 0.145, Fricative, 0.54, false)),
    (Phoneme::Zh, def!(1800.0, 4500.0, 0.0, 0.130, Fricative, 0.56, true)),
    (Phoneme::Hh, def!(400.0, 2000.0, 0.0, 0.090, Fricative, 0.34, false)),
    // Affricates: stop closure plus fricative release, split by the expander
    (Phoneme::Ch, def!(1800.0, 3500.0, 0.0, 0.170, Stop, 0.78, false)),
    (Phoneme::Jh, def!(1800.0, 3500.0, 0.0, 0.160, Stop, 0.80, true)),
    // Nasals
    (Phoneme::M, def!(280.0, 900.0, 2200.0, 0.090, Consonant, 0.72, true)),
    (Phoneme::N, def!(280.0, 1700.0, 2600.0, 0.085, Consonant, 0.72, true)),
    (Phoneme::Ng, def!(280.0, 2300.0, 3000.0, 0.080, Consonant, 0.70, true)),
    // Approximants
    (Phoneme::L, def!(360.0, 980.0, 2480.0, 0.075, Consonant, 0.82, true)),
    (Phoneme::R, def!(460.0, 1190.0, 1580.0, 0.070, Consonant, 0.80, true)),
    (Phoneme::W, def!(290.0, 610.0, 2150.0, 0.065, Consonant, 0.78, true)),
    (Phoneme::Y, def!(260.0, 2100.0, 3000.0, 0.060, Consonant, 0.76, true)),
];

static CATALOG: LazyLock<HashMap<Phoneme, PhonemeDef>> =
    LazyLock::new(|| CATALOG_TABLE.iter().copied().collect());

/// The English catalog, built once on first access.
pub fn catalog() -> &'static HashMap<Phoneme, PhonemeDef> {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phoneme_has_a_catalog_entry() {
        for &ph in ALL {
            assert!(
                catalog().contains_key(&ph),
                "missing catalog entry for {ph:?}"
            );
        }
        assert_eq!(catalog().len(), ALL.len());
    }

    #[test]
    fn vowel_formants_are_ordered() {
        for &ph in ALL {
            let d = ph.def();
            if d.class == PhonemeClass::Vowel {
                assert!(d.f1 < d.f2 && d.f2 < d.f3, "unordered formants for {ph:?}");
                assert!(d.voiced);
            }
        }
    }

    #[test]
    fn name_round_trips() {
        for &ph in ALL {
            assert_eq!(Phoneme::from_name(ph.name()), Some(ph));
        }
    }

    #[test]
    fn classification_is_consistent() {
        assert!(Phoneme::Ae.is_full_vowel());
        assert!(!Phoneme::Ax.is_full_vowel());
        assert!(!Phoneme::Ey2.is_full_vowel());
        assert!(Phoneme::Ey2.is_vowel());
        assert!(Phoneme::El.is_vowel() && !Phoneme::El.is_full_vowel());
        assert!(Phoneme::Ch.is_stop() && !Phoneme::Ch.is_plosive());
        assert!(Phoneme::K.stop_place() == Some(StopPlace::Velar));
        assert!(Phoneme::S.stop_place().is_none());
    }
}
