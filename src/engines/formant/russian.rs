//! Russian phoneme catalog and text utilities.
//!
//! Russian orthography is close to phonemic, so no cross-letter rule matching
//! is needed: each normalized letter maps directly to one catalog entry.
//! Formants adapted from Peterson & Barney (1952) and Bondarko (1998).
//! The soft sign is silent; the hard sign becomes a filler pause.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::phoneme::{PhonemeClass, PhonemeDef};

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

/// Russian catalog, keyed by uppercase Cyrillic letter.
static CATALOG_TABLE: &[(char, PhonemeDef)] = &[
    // Vowels
    ('А', def!(700.0, 1220.0, 2600.0, 0.15, Vowel, 1.00, true)),
    ('Е', def!(500.0, 1700.0, 2500.0, 0.13, Vowel, 0.95, true)),
    ('Ё', def!(500.0, 1700.0, 2500.0, 0.13, Vowel, 0.95, true)),
    ('И', def!(300.0, 2200.0, 2950.0, 0.12, Vowel, 0.90, true)),
    ('О', def!(500.0, 900.0, 2300.0, 0.14, Vowel, 0.95, true)),
    ('У', def!(300.0, 870.0, 2250.0, 0.14, Vowel, 0.90, true)),
    ('Ы', def!(400.0, 1400.0, 2500.0, 0.13, Vowel, 0.88, true)),
    ('Э', def!(550.0, 1700.0, 2400.0, 0.13, Vowel, 0.90, true)),
    ('Ю', def!(300.0, 900.0, 2200.0, 0.13, Vowel, 0.90, true)),
    ('Я', def!(600.0, 1500.0, 2550.0, 0.14, Vowel, 0.92, true)),
    // Voiced stops rendered as voiced consonants
    ('Б', def!(250.0, 700.0, 0.0, 0.14, Consonant, 0.55, true)),
    ('Г', def!(200.0, 600.0, 0.0, 0.13, Consonant, 0.50, true)),
    ('Д', def!(250.0, 500.0, 0.0, 0.14, Consonant, 0.52, true)),
    // Voiced fricatives and approximants
    ('В', def!(800.0, 2000.0, 0.0, 0.14, Consonant, 0.50, true)),
    ('Ж', def!(2800.0, 3500.0, 0.0, 0.14, Fricative, 0.38, true)),
    ('З', def!(2200.0, 3500.0, 0.0, 0.15, Fricative, 0.38, true)),
    // Sonorants
    ('Й', def!(300.0, 2000.0, 0.0, 0.11, Consonant, 0.48, true)),
    ('Л', def!(400.0, 900.0, 0.0, 0.14, Consonant, 0.55, true)),
    ('М', def!(300.0, 900.0, 0.0, 0.14, Consonant, 0.58, true)),
    ('Н', def!(300.0, 1000.0, 0.0, 0.14, Consonant, 0.58, true)),
    ('Р', def!(500.0, 1500.0, 0.0, 0.14, Consonant, 0.52, true)),
    // Voiceless stops
    ('П', def!(200.0, 600.0, 0.0, 0.10, Stop, 0.45, false)),
    ('Т', def!(300.0, 900.0, 0.0, 0.10, Stop, 0.45, false)),
    ('К', def!(800.0, 1500.0, 0.0, 0.10, Stop, 0.42, false)),
    // Voiceless fricatives
    ('Ф', def!(2200.0, 4000.0, 0.0, 0.14, Fricative, 0.32, false)),
    ('С', def!(4000.0, 6000.0, 0.0, 0.16, Fricative, 0.30, false)),
    ('Х', def!(2000.0, 3500.0, 0.0, 0.15, Fricative, 0.30, false)),
    ('Ш', def!(2800.0, 4000.0, 0.0, 0.16, Fricative, 0.35, false)),
    ('Щ', def!(2800.0, 4200.0, 0.0, 0.17, Fricative, 0.35, false)),
    // Affricates
    ('Ц', def!(2000.0, 4000.0, 0.0, 0.11, Stop, 0.38, false)),
    ('Ч', def!(2200.0, 4000.0, 0.0, 0.11, Stop, 0.38, false)),
    // Non-phonemic signs
    ('Ъ', def!(0.0, 0.0, 0.0, 0.03, Silence, 0.0, false)),
    ('Ь', def!(0.0, 0.0, 0.0, 0.00, Silence, 0.0, false)),
];

static CATALOG: LazyLock<HashMap<char, PhonemeDef>> =
    LazyLock::new(|| CATALOG_TABLE.iter().copied().collect());

/// The Russian catalog, built once on first access.
pub fn catalog() -> &'static HashMap<char, PhonemeDef> {
    &CATALOG
}

/// Look up a normalized symbol; `None` for anything outside the catalog.
pub fn lookup(symbol: char) -> Option<&'static PhonemeDef> {
    CATALOG.get(&symbol)
}

/// Fold lowercase Cyrillic onto the uppercase catalog keys.
pub fn normalize_upper(ch: char) -> char {
    match ch {
        'а'..='я' => {
            // The lowercase block sits 0x20 above uppercase
            char::from_u32(ch as u32 - 0x20).unwrap_or(ch)
        }
        'ё' => 'Ё',
        other => other,
    }
}

/// Pause duration in seconds for punctuation, Russian text.
pub fn punctuation_pause(ch: char) -> f64 {
    match ch {
        ' ' => 0.08,
        ',' => 0.15,
        '.' => 0.28,
        '!' | '?' => 0.32,
        ';' | ':' => 0.20,
        '\n' => 0.35,
        '-' => 0.07,
        _ => 0.0,
    }
}

/// Russian single-digit words for digit expansion.
pub fn digit_word(digit: u8) -> &'static str {
    const WORDS: [&str; 10] = [
        "ноль",
        "один",
        "два",
        "три",
        "четыре",
        "пять",
        "шесть",
        "семь",
        "восемь",
        "девять",
    ];
    WORDS[usize::from(digit.min(9))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case() {
        assert_eq!(normalize_upper('а'), 'А');
        assert_eq!(normalize_upper('я'), 'Я');
        assert_eq!(normalize_upper('ё'), 'Ё');
        assert_eq!(normalize_upper('Ш'), 'Ш');
        assert_eq!(normalize_upper('x'), 'x');
    }

    #[test]
    fn catalog_covers_the_alphabet() {
        for ch in 'А'..='Я' {
            assert!(lookup(ch).is_some(), "no entry for {ch}");
        }
        assert!(lookup('Ё').is_some());
    }

    #[test]
    fn soft_sign_is_silent_and_durationless() {
        let def = lookup('Ь').expect("soft sign present");
        assert_eq!(def.class, PhonemeClass::Silence);
        assert_eq!(def.duration, 0.0);
    }
}
