//! Pronunciation exception lexicon.
//!
//! English spelling is irregular enough that a handful of very frequent words
//! defeat any rule table. Those live in a built-in exception list consulted
//! before rule matching. Users can layer their own pronunciations on top by
//! loading a JSON file mapping words to phoneme name lists:
//!
//! ```json
//! { "tomato": ["t", "ax", "m", "ey1", "ey2", "t", "ow1", "ow2"] }
//! ```
//!
//! Phoneme names are the lowercase codes from [`Phoneme::name`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::engine::FormantError;
use super::phoneme::Phoneme;

use Phoneme::*;

/// Irregular high-frequency words the rule table cannot reach.
static BUILTIN_TABLE: &[(&str, &[Phoneme])] = &[
    ("a", &[Ax]),
    ("the", &[Dh, Ax]),
    ("of", &[Ah, V]),
    ("to", &[T, Uw]),
    ("do", &[D, Uw]),
    ("who", &[Hh, Uw]),
    ("you", &[Y, Uw]),
    ("was", &[W, Ah, Z]),
    ("were", &[W, Er]),
    ("are", &[Aa, R]),
    ("one", &[W, Ah, N]),
    ("once", &[W, Ah, N, S]),
    ("two", &[T, Uw]),
    ("said", &[S, Eh, D]),
    ("says", &[S, Eh, Z]),
    ("have", &[Hh, Ae, V]),
    ("done", &[D, Ah, N]),
    ("gone", &[G, Ao, N]),
    ("none", &[N, Ah, N]),
    ("some", &[S, Ah, M]),
    ("come", &[K, Ah, M]),
    ("love", &[L, Ah, V]),
    ("move", &[M, Uw, V]),
    ("give", &[G, Ih, V]),
    ("there", &[Dh, Eh, R]),
    ("where", &[W, Eh, R]),
    ("here", &[Hh, Ih, R]),
    ("they", &[Dh, Ey1, Ey2]),
    ("been", &[B, Ih, N]),
    ("eye", &[Ay1, Ay2]),
    ("iron", &[Ay1, Ay2, Er, N]),
    ("island", &[Ay1, Ay2, L, Ax, N, D]),
];

static BUILTIN: LazyLock<HashMap<&'static str, &'static [Phoneme]>> =
    LazyLock::new(|| BUILTIN_TABLE.iter().copied().collect());

/// Look up an irregular word in the built-in exception list.
pub fn builtin_lookup(word: &str) -> Option<&'static [Phoneme]> {
    BUILTIN.get(word).copied()
}

/// On-disk lexicon format: a flat word → phoneme-names map.
#[derive(serde::Deserialize)]
#[serde(transparent)]
struct LexiconFile(HashMap<String, Vec<String>>);

/// User-supplied pronunciation overrides, consulted before the built-ins.
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Phoneme>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lexicon from a JSON file mapping words to phoneme name lists.
    ///
    /// Unknown phoneme names are rejected rather than dropped so a typo in
    /// the file does not silently change a pronunciation.
    pub fn load(path: &Path) -> Result<Self, FormantError> {
        let content = std::fs::read_to_string(path)?;
        let LexiconFile(raw) = serde_json::from_str(&content)
            .map_err(|e| FormantError::Lexicon(format!("failed to parse JSON: {e}")))?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (word, names) in raw {
            let mut phones = Vec::with_capacity(names.len());
            for name in &names {
                let ph = Phoneme::from_name(name).ok_or_else(|| {
                    FormantError::Lexicon(format!(
                        "unknown phoneme {name:?} in entry for {word:?}"
                    ))
                })?;
                phones.push(ph);
            }
            entries.insert(word.to_lowercase(), phones);
        }

        log::info!("Loaded {} lexicon entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Add or replace a single pronunciation.
    pub fn insert(&mut self, word: &str, phones: Vec<Phoneme>) {
        self.entries.insert(word.to_lowercase(), phones);
    }

    pub fn lookup(&self, word: &str) -> Option<&[Phoneme]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_the_usual_suspects() {
        assert_eq!(builtin_lookup("the"), Some(&[Dh, Ax][..]));
        assert_eq!(builtin_lookup("one"), Some(&[W, Ah, N][..]));
        assert_eq!(builtin_lookup("cat"), None);
    }

    #[test]
    fn builtin_entries_are_nonempty_and_unique() {
        assert_eq!(BUILTIN.len(), BUILTIN_TABLE.len());
        for (word, phones) in BUILTIN_TABLE {
            assert!(!phones.is_empty(), "empty pronunciation for {word}");
        }
    }

    #[test]
    fn user_entries_shadow_case_insensitively() {
        let mut lex = Lexicon::new();
        lex.insert("NASA", vec![N, Ae, S, Ax]);
        assert_eq!(lex.lookup("nasa"), Some(&[N, Ae, S, Ax][..]));
    }

    #[test]
    fn load_rejects_unknown_phoneme_names() {
        let dir = std::env::temp_dir();
        let path = dir.join("formant_tts_bad_lexicon.json");
        std::fs::write(&path, r#"{ "word": ["qq"] }"#).expect("temp file");
        let err = Lexicon::load(&path).expect_err("unknown phoneme should fail");
        assert!(err.to_string().contains("qq"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_parses_valid_entries() {
        let dir = std::env::temp_dir();
        let path = dir.join("formant_tts_good_lexicon.json");
        std::fs::write(&path, r#"{ "Tomato": ["t", "ax", "m", "ey1", "ey2", "t", "ow1", "ow2"] }"#)
            .expect("temp file");
        let lex = Lexicon::load(&path).expect("valid lexicon");
        assert_eq!(lex.len(), 1);
        assert_eq!(
            lex.lookup("tomato"),
            Some(&[T, Ax, M, Ey1, Ey2, T, Ow1, Ow2][..])
        );
        let _ = std::fs::remove_file(&path);
    }
}
