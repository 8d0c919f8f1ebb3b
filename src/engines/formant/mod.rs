//! Rule-based formant synthesis engine.
//!
//! Generates speech from phonetic rules and a resonant filter bank at a
//! fixed 16 kHz, with no model files or external programs. English input
//! goes through grapheme-to-phoneme rules, coarticulation, and a
//! declination-based prosody model; Russian maps its phonemic orthography
//! straight onto the Cyrillic catalog. The script of the input selects the
//! language automatically unless one is pinned.
//!
//! # Examples
//!
//! ```
//! use formant_tts::{SynthesisEngine, engines::formant::FormantEngine};
//!
//! let mut engine = FormantEngine::new();
//! let result = engine.synthesize("Hello, world!", None)?;
//! assert_eq!(result.sample_rate, 16_000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Per-call overrides
//!
//! ```
//! use formant_tts::{
//!     SynthesisEngine,
//!     engines::formant::{FormantEngine, FormantSynthesisParamsBuilder, Language},
//! };
//!
//! let mut engine = FormantEngine::with_seed(1234);
//! let params = FormantSynthesisParamsBuilder::default()
//!     .language(Language::English)
//!     .speed(1.4)
//!     .pitch_hz(95.0)
//!     .build()?;
//! let result = engine.synthesize("Good evening.", Some(params))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coarticulate;
mod engine;
mod expand;
mod frame;
mod g2p;
mod lexicon;
mod phoneme;
mod postprocess;
mod prosody;
mod russian;
mod sequence;
mod synth;
mod text;

pub use engine::{
    FormantEngine, FormantError, FormantSynthesisParams, FormantSynthesisParamsBuilder, Language,
};
pub use frame::SAMPLE_RATE;
pub use lexicon::Lexicon;
pub use phoneme::{Phoneme, PhonemeClass, PhonemeDef};
