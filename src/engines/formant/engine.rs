use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use derive_builder::Builder;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{SynthesisEngine, SynthesisResult};

use super::frame::SAMPLE_RATE;
use super::lexicon::Lexicon;
use super::postprocess;
use super::sequence::{self, BuildConfig};
use super::synth;
use super::text;

/// Synthesis language selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Russian,
    English,
    /// Pick per call by script: any Cyrillic-dominant text is Russian.
    #[default]
    Auto,
}

/// Errors from the formant engine.
#[derive(thiserror::Error, Debug)]
pub enum FormantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("lexicon error: {0}")]
    Lexicon(String),
}

/// Per-call overrides for a synthesis request.
///
/// Every field is optional; `None` keeps the engine's session setting.
/// Build one directly or through [`FormantSynthesisParamsBuilder`]:
///
/// ```
/// use formant_tts::engines::formant::FormantSynthesisParamsBuilder;
///
/// let params = FormantSynthesisParamsBuilder::default()
///     .speed(1.3)
///     .whisper(true)
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, Builder)]
#[builder(setter(strip_option), default)]
pub struct FormantSynthesisParams {
    /// Override the session language.
    pub language: Option<Language>,
    /// Override the session speed multiplier (0.1–8.0).
    pub speed: Option<f64>,
    /// Override the session base pitch in Hz (60–400).
    pub pitch_hz: Option<f64>,
    /// Override whisper mode.
    pub whisper: Option<bool>,
}

const SPEED_RANGE: (f64, f64) = (0.1, 8.0);
const PITCH_RANGE: (f64, f64) = (60.0, 400.0);
const DEFAULT_PITCH_HZ: f64 = 120.0;

/// Rule-based formant text-to-speech engine.
///
/// Holds session voice settings, an optional pronunciation lexicon, and a
/// seedable RNG driving jitter and noise. No model files are required.
///
/// ```
/// use formant_tts::{engines::formant::FormantEngine, SynthesisEngine};
///
/// let mut engine = FormantEngine::new();
/// engine.set_speed(1.2);
/// let result = engine.synthesize("Forty two.", None)?;
/// assert_eq!(result.sample_rate, 16_000);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FormantEngine {
    language: Language,
    speed: f64,
    pitch_hz: f64,
    whisper: bool,
    lexicon: Option<Lexicon>,
    rng: Pcg32,
    last: Vec<f32>,
}

impl Default for FormantEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormantEngine {
    /// Create an engine with default voice settings and a wall-clock seed.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::with_seed(seed)
    }

    /// Create an engine with a fixed RNG seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            language: Language::Auto,
            speed: 1.0,
            pitch_hz: DEFAULT_PITCH_HZ,
            whisper: false,
            lexicon: None,
            rng: Pcg32::seed_from_u64(seed),
            last: Vec::new(),
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Set the session speed multiplier, clamped to 0.1–8.0.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the session base pitch in Hz, clamped to 60–400.
    pub fn set_pitch_hz(&mut self, pitch_hz: f64) {
        self.pitch_hz = pitch_hz.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
    }

    pub fn pitch_hz(&self) -> f64 {
        self.pitch_hz
    }

    pub fn set_whisper(&mut self, whisper: bool) {
        self.whisper = whisper;
    }

    pub fn whisper(&self) -> bool {
        self.whisper
    }

    /// Load a pronunciation lexicon from a JSON file of word → phoneme names.
    pub fn load_lexicon(&mut self, path: &Path) -> Result<(), FormantError> {
        let lexicon = Lexicon::load(path)?;
        log::info!("Loaded lexicon with {} entries", lexicon.len());
        self.lexicon = Some(lexicon);
        Ok(())
    }

    pub fn set_lexicon(&mut self, lexicon: Lexicon) {
        self.lexicon = Some(lexicon);
    }

    /// Samples of the most recent synthesis, for inspection or replay.
    pub fn last_samples(&self) -> &[f32] {
        &self.last
    }

    /// The engine's fixed output sample rate.
    pub fn sample_rate() -> u32 {
        SAMPLE_RATE
    }

    fn run(
        &mut self,
        input: &str,
        params: Option<FormantSynthesisParams>,
    ) -> Result<SynthesisResult, FormantError> {
        let params = params.unwrap_or_default();
        let language = params.language.unwrap_or(self.language);
        let speed = params
            .speed
            .map_or(self.speed, |s| s.clamp(SPEED_RANGE.0, SPEED_RANGE.1));
        let pitch_hz = params
            .pitch_hz
            .map_or(self.pitch_hz, |p| p.clamp(PITCH_RANGE.0, PITCH_RANGE.1));
        let whisper = params.whisper.unwrap_or(self.whisper);

        let language = match language {
            Language::Auto => text::detect_language(input),
            fixed => fixed,
        };
        log::debug!("synthesizing {:?} as {language:?}, speed {speed}", input);

        // Session pitch wobbles a little per utterance
        let base_pitch_hz = pitch_hz * (1.0 + self.rng.gen_range(-0.02..=0.02));
        let cfg = BuildConfig {
            speed,
            base_pitch_hz,
            whisper,
        };

        let expanded = text::expand_input(input, language);
        let seq = match language {
            Language::English => sequence::build_english(
                &expanded,
                self.lexicon.as_ref(),
                &cfg,
                &mut self.rng,
            ),
            Language::Russian | Language::Auto => {
                sequence::build_russian(&expanded, &cfg, &mut self.rng)
            }
        };

        let samples = match seq {
            Some(mut seq) => {
                let mut samples = synth::render(&mut seq, &mut self.rng);
                postprocess::finalize(&mut samples);
                samples
            }
            None => Vec::new(),
        };

        log::info!(
            "synthesized {:.2}s of audio from {} chars",
            samples.len() as f64 / f64::from(SAMPLE_RATE),
            input.chars().count()
        );
        self.last = samples.clone();
        Ok(SynthesisResult {
            samples,
            sample_rate: SAMPLE_RATE,
        })
    }
}

impl SynthesisEngine for FormantEngine {
    type SynthesisParams = FormantSynthesisParams;

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        Ok(self.run(text, params)?)
    }
}
