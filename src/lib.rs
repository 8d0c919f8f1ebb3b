//! # formant-tts
//!
//! A Rust library for rule-based formant text-to-speech synthesis.
//!
//! ## Features
//!
//! - **Formant synthesis**: speech is generated from phonetic rules and a
//!   resonant filter bank, not recorded samples; no model files required
//! - **Two languages**: English (rule-based grapheme-to-phoneme conversion,
//!   coarticulation, and prosody) and Russian (phonemic orthography), with
//!   script-based auto-detection
//! - **Session control**: speed, base pitch, and a whisper mode per engine
//!   or per synthesis call
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! formant-tts = "0.3"
//! ```
//!
//! ```
//! use formant_tts::{engines::formant::FormantEngine, SynthesisEngine};
//!
//! let mut engine = FormantEngine::new();
//! let result = engine.synthesize("Hello, world!", None)?;
//! println!("{} samples at {} Hz", result.samples.len(), result.sample_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engines;

use std::path::Path;

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains raw f32 audio samples and the sample rate of the output audio.
#[derive(Debug)]
pub struct SynthesisResult {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio (16000 for the formant engine)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// This trait defines the standard operations that all synthesis engines must
/// support. Each engine may have a different parameter type for configuring a
/// synthesis request.
pub trait SynthesisEngine {
    /// Parameters for configuring synthesis behavior (speed, pitch, etc.)
    type SynthesisParams;

    /// Synthesize speech from the given text.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text, params)?.write_wav(wav_path)
    }
}
