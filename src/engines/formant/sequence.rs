//! Utterance assembly: text in, an ordered list of synthesis frames out.
//!
//! English goes through grapheme-to-phoneme conversion, coarticulation,
//! prosody and phone expansion per word. Russian maps characters to the
//! Cyrillic catalog directly, with run-length elongation for repeated
//! letters. Both builders respect the utterance ceiling so a pathological
//! input cannot produce unbounded audio.

use rand::Rng;

use super::coarticulate;
use super::expand::expand_phone;
use super::frame::{SynthesisFrame, SAMPLE_RATE};
use super::g2p;
use super::lexicon::Lexicon;
use super::phoneme::{PhonemeClass, PhonemeDef};
use super::prosody;
use super::russian;
use super::text;

/// Hard ceiling on a single utterance.
pub const MAX_UTTERANCE_SECS: f64 = 30.0;
pub const MAX_UTTERANCE_SAMPLES: usize = (MAX_UTTERANCE_SECS * SAMPLE_RATE as f64) as usize;

/// Longest phoneme string produced for a single word.
const MAX_WORD_PHONEMES: usize = 96;

/// Voice parameters shared by both language builders.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    pub speed: f64,
    pub base_pitch_hz: f64,
    pub whisper: bool,
}

/// An ordered, bounded list of frames ready for rendering.
#[derive(Debug)]
pub struct FrameSequence {
    frames: Vec<SynthesisFrame>,
}

impl FrameSequence {
    pub fn frames(&self) -> &[SynthesisFrame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [SynthesisFrame] {
        &mut self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.frames.iter().map(SynthesisFrame::total_samples).sum()
    }

    /// Cut the sequence at the utterance ceiling. The frame straddling the
    /// boundary is shortened rather than dropped, so oversized single
    /// frames still render their prefix.
    fn enforce_ceiling(&mut self) {
        let mut budget = MAX_UTTERANCE_SAMPLES;
        let mut keep = 0;
        for frame in &mut self.frames {
            if frame.total_samples() > budget {
                if budget > 0 {
                    frame.truncate_to(budget);
                    keep += 1;
                }
                break;
            }
            budget -= frame.total_samples();
            keep += 1;
        }
        if keep < self.frames.len() {
            log::warn!(
                "utterance exceeds {MAX_UTTERANCE_SECS}s ceiling, dropping {} frames",
                self.frames.len() - keep
            );
            self.frames.truncate(keep);
        }
    }
}

/// Devoice a definition for whispered output.
///
/// Vowels become frication shaped around their (raised) formant targets,
/// so whispered speech keeps its vowel color without any glottal energy.
fn whisper_def(def: &mut PhonemeDef) {
    def.voiced = false;
    if def.class == PhonemeClass::Vowel {
        def.class = PhonemeClass::Fricative;
        def.f1 = 900.0 + def.f1 * 2.5;
        def.amp *= 0.6;
    }
}

fn word_frames<R: Rng>(
    word: &str,
    lexicon: Option<&Lexicon>,
    cfg: &BuildConfig,
    interrogative: bool,
    frames: &mut Vec<SynthesisFrame>,
    rng: &mut R,
) {
    let phones = g2p::word_to_phonemes(word, MAX_WORD_PHONEMES, lexicon);
    if phones.is_empty() {
        return;
    }
    log::trace!(
        "word {:?} -> {:?}",
        word,
        phones.iter().map(|p| p.name()).collect::<Vec<_>>()
    );

    let entries = prosody::assign(&phones, cfg.base_pitch_hz, interrogative);

    let mut defs = Vec::with_capacity(phones.len());
    for (i, &ph) in phones.iter().enumerate() {
        let prev = if i > 0 { Some(phones[i - 1]) } else { None };
        let next = phones.get(i + 1).copied();
        let mut def = coarticulate::coarticulate(prev, ph, next);
        if cfg.whisper {
            whisper_def(&mut def);
        }
        defs.push(def);
    }

    for (i, &ph) in phones.iter().enumerate() {
        let prev = if i > 0 { Some(phones[i - 1]) } else { None };
        expand_phone(
            prev,
            ph,
            &defs[i],
            defs.get(i + 1),
            &entries[i],
            cfg.speed,
            frames,
            rng,
        );
    }
}

/// Build the frame sequence for English text.
///
/// `input` must already be through [`text::expand_input`]. Returns `None`
/// when the text produces no audible frames at all.
pub fn build_english<R: Rng>(
    input: &str,
    lexicon: Option<&Lexicon>,
    cfg: &BuildConfig,
    rng: &mut R,
) -> Option<FrameSequence> {
    let interrogative = input.contains('?');
    let mut frames = Vec::new();
    let mut word = String::new();

    for ch in input.chars() {
        if ch.is_ascii_alphabetic() || ch == '\'' {
            word.push(ch.to_ascii_lowercase());
            continue;
        }
        if !word.is_empty() {
            word_frames(&word, lexicon, cfg, interrogative, &mut frames, rng);
            word.clear();
        }
        let pause = text::punctuation_pause(ch);
        if pause > 0.0 {
            frames.push(SynthesisFrame::silence(pause, cfg.speed));
        }
    }
    if !word.is_empty() {
        word_frames(&word, lexicon, cfg, interrogative, &mut frames, rng);
    }

    if frames.is_empty() {
        return None;
    }
    let mut seq = FrameSequence { frames };
    seq.enforce_ceiling();
    Some(seq)
}

/// Build the frame sequence for Russian text.
///
/// Cyrillic letters map one-to-one onto the catalog; a run of the same
/// letter elongates the segment instead of repeating it. Pauses stack.
pub fn build_russian<R: Rng>(
    input: &str,
    cfg: &BuildConfig,
    rng: &mut R,
) -> Option<FrameSequence> {
    let chars: Vec<char> = input.chars().map(russian::normalize_upper).collect();
    let mut frames = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let mut count = 1usize;
        while i + count < chars.len() && chars[i + count] == ch {
            count += 1;
        }
        i += count;

        if let Some(def) = russian::lookup(ch) {
            if def.class == PhonemeClass::Silence {
                // Hard sign and friends pause once, never elongate
                if def.duration > 0.0 {
                    frames.push(SynthesisFrame::silence(def.duration, cfg.speed));
                }
                continue;
            }
            let mut def = *def;
            def.duration *= count as f64;
            if cfg.whisper {
                whisper_def(&mut def);
            }
            let pitch = cfg.base_pitch_hz * (1.0 + rng.gen_range(-0.03..=0.03));
            frames.push(SynthesisFrame::new(&def, pitch, def.duration, cfg.speed));
            continue;
        }

        let pause = russian::punctuation_pause(ch);
        if pause > 0.0 {
            frames.push(SynthesisFrame::silence(pause * count as f64, cfg.speed));
        } else {
            // Unmapped symbol: short neutral gap
            frames.push(SynthesisFrame::silence(0.04, cfg.speed));
        }
    }

    if frames.is_empty() {
        return None;
    }
    let mut seq = FrameSequence { frames };
    seq.enforce_ceiling();
    Some(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cfg() -> BuildConfig {
        BuildConfig {
            speed: 1.0,
            base_pitch_hz: 120.0,
            whisper: false,
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn empty_text_builds_nothing() {
        assert!(build_english("", None, &cfg(), &mut rng()).is_none());
        assert!(build_russian("", &cfg(), &mut rng()).is_none());
    }

    #[test]
    fn word_and_pause_interleave() {
        let seq = build_english("go on", None, &cfg(), &mut rng()).unwrap();
        assert!(seq
            .frames()
            .iter()
            .any(|f| f.class() == PhonemeClass::Silence));
        assert!(seq
            .frames()
            .iter()
            .any(|f| f.class() == PhonemeClass::Vowel));
    }

    #[test]
    fn whisper_removes_all_voicing() {
        let mut config = cfg();
        config.whisper = true;
        let seq = build_english("mama", None, &config, &mut rng()).unwrap();
        assert!(seq.frames().iter().all(|f| !f.is_voiced()));
        assert!(seq
            .frames()
            .iter()
            .all(|f| f.class() != PhonemeClass::Vowel));
    }

    #[test]
    fn russian_run_elongates_instead_of_repeating() {
        let single = build_russian("а", &cfg(), &mut rng()).unwrap();
        let tripled = build_russian("ааа", &cfg(), &mut rng()).unwrap();
        assert_eq!(single.len(), tripled.len());
        assert!(tripled.total_samples() > 2 * single.total_samples());
    }

    #[test]
    fn russian_unknown_symbol_becomes_short_gap() {
        let seq = build_russian("§", &cfg(), &mut rng()).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.frames()[0].class(), PhonemeClass::Silence);
    }

    #[test]
    fn utterance_ceiling_is_enforced() {
        let long_text = "о".repeat(4000);
        let seq = build_russian(&long_text, &cfg(), &mut rng()).unwrap();
        assert!(seq.total_samples() <= MAX_UTTERANCE_SAMPLES);
    }

    #[test]
    fn oversized_single_frame_renders_its_prefix() {
        // One elongated run far past the ceiling still yields capped audio,
        // not an empty sequence
        let seq = build_russian(&"а".repeat(300), &cfg(), &mut rng()).unwrap();
        assert!(seq.total_samples() > 0);
        assert_eq!(seq.total_samples(), MAX_UTTERANCE_SAMPLES);
    }

    #[test]
    fn russian_frame_lengths_follow_catalog_and_speed() {
        let mut config = cfg();
        config.speed = 1.6;
        let seq = build_russian("ам", &config, &mut rng()).unwrap();
        assert_eq!(seq.len(), 2);
        let defs = [
            russian::lookup('А').expect("vowel present"),
            russian::lookup('М').expect("nasal present"),
        ];
        for (frame, def) in seq.frames().iter().zip(defs) {
            let expected = ((def.duration * f64::from(SAMPLE_RATE) / 1.6) as usize).max(2);
            assert_eq!(frame.total_samples(), expected);
        }
    }

    #[test]
    fn speed_scales_every_frame_duration() {
        let slow = build_english("market", None, &cfg(), &mut rng()).unwrap();
        let mut fast_cfg = cfg();
        fast_cfg.speed = 2.0;
        let fast = build_english("market", None, &fast_cfg, &mut rng()).unwrap();
        assert_eq!(slow.len(), fast.len());
        for (s, f) in slow.frames().iter().zip(fast.frames()) {
            // Per-frame flooring can differ by at most one sample
            let expected = (s.total_samples() / 2).max(2) as i64;
            assert!((f.total_samples() as i64 - expected).abs() <= 1);
        }
    }

    #[test]
    fn period_pause_matches_the_table_scaled_by_speed() {
        let mut config = cfg();
        config.speed = 2.0;
        let seq = build_english("a.", None, &config, &mut rng()).unwrap();
        let last = seq.frames().last().expect("nonempty");
        assert_eq!(last.class(), PhonemeClass::Silence);
        let expected =
            (text::punctuation_pause('.') * f64::from(SAMPLE_RATE) / 2.0) as usize;
        assert_eq!(last.total_samples(), expected);
    }

    #[test]
    fn speed_divides_total_duration() {
        let slow = build_english("testing one two", None, &cfg(), &mut rng()).unwrap();
        let mut fast_cfg = cfg();
        fast_cfg.speed = 2.0;
        let fast = build_english("testing one two", None, &fast_cfg, &mut rng()).unwrap();
        assert!(fast.total_samples() < slow.total_samples());
    }
}
