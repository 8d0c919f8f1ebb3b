//! Sample-level rendering of frame sequences.
//!
//! The glottal source is a normalized harmonic sum capped below Nyquist;
//! noise comes from the session RNG so seeded sessions reproduce exactly.
//! Each acoustic class has its own excitation-and-mix recipe, and every
//! sample passes through a soft clipper before it leaves the frame.

use std::f64::consts::TAU;

use rand::Rng;

use super::frame::{SynthesisFrame, SAMPLE_RATE};
use super::phoneme::PhonemeClass;
use super::sequence::{FrameSequence, MAX_UTTERANCE_SAMPLES};

/// Pre-clip drive. Pushes sustained vowels into the clipper's soft knee.
const DRIVE: f64 = 1.8;

/// Soft clipper: transparent inside [-1, 1], reciprocal compression beyond.
fn soft_clip(x: f64) -> f64 {
    if x > 1.0 {
        1.0 - 1.0 / (1.0 + (x - 1.0) * 3.0)
    } else if x < -1.0 {
        -1.0 + 1.0 / (1.0 + (-x - 1.0) * 3.0)
    } else {
        x
    }
}

impl SynthesisFrame {
    /// One period-normalized glottal pulse sample, advancing the phase.
    fn glottal_source(&mut self) -> f64 {
        self.phase += self.pitch_hz / f64::from(SAMPLE_RATE);
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        let mut sum = 0.0;
        for h in 1..=self.glottal_max_h {
            let h = h as f64;
            sum += (TAU * h * self.phase).sin() / h;
        }
        sum * 0.6 / self.glottal_norm
    }

    /// Render the next sample of this frame.
    pub(super) fn next_sample<R: Rng>(&mut self, rng: &mut R) -> f32 {
        let env = self.envelope();
        self.position += 1;

        let raw = match self.class {
            PhonemeClass::Silence => 0.0,

            PhonemeClass::Vowel => {
                let g = self.glottal_source();
                let s = self.resonators[0].process(g) * 0.5
                    + self.resonators[1].process(g)
                    + self.resonators[2].process(g) * 0.8;
                s * 0.9
            }

            PhonemeClass::Consonant => {
                let src = if self.voiced {
                    self.glottal_source() * 0.55 + rng.gen_range(-1.0..=1.0) * 0.02
                } else {
                    rng.gen_range(-1.0..=1.0) * 0.10
                };
                let mix = self.resonators[0].process(src) * 0.6
                    + self.resonators[1].process(src) * 0.4;
                self.smoother.process(mix)
            }

            PhonemeClass::Fricative => {
                // First-difference highpass flattens the noise spectrum
                let n = rng.gen_range(-1.0..=1.0);
                let hp = n - 0.88 * self.noise_hp;
                self.noise_hp = n;
                let mix = self.resonators[0].process(hp) * 0.6
                    + self.resonators[1].process(hp) * 0.4;
                let mix = self.smoother.process(mix);
                if self.voiced {
                    mix * 0.5 + self.glottal_source() * 0.35
                } else {
                    mix
                }
            }

            PhonemeClass::Stop => {
                if self.burst_remaining > 0 {
                    let decay = self.burst_remaining as f64 / self.burst_total.max(1) as f64;
                    self.burst_remaining -= 1;
                    let n = rng.gen_range(-1.0..=1.0) * decay;
                    let mix = self.resonators[0].process(n) * 0.6
                        + self.resonators[1].process(n) * 0.4;
                    self.smoother.process(mix) * 0.6
                } else if self.voiced {
                    self.glottal_source() * 0.25
                } else {
                    0.0
                }
            }
        };

        let s = soft_clip(raw * self.amplitude * env * DRIVE);
        if s.is_finite() {
            s as f32
        } else {
            0.0
        }
    }
}

/// Render a whole sequence into mono samples at [`SAMPLE_RATE`].
pub fn render<R: Rng>(seq: &mut FrameSequence, rng: &mut R) -> Vec<f32> {
    let budget = seq.total_samples().min(MAX_UTTERANCE_SAMPLES);
    let mut out = Vec::with_capacity(budget);

    'frames: for frame in seq.frames_mut() {
        frame.reset();
        while !frame.is_exhausted() {
            if out.len() >= MAX_UTTERANCE_SAMPLES {
                break 'frames;
            }
            out.push(frame.next_sample(rng));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::formant::phoneme::Phoneme;
    use crate::engines::formant::sequence::{build_english, BuildConfig};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cfg() -> BuildConfig {
        BuildConfig {
            speed: 1.0,
            base_pitch_hz: 120.0,
            whisper: false,
        }
    }

    #[test]
    fn clipper_is_transparent_inside_unit_range() {
        assert_eq!(soft_clip(0.9), 0.9);
        assert_eq!(soft_clip(-0.5), -0.5);
        assert_eq!(soft_clip(0.0), 0.0);
        for x in [1.5, 4.0, 100.0] {
            assert!(soft_clip(x) < 1.0 && soft_clip(x) >= 0.0);
            assert_eq!(soft_clip(-x), -soft_clip(x));
        }
    }

    #[test]
    fn silence_renders_zeros() {
        let mut frame = SynthesisFrame::silence(0.05, 1.0);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..frame.total_samples() {
            assert_eq!(frame.next_sample(&mut rng), 0.0);
        }
    }

    #[test]
    fn vowel_produces_bounded_nonzero_audio() {
        let def = Phoneme::Aa.def();
        let mut frame = SynthesisFrame::new(&def, 120.0, 0.1, 1.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let samples: Vec<f32> = (0..frame.total_samples())
            .map(|_| frame.next_sample(&mut rng))
            .collect();
        assert!(samples.iter().any(|s| s.abs() > 0.01));
        assert!(samples.iter().all(|s| s.abs() <= 1.0 && s.is_finite()));
    }

    #[test]
    fn envelope_silences_frame_edges() {
        let def = Phoneme::Iy.def();
        let mut frame = SynthesisFrame::new(&def, 120.0, 0.2, 1.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let first = frame.next_sample(&mut rng);
        assert!(first.abs() < 0.05);
    }

    #[test]
    fn seeded_render_is_deterministic() {
        let mut a_rng = Pcg32::seed_from_u64(99);
        let mut b_rng = Pcg32::seed_from_u64(99);
        let mut a = build_english("hello world", None, &cfg(), &mut a_rng).unwrap();
        let mut b = build_english("hello world", None, &cfg(), &mut b_rng).unwrap();
        let mut a_rng2 = Pcg32::seed_from_u64(5);
        let mut b_rng2 = Pcg32::seed_from_u64(5);
        assert_eq!(render(&mut a, &mut a_rng2), render(&mut b, &mut b_rng2));
    }

    #[test]
    fn render_length_matches_sequence() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut seq = build_english("ok", None, &cfg(), &mut rng).unwrap();
        let expected = seq.total_samples();
        let out = render(&mut seq, &mut rng);
        assert_eq!(out.len(), expected);
    }
}
