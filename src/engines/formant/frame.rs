//! Synthesis frames and the resonant filters they own.
//!
//! A [`SynthesisFrame`] is the atomic renderable unit: a sample count, an
//! acoustic class, formant targets, the biquad filter bank tuned to them,
//! and the oscillator/noise/envelope state the render loop mutates. Filter
//! coefficients use the Audio EQ Cookbook formulas.

use std::f64::consts::PI;

use super::phoneme::{PhonemeClass, PhonemeDef};

/// Fixed operating sample rate of the formant engine.
pub const SAMPLE_RATE: u32 = 16_000;

/// Shortest frame the renderer will accept.
const MIN_FRAME_SAMPLES: usize = 2;

/// Burst length for stop frames built directly from the catalog.
const DEFAULT_BURST_SECS: f64 = 0.018;

/// Biquad filter: coefficients plus owned two-sample memory.
///
/// Each frame carries its own filter state, so independent sequences render
/// without interfering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Bandpass (constant skirt gain) centered at `center` Hz.
    ///
    /// A non-positive center or Q yields a muted filter rather than a NaN
    /// cascade.
    pub fn bandpass(center: f64, q: f64, sample_rate: f64) -> Self {
        if center <= 0.0 || q <= 0.0 || center >= sample_rate / 2.0 {
            return Self::default();
        }
        let omega = 2.0 * PI * center / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let cos_omega = omega.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
            ..Self::default()
        }
    }

    /// Butterworth-style lowpass with cutoff at `cutoff` Hz.
    pub fn lowpass(cutoff: f64, sample_rate: f64) -> Self {
        if cutoff <= 0.0 || cutoff >= sample_rate / 2.0 {
            return Self::default();
        }
        let omega = 2.0 * PI * cutoff / sample_rate;
        let alpha = omega.sin() / (2.0 * 0.707);
        let cos_omega = omega.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_omega) / (2.0 * a0),
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / (2.0 * a0),
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
            ..Self::default()
        }
    }

    /// Run one sample through the filter, updating its memory.
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Clear the filter memory, keeping the coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Runtime state for one synthesized segment.
///
/// Created by the phone expander or sequence builder, mutated only by the
/// render loop, discarded with its utterance.
#[derive(Debug, Clone)]
pub struct SynthesisFrame {
    pub(super) total_samples: usize,
    pub(super) position: usize,
    pub(super) class: PhonemeClass,
    pub(super) voiced: bool,
    pub(super) amplitude: f64,
    pub(super) formants: [f64; 3],

    // Glottal source state
    pub(super) pitch_hz: f64,
    pub(super) phase: f64,
    pub(super) glottal_max_h: usize,
    pub(super) glottal_norm: f64,

    // Filter bank: up to three formant resonators plus a smoothing lowpass
    pub(super) resonators: [Biquad; 3],
    pub(super) smoother: Biquad,

    // Noise / burst state
    pub(super) noise_hp: f64,
    pub(super) burst_total: usize,
    pub(super) burst_remaining: usize,

    // Envelope boundaries, in samples
    pub(super) attack_samples: usize,
    pub(super) release_samples: usize,
}

impl SynthesisFrame {
    /// Build a frame from a (coarticulated) phoneme definition.
    ///
    /// `duration_secs` is the frame's own duration before speed scaling;
    /// `pitch_hz` already includes prosody and jitter.
    pub fn new(def: &PhonemeDef, pitch_hz: f64, duration_secs: f64, speed: f64) -> Self {
        let sr = f64::from(SAMPLE_RATE);
        let total_samples =
            ((duration_secs * sr / speed) as usize).max(MIN_FRAME_SAMPLES);

        let pitch_hz = pitch_hz.clamp(50.0, 400.0);
        let glottal_max_h = ((sr / (2.0 * pitch_hz)) as usize).clamp(1, 40);
        let glottal_norm: f64 = (1..=glottal_max_h).map(|h| 1.0 / h as f64).sum();
        let glottal_norm = if glottal_norm > 0.0 { glottal_norm } else { 1.0 };

        let burst_total = if def.class == PhonemeClass::Stop {
            ((DEFAULT_BURST_SECS * sr) as usize).min(total_samples)
        } else {
            0
        };

        let attack_samples = ((total_samples as f64 * 0.14) as usize).max(3);
        let min_release = (DEFAULT_BURST_SECS * sr) as usize;
        let release_samples = ((total_samples as f64 * 0.22) as usize)
            .max(min_release)
            .min(total_samples / 2)
            .max(2);

        // Sharper resonances at higher pitch sound buzzy; scale Q down
        let q_scale = (pitch_hz / 130.0).clamp(0.5, 1.0);

        let (resonators, smoother) = match def.class {
            PhonemeClass::Vowel => (
                [
                    Biquad::bandpass(def.f1, 7.0 * q_scale + 1.0, sr),
                    Biquad::bandpass(def.f2, 9.0 * q_scale + 1.0, sr),
                    Biquad::bandpass(def.f3, 12.0 * q_scale + 1.0, sr),
                ],
                Biquad::default(),
            ),
            PhonemeClass::Fricative => {
                let fc1 = if def.f1 > 0.0 { def.f1 } else { 3000.0 };
                let fc2 = if def.f2 > 0.0 { def.f2 } else { fc1 * 1.3 };
                let lp_fc = if fc1 < 3500.0 { fc1 * 0.80 } else { 2800.0 };
                (
                    [
                        Biquad::bandpass(fc1, 2.5, sr),
                        Biquad::bandpass(fc2, 2.0, sr),
                        Biquad::default(),
                    ],
                    Biquad::lowpass(lp_fc, sr),
                )
            }
            PhonemeClass::Consonant => {
                let fc1 = if def.f1 > 0.0 { def.f1 } else { 400.0 };
                let fc2 = if def.f2 > 0.0 { def.f2 } else { 1200.0 };
                (
                    [
                        Biquad::bandpass(fc1, 5.0 * q_scale + 1.0, sr),
                        Biquad::bandpass(fc2, 6.0 * q_scale + 1.0, sr),
                        Biquad::default(),
                    ],
                    Biquad::lowpass(3000.0, sr),
                )
            }
            PhonemeClass::Stop => {
                let fc1 = if def.f1 > 0.0 { def.f1 } else { 600.0 };
                let fc2 = if def.f2 > 0.0 { def.f2 } else { 1800.0 };
                (
                    [
                        Biquad::bandpass(fc1, 3.5, sr),
                        Biquad::bandpass(fc2, 3.0, sr),
                        Biquad::default(),
                    ],
                    Biquad::lowpass(2500.0, sr),
                )
            }
            PhonemeClass::Silence => ([Biquad::default(); 3], Biquad::default()),
        };

        Self {
            total_samples,
            position: 0,
            class: def.class,
            voiced: def.voiced,
            amplitude: def.amp,
            formants: [def.f1, def.f2, def.f3],
            pitch_hz,
            phase: 0.0,
            glottal_max_h,
            glottal_norm,
            resonators,
            smoother,
            noise_hp: 0.0,
            burst_total,
            burst_remaining: burst_total,
            attack_samples,
            release_samples,
        }
    }

    /// A silent pause frame.
    pub fn silence(duration_secs: f64, speed: f64) -> Self {
        Self::new(&PhonemeDef::silence(duration_secs), 100.0, duration_secs, speed)
    }

    /// Shorten the frame to at most `samples`, keeping the release ramp and
    /// burst countdown inside the new length.
    pub fn truncate_to(&mut self, samples: usize) {
        self.total_samples = self.total_samples.min(samples.max(MIN_FRAME_SAMPLES));
        self.release_samples = self
            .release_samples
            .min(self.total_samples / 2)
            .max(2);
        self.burst_total = self.burst_total.min(self.total_samples);
        self.burst_remaining = self.burst_remaining.min(self.burst_total);
    }

    /// Make the entire frame a release burst (used for stop expansion).
    pub fn set_burst(&mut self, samples: usize) {
        let samples = samples.min(self.total_samples);
        self.burst_total = samples;
        self.burst_remaining = samples;
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn class(&self) -> PhonemeClass {
        self.class
    }

    pub fn is_voiced(&self) -> bool {
        self.voiced
    }

    pub fn formants(&self) -> [f64; 3] {
        self.formants
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.total_samples
    }

    /// Current envelope gain: linear attack, unity body, linear release.
    pub(super) fn envelope(&self) -> f64 {
        let n = self.position;
        let tail = self.total_samples.saturating_sub(n);
        if n < self.attack_samples {
            n as f64 / (self.attack_samples + 1) as f64
        } else if tail < self.release_samples {
            tail as f64 / (self.release_samples + 1) as f64
        } else {
            1.0
        }
    }

    /// Rewind position and clear all mutable render state.
    pub fn reset(&mut self) {
        self.position = 0;
        self.phase = 0.0;
        self.noise_hp = 0.0;
        self.burst_remaining = self.burst_total;
        for r in &mut self.resonators {
            r.reset();
        }
        self.smoother.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::formant::phoneme::Phoneme;

    #[test]
    fn duration_scales_with_speed() {
        let def = Phoneme::Ae.def();
        let normal = SynthesisFrame::new(&def, 120.0, 0.2, 1.0);
        let fast = SynthesisFrame::new(&def, 120.0, 0.2, 2.0);
        assert_eq!(normal.total_samples(), 3200);
        assert_eq!(fast.total_samples(), 1600);
    }

    #[test]
    fn tiny_durations_are_floored() {
        let frame = SynthesisFrame::silence(0.000_01, 8.0);
        assert!(frame.total_samples() >= 2);
    }

    #[test]
    fn harmonic_count_respects_nyquist() {
        let def = Phoneme::Ae.def();
        let low = SynthesisFrame::new(&def, 60.0, 0.1, 1.0);
        // 16000 / (2 * 60) > 40, capped
        assert_eq!(low.glottal_max_h, 40);
        let high = SynthesisFrame::new(&def, 400.0, 0.1, 1.0);
        assert_eq!(high.glottal_max_h, 20);
        assert!(high.glottal_max_h as f64 * 400.0 <= f64::from(SAMPLE_RATE) / 2.0);
    }

    #[test]
    fn stop_frames_start_with_a_burst() {
        let def = Phoneme::T.def();
        let frame = SynthesisFrame::new(&def, 120.0, def.duration, 1.0);
        assert!(frame.burst_remaining > 0);
        let vowel = SynthesisFrame::new(&Phoneme::Ae.def(), 120.0, 0.1, 1.0);
        assert_eq!(vowel.burst_remaining, 0);
    }

    #[test]
    fn envelope_ramps_in_and_out() {
        let mut frame = SynthesisFrame::new(&Phoneme::Ae.def(), 120.0, 0.1, 1.0);
        assert!(frame.envelope() < 0.01);
        frame.position = frame.total_samples / 2;
        assert_eq!(frame.envelope(), 1.0);
        frame.position = frame.total_samples - 1;
        assert!(frame.envelope() < 0.05);
    }

    #[test]
    fn muted_bandpass_outputs_zero() {
        let mut degenerate = Biquad::bandpass(0.0, 2.0, 16_000.0);
        assert_eq!(degenerate.process(1.0), 0.0);
        let mut live = Biquad::bandpass(1000.0, 5.0, 16_000.0);
        let mut energy = 0.0;
        for _ in 0..64 {
            energy += live.process(1.0).abs();
        }
        assert!(energy > 0.0);
    }
}
