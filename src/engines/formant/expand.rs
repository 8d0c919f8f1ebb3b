//! Phone expansion: one phoneme becomes the sub-phonemic frames that make
//! it audible.
//!
//! Stops get a closure, an aspiration interval, and a release burst.
//! Fricatives get a soft onset, a steady body, and a soft offset. Vowels
//! following a stop get a short formant transition before the steady state.
//! Prosody scaling applies to the steady portions only; closures, bursts
//! and transitions keep their articulatory timing.

use rand::Rng;

use super::frame::SynthesisFrame;
use super::phoneme::{Phoneme, PhonemeClass, PhonemeDef};
use super::prosody::ProsodyEntry;

/// Length of the release burst of a plosive.
const BURST_SECS: f64 = 0.009_5;

/// Closure held before an affricate's frication release.
const AFFRICATE_CLOSURE_SECS: f64 = 0.060;

/// Formant transition out of a stop into a following vowel.
const TRANSITION_SECS: f64 = 0.028;

/// Shortest steady vowel or fricative body, post-scaling.
const MIN_STEADY_SECS: f64 = 0.030;

/// Per-frame pitch perturbation, as a fraction of the prosodic target.
const JITTER: f64 = 0.03;

fn jittered_pitch<R: Rng>(prosody: &ProsodyEntry, rng: &mut R) -> f64 {
    prosody.pitch_hz * (1.0 + rng.gen_range(-JITTER..=JITTER))
}

/// A silent (or murmured, if voiced) stop closure.
fn closure_frame<R: Rng>(
    def: &PhonemeDef,
    duration: f64,
    prosody: &ProsodyEntry,
    speed: f64,
    rng: &mut R,
) -> SynthesisFrame {
    let closure = PhonemeDef {
        class: PhonemeClass::Stop,
        amp: def.amp * 0.25,
        ..*def
    };
    let mut frame = SynthesisFrame::new(&closure, jittered_pitch(prosody, rng), duration, speed);
    frame.set_burst(0);
    frame
}

/// Expand one phoneme into renderable frames, appending to `frames`.
///
/// `def` is the coarticulated (and possibly whispered) definition for
/// `cur`; `next_def` is the same for the following phoneme when there is
/// one. `prev` is the previous phoneme before coarticulation.
pub fn expand_phone<R: Rng>(
    prev: Option<Phoneme>,
    cur: Phoneme,
    def: &PhonemeDef,
    next_def: Option<&PhonemeDef>,
    prosody: &ProsodyEntry,
    speed: f64,
    frames: &mut Vec<SynthesisFrame>,
    rng: &mut R,
) {
    let amp = def.amp * prosody.amp_scale;

    if cur.is_affricate() {
        frames.push(closure_frame(def, AFFRICATE_CLOSURE_SECS, prosody, speed, rng));

        let release = PhonemeDef {
            class: PhonemeClass::Fricative,
            amp,
            ..*def
        };
        let release_dur = (def.duration * prosody.duration_scale).max(0.040);
        frames.push(SynthesisFrame::new(
            &release,
            jittered_pitch(prosody, rng),
            release_dur,
            speed,
        ));
        return;
    }

    if let Some(place) = cur.stop_place() {
        frames.push(closure_frame(def, place.closure_secs(), prosody, speed, rng));

        if !def.voiced {
            // Aspiration colored by the upcoming vowel, if any
            let (asp_f1, asp_f2) = match next_def {
                Some(n) if n.class == PhonemeClass::Vowel => (n.f2, n.f3),
                _ => (1500.0, 3000.0),
            };
            let aspiration = PhonemeDef {
                f1: asp_f1,
                f2: asp_f2,
                f3: 0.0,
                class: PhonemeClass::Fricative,
                amp: 0.30 * prosody.amp_scale,
                voiced: false,
                ..*def
            };
            frames.push(SynthesisFrame::new(
                &aspiration,
                jittered_pitch(prosody, rng),
                place.vot_secs(),
                speed,
            ));
        }

        let (burst_f1, burst_f2) = place.burst_bands();
        let burst = PhonemeDef {
            f1: burst_f1,
            f2: burst_f2,
            f3: 0.0,
            class: PhonemeClass::Stop,
            amp: (amp * 1.3).min(1.5),
            ..*def
        };
        let mut frame =
            SynthesisFrame::new(&burst, jittered_pitch(prosody, rng), BURST_SECS, speed);
        frame.set_burst(frame.total_samples());
        frames.push(frame);
        return;
    }

    if def.class == PhonemeClass::Fricative {
        let onset = PhonemeDef { amp: amp * 0.30, ..*def };
        frames.push(SynthesisFrame::new(
            &onset,
            jittered_pitch(prosody, rng),
            0.010,
            speed,
        ));

        let body_dur = (def.duration * prosody.duration_scale - 0.022).max(MIN_STEADY_SECS);
        let body = PhonemeDef { amp, ..*def };
        frames.push(SynthesisFrame::new(
            &body,
            jittered_pitch(prosody, rng),
            body_dur,
            speed,
        ));

        let offset = PhonemeDef { amp: amp * 0.22, ..*def };
        frames.push(SynthesisFrame::new(
            &offset,
            jittered_pitch(prosody, rng),
            0.012,
            speed,
        ));
        return;
    }

    if def.class == PhonemeClass::Vowel || def.class == PhonemeClass::Consonant {
        // Coming out of a stop, interpolate formants from the burst locus
        if let Some(place) = prev.and_then(Phoneme::stop_place) {
            let transition = PhonemeDef {
                f1: def.f1 * 0.775,
                f2: (place.locus_hz() + def.f2) / 2.0,
                amp: amp * 0.8,
                ..*def
            };
            frames.push(SynthesisFrame::new(
                &transition,
                jittered_pitch(prosody, rng),
                TRANSITION_SECS,
                speed,
            ));
        }

        let steady_dur = (def.duration * prosody.duration_scale).max(MIN_STEADY_SECS);
        let steady = PhonemeDef { amp, ..*def };
        frames.push(SynthesisFrame::new(
            &steady,
            jittered_pitch(prosody, rng),
            steady_dur,
            speed,
        ));
        return;
    }

    // Silence and anything unclassified renders as a single frame as-is
    frames.push(SynthesisFrame::new(
        def,
        jittered_pitch(prosody, rng),
        def.duration,
        speed,
    ));
}
