//! Final conditioning of rendered audio.
//!
//! Runs once per utterance: sanitize, normalize to a headroom target,
//! smooth the synthesis hash above ~5 kHz, remove DC, and limit.

use super::frame::SAMPLE_RATE;

/// Peak target below full scale, in dB.
const HEADROOM_DB: f32 = 1.0;

/// Cutoff of the smoothing lowpass, Hz.
const SMOOTHING_CUTOFF_HZ: f32 = 5_200.0;

/// DC blocker pole radius.
const DC_POLE: f32 = 0.995;

/// Scale samples so the absolute peak sits `headroom_db` below full scale.
///
/// Silent buffers are left untouched.
fn normalize(samples: &mut [f32], headroom_db: f32) {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak <= f32::EPSILON {
        return;
    }
    let target = 10.0f32.powf(-headroom_db / 20.0);
    let gain = target / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }
}

/// One-pole lowpass applied twice for a steeper rolloff.
fn smooth(samples: &mut [f32]) {
    let k = 1.0 - (-std::f32::consts::TAU * SMOOTHING_CUTOFF_HZ / SAMPLE_RATE as f32).exp();
    let mut y1 = 0.0f32;
    let mut y2 = 0.0f32;
    for s in samples.iter_mut() {
        y1 += k * (*s - y1);
        y2 += k * (y1 - y2);
        *s = y2;
    }
}

/// Standard first-order DC blocker.
fn remove_dc(samples: &mut [f32]) {
    let mut x1 = 0.0f32;
    let mut y1 = 0.0f32;
    for s in samples.iter_mut() {
        let y = *s - x1 + DC_POLE * y1;
        x1 = *s;
        y1 = y;
        *s = y;
    }
}

/// Condition a rendered utterance in place.
pub fn finalize(samples: &mut [f32]) {
    for s in samples.iter_mut() {
        if !s.is_finite() {
            *s = 0.0;
        }
    }
    normalize(samples, HEADROOM_DB);
    smooth(samples);
    remove_dc(samples);
    for s in samples.iter_mut() {
        *s = s.tanh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_stays_silent() {
        let mut buf = vec![0.0f32; 256];
        finalize(&mut buf);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn output_is_bounded_and_finite() {
        let mut buf: Vec<f32> = (0..1024)
            .map(|i| ((i as f32 * 0.3).sin() * 4.0))
            .collect();
        buf[10] = f32::NAN;
        buf[11] = f32::INFINITY;
        finalize(&mut buf);
        assert!(buf.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn normalize_hits_headroom_target() {
        let mut buf = vec![0.0f32; 64];
        buf[32] = 0.1;
        normalize(&mut buf, 1.0);
        let peak = buf.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 10.0f32.powf(-1.0 / 20.0)).abs() < 1e-4);
    }

    #[test]
    fn dc_offset_is_removed() {
        let mut buf = vec![0.5f32; 4096];
        remove_dc(&mut buf);
        let tail_mean: f32 = buf[2048..].iter().sum::<f32>() / 2048.0;
        assert!(tail_mean.abs() < 0.01);
    }
}
