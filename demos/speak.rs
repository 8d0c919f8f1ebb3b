use std::path::PathBuf;
use std::time::Instant;

use formant_tts::{
    engines::formant::{FormantEngine, FormantSynthesisParamsBuilder},
    SynthesisEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut engine = FormantEngine::new();

    let text = "Hello! This is a rule based formant synthesizer. \
                It speaks English and Russian with no model files at all, \
                and it can even count: 1, 2, 3, 45, 167.";

    let params = FormantSynthesisParamsBuilder::default()
        .speed(1.0)
        .pitch_hz(120.0)
        .build()?;

    let synth_start = Instant::now();
    let result = engine.synthesize(text, Some(params))?;
    let synth_dur = synth_start.elapsed();

    let audio_duration = result.duration_secs();
    let speedup = audio_duration / synth_dur.as_secs_f64();
    println!(
        "Synthesized {:.2}s audio in {:.2?} ({:.1}x real-time)",
        audio_duration, synth_dur, speedup
    );

    engine.synthesize_to_file(text, &PathBuf::from("output.wav"), None)?;
    println!("Saved to output.wav");

    engine.synthesize_to_file(
        "Привет, мир! Это синтез речи по формантным правилам.",
        &PathBuf::from("output_ru.wav"),
        None,
    )?;
    println!("Saved to output_ru.wav");

    Ok(())
}
