//! Example: Find and stitch a loop in a synthetic sustained tone
//!
//! Usage:
//!   cargo run --release --example stitch_synthetic -- [--freq HZ] [--overlap L] [--curve NAME] [--json]
//!
//! Notes:
//! - The tone is one second of a decaying two-partial note at 48 kHz.
//! - The search range is [2000, 46000), as for a note with attack and release trimmed off.
//! - Set RUST_LOG=debug to see the search diagnostics.
//! - The full-size search takes a few seconds even in release builds.

use loopseam::{analyze_sample, CrossfadeCurve, LoopStitcher, StitchConfig, SummaryConfig};
use std::env;
use std::f64::consts::PI;

const SAMPLE_RATE: u32 = 48000;

fn synth_tone(freq: f64, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let env = (-0.4 * t).exp();
            let phase = 2.0 * PI * freq * t;
            (0.5 * env * (phase.sin() + 0.3 * (2.0 * phase).sin())) as f32
        })
        .collect()
}

fn parse_curve(name: &str) -> Result<CrossfadeCurve, Box<dyn std::error::Error>> {
    match name {
        "equalPower" | "equal-power" => Ok(CrossfadeCurve::EqualPower),
        "smoothstep" => Ok(CrossfadeCurve::Smoothstep),
        "hann" => Ok(CrossfadeCurve::Hann),
        other => Err(format!("unknown curve '{other}' (equalPower, smoothstep, hann)").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut freq = 220.0f64;
    let mut overlap = 1024usize;
    let mut curve = CrossfadeCurve::EqualPower;
    let mut json = false;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--freq" => {
                freq = args.first().ok_or("--freq requires a value")?.parse()?;
                args.remove(0);
            }
            "--overlap" => {
                overlap = args.first().ok_or("--overlap requires a value")?.parse()?;
                args.remove(0);
            }
            "--curve" => {
                curve = parse_curve(args.first().ok_or("--curve requires a value")?)?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: stitch_synthetic [--freq HZ] [--overlap L] [--curve NAME] [--json]\n\
                     \n\
                     --freq HZ      Tone frequency (default: 220)\n\
                     --overlap L    Seam length in samples (default: 1024)\n\
                     --curve NAME   equalPower | smoothstep | hann (default: equalPower)\n\
                     --json         Print the loop record as JSON\n"
                );
                return Ok(());
            }
            other => {
                eprintln!("ERROR: unexpected argument '{other}'. Use --help for usage.");
                std::process::exit(2);
            }
        }
    }

    let mut samples = synth_tone(freq, SAMPLE_RATE as usize);
    let stitcher = LoopStitcher::new(StitchConfig::with_overlap(overlap))?;
    let found = stitcher.stitch_loop_in_place(&mut samples, 2000, 46000, curve)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found.record())?);
        return Ok(());
    }

    println!(
        "Loop: {} -> {} ({} samples, {:.1} ms)",
        found.start,
        found.end,
        found.len(),
        found.len() as f64 * 1000.0 / SAMPLE_RATE as f64
    );
    println!(
        "Scores: J={:.6} amp={:.6} slope={:.6} spec={:.3}",
        found.scores.composite, found.scores.amplitude, found.scores.slope, found.scores.spectral
    );
    println!(
        "Seam: {:?} over {} samples, tail shift {}",
        found.curve, found.overlap, found.shift
    );

    let summary = analyze_sample(
        &samples,
        SAMPLE_RATE,
        &SummaryConfig {
            loop_search: None,
            ..Default::default()
        },
    )?;
    println!(
        "Sample: {:.2} s, rms={:.3}, peak={:.3}, centroid={:.0} Hz, flatness={:.3}",
        summary.duration_seconds, summary.rms, summary.peak, summary.centroid_hz, summary.flatness
    );

    Ok(())
}
