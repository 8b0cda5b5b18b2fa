//! handswarm runner
//!
//! Builds a swarm from a JSON config, plays a scripted hand through it on a
//! detector thread and logs how the particles respond.
//!
//! Usage: `handswarm-runner [config.json] [--dump-config out.json]`
//!
//! Set `RUST_LOG=debug` (or `trace`) for more detail.

mod config;
mod script;

use config::RunnerConfig;
use handswarm::prelude::*;
use script::ScriptedHand;
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

fn build_swarm(config: &RunnerConfig) -> Result<Swarm, Box<dyn std::error::Error>> {
    let font = BitmapFont::default();
    let sampler = MaskSampler::default();

    let mut builder = SwarmBuilder::from_config(config.swarm.clone());
    for (&selector, path) in &config.masks {
        let points = sampler.sample_file(path)?;
        let target = GlyphTarget::new(points).ok_or_else(|| GlyphError::EmptyTarget {
            text: path.display().to_string(),
        })?;
        builder = builder.with_glyph(selector, target);
    }
    for (&selector, text) in &config.texts {
        if config.masks.contains_key(&selector) {
            continue;
        }
        builder = builder.with_text(selector, text, &font);
    }
    Ok(builder.build()?)
}

fn run(config: RunnerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut swarm = build_swarm(&config)?;
    log::info!(
        "swarm ready: {} particles, shapes {:?}",
        swarm.particle_count(),
        swarm.glyphs().selectors().map(|s| s.0).collect::<Vec<_>>()
    );

    let classifier = GestureClassifier::new(config.swarm.gesture, config.swarm.camera);
    let mut latch = spawn_classifier(
        ScriptedHand {
            steps: config.script.clone(),
            interval: Duration::from_millis(config.detector_interval_ms),
            gesture: config.swarm.gesture,
        },
        classifier,
    );

    let mut clock = FrameClock::new(config.swarm.max_delta);
    let pacing = Duration::from_secs_f32(config.frame_delta.max(0.0));
    let log_every = config.log_every.max(1);

    for frame in 1..=config.frames {
        thread::sleep(pacing);
        let signals = latch.latest();
        let stats = swarm.tick_with_stats(&signals, clock.tick());

        if frame % log_every == 0 {
            log::info!(
                "frame {:>5} | shape {} | open {:.2} | pointer {} | target dist {:8.3} | max move {:7.3} | {:.0} fps",
                frame,
                stats.shape.0,
                signals.openness(),
                if signals.pointer().is_some() { "yes" } else { "no " },
                stats.mean_target_distance,
                stats.max_displacement,
                clock.fps()
            );
        }
    }

    if let Some(bad) = swarm.positions().iter().position(|p| !p.is_finite()) {
        log::error!("particle {} ended with a non-finite position", bad);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;
    let mut dump_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dump-config" => {
                i += 1;
                dump_path = args.get(i).map(PathBuf::from);
            }
            other => config_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => match RunnerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("no config given, using the built-in demo script");
            RunnerConfig::default()
        }
    };

    if let Some(path) = dump_path {
        if let Err(e) = config.save(&path) {
            log::error!("failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
        log::info!("wrote config to {}", path.display());
        return;
    }

    if let Err(e) = run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
