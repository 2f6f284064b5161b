//! Show simulation command

use super::playback::{play, print_report, OutputFormat};
use anyhow::{Context, Result};
use pyro_core::Vec3;
use pyro_particles::{FireworkSystem, ShowFile};
use std::path::Path;

pub struct SimulateArgs {
    pub show: String,
    pub fps: u32,
    pub seconds: Option<f32>,
    pub seed: u32,
    pub origin: [f32; 3],
    pub format: OutputFormat,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let show = ShowFile::load(Path::new(&args.show))
        .with_context(|| format!("Failed to load show '{}'", args.show))?;

    for (index, err) in show.invalid_entries() {
        log::warn!("firework #{index} will be rejected: {err}");
    }

    // Run one second past the last expiry unless told otherwise
    let max_time = args
        .seconds
        .map(|s| s as f64)
        .unwrap_or(show.running_time() as f64 + 1.0);

    if args.format == OutputFormat::Text {
        println!(
            "Simulating '{}': {} firework(s) at {} fps",
            args.show,
            show.fireworks.len(),
            args.fps
        );
    }

    let system = FireworkSystem::from_show(show, args.seed, Vec3::from_array(args.origin))
        .context("Invalid [settings] in show")?;
    let report = play(system, args.fps, max_time)?;
    print_report(&report, args.format)
}
