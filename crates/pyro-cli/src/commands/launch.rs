//! Single firework launch command

use super::playback::{play, print_report, OutputFormat};
use anyhow::{Context, Result};
use pyro_core::{Color, FireworkType, Vec3};
use pyro_particles::{EmitterConfig, EmitterRegistry, FireworkSystem, KinematicsSettings};

pub struct LaunchArgs {
    pub firework_type: String,
    pub color: String,
    pub duration: f32,
    pub particles: usize,
    pub origin: [f32; 3],
    pub trail: Option<usize>,
    pub streaks: Option<usize>,
    pub seed: u32,
    pub fps: u32,
    pub format: OutputFormat,
}

pub fn run(args: LaunchArgs) -> Result<()> {
    let config = config_from_args(&args)?;
    config
        .validate()
        .with_context(|| format!("Cannot launch {}", config.firework_type))?;

    let registry = EmitterRegistry::new(KinematicsSettings::default(), args.seed)?;
    let mut system = FireworkSystem::new(registry, Vec3::ZERO);
    let max_time = config.duration as f64 + 1.0;
    system.queue([config]);

    let report = play(system, args.fps, max_time)?;
    print_report(&report, args.format)
}

fn config_from_args(args: &LaunchArgs) -> Result<EmitterConfig> {
    let color = Color::parse(&args.color)
        .with_context(|| format!("Invalid --color '{}'", args.color))?;
    Ok(EmitterConfig {
        firework_type: FireworkType::from_name_or_default(&args.firework_type),
        color,
        duration: args.duration,
        particle_count: args.particles,
        origin: Vec3::from_array(args.origin),
        trail: args.trail,
        streaks: args.streaks,
        ..Default::default()
    })
}
