//! Pyro CLI - Headless firework show simulator

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{launch, playback::OutputFormat, simulate, types, validate};

#[derive(Parser)]
#[command(name = "pyro")]
#[command(about = "Simulate firework shows without a renderer", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a show file to completion and report what happened
    Simulate {
        /// Path to show file
        show: String,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Stop after this many seconds even if fireworks are still live
        #[arg(long)]
        seconds: Option<f32>,

        /// Random seed; equal seeds replay identically
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Scene origin every launch is offset by (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        origin: [f32; 3],

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Launch a single firework
    Launch {
        /// Firework type (see `pyro types`)
        #[arg(long = "type", default_value = "default")]
        firework_type: String,

        /// Color as #rrggbb
        #[arg(long, default_value = "#ff0000")]
        color: String,

        /// Lifetime in seconds
        #[arg(long, default_value = "3")]
        duration: f32,

        /// Number of particles
        #[arg(long, default_value = "100")]
        particles: usize,

        /// Launch position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        origin: [f32; 3],

        /// Record a trail with this many samples per particle
        #[arg(long)]
        trail: Option<usize>,

        /// Draw this many streak layers
        #[arg(long)]
        streaks: Option<usize>,

        #[arg(long, default_value = "1")]
        seed: u32,

        #[arg(long, default_value = "60")]
        fps: u32,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a show file and check every entry
    Validate {
        /// Path to show file
        show: String,
    },

    /// List firework types and their burst profiles
    Types,
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, 2) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags when set
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose, cli.quiet))
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Simulate {
            show,
            fps,
            seconds,
            seed,
            origin,
            format,
        } => simulate::run(simulate::SimulateArgs {
            show,
            fps,
            seconds,
            seed,
            origin,
            format,
        }),
        Commands::Launch {
            firework_type,
            color,
            duration,
            particles,
            origin,
            trail,
            streaks,
            seed,
            fps,
            format,
        } => launch::run(launch::LaunchArgs {
            firework_type,
            color,
            duration,
            particles,
            origin,
            trail,
            streaks,
            seed,
            fps,
            format,
        }),
        Commands::Validate { show } => validate::run(&show),
        Commands::Types => types::run(),
    }
}
