//! Headless playback shared by `simulate` and `launch`

use anyhow::{bail, Result};
use pyro_particles::FireworkSystem;
use pyro_runtime::{FrameDriver, RuntimeSystem, SceneGraph, ShowEvent};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// State of the show at the end of one simulated second
#[derive(Debug, Default, Serialize)]
pub struct SecondSummary {
    pub second: u32,
    pub live: usize,
    pub particles: usize,
    pub spawned: usize,
    pub destroyed: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct PlaybackReport {
    pub frames: u64,
    pub seconds: f64,
    pub peak_particles: usize,
    pub launched: usize,
    pub rejected: usize,
    pub bursts: usize,
    pub destroyed: usize,
    /// Scene primitives still alive after shutdown
    pub leaked: usize,
    pub timeline: Vec<SecondSummary>,
    pub events: Vec<ShowEvent>,
}

impl PlaybackReport {
    fn record_events(&mut self, events: Vec<ShowEvent>) {
        for event in &events {
            match event {
                ShowEvent::Launched { .. } => self.launched += 1,
                ShowEvent::Rejected { .. } => self.rejected += 1,
                ShowEvent::Burst { .. } => self.bursts += 1,
                ShowEvent::Destroyed { .. } => self.destroyed += 1,
                ShowEvent::Scheduled { .. } => {}
            }
        }
        self.events.extend(events);
    }
}

/// Step `system` at `fps` until it is idle or `max_time` seconds have passed
pub fn play(system: FireworkSystem, fps: u32, max_time: f64) -> Result<PlaybackReport> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    let dt = 1.0 / fps as f64;
    let mut driver = FrameDriver::new(system);
    let mut scene = SceneGraph::new();
    let mut report = PlaybackReport::default();
    let mut current = SecondSummary::default();

    loop {
        driver.step(&mut scene, dt)?;

        let tick = driver.system().last_report();
        current.spawned += tick.spawned.len();
        current.destroyed += tick.destroyed.len();
        current.live = tick.live;
        current.particles = tick.particles;
        report.peak_particles = report.peak_particles.max(tick.particles);

        let events = driver.system_mut().registry_mut().drain_events();
        report.record_events(events);

        let elapsed = driver.clock.total_time;
        let done = driver.system().is_idle() || elapsed >= max_time;
        if elapsed.floor() as u32 > current.second || done {
            let next = SecondSummary {
                second: current.second + 1,
                ..Default::default()
            };
            report.timeline.push(std::mem::replace(&mut current, next));
        }
        if done {
            break;
        }
    }

    report.frames = driver.clock.frame_count;
    report.seconds = driver.clock.total_time;

    driver.shutdown(&mut scene)?;
    let events = driver.system_mut().registry_mut().drain_events();
    report.record_events(events);
    report.leaked = scene.live_count();
    if report.leaked > 0 {
        log::warn!("{} scene primitive(s) still live after shutdown", report.leaked);
    }

    Ok(report)
}

pub fn print_report(report: &PlaybackReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            for s in &report.timeline {
                println!(
                    "  t={:>3}s  live {:>3}  particles {:>6}  +{} -{}",
                    s.second, s.live, s.particles, s.spawned, s.destroyed
                );
            }
            println!(
                "\n{} frame(s), {:.2}s: {} launched, {} rejected, {} burst(s), {} destroyed",
                report.frames,
                report.seconds,
                report.launched,
                report.rejected,
                report.bursts,
                report.destroyed
            );
            println!("Peak particles: {}", report.peak_particles);
        }
    }
    Ok(())
}
