//! Firework type listing

use anyhow::Result;
use pyro_core::FireworkType;
use pyro_particles::kinematics::{BurstRadius, DepthTerm};
use pyro_particles::{profile_for, SpreadFamily};

pub fn run() -> Result<()> {
    println!(
        "{:<14} {:<7} {:>7} {:>6} {:>5} {:>6} {:>7} {:>6}",
        "type", "spread", "radius", "carry", "rate", "depth", "ascent", "2nd"
    );
    for firework_type in FireworkType::ALL {
        let profile = profile_for(firework_type);
        println!(
            "{:<14} {:<7} {:>7} {:>6} {:>5} {:>6} {:>7} {:>6}",
            firework_type.name(),
            format!("{:?}", SpreadFamily::of(firework_type)).to_lowercase(),
            radius_label(&profile.radius),
            profile.carry,
            profile.lateral_rate,
            depth_label(profile.depth, profile.depth_rate),
            if profile.has_ascent { "yes" } else { "no" },
            profile
                .second_burst
                .map_or_else(|| "-".to_string(), |r| format!("{r}")),
        );
    }
    Ok(())
}

fn radius_label(radius: &BurstRadius) -> String {
    match *radius {
        BurstRadius::Fixed(r) => format!("{r}"),
        BurstRadius::Jittered { min, span } => format!("{min}-{}", min + span),
    }
}

fn depth_label(depth: DepthTerm, rate: f32) -> String {
    match depth {
        DepthTerm::None => "-".to_string(),
        DepthTerm::Sin => format!("sin*{rate}"),
        DepthTerm::Cos => format!("cos*{rate}"),
    }
}
