//! Show validation command

use anyhow::{bail, Context, Result};
use pyro_particles::ShowFile;
use std::path::Path;

pub fn run(path: &str) -> Result<()> {
    let show = ShowFile::load(Path::new(path))
        .with_context(|| format!("Failed to load show '{}'", path))?;

    let invalid = show.invalid_entries();
    for (index, err) in &invalid {
        let config = &show.fireworks[*index];
        println!("  #{index} {}: {err}", config.firework_type);
    }

    if !invalid.is_empty() {
        bail!(
            "{} of {} firework(s) would be rejected",
            invalid.len(),
            show.fireworks.len()
        );
    }

    println!(
        "'{}' is valid: {} firework(s), {:.2}s running time",
        path,
        show.fireworks.len(),
        show.running_time()
    );
    Ok(())
}
