//! Level validation command

use anyhow::{Context, Result};
use hinge_mover::loader::load_level_from_file;
use std::path::Path;

pub fn run(level: &str) -> Result<()> {
    let level = load_level_from_file(Path::new(level))
        .with_context(|| format!("Failed to load level {}", level))?;

    println!("Level: {}", level.settings.name);
    println!(
        "Tick rate: {} Hz{}",
        level.settings.tick_rate,
        if level.settings.legacy_movers {
            " (legacy movers)"
        } else {
            ""
        }
    );
    println!("Movers: {}", level.movers.len());

    for mover in &level.movers {
        let hold = mover
            .stop_completely_at_keyframe
            .map(|k| format!(", holds at {}", k))
            .unwrap_or_default();
        println!(
            "  {} {} — {:?} {:?}, {} keyframe(s), starts at {}{}{}",
            mover.id,
            mover.name,
            mover.kind,
            mover.move_type,
            mover.keyframes().len(),
            mover.start_at_keyframe,
            hold,
            if mover.door { ", door" } else { "" }
        );
    }

    if !level.script.is_empty() {
        println!("Script entries: {}", level.script.len());
    }
    println!("OK");
    Ok(())
}
