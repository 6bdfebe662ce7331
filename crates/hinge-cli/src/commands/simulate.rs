//! Simulate command: runs a level's movers headless on the fixed-step clock

use anyhow::{Context, Result};
use hinge_mover::loader::load_level_from_file;
use hinge_mover::mover::MoverSnapshot;
use hinge_mover::MoverSystem;
use hinge_runtime::{EventBus, GameClock, GameEvent, RuntimeSystem};
use serde::Serialize;
use std::path::Path;

pub struct SimulateArgs {
    pub level: String,
    pub ticks: u64,
    pub every: u64,
    pub format: String,
    pub legacy: bool,
}

/// One line of JSON output
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a> {
    Snapshot {
        tick: u64,
        time: f64,
        #[serde(flatten)]
        mover: &'a MoverSnapshot,
    },
    Event {
        tick: u64,
        #[serde(flatten)]
        event: &'a GameEvent,
    },
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let level = load_level_from_file(Path::new(&args.level))
        .with_context(|| format!("Failed to load level {}", args.level))?;
    let json = args.format == "json";

    let mut system = MoverSystem::new(
        level.movers.clone(),
        level.settings.legacy_movers || args.legacy,
    );
    let mut events = EventBus::new();
    system
        .initialize(&mut events)
        .context("Failed to initialize movers")?;

    let mut clock = GameClock::with_fixed_timestep(level.settings.tick_rate);
    let dt = clock.fixed_timestep;
    tracing::info!(
        level = %level.settings.name,
        ticks = args.ticks,
        dt,
        strategy = system.strategy_name(),
        "simulation started"
    );

    if !json {
        println!(
            "Simulating '{}': {} mover(s), {} steps at {} Hz ({} strategy)",
            level.settings.name,
            system.movers().len(),
            args.ticks,
            level.settings.tick_rate,
            system.strategy_name()
        );
    }

    while clock.fixed_steps() < args.ticks {
        clock.advance(dt);
        while clock.should_fixed_update() && clock.fixed_steps() < args.ticks {
            let tick = clock.fixed_steps();
            for entry in level.script_at(tick) {
                system
                    .apply_script(entry, &mut events)
                    .with_context(|| format!("Script entry at tick {} failed", tick))?;
            }

            clock.consume_fixed_step();
            system.fixed_update(&mut events, dt)?;

            let tick = clock.fixed_steps();
            for event in events.drain() {
                emit_event(tick, &event, json)?;
            }
            if tick % args.every == 0 {
                for snapshot in system.snapshots() {
                    emit_snapshot(tick, clock.sim_time(), &snapshot, json)?;
                }
            }
        }
    }

    tracing::info!(
        steps = clock.fixed_steps(),
        sim_time = clock.sim_time(),
        "simulation finished"
    );
    system.shutdown()?;
    Ok(())
}

fn emit_snapshot(tick: u64, time: f64, snapshot: &MoverSnapshot, json: bool) -> Result<()> {
    if json {
        let record = Record::Snapshot {
            tick,
            time,
            mover: snapshot,
        };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        let [x, y, z] = snapshot.position;
        println!(
            "[{:>5}] {:<16} pos=({:.3}, {:.3}, {:.3}) angle={:.2} vel={:.3} {:?}",
            tick, snapshot.name, x, y, z, snapshot.angle, snapshot.velocity, snapshot.state
        );
    }
    Ok(())
}

fn emit_event(tick: u64, event: &GameEvent, json: bool) -> Result<()> {
    if json {
        let record = Record::Event { tick, event };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("[{:>5}] event {:?}", tick, event);
    }
    Ok(())
}
