//! # WRAITH Demo Server
//!
//! Runs the engine against an in-memory host: a ring of display models
//! and a handful of viewers walking past them.
//!
//! ## Usage
//!
//! ```bash
//! wraith_server --config wraith.toml --models 64 --viewers 8 --duration 10
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use glam::{DVec3, Vec3};
use parking_lot::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wraith_core::{HostTypes, Location};
use wraith_engine::{
    ChannelTransport, DisplaySchema, Engine, EngineConfig, EngineParts, ProximityOracle,
    SequentialEntityIds, UpdateScheduler,
};
use wraith_shared::{Billboard, Color, ModelId, WraithResult};

#[derive(Clone, Debug)]
struct DemoHost;

impl HostTypes for DemoHost {
    type Viewer = u32;
    type World = String;
    type BlockState = String;
    type ItemStack = String;
    type Text = String;
}

/// Viewers walking a circle around the origin.
struct Walkers {
    positions: Mutex<Vec<(u32, DVec3)>>,
}

impl Walkers {
    fn new(count: u32) -> Self {
        let positions = (1..=count).map(|id| (id, DVec3::ZERO)).collect();
        Self {
            positions: Mutex::new(positions),
        }
    }

    fn step(&self, tick: u64) {
        let mut positions = self.positions.lock();
        let count = positions.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        for (i, (_, position)) in positions.iter_mut().enumerate() {
            let phase = tick as f64 * 0.01 + i as f64 * std::f64::consts::TAU / count as f64;
            *position = DVec3::new(phase.cos() * 150.0, 64.0, phase.sin() * 150.0);
        }
    }
}

impl ProximityOracle<DemoHost> for Walkers {
    fn viewers_near(&self, location: &Location<String>, radius: f64) -> Vec<u32> {
        let radius_sq = radius * radius;
        self.positions
            .lock()
            .iter()
            .filter(|(_, p)| p.distance_squared(location.position) <= radius_sq)
            .map(|(id, _)| *id)
            .collect()
    }
}

struct Options {
    config: Option<String>,
    models: u32,
    viewers: u32,
    duration_secs: Option<u32>,
}

fn parse_args() -> Option<Options> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        config: None,
        models: 64,
        viewers: 8,
        duration_secs: Some(10),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    options.config = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--models" | "-m" => {
                if i + 1 < args.len() {
                    options.models = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "--viewers" | "-v" => {
                if i + 1 < args.len() {
                    options.viewers = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--duration" | "-d" => {
                if i + 1 < args.len() {
                    options.duration_secs = args[i + 1].parse().ok().filter(|d| *d > 0);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: wraith_server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>        TOML engine configuration");
                println!("  -m, --models <NUM>         Display models to spawn (default: 64)");
                println!("  -v, --viewers <NUM>        Simulated viewers (default: 8)");
                println!("  -d, --duration <SECS>      Run for N seconds, 0 = forever (default: 10)");
                println!("  -h, --help                 Show this help");
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    Some(options)
}

fn spawn_ring(engine: &Engine<DemoHost>, count: u32) -> WraithResult<Vec<ModelId>> {
    let mut ids = Vec::with_capacity(count as usize);
    for i in 0..count {
        let angle = f64::from(i) * std::f64::consts::TAU / f64::from(count.max(1));
        let anchor = Location::new(
            "overworld".to_string(),
            DVec3::new(angle.cos() * 100.0, 64.0, angle.sin() * 100.0),
        );
        let id = match i % 3 {
            0 => engine.spawn_block_model_with(anchor, "minecraft:glowstone".into(), |m| {
                m.scale(0.5).set_glow_color(Color::from_channels(255, 255, 200, 0));
                Ok(())
            })?,
            1 => engine.spawn_item_model_with(anchor, "minecraft:diamond".into(), |m| {
                m.set_billboard(Billboard::Vertical);
                m.item_mut()?.ground_view();
                Ok(())
            })?,
            _ => engine.spawn_text_model_with(anchor, format!("Marker #{i}"), |m| {
                m.set_billboard(Billboard::Center).translate(0.0, 1.0, 0.0);
                m.text_mut()?.set_shadow(true);
                Ok(())
            })?,
        };
        ids.push(id);
    }
    Ok(ids)
}

/// Bobs an eighth of the models each tick so there is something to sync.
fn bob(engine: &Engine<DemoHost>, models: &[ModelId], tick: u64) -> WraithResult<()> {
    let renderer = engine.renderer();
    let lift = if tick % 16 < 8 { 0.25 } else { -0.25 };
    #[allow(clippy::cast_possible_truncation)]
    for id in models.iter().skip((tick % 8) as usize).step_by(8) {
        let here = engine.tracker().with_model(*id, |m| m.absolute_position())?;
        renderer.render_at_with(*id, here + DVec3::new(0.0, lift, 0.0), 4, |t| {
            t.rotate_left_by(0.1, Vec3::Y);
        })?;
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
fn run(options: &Options) -> WraithResult<()> {
    let config = match &options.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Host Version:       {}", config.host_version);
    println!("│ Tick Rate:          {} Hz", config.tick_rate);
    println!("│ Visibility Radius:  {:.1} blocks", config.visibility_radius);
    println!("│ Models / Viewers:   {} / {}", options.models, options.viewers);
    match options.duration_secs {
        Some(d) => println!("│ Duration:           {d} seconds"),
        None => println!("│ Duration:           infinite"),
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let (transport, deliveries) = ChannelTransport::<DemoHost>::new(config.transport_capacity);
    let transport = Arc::new(transport);
    let walkers = Arc::new(Walkers::new(options.viewers));
    let parts = EngineParts {
        transport: transport.clone(),
        proximity: walkers.clone(),
        ids: Arc::new(SequentialEntityIds::starting_at(100_000)),
    };

    let mut scheduler = UpdateScheduler::for_config(&config)?;
    let engine = Engine::new(config.clone(), &DisplaySchema::builtin(), parts)?;

    let models = spawn_ring(&engine, options.models)?;
    info!(models = models.len(), "Demo world ready");

    let start = Instant::now();
    let stats_interval = u64::from(config.tick_rate) * 5;
    let mut last_stats_tick = 0u64;
    let mut delivered = 0u64;

    loop {
        if let Some(duration) = options.duration_secs {
            if start.elapsed().as_secs() >= u64::from(duration) {
                break;
            }
        }

        scheduler.wait_for_next_tick();

        let next_tick = engine.tick_count() + 1;
        walkers.step(next_tick);
        bob(&engine, &models, next_tick)?;

        if scheduler.run_due(&engine).is_empty() {
            continue;
        }
        delivered += deliveries.try_iter().count() as u64;

        let current_tick = engine.tick_count();
        if current_tick - last_stats_tick >= stats_interval {
            last_stats_tick = current_tick;
            let stats = scheduler.stats();
            let transport_stats = transport.stats();

            println!("┌─ ENGINE STATUS (Tick {current_tick}) ─────────────────────────────────");
            println!("│ Uptime:             {:.1}s", start.elapsed().as_secs_f64());
            println!("│ Tracked Models:     {}", engine.tracker().len());
            println!("│ Properties Pushed:  {}", stats.sync.properties_pushed);
            println!(
                "│ Bandwidth Saved:    {:.1}%",
                stats.sync.bandwidth_savings() * 100.0
            );
            println!(
                "│ Packets Delivered:  {delivered} (dropped: {})",
                transport_stats.dropped
            );
            println!("│ Avg Tick Time:      {} μs", stats.avg_tick_us);
            #[allow(clippy::cast_precision_loss)]
            let late_pct = stats.late_ticks as f64 / stats.total_ticks.max(1) as f64 * 100.0;
            println!("│ Late Ticks:         {} ({late_pct:.2}%)", stats.late_ticks);
            println!("│ Skipped Ticks:      {}", stats.skipped_ticks);
            println!("└──────────────────────────────────────────────────────────────────");
            println!();
        }
    }

    let renderer = engine.renderer();
    for id in &models {
        renderer.remove(*id);
    }
    delivered += deliveries.try_iter().count() as u64;

    let final_stats = scheduler.stats();
    let transport_stats = transport.stats();
    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    ENGINE SHUTDOWN                               ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║ Total Ticks:        {:>10}                                   ║", final_stats.total_ticks);
    println!("║ Avg Tick Time:      {:>10} μs                                ║", final_stats.avg_tick_us);
    println!("║ Max Tick Time:      {:>10} μs                                ║", final_stats.max_tick_us);
    println!("║ Properties Pushed:  {:>10}                                   ║", final_stats.sync.properties_pushed);
    println!("║ Packets Delivered:  {delivered:>10}                                   ║");
    println!("║ Packets Dropped:    {:>10}                                   ║", transport_stats.dropped);
    println!("╚══════════════════════════════════════════════════════════════════╝");
    Ok(())
}

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         WRAITH DISPLAY SERVER                                    ║");
    println!("║         MODEL STATE & VIEWER SYNC                                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let Some(options) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Engine stopped");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
