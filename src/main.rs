//! Life3D CLI - Run headless simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use life3d::{
    compute::{Simulation, SimulationStats},
    schema::{RulePreset, SimulationConfig},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a 3D cellular automaton from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Number of simulation steps (default: 100)");
        eprintln!();
        eprintln!("Print an example configuration with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config {}: {}", config_path.display(), e);
        std::process::exit(1);
    });

    let rule = config.rule.rule();

    println!("Life3D Simulation");
    println!("=================");
    println!(
        "Grid: {0}x{0}x{0} ({1} shards)",
        config.dimension, config.shard_count
    );
    println!("Rule: {} ({:?} palette)", rule, rule.palette);
    println!("Seeding: {:?}", config.seed_policy());
    println!("Steps: {}", steps);
    println!();

    let mut simulation = Simulation::new(&config).unwrap_or_else(|e| {
        eprintln!("Error creating simulation: {}", e);
        std::process::exit(1);
    });

    print_stats("Initial state", &simulation.stats());

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        simulation.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = simulation.stats();
            let points = simulation.draw();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Step {}/{}: live={}, decaying={}, points={}, {:.1} steps/s",
                i + 1,
                steps,
                stats.live_cells,
                stats.decaying_cells,
                points.len(),
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    print_stats("Final state", &simulation.stats());

    let timings = simulation.timings();
    if let Some(ms) = timings.average_update_ms() {
        println!("update: {:.3} ms", ms);
    }
    if let Some(ms) = timings.average_draw_ms() {
        println!("draw: {:.3} ms", ms);
    }
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
    timings.log_summary();
}

fn print_stats(label: &str, stats: &SimulationStats) {
    println!("{label}:");
    println!("  Live cells: {} / {}", stats.live_cells, stats.total_cells);
    println!("  Fully alive: {}", stats.alive_cells);
    println!("  Decaying: {}", stats.decaying_cells);
    println!("  Live fraction: {:.4}", stats.live_fraction);
    println!();
}

fn print_example_config() {
    println!("Example configuration (config.json):");
    for preset in RulePreset::ALL {
        let config = SimulationConfig::from_preset(preset);
        match serde_json::to_string_pretty(&config) {
            Ok(json) => {
                println!("// {:?}", preset);
                println!("{}", json);
            }
            Err(e) => eprintln!("Error serializing {:?}: {}", preset, e),
        }
    }
}
