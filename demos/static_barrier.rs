//! Static-barrier null test: a symmetric barrier in vacuum noise should
//! produce no net impulse.
//!
//! Run: cargo run --example static_barrier --release

use vacuum_thrust_sim::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let config = ChamberConfig::default();
    let grid = config.grid()?;
    let v = gaussian_barrier(&grid, grid.center(), 5.0, 50.0);
    let steps = 2000;
    let seeds: Vec<u64> = (0..16).map(|k| config.seed + k).collect();

    println!("Static barrier: nx={} dx={} dt={} steps={}", grid.nx(), grid.dx(), config.dt, steps);
    println!();
    println!("  {:>6}  {:>14}  {:>14}  {:>10}", "seed", "impulse", "energy drift", "thrust?");
    println!("  {:─>6}  {:─>14}  {:─>14}  {:─>10}", "", "", "", "");

    let mut impulses = Vec::with_capacity(seeds.len());
    for &seed in &seeds {
        let mut chamber = VacuumChamber::new(grid);
        chamber.seed_vacuum_noise(seed, 0.001)?;
        for _ in 0..steps {
            chamber.step(config.dt, 1.0, &v)?;
        }
        let j = chamber.telemetry().net_impulse(config.dt);
        let drift = chamber.telemetry().energy_drift().unwrap_or(0.0);
        println!(
            "  {:>6}  {:>+14.4e}  {:>14.4e}  {:>10}",
            seed,
            j,
            drift,
            if is_thrusting(j) { "yes" } else { "no" }
        );
        impulses.push(j);
    }

    let stats = EnsembleStats::from_samples(&impulses);
    println!();
    println!("  ensemble: J = {:+.4e} ± {:.4e}  (SNR {:.2})", stats.mean, stats.std, stats.snr);
    println!(
        "  verdict: {}",
        if is_thrusting(stats.mean) { "THRUST (unexpected)" } else { "no net impulse" }
    );
    Ok(())
}
