// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Merging Cloud Example
//!
//! A dense cloud of particles under gravity and merging. Nearby particles
//! coalesce, so the particle count drops while total mass stays constant.
//! Runs the same cloud sequentially and on a worker pool.
//!
//! # Running
//!
//! ```bash
//! cargo run --example merging_cloud --release
//! RUST_LOG=debug cargo run --example merging_cloud --release
//! ```

use env_logger::Env;
use nbody_engine::engine::{Engine, EngineConfig, LoggingHook, ParticleFactory};
use nbody_engine::laws::{Gravity, Merge};
use rand::Rng;
use std::time::Instant;

const PARTICLES: usize = 400;
const TICKS: u64 = 100;
const WORKERS: usize = 4;
const SEED: u64 = 2024;

fn cloud() -> nbody_engine::Result<Engine> {
    // Tighter than the default layout so merges actually happen
    let factory = ParticleFactory::new(Some(SEED))
        .with_mass(|_, rng| rng.random_range(1.0..20.0))
        .with_position(|_, rng| {
            vec![
                rng.random_range(-60.0..60.0),
                rng.random_range(-60.0..60.0),
                rng.random_range(-60.0..60.0),
            ]
        });

    Engine::builder()
        .config(EngineConfig::new(PARTICLES).with_max_ticks(TICKS))
        .factory(factory)
        .force_generator(Gravity::default())
        .law(Merge::new())
        .hook(LoggingHook::new(25))
        .build()
}

fn main() -> nbody_engine::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    println!("N-Body Engine - Merging Cloud Example");
    println!("=====================================\n");

    let mut sequential = cloud()?;
    let initial_mass = sequential.total_mass();
    let start = Instant::now();
    sequential.run()?;
    println!(
        "sequential: {} -> {} particles, mass {:.3} -> {:.3}, {:.3} seconds by turn",
        PARTICLES,
        sequential.particles().len(),
        initial_mass,
        sequential.total_mass(),
        start.elapsed().as_secs_f64() / TICKS as f64
    );

    let mut parallel = cloud()?;
    let start = Instant::now();
    parallel.run_parallel(WORKERS)?;
    println!(
        "parallel ({} workers): {} -> {} particles, mass {:.3} -> {:.3}, {:.3} seconds by turn",
        WORKERS,
        PARTICLES,
        parallel.particles().len(),
        initial_mass,
        parallel.total_mass(),
        start.elapsed().as_secs_f64() / TICKS as f64
    );
    Ok(())
}
