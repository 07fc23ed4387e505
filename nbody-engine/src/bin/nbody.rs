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
//! N-body simulation runner
//!
//! Configuration comes from the environment:
//!
//! ```bash
//! NBODY_PARTICLE_COUNT=500 NBODY_WORKERS=4 NBODY_MAX_TICKS=200 cargo run --release --bin nbody
//! ```
//!
//! `NBODY_WORKERS=0` (the default) runs the sequential loop.

use env_logger::Env;
use nbody_engine::engine::{Engine, EngineConfig, LoggingHook};
use nbody_engine::laws::{Gravity, Merge};
use std::process::ExitCode;
use std::time::Instant;

/// Log a summary this often
const LOG_INTERVAL: u64 = 50;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> nbody_engine::Result<()> {
    let config = EngineConfig::from_env()?;
    let workers = config.workers;

    let mut engine = Engine::builder()
        .config(config)
        .force_generator(Gravity::default())
        .law(Merge::new())
        .hook(LoggingHook::new(LOG_INTERVAL))
        .build()?;

    let start = Instant::now();
    let ticks = if workers > 0 {
        engine.run_parallel(workers)?
    } else {
        engine.run()?
    };
    let elapsed = start.elapsed().as_secs_f64();

    if ticks > 0 {
        println!("{:.3} seconds by turn", elapsed / ticks as f64);
    }
    log::info!(
        "{} particle(s) left, total mass {:.3}",
        engine.particles().len(),
        engine.total_mass()
    );
    Ok(())
}
