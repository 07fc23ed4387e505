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
//! Two-Body Example
//!
//! A light particle falls toward a heavy one under gravity. Prints both
//! bodies every few ticks and the total momentum, which stays at zero.
//!
//! # Running
//!
//! ```bash
//! cargo run --example two_body
//! ```

use env_logger::Env;
use nbody_engine::engine::{Engine, EngineConfig, HookContext, TickHook};
use nbody_engine::laws::Gravity;
use nbody_engine::particle::Particle;

/// Prints every body on a fixed interval
struct Printer {
    interval: u64,
}

impl TickHook for Printer {
    fn after_tick(&mut self, context: &HookContext<'_>) {
        if context.tick() % self.interval != 0 {
            return;
        }
        println!("tick {}", context.tick());
        for particle in context.particles() {
            println!(
                "  {} m={:.1} x=({:.4}, {:.4}) v=({:.5}, {:.5})",
                particle.id(),
                particle.mass(),
                particle.position()[0],
                particle.position()[1],
                particle.velocity()[0],
                particle.velocity()[1]
            );
        }
    }
}

fn main() -> nbody_engine::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    println!("N-Body Engine - Two-Body Example");
    println!("================================\n");

    let light = Particle::new(10.0, vec![0.0, 0.0], vec![0.0, 0.0])?;
    let heavy = Particle::new(100.0, vec![40.0, 0.0], vec![0.0, 0.0])?;

    let mut engine = Engine::builder()
        .config(EngineConfig::default().with_max_ticks(40))
        .particles(vec![light, heavy])
        .force_generator(Gravity::default())
        .hook(Printer { interval: 10 })
        .build()?;

    let ticks = engine.run()?;
    let momentum = engine.momentum();
    println!(
        "\nRan {} ticks, total momentum ({:.2e}, {:.2e})",
        ticks, momentum[0], momentum[1]
    );
    Ok(())
}
