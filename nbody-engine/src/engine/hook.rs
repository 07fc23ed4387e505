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
//! Collaborator hook and stop signalling
//!
//! After every tick the engine calls [`TickHook::after_tick`]. A rendering
//! layer overrides it to draw the particles and poll input, and can end the
//! run from inside the hook with [`HookContext::request_stop`]. Other
//! threads stop the run through a [`StopHandle`]. Either way the stop takes
//! effect at the next tick boundary; a tick in progress always completes.

use crate::particle::ParticleSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag that ends a run at the next tick boundary
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a handle in the running state
    pub fn new() -> Self {
        StopHandle::default()
    }

    /// Request the run to stop
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Check if a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Return to the running state so the engine can run again
    pub fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// State handed to the hook after each tick
pub struct HookContext<'a> {
    tick: u64,
    particles: &'a ParticleSet,
    stop: &'a StopHandle,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(tick: u64, particles: &'a ParticleSet, stop: &'a StopHandle) -> Self {
        HookContext {
            tick,
            particles,
            stop,
        }
    }

    /// Number of ticks completed so far, including the one just finished
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Particles after the tick's commit
    pub fn particles(&self) -> &ParticleSet {
        self.particles
    }

    /// End the run once this hook returns
    pub fn request_stop(&self) {
        self.stop.stop();
    }
}

/// Called once per tick, after commit and before the next pairwise scan
pub trait TickHook: Send {
    /// React to a completed tick
    fn after_tick(&mut self, context: &HookContext<'_>);
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl TickHook for NoopHook {
    fn after_tick(&mut self, _context: &HookContext<'_>) {}
}

/// Hook that logs a one-line summary every `interval` ticks
#[derive(Debug, Clone)]
pub struct LoggingHook {
    interval: u64,
}

impl LoggingHook {
    /// Log every `interval` ticks (0 is treated as 1)
    pub fn new(interval: u64) -> Self {
        LoggingHook {
            interval: interval.max(1),
        }
    }
}

impl TickHook for LoggingHook {
    fn after_tick(&mut self, context: &HookContext<'_>) {
        if context.tick() % self.interval == 0 {
            let mass: f64 = context.particles().iter().map(|p| p.mass()).sum();
            log::info!(
                "tick {}: {} particle(s), total mass {:.3}",
                context.tick(),
                context.particles().len(),
                mass
            );
        }
    }
}
