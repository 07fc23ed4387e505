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
//! Fixed pool of force workers
//!
//! The pool owns `W` named threads. Each worker blocks on a bounded(1)
//! inbound channel, processes one unit of work, and answers on a bounded(1)
//! outbound channel, so exactly one batch per worker is in flight. The
//! coordinator scatters one slice to every worker and then blocks until
//! every worker has answered: a full barrier per tick.
//!
//! # Ownership
//!
//! A unit of work moves an owned slice of particles into the worker along
//! with an `Arc` of the full snapshot. The worker mutates only its slice and
//! only reads the snapshot, so no locks are needed.
//!
//! # Shutdown
//!
//! Dropping the pool closes every inbound channel; workers leave their loop
//! and are joined.

use crate::error::{Error, Result};
use crate::laws::{combined_force, ForceGenerator};
use crate::parallel::split_into_lists;
use crate::particle::Particle;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// One tick's work for one worker
struct WorkUnit {
    tick: u64,
    slice: Vec<Particle>,
    snapshot: Arc<Vec<Particle>>,
}

type WorkResult = Result<Vec<Particle>>;

struct Worker {
    index: usize,
    inbound: Option<Sender<WorkUnit>>,
    outbound: Receiver<WorkResult>,
    handle: Option<JoinHandle<()>>,
}

/// Pool of worker threads computing forces for disjoint slices
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing the given force generators
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `size` is zero, or `Io` if a thread cannot
    /// be spawned.
    pub fn new(size: usize, generators: Arc<Vec<Box<dyn ForceGenerator>>>) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig(
                "worker count must be > 0".to_string(),
            ));
        }

        let mut workers = Vec::with_capacity(size);
        for index in 0..size {
            let (work_tx, work_rx) = bounded::<WorkUnit>(1);
            let (result_tx, result_rx) = bounded::<WorkResult>(1);
            let generators = Arc::clone(&generators);

            let handle = thread::Builder::new()
                .name(format!("nbody-worker-{}", index))
                .spawn(move || worker_loop(index, work_rx, result_tx, generators))?;

            workers.push(Worker {
                index,
                inbound: Some(work_tx),
                outbound: result_rx,
                handle: Some(handle),
            });
        }

        log::info!("started {} force worker(s)", size);
        Ok(WorkerPool { workers })
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Run one tick's force phase over `particles`
    ///
    /// Splits the particles across the workers, ships every worker its slice
    /// plus the full snapshot, and returns the union of the updated slices:
    /// every particle accelerated by all its pairwise forces, integrated, and
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by a worker, or
    /// `WorkerDisconnected` if a worker is gone. All workers are drained
    /// before returning, so the pool stays in lock-step.
    pub fn dispatch(&self, tick: u64, particles: &[Particle]) -> Result<Vec<Particle>> {
        let snapshot = Arc::new(particles.to_vec());
        let slices = split_into_lists(particles.to_vec(), self.workers.len())?;

        let mut dispatched = Vec::with_capacity(self.workers.len());
        let mut first_error = None;

        for (worker, slice) in self.workers.iter().zip(slices) {
            let unit = WorkUnit {
                tick,
                slice,
                snapshot: Arc::clone(&snapshot),
            };
            let sent = worker
                .inbound
                .as_ref()
                .map(|tx| tx.send(unit).is_ok())
                .unwrap_or(false);
            if sent {
                dispatched.push(worker);
            } else {
                record(&mut first_error, Error::WorkerDisconnected(worker.index));
            }
        }

        let mut updated = Vec::with_capacity(particles.len());
        for worker in dispatched {
            match worker.outbound.recv() {
                Ok(Ok(slice)) => updated.extend(slice),
                Ok(Err(e)) => record(&mut first_error, e),
                Err(_) => record(&mut first_error, Error::WorkerDisconnected(worker.index)),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(updated),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.inbound.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::warn!("force worker {} panicked", worker.index);
                }
            }
        }
        log::info!("stopped {} force worker(s)", self.workers.len());
    }
}

/// Keep only the first error of a dispatch
fn record(first_error: &mut Option<Error>, error: Error) {
    if first_error.is_none() {
        *first_error = Some(error);
    }
}

fn worker_loop(
    index: usize,
    inbound: Receiver<WorkUnit>,
    outbound: Sender<WorkResult>,
    generators: Arc<Vec<Box<dyn ForceGenerator>>>,
) {
    while let Ok(unit) = inbound.recv() {
        let tick = unit.tick;
        let result = process_slice(unit, &generators);
        if let Err(e) = &result {
            log::debug!("worker {} failed tick {}: {}", index, tick, e);
        }
        if outbound.send(result).is_err() {
            break;
        }
    }
    log::debug!("worker {} exiting", index);
}

/// Accelerate, integrate, and commit every particle of the slice
///
/// A particle receives both ordered-pair contributions of each partner: the
/// reaction to the force it exerts, `-F(p, q) / m_p`, and the force exerted
/// on it, `+F(q, p) / m_p`. Partners are read from the snapshot only.
fn process_slice(unit: WorkUnit, generators: &[Box<dyn ForceGenerator>]) -> WorkResult {
    let WorkUnit {
        mut slice,
        snapshot,
        ..
    } = unit;

    for particle in slice.iter_mut() {
        for other in snapshot.iter() {
            if other.id() == particle.id() {
                continue;
            }
            if let Some(force) = combined_force(generators, particle, other)? {
                particle.receive_reaction(&force)?;
            }
            if let Some(force) = combined_force(generators, other, particle)? {
                particle.receive_force(&force)?;
            }
        }
        particle.integrate();
        particle.commit();
    }

    Ok(slice)
}
