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
//! Point-mass state with staged mutation
//!
//! A particle holds a mass, a position, and a velocity of fixed
//! dimensionality. Writes go through [`Particle::stage`] and stay invisible
//! to readers until [`Particle::commit`] applies them all at once. This is
//! what keeps one tick's pairwise evaluations independent of the order in
//! which particles are visited.
//!
//! Velocity is the one exception: [`Particle::apply_force`] mutates it
//! immediately so that integration sees every force contribution of the
//! tick.

use crate::error::{Error, Result};
use crate::particle::ParticleId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Attribute of a particle that can be staged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Scalar mass
    Mass,
    /// Position vector
    Position,
    /// Velocity vector
    Velocity,
}

/// A pending write to one attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// New mass
    Mass(f64),
    /// New position
    Position(Vec<f64>),
    /// New velocity
    Velocity(Vec<f64>),
}

impl Update {
    /// The attribute this update targets
    pub fn attribute(&self) -> Attribute {
        match self {
            Update::Mass(_) => Attribute::Mass,
            Update::Position(_) => Attribute::Position,
            Update::Velocity(_) => Attribute::Velocity,
        }
    }
}

/// A point mass evolved by the engine
///
/// Equality and hashing use only the particle's identity: two particles with
/// identical state are still distinct entities.
///
/// # Example
///
/// ```
/// use nbody_engine::particle::Particle;
///
/// let mut p = Particle::new(10.0, vec![0.0, 0.0], vec![1.0, 0.0]).unwrap();
/// p.integrate();
/// assert_eq!(p.position(), &[0.0, 0.0]);
/// p.commit();
/// assert_eq!(p.position(), &[1.0, 0.0]);
/// ```
#[derive(Clone)]
pub struct Particle {
    id: ParticleId,
    mass: f64,
    position: Vec<f64>,
    velocity: Vec<f64>,
    pending: HashMap<Attribute, Update>,
}

impl Particle {
    /// Create a new particle
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if position and velocity lengths differ,
    /// and `InvalidConfig` if the mass is not finite and positive or the
    /// particle has no dimensions.
    pub fn new(mass: f64, position: Vec<f64>, velocity: Vec<f64>) -> Result<Self> {
        if position.len() != velocity.len() {
            return Err(Error::DimensionMismatch {
                expected: position.len(),
                found: velocity.len(),
            });
        }
        if position.is_empty() {
            return Err(Error::InvalidConfig(
                "particle must have at least one dimension".to_string(),
            ));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "particle mass must be finite and > 0, got {}",
                mass
            )));
        }

        Ok(Particle {
            id: ParticleId::next(),
            mass,
            position,
            velocity,
            pending: HashMap::new(),
        })
    }

    /// Identity of this particle
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Committed mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Committed position
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Current velocity (includes force contributions of the running tick)
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Number of spatial dimensions
    pub fn dimensions(&self) -> usize {
        self.position.len()
    }

    /// Record a pending write
    ///
    /// A later stage to the same attribute replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if a vector update does not match the
    /// particle's dimensionality.
    pub fn stage(&mut self, update: Update) -> Result<()> {
        match &update {
            Update::Position(v) | Update::Velocity(v) if v.len() != self.dimensions() => {
                return Err(Error::DimensionMismatch {
                    expected: self.dimensions(),
                    found: v.len(),
                });
            }
            _ => {}
        }
        self.pending.insert(update.attribute(), update);
        Ok(())
    }

    /// Get the pending write for an attribute, if any
    pub fn pending(&self, attribute: Attribute) -> Option<&Update> {
        self.pending.get(&attribute)
    }

    /// Check if any write is waiting for commit
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every pending write and clear the pending set
    pub fn commit(&mut self) {
        for (_, update) in self.pending.drain() {
            match update {
                Update::Mass(mass) => self.mass = mass,
                Update::Position(position) => self.position = position,
                Update::Velocity(velocity) => self.velocity = velocity,
            }
        }
    }

    /// Apply the force exerted by `self` on `other`
    ///
    /// `other` is accelerated by `+force / other.mass` and `self` by
    /// `-force / self.mass` (equal and opposite reaction). Velocities change
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the force does not match either
    /// particle's velocity. Neither particle is modified in that case.
    pub fn apply_force(&mut self, force: &[f64], other: &mut Particle) -> Result<()> {
        self.check_force(force)?;
        other.check_force(force)?;

        other.accelerate(force, 1.0);
        self.accelerate(force, -1.0);
        Ok(())
    }

    /// Accelerate only this particle by `force / mass`
    ///
    /// Used by workers, which own a single side of every pair.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` on a force of the wrong length.
    pub fn receive_force(&mut self, force: &[f64]) -> Result<()> {
        self.check_force(force)?;
        self.accelerate(force, 1.0);
        Ok(())
    }

    /// Accelerate only this particle by `-force / mass`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` on a force of the wrong length.
    pub fn receive_reaction(&mut self, force: &[f64]) -> Result<()> {
        self.check_force(force)?;
        self.accelerate(force, -1.0);
        Ok(())
    }

    /// Stage the next position, `position + velocity`
    pub fn integrate(&mut self) {
        let next_position = self
            .position
            .iter()
            .zip(&self.velocity)
            .map(|(p, v)| p + v)
            .collect();
        self.pending
            .insert(Attribute::Position, Update::Position(next_position));
    }

    /// Kinetic energy, 0.5 * m * |v|²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.iter().map(|v| v * v).sum::<f64>()
    }

    fn check_force(&self, force: &[f64]) -> Result<()> {
        if force.len() != self.velocity.len() {
            return Err(Error::DimensionMismatch {
                expected: self.velocity.len(),
                found: force.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn accelerate(&mut self, force: &[f64], sign: f64) {
        for (v, f) in self.velocity.iter_mut().zip(force) {
            *v += sign * f / self.mass;
        }
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Particle {}

impl Hash for Particle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Particle")
            .field("id", &self.id.raw())
            .field("mass", &self.mass)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(mass={:.3}, velocity={:.3?}, position={:.3?})",
            self.id, self.mass, self.velocity, self.position
        )
    }
}
