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
//! Inelastic merging of nearby particles
//!
//! When two particles come closer than a fixed threshold, the lighter one is
//! absorbed by the heavier one: the heavier particle's mass becomes the sum
//! of both masses and its velocity the mass-weighted average of both
//! velocities (momentum is conserved), and the lighter particle is reported
//! to the removal feature.
//!
//! Writes on the absorbing particle are staged, so they become visible only
//! after the tick commits. If a particle absorbs several others in one tick,
//! each merge builds on the values already staged by the previous one.

use crate::error::Result;
use crate::features::{Effect, Effects, REMOVE_FEATURE};
use crate::geometry::multi_dimensional_distance;
use crate::laws::{ArbitraryLaw, LawContext};
use crate::particle::{Attribute, Particle, Update};

/// Distance below which two particles merge
pub const MINIMUM_MERGE_DISTANCE: f64 = 3.0;

/// Merge law
///
/// The lighter particle of the pair is the one absorbed. On equal masses the
/// first particle of the ordered pair is absorbed; since every ordered pair
/// is visited, which one that is depends on the collection's iteration order.
#[derive(Debug, Clone)]
pub struct Merge {
    minimum_distance: f64,
}

impl Merge {
    /// Create a merge law with the default threshold
    pub fn new() -> Self {
        Merge {
            minimum_distance: MINIMUM_MERGE_DISTANCE,
        }
    }

    /// Get the merge threshold
    pub fn minimum_distance(&self) -> f64 {
        self.minimum_distance
    }
}

impl Default for Merge {
    fn default() -> Self {
        Self::new()
    }
}

/// Mass after the writes staged so far this tick
fn staged_mass(particle: &Particle) -> f64 {
    match particle.pending(Attribute::Mass) {
        Some(Update::Mass(mass)) => *mass,
        _ => particle.mass(),
    }
}

/// Velocity after the writes staged so far this tick
fn staged_velocity(particle: &Particle) -> &[f64] {
    match particle.pending(Attribute::Velocity) {
        Some(Update::Velocity(velocity)) => velocity,
        _ => particle.velocity(),
    }
}

impl ArbitraryLaw for Merge {
    fn name(&self) -> &str {
        "merge"
    }

    fn apply(
        &self,
        particle: &mut Particle,
        other: &mut Particle,
        context: &LawContext<'_>,
    ) -> Result<Effects> {
        let (absorbed, absorber) = if particle.mass() > other.mass() {
            (other, particle)
        } else {
            (particle, other)
        };

        if context.is_scheduled_for_removal(absorbed.id())
            || context.is_scheduled_for_removal(absorber.id())
        {
            return Ok(Effects::new());
        }

        let distance = multi_dimensional_distance(absorbed.position(), absorber.position())?;
        if distance >= self.minimum_distance {
            return Ok(Effects::new());
        }

        let absorbed_mass = staged_mass(absorbed);
        let absorber_mass = staged_mass(absorber);
        let total_mass = absorbed_mass + absorber_mass;
        let absorbed_share = absorbed_mass / total_mass;
        let absorber_share = absorber_mass / total_mass;

        let velocity: Vec<f64> = staged_velocity(absorbed)
            .iter()
            .zip(staged_velocity(absorber))
            .map(|(a, b)| a * absorbed_share + b * absorber_share)
            .collect();

        absorber.stage(Update::Mass(total_mass))?;
        absorber.stage(Update::Velocity(velocity))?;

        log::trace!(
            "tick {}: {} absorbed {} (mass {:.3})",
            context.tick(),
            absorber.id(),
            absorbed.id(),
            total_mass
        );

        let mut effects = Effects::new();
        effects.insert(
            REMOVE_FEATURE.to_string(),
            Effect::Remove([absorbed.id()].into_iter().collect()),
        );
        Ok(effects)
    }
}
