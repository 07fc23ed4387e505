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
//! Identity-keyed particle collection
//!
//! The engine's particle collection has set semantics: no duplicates and no
//! required order. Particles are stored contiguously so the pairwise scan can
//! borrow two of them mutably at once, with an id index on the side for
//! membership checks.

use crate::particle::{Particle, ParticleId};
use std::collections::{HashMap, HashSet};

/// Set of particles keyed by identity
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    index: HashMap<ParticleId, usize>,
}

impl ParticleSet {
    /// Create a new empty set
    pub fn new() -> Self {
        ParticleSet::default()
    }

    /// Create a set with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        ParticleSet {
            particles: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a particle
    ///
    /// Returns `false` and leaves the set unchanged if a particle with the
    /// same identity is already present.
    pub fn insert(&mut self, particle: Particle) -> bool {
        if self.index.contains_key(&particle.id()) {
            return false;
        }
        self.index.insert(particle.id(), self.particles.len());
        self.particles.push(particle);
        true
    }

    /// Check if a particle is in the set
    pub fn contains(&self, id: ParticleId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get a particle by identity
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.index.get(&id).map(|&i| &self.particles[i])
    }

    /// Get a particle mutably by identity
    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.particles[i]),
            None => None,
        }
    }

    /// Remove every particle whose id is in `ids`
    ///
    /// Returns the number of particles removed.
    pub fn remove_all(&mut self, ids: &HashSet<ParticleId>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.particles.len();
        self.particles.retain(|p| !ids.contains(&p.id()));
        self.reindex();
        before - self.particles.len()
    }

    /// Get the number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterate over the particles
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Iterate mutably over the particles
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Borrow the particles as a slice
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Borrow the particles as a mutable slice
    ///
    /// Identities cannot change through the slice, so the index stays valid.
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Borrow two distinct particles mutably by position
    ///
    /// # Panics
    ///
    /// Panics if `i == j` or either index is out of bounds.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Particle, &mut Particle) {
        assert!(i != j, "pair_mut requires two distinct indices");
        if i < j {
            let (left, right) = self.particles.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = self.particles.split_at_mut(i);
            (&mut right[0], &mut left[j])
        }
    }

    /// Copy the particles out into a vector
    pub fn to_vec(&self) -> Vec<Particle> {
        self.particles.clone()
    }

    /// Consume the set, yielding its particles
    pub fn into_vec(self) -> Vec<Particle> {
        self.particles
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, particle) in self.particles.iter().enumerate() {
            self.index.insert(particle.id(), i);
        }
    }
}

impl FromIterator<Particle> for ParticleSet {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = ParticleSet::with_capacity(iter.size_hint().0);
        for particle in iter {
            set.insert(particle);
        }
        set
    }
}

impl Extend<Particle> for ParticleSet {
    fn extend<I: IntoIterator<Item = Particle>>(&mut self, iter: I) {
        for particle in iter {
            self.insert(particle);
        }
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
