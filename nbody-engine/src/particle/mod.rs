//! Particle data model
//!
//! This module provides the point-mass state evolved by the engine:
//! - Process-unique particle identity
//! - Staged (deferred) attribute writes with an explicit commit
//! - The identity-keyed particle collection owned by the engine

mod id;
mod set;
mod state;

pub use id::ParticleId;
pub use set::ParticleSet;
pub use state::{Attribute, Particle, Update};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_creation() {
        let particle = Particle::new(10.0, vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
        assert_eq!(particle.dimensions(), 2);
        assert!(!particle.has_pending());
    }

    #[test]
    fn test_set_insertion() {
        let mut set = ParticleSet::new();
        let particle = Particle::new(10.0, vec![0.0], vec![0.0]).unwrap();
        assert!(set.insert(particle));
        assert_eq!(set.len(), 1);
    }
}
