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
//! Newtonian gravity between point masses
//!
//! **F = G * (m₁ * m₂) / d²**, directed along the line joining the two
//! positions. The force returned for `(particle, other)` is the force
//! `particle` exerts on `other`, so it points from `other` toward
//! `particle`; applying it pulls the two together.
//!
//! The distance is the hypotenuse-folded distance from
//! [`crate::geometry::multi_dimensional_distance`]. There is no softening:
//! coincident particles are a singularity, reported as
//! [`Error::ZeroDistance`] unless [`SingularityPolicy::Skip`] is selected.

use crate::error::{Error, Result};
use crate::geometry::multi_dimensional_distance;
use crate::laws::ForceGenerator;
use crate::particle::Particle;

/// Gravitational constant in simulation units
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f64 = 0.005;

/// What to do when two particles coincide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Abort the tick with `Error::ZeroDistance`
    #[default]
    Fail,
    /// Treat the pair as exerting no force and log a warning
    Skip,
}

/// Gravitational force generator
///
/// # Example
///
/// ```rust
/// use nbody_engine::laws::{ForceGenerator, Gravity};
/// use nbody_engine::particle::Particle;
///
/// let gravity = Gravity::default();
/// let light = Particle::new(10.0, vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
/// let heavy = Particle::new(100.0, vec![4.0, 0.0], vec![0.0, 0.0]).unwrap();
///
/// let force = gravity.compute_force(&light, &heavy).unwrap();
/// // Points from `heavy` back toward `light`
/// assert!(force[0] < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Gravity {
    g_constant: f64,
    policy: SingularityPolicy,
}

impl Gravity {
    /// Create a gravity generator with the given constant
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `g_constant` is negative or not finite.
    pub fn new(g_constant: f64) -> Result<Self> {
        if !(g_constant >= 0.0 && g_constant.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "gravitational constant must be non-negative and finite, got {}",
                g_constant
            )));
        }
        Ok(Gravity {
            g_constant,
            policy: SingularityPolicy::Fail,
        })
    }

    /// Select how coincident particles are handled
    pub fn with_singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the gravitational constant
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Get the singularity policy
    pub fn singularity_policy(&self) -> SingularityPolicy {
        self.policy
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity {
            g_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            policy: SingularityPolicy::Fail,
        }
    }
}

impl ForceGenerator for Gravity {
    fn name(&self) -> &str {
        "gravity"
    }

    fn compute_force(&self, particle: &Particle, other: &Particle) -> Result<Vec<f64>> {
        let distance = multi_dimensional_distance(particle.position(), other.position())?;

        if distance == 0.0 {
            return match self.policy {
                SingularityPolicy::Fail => Err(Error::ZeroDistance {
                    first: particle.id(),
                    second: other.id(),
                }),
                SingularityPolicy::Skip => {
                    log::warn!(
                        "skipping gravity between coincident {} and {}",
                        particle.id(),
                        other.id()
                    );
                    Ok(vec![0.0; particle.dimensions()])
                }
            };
        }

        let magnitude = self.g_constant * particle.mass() * other.mass() / (distance * distance);
        let scale = magnitude / distance;

        Ok(particle
            .position()
            .iter()
            .zip(other.position())
            .map(|(p1, p2)| (p1 - p2) * scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(mass: f64, position: &[f64]) -> Particle {
        Particle::new(mass, position.to_vec(), vec![0.0; position.len()]).unwrap()
    }

    #[test]
    fn test_default_constant() {
        let gravity = Gravity::default();
        assert_eq!(gravity.g_constant(), DEFAULT_GRAVITATIONAL_CONSTANT);
        assert_eq!(gravity.singularity_policy(), SingularityPolicy::Fail);
    }

    #[test]
    fn test_invalid_constant_rejected() {
        assert!(matches!(Gravity::new(-1.0), Err(Error::InvalidConfig(_))));
        assert!(Gravity::new(f64::INFINITY).is_err());
        assert!(Gravity::new(0.0).is_ok());
    }

    #[test]
    fn test_inverse_square_magnitude() {
        let gravity = Gravity::default();
        let a = particle(10.0, &[0.0, 0.0]);
        let b = particle(100.0, &[4.0, 0.0]);

        let force = gravity.compute_force(&a, &b).unwrap();
        // 0.005 * 10 * 100 / 16
        assert!((force[0] + 0.3125).abs() < 1e-12, "got {:?}", force);
        assert_eq!(force[1], 0.0);
    }

    #[test]
    fn test_force_is_antisymmetric() {
        let gravity = Gravity::default();
        let a = particle(3.0, &[1.0, 2.0, -1.0]);
        let b = particle(7.0, &[-2.0, 5.0, 4.0]);

        let ab = gravity.compute_force(&a, &b).unwrap();
        let ba = gravity.compute_force(&b, &a).unwrap();
        for (x, y) in ab.iter().zip(&ba) {
            assert!((x + y).abs() < 1e-15);
        }
    }

    #[test]
    fn test_zero_distance_fails_by_default() {
        let gravity = Gravity::default();
        let a = particle(1.0, &[1.0, 1.0]);
        let b = particle(1.0, &[1.0, 1.0]);

        let result = gravity.compute_force(&a, &b);
        assert!(matches!(
            result,
            Err(Error::ZeroDistance { first, second }) if first == a.id() && second == b.id()
        ));
    }

    #[test]
    fn test_zero_distance_skip_policy() {
        let gravity = Gravity::default().with_singularity_policy(SingularityPolicy::Skip);
        let a = particle(1.0, &[1.0, 1.0, 1.0]);
        let b = particle(1.0, &[1.0, 1.0, 1.0]);

        let force = gravity.compute_force(&a, &b).unwrap();
        assert_eq!(force, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dimension_mismatch_between_particles() {
        let gravity = Gravity::default();
        let a = particle(1.0, &[0.0, 0.0]);
        let b = particle(1.0, &[1.0, 0.0, 0.0]);
        assert!(matches!(
            gravity.compute_force(&a, &b),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
