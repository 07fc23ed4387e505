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
//! Error types shared across the engine
//!
//! Errors fall into three groups: precondition violations (dimensionality
//! mismatches), numeric singularities (coincident particles), and
//! configuration errors rejected at construction. None of them are retried;
//! a failed tick aborts the run and the error is returned to the caller.

use crate::particle::ParticleId;
use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the engine, its laws, and the worker pool
#[derive(Debug, Error)]
pub enum Error {
    /// A vector did not have the dimensionality of the particle it targets.
    #[error("dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the receiving particle
        expected: usize,
        /// Dimensionality of the offending vector
        found: usize,
    },

    /// Two particles occupy the same position, so the pairwise distance is zero.
    #[error("zero distance between {first} and {second}")]
    ZeroDistance {
        /// Subject particle of the pair
        first: ParticleId,
        /// Other particle of the pair
        second: ParticleId,
    },

    /// Invalid construction or environment parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A law reported an effect for a feature the engine does not know.
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    /// An effect payload was routed to a feature that cannot consume it.
    #[error("feature '{feature}' cannot consume {effect} effects")]
    FeatureMismatch {
        /// Name of the receiving feature
        feature: String,
        /// Kind of the rejected payload
        effect: &'static str,
    },

    /// A worker thread exited or dropped its channel mid-run.
    #[error("worker {0} disconnected")]
    WorkerDisconnected(usize),

    /// Propagated I/O errors (e.g., failing to spawn a worker thread).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let e = Error::DimensionMismatch { expected: 3, found: 2 };
        let msg = e.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("found 2"));
    }

    #[test]
    fn test_zero_distance_names_both_particles() {
        let e = Error::ZeroDistance {
            first: ParticleId::new(4),
            second: ParticleId::new(9),
        };
        let msg = e.to_string();
        assert!(msg.contains("Particle(4)"));
        assert!(msg.contains("Particle(9)"));
    }

    #[test]
    fn test_invalid_config_display() {
        let e = Error::InvalidConfig("worker count must be > 0".to_string());
        assert!(e.to_string().starts_with("invalid configuration"));
    }
}
