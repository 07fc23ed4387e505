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
//! # N-Body Engine
//!
//! A discrete-time, brute-force N-body particle simulator with pluggable
//! pairwise laws and an optional scatter-gather worker pool.
//!
//! ## Features
//!
//! - **Staged Mutation**: Particle writes are recorded and committed at the tick boundary
//! - **Force Generators**: Pairwise forces summed and applied with an equal reaction
//! - **Arbitrary Laws**: Non-force interactions (merging) reporting effects to features
//! - **Features**: Deferred, once-per-tick collection changes (removal, spawning)
//! - **Parallelization**: Worker pool over crossbeam channels, Rayon for the commit sweep
//!
//! ## Example
//!
//! ```rust
//! use nbody_engine::{Engine, EngineConfig, Gravity, Merge};
//!
//! let mut engine = Engine::builder()
//!     .config(EngineConfig::new(50).with_seed(7).with_max_ticks(3))
//!     .force_generator(Gravity::default())
//!     .law(Merge::new())
//!     .build()
//!     .unwrap();
//!
//! let ticks = engine.run().unwrap();
//! assert_eq!(ticks, 3);
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// Particle data model and collection
pub mod particle;

/// Distance helpers
pub mod geometry;

/// Deferred per-tick effects
pub mod features;

/// Force generators and arbitrary laws
pub mod laws;

/// Engine, configuration, and tick loop
pub mod engine;

/// Scatter-gather worker pool
pub mod parallel;

pub use engine::{Engine, EngineBuilder, EngineConfig, TickHook};
pub use error::{Error, Result};
pub use laws::{ArbitraryLaw, ForceGenerator, Gravity, Merge};
pub use particle::{Particle, ParticleId, ParticleSet};
