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
//! Integration tests for the physical properties of a sequential tick

use nbody_engine::engine::Engine;
use nbody_engine::laws::{Gravity, Merge};
use nbody_engine::particle::Particle;

const EPS: f64 = 1e-9;

fn particle(mass: f64, position: &[f64], velocity: &[f64]) -> Particle {
    Particle::new(mass, position.to_vec(), velocity.to_vec()).unwrap()
}

#[test]
fn test_two_body_single_tick() {
    // Light particle at the origin, heavy one four units along x
    let light = particle(10.0, &[0.0, 0.0], &[0.0, 0.0]);
    let heavy = particle(100.0, &[4.0, 0.0], &[0.0, 0.0]);
    let (light_id, heavy_id) = (light.id(), heavy.id());

    let mut engine = Engine::builder()
        .particles(vec![light, heavy])
        .force_generator(Gravity::default())
        .build()
        .unwrap();
    engine.tick().unwrap();

    let light = engine.particles().get(light_id).unwrap();
    let heavy = engine.particles().get(heavy_id).unwrap();

    // |F| = 0.005 * 10 * 100 / 16 = 0.3125, applied once per ordered pair
    assert!(
        (light.velocity()[0] - 0.0625).abs() < EPS,
        "light vx = {}",
        light.velocity()[0]
    );
    assert!(
        (heavy.velocity()[0] + 0.00625).abs() < EPS,
        "heavy vx = {}",
        heavy.velocity()[0]
    );
    assert_eq!(light.velocity()[1], 0.0);
    assert_eq!(heavy.velocity()[1], 0.0);

    // Bodies approach each other, the light one faster
    assert!(light.velocity()[0] > 0.0);
    assert!(heavy.velocity()[0] < 0.0);
    assert!(light.velocity()[0].abs() > heavy.velocity()[0].abs());

    // Integrated with this tick's velocity
    assert!((light.position()[0] - 0.0625).abs() < EPS);
    assert!((heavy.position()[0] - 3.99375).abs() < EPS);
}

#[test]
fn test_momentum_conserved_under_gravity() {
    let mut engine = Engine::builder()
        .particles(vec![
            particle(10.0, &[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]),
            particle(40.0, &[50.0, 10.0, 0.0], &[0.0, 0.0, 0.0]),
            particle(25.0, &[-30.0, 60.0, 20.0], &[0.0, 0.0, 0.0]),
            particle(70.0, &[15.0, -45.0, -35.0], &[0.0, 0.0, 0.0]),
        ])
        .force_generator(Gravity::default())
        .build()
        .unwrap();

    for _ in 0..20 {
        engine.tick().unwrap();
    }

    for (axis, p) in engine.momentum().iter().enumerate() {
        assert!(p.abs() < EPS, "momentum along axis {} is {}", axis, p);
    }
    // Something did move
    assert!(engine.kinetic_energy() > 0.0);
}

#[test]
fn test_no_motion_without_force() {
    let at_rest = particle(10.0, &[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]);
    let drifting = particle(20.0, &[100.0, 0.0, 0.0], &[1.5, 0.0, -0.5]);
    let (rest_id, drift_id) = (at_rest.id(), drifting.id());

    let mut engine = Engine::builder()
        .particles(vec![at_rest, drifting])
        .build()
        .unwrap();
    for _ in 0..10 {
        engine.tick().unwrap();
    }

    let at_rest = engine.particles().get(rest_id).unwrap();
    assert_eq!(at_rest.position(), &[1.0, 2.0, 3.0]);
    assert_eq!(at_rest.velocity(), &[0.0, 0.0, 0.0]);

    let drifting = engine.particles().get(drift_id).unwrap();
    assert_eq!(drifting.position(), &[115.0, 0.0, -5.0]);
    assert_eq!(drifting.velocity(), &[1.5, 0.0, -0.5]);
}

#[test]
fn test_merge_conserves_mass_and_removes_absorbed() {
    let light = particle(10.0, &[0.0, 0.0], &[2.0, 0.0]);
    let heavy = particle(30.0, &[1.0, 1.0], &[0.0, 0.0]);
    let far = particle(5.0, &[100.0, 100.0], &[0.0, 0.0]);
    let (light_id, heavy_id, far_id) = (light.id(), heavy.id(), far.id());

    let mut engine = Engine::builder()
        .particles(vec![light, heavy, far])
        .law(Merge::new())
        .build()
        .unwrap();
    engine.tick().unwrap();

    assert_eq!(engine.particles().len(), 2);
    assert!(!engine.particles().contains(light_id));
    assert!(engine.particles().contains(far_id));
    assert_eq!(engine.total_mass(), 45.0);

    let heavy = engine.particles().get(heavy_id).unwrap();
    assert_eq!(heavy.mass(), 40.0);
    // (10 * 2 + 30 * 0) / 40
    assert!((heavy.velocity()[0] - 0.5).abs() < EPS);
}

#[test]
fn test_chained_merges_collapse_cluster() {
    let mut engine = Engine::builder()
        .particles(vec![
            particle(10.0, &[0.0, 0.0], &[0.0, 0.0]),
            particle(20.0, &[1.0, 0.0], &[0.0, 0.0]),
            particle(35.0, &[2.0, 0.0], &[0.0, 0.0]),
        ])
        .law(Merge::new())
        .build()
        .unwrap();
    engine.tick().unwrap();

    assert_eq!(engine.particles().len(), 1);
    let survivor = engine.particles().iter().next().unwrap();
    assert_eq!(survivor.mass(), 65.0);
}

#[test]
fn test_merge_threshold_is_exclusive() {
    let mut engine = Engine::builder()
        .particles(vec![
            particle(10.0, &[0.0, 0.0], &[0.0, 0.0]),
            particle(20.0, &[3.0, 0.0], &[0.0, 0.0]),
        ])
        .law(Merge::new())
        .build()
        .unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.particles().len(), 2);
}

#[test]
fn test_gravity_and_merge_together() {
    let mut engine = Engine::builder()
        .particles(vec![
            particle(10.0, &[0.0, 0.0], &[0.0, 0.0]),
            particle(20.0, &[2.0, 0.0], &[0.0, 0.0]),
            particle(50.0, &[200.0, 0.0], &[0.0, 0.0]),
        ])
        .force_generator(Gravity::default())
        .law(Merge::new())
        .build()
        .unwrap();

    for _ in 0..5 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.particles().len(), 2);
    assert!((engine.total_mass() - 80.0).abs() < EPS);
}
