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
//! Integration tests comparing the parallel run with the sequential one

use nbody_engine::engine::{Engine, EngineConfig, ParticleFactory};
use nbody_engine::laws::{Gravity, Merge};
use nbody_engine::parallel::split_into_lists;
use nbody_engine::particle::Particle;
use nbody_engine::Error;
use std::collections::HashSet;

const EPS: f64 = 1e-9;

fn particle(mass: f64, position: &[f64], velocity: &[f64]) -> Particle {
    Particle::new(mass, position.to_vec(), velocity.to_vec()).unwrap()
}

fn gravity_engine(particles: Vec<Particle>, ticks: u64) -> Engine {
    Engine::builder()
        .config(EngineConfig::default().with_max_ticks(ticks))
        .particles(particles)
        .force_generator(Gravity::default())
        .build()
        .unwrap()
}

fn assert_close(expected: &[f64], actual: &[f64], what: &str) {
    assert_eq!(expected.len(), actual.len());
    for (e, a) in expected.iter().zip(actual) {
        assert!(
            (e - a).abs() < EPS,
            "{} differs: expected {:?}, got {:?}",
            what,
            expected,
            actual
        );
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let initial = ParticleFactory::new(Some(42)).build(30).unwrap().into_vec();

    let mut sequential = gravity_engine(initial.clone(), 5);
    assert_eq!(sequential.run().unwrap(), 5);

    for workers in 1..=4 {
        let mut parallel = gravity_engine(initial.clone(), 5);
        assert_eq!(parallel.run_parallel(workers).unwrap(), 5);
        assert_eq!(parallel.particles().len(), sequential.particles().len());

        for expected in sequential.particles() {
            let actual = parallel
                .particles()
                .get(expected.id())
                .unwrap_or_else(|| panic!("{} missing with {} workers", expected.id(), workers));
            assert_eq!(expected.mass(), actual.mass());
            assert_close(expected.velocity(), actual.velocity(), "velocity");
            assert_close(expected.position(), actual.position(), "position");
        }
    }
}

#[test]
fn test_parallel_two_body_matches_hand_computation() {
    let light = particle(10.0, &[0.0, 0.0], &[0.0, 0.0]);
    let heavy = particle(100.0, &[4.0, 0.0], &[0.0, 0.0]);
    let (light_id, heavy_id) = (light.id(), heavy.id());

    let mut engine = gravity_engine(vec![light, heavy], 1);
    engine.run_parallel(2).unwrap();

    let light = engine.particles().get(light_id).unwrap();
    let heavy = engine.particles().get(heavy_id).unwrap();
    assert_close(&[0.0625, 0.0], light.velocity(), "light velocity");
    assert_close(&[-0.00625, 0.0], heavy.velocity(), "heavy velocity");
}

#[test]
fn test_more_workers_than_particles() {
    let initial = vec![
        particle(10.0, &[0.0, 0.0], &[0.0, 0.0]),
        particle(20.0, &[10.0, 0.0], &[0.0, 0.0]),
    ];
    let mut engine = gravity_engine(initial, 3);
    assert_eq!(engine.run_parallel(6).unwrap(), 3);
    assert_eq!(engine.particles().len(), 2);
}

#[test]
fn test_parallel_run_applies_merge() {
    let light = particle(10.0, &[0.0, 0.0], &[0.0, 0.0]);
    let heavy = particle(20.0, &[1.0, 0.0], &[0.0, 0.0]);
    let far = particle(5.0, &[500.0, 0.0], &[0.0, 0.0]);
    let (light_id, heavy_id) = (light.id(), heavy.id());

    let mut engine = Engine::builder()
        .config(EngineConfig::default().with_max_ticks(1))
        .particles(vec![light, heavy, far])
        .force_generator(Gravity::default())
        .law(Merge::new())
        .build()
        .unwrap();
    assert_eq!(engine.run_parallel(2).unwrap(), 1);

    assert_eq!(engine.particles().len(), 2);
    assert!(!engine.particles().contains(light_id));
    assert_eq!(engine.particles().get(heavy_id).unwrap().mass(), 30.0);
    assert!((engine.total_mass() - 35.0).abs() < EPS);
}

#[test]
fn test_parallel_zero_distance_aborts() {
    let mut engine = gravity_engine(
        vec![
            particle(1.0, &[5.0, 5.0], &[0.0, 0.0]),
            particle(2.0, &[5.0, 5.0], &[0.0, 0.0]),
            particle(3.0, &[50.0, 5.0], &[0.0, 0.0]),
        ],
        10,
    );
    assert!(matches!(
        engine.run_parallel(2),
        Err(Error::ZeroDistance { .. })
    ));
    assert_eq!(engine.tick_count(), 0);
}

#[test]
fn test_split_into_lists_partitions_input() {
    let lists = split_into_lists((0..7).collect::<Vec<u32>>(), 3).unwrap();
    assert_eq!(lists, vec![vec![0, 1, 6], vec![2, 3], vec![4, 5]]);

    for n in 1..=10 {
        let lists = split_into_lists((0..23).collect::<Vec<u32>>(), n).unwrap();
        assert_eq!(lists.len(), n);

        let sizes: Vec<usize> = lists.iter().map(Vec::len).collect();
        let max = sizes.iter().copied().max().unwrap();
        let min = sizes.iter().copied().min().unwrap();
        assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);

        let union: HashSet<u32> = lists.iter().flatten().copied().collect();
        assert_eq!(union.len(), 23);
        assert_eq!(lists.iter().map(Vec::len).sum::<usize>(), 23);
    }
}
