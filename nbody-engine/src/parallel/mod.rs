//! Scatter-gather execution of the force phase
//!
//! This module provides the pieces the engine's parallel run is built on:
//! - Partitioning of the particle collection into near-equal slices
//! - A fixed pool of worker threads fed through bounded channels
//!
//! Workers never share mutable state. Each unit of work carries an owned
//! slice plus a read-only snapshot of the whole collection, and the worker
//! hands the slice back once its particles are updated.

mod partition;
mod pool;

pub use partition::split_into_lists;
pub use pool::WorkerPool;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exports() {
        let lists = split_into_lists(vec![1, 2, 3], 2).unwrap();
        assert_eq!(lists.len(), 2);
    }
}
