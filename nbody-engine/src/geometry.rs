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
//! Distance helpers for N-dimensional positions
//!
//! The engine measures pairwise distance by folding two-dimensional
//! hypotenuses: the first two axes give a planar distance, and every further
//! axis is folded in with another hypotenuse. Mathematically this equals the
//! Euclidean norm; numerically the rounding differs slightly, and the folded
//! form is the one the laws use.

use crate::error::{Error, Result};

/// Planar hypotenuse, sqrt(dx² + dy²)
#[inline]
pub fn dist(delta_x: f64, delta_y: f64) -> f64 {
    (delta_x * delta_x + delta_y * delta_y).sqrt()
}

/// Distance between two positions by hypotenuse folding
///
/// One-dimensional positions use the absolute difference.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the positions differ in length, and
/// `InvalidConfig` for empty positions.
pub fn multi_dimensional_distance(position_1: &[f64], position_2: &[f64]) -> Result<f64> {
    check_dimensions(position_1, position_2)?;

    match position_1.len() {
        0 => Err(Error::InvalidConfig(
            "distance requires at least one dimension".to_string(),
        )),
        1 => Ok((position_1[0] - position_2[0]).abs()),
        _ => {
            let planar = dist(position_1[0] - position_2[0], position_2[1] - position_1[1]);
            Ok(position_1[2..]
                .iter()
                .zip(&position_2[2..])
                .fold(planar, |acc, (p1, p2)| dist(acc, p1 - p2)))
        }
    }
}

/// Euclidean norm of the difference between two positions
///
/// # Errors
///
/// Returns `DimensionMismatch` if the positions differ in length.
pub fn euclidean_distance(position_1: &[f64], position_2: &[f64]) -> Result<f64> {
    check_dimensions(position_1, position_2)?;
    Ok(position_1
        .iter()
        .zip(position_2)
        .map(|(p1, p2)| (p1 - p2) * (p1 - p2))
        .sum::<f64>()
        .sqrt())
}

fn check_dimensions(position_1: &[f64], position_2: &[f64]) -> Result<()> {
    if position_1.len() != position_2.len() {
        return Err(Error::DimensionMismatch {
            expected: position_1.len(),
            found: position_2.len(),
        });
    }
    Ok(())
}
