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
//! Work partitioning

use crate::error::{Error, Result};

/// Split `items` into `nbr` disjoint lists whose sizes differ by at most one
///
/// Every list first receives `len / nbr` consecutive items; the remaining
/// items are dealt round-robin starting from the first list.
///
/// # Errors
///
/// Returns `InvalidConfig` if `nbr` is zero.
///
/// # Example
///
/// ```rust
/// use nbody_engine::parallel::split_into_lists;
///
/// let lists = split_into_lists((0..7).collect::<Vec<u32>>(), 3).unwrap();
/// assert_eq!(lists, vec![vec![0, 1, 6], vec![2, 3], vec![4, 5]]);
/// ```
pub fn split_into_lists<T>(items: Vec<T>, nbr: usize) -> Result<Vec<Vec<T>>> {
    if nbr == 0 {
        return Err(Error::InvalidConfig(
            "number of lists must be > 0".to_string(),
        ));
    }

    let per_list = items.len() / nbr;
    let mut lists: Vec<Vec<T>> = (0..nbr).map(|_| Vec::with_capacity(per_list + 1)).collect();

    let mut items = items.into_iter();
    for list in lists.iter_mut() {
        list.extend(items.by_ref().take(per_list));
    }
    for (item, i) in items.zip((0..nbr).cycle()) {
        lists[i].push(item);
    }

    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seven_items_in_three_lists() {
        let items: Vec<u32> = (0..7).collect();
        let lists = split_into_lists(items.clone(), 3).unwrap();
        assert_eq!(lists.len(), 3);

        let sizes: Vec<usize> = lists.iter().map(Vec::len).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1, "sizes {:?}", sizes);

        let flattened: Vec<u32> = lists.iter().flatten().copied().collect();
        assert_eq!(flattened.len(), items.len(), "an item appears twice");
        let union: HashSet<u32> = flattened.into_iter().collect();
        assert_eq!(union, items.into_iter().collect::<HashSet<u32>>());
    }

    #[test]
    fn test_more_lists_than_items() {
        let lists = split_into_lists(vec!['a', 'b'], 4).unwrap();
        assert_eq!(lists, vec![vec!['a'], vec!['b'], vec![], vec![]]);
    }

    #[test]
    fn test_exact_division() {
        let lists = split_into_lists((0..6).collect::<Vec<_>>(), 3).unwrap();
        assert_eq!(lists, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_single_list() {
        let lists = split_into_lists(vec![1, 2, 3], 1).unwrap();
        assert_eq!(lists, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_empty_input() {
        let lists: Vec<Vec<u8>> = split_into_lists(Vec::new(), 2).unwrap();
        assert_eq!(lists, vec![Vec::<u8>::new(), Vec::new()]);
    }

    #[test]
    fn test_zero_lists_rejected() {
        assert!(matches!(
            split_into_lists(vec![1], 0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
