//! Uniform shuffling for boards and display orders.

use rand::Rng;

/// In-place Fisher-Yates shuffle: for each i from the last index down to 1,
/// swap with a uniformly chosen index in [0, i].
pub fn fisher_yates<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// A shuffled permutation of `0..len`.
pub fn shuffled_indices(len: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    fisher_yates(&mut order, rng);
    order
}
