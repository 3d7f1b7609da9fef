//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::tree::Tree;
use rand::Rng;

/// A candidate with a cached fitness. Higher is better.
pub trait Individual {
    /// Current fitness.
    fn fitness(&self) -> f64;
}

impl Individual for Tree {
    fn fitness(&self) -> f64 {
        Tree::fitness(self)
    }
}

/// Picks the index of a parent by tournament.
///
/// Draws `size` contestants uniformly **with replacement** and returns the
/// fittest; ties go to the contestant drawn first. A tournament at least as
/// large as the population degenerates to picking the population's fittest
/// individual (first one on ties) without drawing.
///
/// # Complexity
/// O(size) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<I: Individual, R: Rng + ?Sized>(
    population: &[I],
    size: usize,
    rng: &mut R,
) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let n = population.len();
    if size >= n {
        return fittest(population);
    }

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..size.max(1) {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() > population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Index of the fittest individual; the first one on ties.
///
/// # Panics
/// Panics if `population` is empty.
pub fn fittest<I: Individual>(population: &[I]) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let mut best_idx = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness() > population[best_idx].fitness() {
            best_idx = i;
        }
    }
    best_idx
}
