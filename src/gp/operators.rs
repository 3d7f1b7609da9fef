//! Structural genetic operators on decision trees.
//!
//! - [`crossover`]: exchange one non-root subtree between two trees
//! - [`mutate`]: point mutation of a single node label
//! - [`mutate_population`]: point-mutate a random subset of trees
//!
//! All operators refresh the fitness of every tree they touch before
//! returning.
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers by
//!   Means of Natural Selection*

use super::tree::Tree;
use log::trace;
use rand::seq::index;
use rand::Rng;

/// Subtree crossover.
///
/// Picks a uniform non-root node in each tree and swaps the subtrees
/// rooted there. The pair's total node count is preserved.
///
/// A tree made of a lone root has no subtree to give; crossover is then a
/// no-op and returns `false`.
pub fn crossover<R: Rng + ?Sized>(a: &mut Tree, b: &mut Tree, rng: &mut R) -> bool {
    let (len_a, len_b) = (a.len(), b.len());
    if len_a < 2 || len_b < 2 {
        trace!("crossover skipped: {len_a} and {len_b} nodes");
        return false;
    }
    let ka = rng.random_range(1..len_a);
    let kb = rng.random_range(1..len_b);
    Tree::swap_subtrees(a, ka, b, kb)
}

/// Point mutation.
///
/// Picks a uniform node, root included, and replaces its label with a
/// different one of the same category. The tree's shape is unchanged.
///
/// Returns the preorder index of the mutated node.
pub fn mutate<R: Rng + ?Sized>(tree: &mut Tree, rng: &mut R) -> usize {
    let k = rng.random_range(0..tree.len());
    if let Some(node) = tree.node(k) {
        let next = node.label().redraw(rng);
        let relabeled = tree.relabel(k, next);
        debug_assert!(relabeled, "redraw must keep the label category");
    }
    k
}

/// Mutates `round(rate * trees.len())` distinct trees chosen at random.
///
/// Returns the number of trees mutated.
pub fn mutate_population<R: Rng + ?Sized>(trees: &mut [Tree], rate: f64, rng: &mut R) -> usize {
    let count = mutation_count(trees.len(), rate);
    for i in index::sample(rng, trees.len(), count) {
        mutate(&mut trees[i], rng);
    }
    count
}

/// Number of trees [`mutate_population`] touches.
pub fn mutation_count(n: usize, rate: f64) -> usize {
    ((rate.max(0.0) * n as f64).round() as usize).min(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::primitives::{Action, Label, Test};
    use crate::gp::tree::Node;
    use crate::level::{Level, TileKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn classic() -> Arc<Level> {
        Arc::new(Level::classic())
    }

    fn labels(tree: &Tree) -> Vec<Label> {
        tree.dump().into_iter().map(|r| r.label).collect()
    }

    #[test]
    fn test_crossover_preserves_node_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let lvl = classic();
        for _ in 0..200 {
            let mut a = Tree::random(&mut rng, 5, Arc::clone(&lvl));
            let mut b = Tree::random(&mut rng, 5, Arc::clone(&lvl));
            let (root_a, root_b) = (a.root().label(), b.root().label());
            let total = a.len() + b.len();

            assert!(crossover(&mut a, &mut b, &mut rng));

            assert_eq!(a.len() + b.len(), total);
            assert_eq!(a.root().label(), root_a, "root of a must stay");
            assert_eq!(b.root().label(), root_b, "root of b must stay");
            assert_eq!(a.leaf_count(), a.internal_count() + 1);
            assert_eq!(b.leaf_count(), b.internal_count() + 1);
        }
    }

    #[test]
    fn test_crossover_refreshes_fitness() {
        let lvl: Arc<Level> = Arc::new("PPHP".parse().unwrap());
        let jumper = Node::test(
            Test::new(TileKind::Hole, 1),
            Node::action(Action::Jump),
            Node::action(Action::MoveRight),
        );
        let walker = Node::test(
            Test::new(TileKind::Hole, 1),
            Node::action(Action::MoveRight),
            Node::action(Action::MoveRight),
        );
        let mut a = Tree::new(jumper, Arc::clone(&lvl));
        let mut b = Tree::new(walker, lvl);
        assert_eq!(a.fitness(), 1.0);
        assert_eq!(b.fitness(), 0.5);

        // swap the `yes` leaves directly
        assert!(Tree::swap_subtrees(&mut a, 1, &mut b, 1));
        assert_eq!(a.fitness(), 0.5);
        assert_eq!(b.fitness(), 1.0);
    }

    #[test]
    fn test_crossover_on_lone_root_is_noop() {
        let lvl = classic();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lone = Tree::new(Node::action(Action::Jump), Arc::clone(&lvl));
        let mut other = Tree::random(&mut rng, 4, lvl);
        let before = other.root().clone();

        assert!(!crossover(&mut lone, &mut other, &mut rng));
        assert_eq!(lone.len(), 1);
        assert_eq!(other.root(), &before);
    }

    #[test]
    fn test_mutate_changes_exactly_one_label() {
        let mut rng = StdRng::seed_from_u64(7);
        let lvl = classic();
        for _ in 0..200 {
            let mut tree = Tree::random(&mut rng, 5, Arc::clone(&lvl));
            let before = tree.dump();
            let k = mutate(&mut tree, &mut rng);
            let after = tree.dump();

            assert_eq!(before.len(), after.len());
            let changed: Vec<usize> = before
                .iter()
                .zip(&after)
                .filter(|(x, y)| x.label != y.label)
                .map(|(x, _)| x.index)
                .collect();
            assert_eq!(changed, vec![k]);
            assert_eq!(before[k].label.is_test(), after[k].label.is_test());
            for (x, y) in before.iter().zip(&after) {
                assert_eq!(x.parent, y.parent);
                assert_eq!(x.children, y.children);
            }
        }
    }

    #[test]
    fn test_mutate_refreshes_fitness() {
        let mut rng = StdRng::seed_from_u64(3);
        let lvl = classic();
        for _ in 0..50 {
            let mut tree = Tree::random(&mut rng, 4, Arc::clone(&lvl));
            mutate(&mut tree, &mut rng);
            let fresh = Tree::new(tree.root().clone(), Arc::clone(&lvl));
            assert_eq!(tree.fitness(), fresh.fitness());
        }
    }

    #[test]
    fn test_mutate_population_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let lvl = classic();
        let mut trees: Vec<Tree> = (0..40)
            .map(|_| Tree::random(&mut rng, 4, Arc::clone(&lvl)))
            .collect();
        let before: Vec<Vec<Label>> = trees.iter().map(labels).collect();

        let n = mutate_population(&mut trees, 0.1, &mut rng);
        assert_eq!(n, 4);

        let touched = trees
            .iter()
            .zip(&before)
            .filter(|(t, b)| &labels(t) != *b)
            .count();
        assert_eq!(touched, 4);
    }

    #[test]
    fn test_mutation_count_rounding_and_clamping() {
        assert_eq!(mutation_count(10, 0.25), 3); // 2.5 rounds away from zero
        assert_eq!(mutation_count(40, 0.1), 4);
        assert_eq!(mutation_count(10, 0.0), 0);
        assert_eq!(mutation_count(10, -1.0), 0);
        assert_eq!(mutation_count(10, 3.0), 10);
        assert_eq!(mutation_count(0, 0.5), 0);
    }
}
