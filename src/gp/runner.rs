//! GP generational loop.
//!
//! [`GpRunner`] orchestrates the complete evolutionary process:
//! seeding → (elitism → recombination → mutation → replacement) × generations.
//!
//! Every tree keeps its fitness current after each structural change, so the
//! population is always fully scored whenever selection reads it.

use super::config::GpConfig;
use super::operators::{crossover, mutate_population};
use super::selection::{fittest, tournament};
use super::tree::Tree;
use crate::level::Level;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of one generation, taken after replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Best fitness in the population.
    pub best_fitness: f64,
    /// Mean fitness of the population.
    pub mean_fitness: f64,
    /// Population variance of the fitness.
    pub fitness_variance: f64,
    /// Crossover events that exchanged subtrees (0 if the generation did
    /// not recombine).
    pub crossover_events: usize,
    /// Trees mutated (0 if the generation did not mutate).
    pub mutations: usize,
}

/// Result of a GP run.
#[derive(Debug, Clone)]
pub struct GpResult {
    /// The fittest tree of the final population, or the best tree seen so
    /// far if the run was cancelled.
    pub best: Tree,

    /// Fitness of [`best`](Self::best).
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Seed the run was driven by.
    pub seed: u64,

    /// Best fitness after seeding, then after each generation.
    pub fitness_history: Vec<f64>,

    /// Per-generation statistics.
    pub stats: Vec<GenerationStats>,
}

/// Executes the GP loop.
///
/// # Usage
///
/// ```
/// use tile_gp::gp::{GpConfig, GpRunner};
/// use tile_gp::level::Level;
///
/// let config = GpConfig::default()
///     .with_population_size(30)
///     .with_max_generations(10)
///     .with_seed(42);
/// let result = GpRunner::run(&Level::training(), &config);
/// assert!(result.best_fitness >= 0.0);
/// println!("{}", result.best);
/// ```
pub struct GpRunner;

impl GpRunner {
    /// Runs the GP against `level`.
    ///
    /// The configuration is clamped first (see [`GpConfig::clamped`]); the
    /// run never fails.
    pub fn run(level: &Level, config: &GpConfig) -> GpResult {
        Self::run_with_cancel(level, config, None)
    }

    /// Runs the GP with an optional cancellation token.
    ///
    /// The flag is checked once at the start of every generation. When it
    /// is set the run stops with the population intact and returns the
    /// best tree found so far.
    pub fn run_with_cancel(
        level: &Level,
        config: &GpConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GpResult {
        let config = config.clamped();
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let level = Arc::new(level.clone());

        info!(
            "seeding {} trees (height <= {}) on a {}-tile level, seed {seed}",
            config.population_size,
            config.max_initial_height,
            level.len()
        );

        // 1. Seed
        let mut population: Vec<Tree> = (0..config.population_size)
            .map(|_| Tree::random(&mut rng, config.max_initial_height, Arc::clone(&level)))
            .collect();

        let mut best = population[fittest(&population)].clone();
        let mut fitness_history = vec![best.fitness()];
        let mut stats = Vec::new();

        let n_elite = config.elite_count();
        let mut generations = 0;
        let mut cancelled = false;

        // 2. Generational loop
        while generations < config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            sort_descending(&mut population);
            let elite: Vec<Tree> = population[..n_elite].to_vec();

            let crossover_events = if rng.random_bool(config.crossover_probability) {
                recombine(&mut population, config.tournament_size, &mut rng)
            } else {
                0
            };

            let mutations = if rng.random_bool(config.mutation_probability) {
                mutate_population(&mut population[n_elite..], config.mutation_rate, &mut rng)
            } else {
                0
            };

            // Replacement: elites come back exactly as they were sorted in.
            for (slot, kept) in population.iter_mut().zip(elite) {
                *slot = kept;
            }
            generations += 1;

            let gen_stats = summarize(&population, generations, crossover_events, mutations);
            debug!(
                "generation {}: best {:.4}, mean {:.4}, {} crossovers, {} mutations",
                gen_stats.generation,
                gen_stats.best_fitness,
                gen_stats.mean_fitness,
                gen_stats.crossover_events,
                gen_stats.mutations
            );

            let gen_best = &population[fittest(&population)];
            if gen_best.fitness() > best.fitness() {
                best = gen_best.clone();
            }
            fitness_history.push(best.fitness());
            stats.push(gen_stats);
        }

        // 3. A completed run returns the fittest of the final population; a
        //    cancelled one returns the best tree seen so far.
        sort_descending(&mut population);
        if !cancelled || population[0].fitness() >= best.fitness() {
            best = population.swap_remove(0);
        }

        info!(
            "finished after {generations} generations{}: best fitness {:.4}, depth {}",
            if cancelled { " (cancelled)" } else { "" },
            best.fitness(),
            best.depth()
        );

        GpResult {
            best_fitness: best.fitness(),
            best,
            generations,
            cancelled,
            seed,
            fitness_history,
            stats,
        }
    }
}

/// Stable sort, fittest first.
fn sort_descending(population: &mut [Tree]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

/// Crosses tournament-selected pairs until as many parents have been drawn
/// as there are trees. Returns the number of pairs that exchanged subtrees.
///
/// A tree drawn as both parents is crossed with a copy of itself; only the
/// drawn tree keeps its offspring.
fn recombine<R: Rng + ?Sized>(population: &mut [Tree], tournament_size: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut drawn = 0;
    let mut events = 0;
    while drawn < n {
        let i = tournament(&*population, tournament_size, rng);
        let j = tournament(&*population, tournament_size, rng);
        drawn += 2;
        let exchanged = match pair_mut(population, i, j) {
            Some((a, b)) => crossover(a, b, rng),
            None => {
                debug!("tree {i} drawn as both parents, crossing with its copy");
                let mut copy = population[i].clone();
                crossover(&mut population[i], &mut copy, rng)
            }
        };
        if exchanged {
            events += 1;
        }
    }
    events
}

/// Two distinct mutable elements of a slice.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j {
        return None;
    }
    if i < j {
        let (left, right) = items.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}

fn summarize(
    population: &[Tree],
    generation: usize,
    crossover_events: usize,
    mutations: usize,
) -> GenerationStats {
    let n = population.len() as f64;
    let mean = population.iter().map(Tree::fitness).sum::<f64>() / n;
    let variance = population
        .iter()
        .map(|t| (t.fitness() - mean).powi(2))
        .sum::<f64>()
        / n;
    let best = population
        .iter()
        .map(Tree::fitness)
        .fold(f64::NEG_INFINITY, f64::max);
    GenerationStats {
        generation,
        best_fitness: best,
        mean_fitness: mean,
        fitness_variance: variance,
        crossover_events,
        mutations,
    }
}

// ============================================================================
// Tests
// ============================================================================
