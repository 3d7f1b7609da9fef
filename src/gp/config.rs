//! GP configuration.
//!
//! [`GpConfig`] holds all parameters that control the evolutionary loop.
//! Out-of-range values are never rejected: [`GpConfig::clamped`] raises or
//! lowers them to the nearest usable value, and the runner always works on
//! the clamped copy.

use log::warn;

/// Smallest population the runner accepts.
pub const MIN_POPULATION_SIZE: usize = 6;
/// Smallest tournament the runner accepts.
pub const MIN_TOURNAMENT_SIZE: usize = 2;
/// Smallest initial tree height the runner accepts.
pub const MIN_INITIAL_HEIGHT: usize = 2;

/// Configuration for the GP loop.
///
/// # Defaults
///
/// ```
/// use tile_gp::gp::GpConfig;
///
/// let config = GpConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.tournament_size, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tile_gp::gp::GpConfig;
///
/// let config = GpConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(3)
///     .with_crossover_probability(0.9)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GpConfig {
    /// Number of trees in the population (at least 6).
    pub population_size: usize,

    /// Number of generations to run (at least 1).
    pub max_generations: usize,

    /// Fraction of the population carried unchanged into the next
    /// generation. `round(elitism_rate * population_size)` trees are kept.
    pub elitism_rate: f64,

    /// Probability that a generation recombines its population (0.0–1.0).
    pub crossover_probability: f64,

    /// Contestants per tournament (at least 2).
    pub tournament_size: usize,

    /// Fraction of the non-elite trees mutated in a mutating generation.
    pub mutation_rate: f64,

    /// Probability that a generation mutates at all (0.0–1.0).
    ///
    /// Distinct from [`mutation_rate`](Self::mutation_rate): this decides
    /// *whether* a generation mutates, the rate decides *how many* trees.
    pub mutation_probability: f64,

    /// Height bound for the randomly sampled initial trees (at least 2).
    pub max_initial_height: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed for every run.
    pub seed: Option<u64>,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            elitism_rate: 0.1,
            crossover_probability: 0.5,
            tournament_size: 5,
            mutation_rate: 0.05,
            mutation_probability: 0.03,
            max_initial_height: 5,
            seed: None,
        }
    }
}

impl GpConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the elitism rate.
    pub fn with_elitism_rate(mut self, rate: f64) -> Self {
        self.elitism_rate = rate;
        self
    }

    /// Sets the per-generation crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the fraction of non-elite trees to mutate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the per-generation mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the initial tree height bound.
    pub fn with_max_initial_height(mut self, h: usize) -> Self {
        self.max_initial_height = h;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with every parameter moved into its usable range.
    ///
    /// | parameter | clamp |
    /// |---|---|
    /// | `population_size` | ≥ 6 |
    /// | `max_generations` | ≥ 1 |
    /// | `tournament_size` | ≥ 2 |
    /// | `max_initial_height` | ≥ 2 |
    /// | `elitism_rate`, `mutation_rate` | ≥ 0 |
    /// | `crossover_probability`, `mutation_probability` | 0–1 |
    ///
    /// NaN rates and probabilities become 0. Each adjustment is logged at
    /// `warn` level.
    pub fn clamped(&self) -> Self {
        Self {
            population_size: clamp_min("population_size", self.population_size, MIN_POPULATION_SIZE),
            max_generations: clamp_min("max_generations", self.max_generations, 1),
            elitism_rate: clamp_rate("elitism_rate", self.elitism_rate, f64::INFINITY),
            crossover_probability: clamp_rate(
                "crossover_probability",
                self.crossover_probability,
                1.0,
            ),
            tournament_size: clamp_min("tournament_size", self.tournament_size, MIN_TOURNAMENT_SIZE),
            mutation_rate: clamp_rate("mutation_rate", self.mutation_rate, f64::INFINITY),
            mutation_probability: clamp_rate(
                "mutation_probability",
                self.mutation_probability,
                1.0,
            ),
            max_initial_height: clamp_min(
                "max_initial_height",
                self.max_initial_height,
                MIN_INITIAL_HEIGHT,
            ),
            seed: self.seed,
        }
    }

    /// Number of elite trees: `round(elitism_rate * population_size)`,
    /// capped at the population size.
    pub fn elite_count(&self) -> usize {
        let n = self.population_size;
        ((self.elitism_rate.max(0.0) * n as f64).round() as usize).min(n)
    }
}

fn clamp_min(name: &str, value: usize, min: usize) -> usize {
    if value < min {
        warn!("{name} = {value} is below the minimum, using {min}");
        min
    } else {
        value
    }
}

fn clamp_rate(name: &str, value: f64, max: f64) -> f64 {
    let clamped = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    };
    if clamped != value {
        warn!("{name} = {value} is out of range, using {clamped}");
    }
    clamped
}
