//! Evolves decision trees that steer an agent across a one-dimensional
//! level of plain, hole and enemy tiles.
//!
//! - [`level`]: Tiles and levels, parsed from strings such as `"PPHPEP"`
//! - [`gp`]: The genetic-programming engine: tree individuals, tile-walk
//!   fitness, tournament selection, subtree crossover, point mutation and
//!   the elitist generational loop
//!
//! ```
//! use tile_gp::gp::{GpConfig, GpRunner};
//! use tile_gp::level::Level;
//!
//! let level: Level = "PPPHPPEPPHHP".parse().unwrap();
//! let config = GpConfig::default()
//!     .with_population_size(50)
//!     .with_max_generations(20)
//!     .with_seed(7);
//! let result = GpRunner::run(&level, &config);
//! println!("fitness {:.2}, depth {}", result.best_fitness, result.best.depth());
//! ```
//!
//! Runs are single-threaded and fully determined by the configured seed.

pub mod gp;
pub mod level;
