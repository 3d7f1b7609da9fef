//! Genetic programming of tile-walking decision trees.
//!
//! Individuals are binary decision trees: internal nodes branch on a
//! [`Test`] of the level around the agent, leaves emit an [`Action`]. The
//! [`GpRunner`] evolves a population of such trees with tournament
//! selection, subtree crossover, point mutation and elitism, scoring each
//! tree by how far it walks across a [`Level`](crate::level::Level).
//!
//! # Key Types
//!
//! - [`GpConfig`]: Algorithm parameters, clamped into range before a run
//! - [`GpRunner`]: Executes the generational loop
//! - [`GpResult`]: Best tree and per-generation statistics
//! - [`Tree`] / [`Node`]: The individual and its node graph
//!
//! # Submodules
//!
//! - [`fitness`]: Tile-walk simulation and scoring
//! - [`operators`]: Subtree crossover and point mutation
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers by
//!   Means of Natural Selection*
//! - Poli, Langdon & McPhee (2008), *A Field Guide to Genetic Programming*

mod config;
pub mod fitness;
pub mod operators;
mod primitives;
mod runner;
pub mod selection;
mod tree;

pub use config::{GpConfig, MIN_INITIAL_HEIGHT, MIN_POPULATION_SIZE, MIN_TOURNAMENT_SIZE};
pub use primitives::{Action, Label, Outcome, Test};
pub use runner::{GenerationStats, GpResult, GpRunner};
pub use tree::{Branch, Node, NodeRecord, Tree, UNEVALUATED};
