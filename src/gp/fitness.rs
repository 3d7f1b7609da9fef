//! Tile-walk fitness.
//!
//! The agent starts on a start pad left of tile 0. On every step the tree
//! picks an action for the agent's current position, and the action is
//! checked against the tile directly ahead. A valid action clears that
//! tile and scores one point; the first invalid action kills the agent.
//!
//! Fitness is the fraction of the level cleared, in `[0, 1]`.

use super::primitives::Outcome;
use super::tree::Node;
use crate::level::{Level, TileKind};

/// Position of the start pad, left of the first tile.
pub const START_POSITION: isize = -1;

/// State of one walk across a level.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    level: &'a Level,
    position: isize,
    steps: usize,
    alive: bool,
}

impl<'a> Simulation<'a> {
    /// Places the agent on the start pad.
    pub fn new(level: &'a Level) -> Self {
        Self {
            level,
            position: START_POSITION,
            steps: 0,
            alive: true,
        }
    }

    /// Index of the last tile cleared (`-1` on the start pad).
    pub fn position(&self) -> isize {
        self.position
    }

    /// Number of tiles cleared.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the agent is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Tile the next action is checked against.
    pub fn tile_ahead(&self) -> Option<TileKind> {
        self.level.get(self.position + 1)
    }

    /// Whether the walk is over: the agent died or cleared every tile.
    pub fn is_finished(&self) -> bool {
        !self.alive || self.steps >= self.level.len()
    }

    /// Lets `root` choose one action and performs it.
    pub fn step(&mut self, root: &Node) -> Outcome {
        if self.is_finished() {
            return if self.alive {
                Outcome::Advanced
            } else {
                Outcome::Died
            };
        }
        let action = root.decide(self.level, self.position);
        let outcome = action.apply(self.tile_ahead());
        match outcome {
            Outcome::Advanced => {
                self.position += 1;
                self.steps += 1;
            }
            Outcome::Died => self.alive = false,
        }
        outcome
    }

    /// Fraction of the level cleared so far; 0 for an empty level.
    pub fn score(&self) -> f64 {
        if self.level.is_empty() {
            0.0
        } else {
            self.steps as f64 / self.level.len() as f64
        }
    }
}

/// Walks `root` across `level` and returns its fitness.
///
/// Pure: the same tree and level always give the same score.
pub fn evaluate(root: &Node, level: &Level) -> f64 {
    let mut sim = Simulation::new(level);
    while !sim.is_finished() {
        sim.step(root);
    }
    sim.score()
}
