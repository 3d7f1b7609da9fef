//! The fixed test/action alphabet.
//!
//! Internal tree nodes hold a [`Test`], leaves hold an [`Action`]. Both are
//! closed sets: [`Test::ALL`] and [`Action::ALL`] enumerate every member,
//! and random draws pick a uniform index into those arrays.

use crate::level::{Level, TileKind};
use rand::Rng;
use std::fmt;

/// Predicate "the tile `offset` steps from the agent is `tile`".
///
/// Tiles off either end of the level never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Test {
    /// Tile kind the test looks for.
    pub tile: TileKind,
    /// Signed distance from the agent's position.
    pub offset: isize,
}

impl Test {
    /// Distances a test can look at.
    pub const OFFSETS: [isize; 4] = [-2, -1, 1, 2];

    /// Every test in the alphabet.
    pub const ALL: [Test; 12] = {
        let mut all = [Test {
            tile: TileKind::Plain,
            offset: 0,
        }; 12];
        let mut i = 0;
        while i < 12 {
            all[i] = Test {
                tile: TileKind::ALL[i / 4],
                offset: Self::OFFSETS[i % 4],
            };
            i += 1;
        }
        all
    };

    /// Creates a test.
    pub const fn new(tile: TileKind, offset: isize) -> Self {
        Self { tile, offset }
    }

    /// Evaluates the test for an agent standing at `position`.
    pub fn evaluate(self, level: &Level, position: isize) -> bool {
        level.get(position + self.offset) == Some(self.tile)
    }

    /// Draws a test uniformly from [`Test::ALL`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}{:+}", self.tile.symbol(), self.offset)
    }
}

/// Result of performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The agent cleared the tile ahead.
    Advanced,
    /// The agent died on the tile ahead.
    Died,
}

impl Outcome {
    /// Whether the agent survived.
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Advanced)
    }
}

/// Terminal behavior of the agent.
///
/// Every action attempts to cross the tile directly ahead of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Walk onto the next tile. Dies on holes and enemies.
    MoveRight,
    /// Jump over the next tile. Always survives.
    Jump,
    /// Shoot ahead and walk on. Clears enemies, dies on holes.
    Fire,
}

impl Action {
    /// Every action in the alphabet.
    pub const ALL: [Action; 3] = [Action::MoveRight, Action::Jump, Action::Fire];

    /// Performs the action against the tile ahead of the agent.
    ///
    /// Running off the right end of the level (`ahead == None`) counts as
    /// an advance.
    pub fn apply(self, ahead: Option<TileKind>) -> Outcome {
        let survives = match (self, ahead) {
            (_, None) => true,
            (Action::Jump, _) => true,
            (Action::MoveRight, Some(tile)) => !tile.is_hazard(),
            (Action::Fire, Some(tile)) => tile != TileKind::Hole,
        };
        if survives {
            Outcome::Advanced
        } else {
            Outcome::Died
        }
    }

    /// Draws an action uniformly from [`Action::ALL`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Short code used in tree dumps.
    pub fn code(self) -> char {
        match self {
            Action::MoveRight => 'R',
            Action::Jump => 'J',
            Action::Fire => 'F',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Label carried by a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    /// Internal node predicate.
    Test(Test),
    /// Leaf behavior.
    Action(Action),
}

impl Label {
    /// Draws uniformly from the union of tests and actions.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let n_tests = Test::ALL.len();
        let i = rng.random_range(0..n_tests + Action::ALL.len());
        if i < n_tests {
            Label::Test(Test::ALL[i])
        } else {
            Label::Action(Action::ALL[i - n_tests])
        }
    }

    /// Draws a different label of the same category.
    pub fn redraw<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        match self {
            Label::Test(current) => Label::Test(draw_other(&Test::ALL, current, rng)),
            Label::Action(current) => Label::Action(draw_other(&Action::ALL, current, rng)),
        }
    }

    /// Whether this label belongs on an internal node.
    pub fn is_test(self) -> bool {
        matches!(self, Label::Test(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Test(t) => fmt::Display::fmt(t, f),
            Label::Action(a) => fmt::Display::fmt(a, f),
        }
    }
}

/// Uniform draw from `all` excluding `current`.
fn draw_other<T: Copy + PartialEq, R: Rng + ?Sized>(all: &[T], current: T, rng: &mut R) -> T {
    let others: Vec<T> = all.iter().copied().filter(|&x| x != current).collect();
    if others.is_empty() {
        return current;
    }
    others[rng.random_range(0..others.len())]
}
