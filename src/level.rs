//! One-dimensional levels.
//!
//! A [`Level`] is an ordered row of [`TileKind`]s the agent walks across
//! from left to right. Levels are usually written as strings of tile
//! symbols (`P` plain, `H` hole, `E` enemy):
//!
//! ```
//! use tile_gp::level::{Level, TileKind};
//!
//! let level: Level = "PPHP".parse().unwrap();
//! assert_eq!(level.len(), 4);
//! assert_eq!(level.get(2), Some(TileKind::Hole));
//! assert_eq!(level.get(-1), None);
//! ```

use std::fmt;
use std::str::FromStr;

/// Kind of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    /// Solid ground.
    Plain,
    /// A gap the agent falls into unless it jumps.
    Hole,
    /// An enemy the agent dies on unless it jumps or fires.
    Enemy,
}

impl TileKind {
    /// Every tile kind, in declaration order.
    pub const ALL: [TileKind; 3] = [TileKind::Plain, TileKind::Hole, TileKind::Enemy];

    /// Single-character symbol used in level strings.
    pub fn symbol(self) -> char {
        match self {
            TileKind::Plain => 'P',
            TileKind::Hole => 'H',
            TileKind::Enemy => 'E',
        }
    }

    /// Parses a tile symbol. Lowercase symbols are accepted.
    pub fn from_symbol(symbol: char) -> Option<TileKind> {
        match symbol.to_ascii_uppercase() {
            'P' => Some(TileKind::Plain),
            'H' => Some(TileKind::Hole),
            'E' => Some(TileKind::Enemy),
            _ => None,
        }
    }

    /// Whether the agent dies walking onto this tile.
    pub fn is_hazard(self) -> bool {
        !matches!(self, TileKind::Plain)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error produced when parsing a level string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// A character that is not a tile symbol.
    #[error("unknown tile symbol {symbol:?} at index {index}")]
    UnknownTile {
        /// The offending character.
        symbol: char,
        /// Index of the tile within the level (whitespace not counted).
        index: usize,
    },
}

/// An immutable row of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    tiles: Vec<TileKind>,
}

impl Level {
    /// Creates a level from its tiles.
    pub fn new(tiles: Vec<TileKind>) -> Self {
        Self { tiles }
    }

    /// The 20-tile training level.
    pub fn training() -> Self {
        Self::from_symbols("PPPHHPPPHPPPPHPPEEPP")
    }

    /// The 35-tile classic level, mixing holes, double holes and enemies.
    pub fn classic() -> Self {
        Self::from_symbols("PPPHPPHPPEPPPHHPHHPPEPEPEHHPPEPHHPP")
    }

    fn from_symbols(symbols: &str) -> Self {
        Self::new(symbols.chars().filter_map(TileKind::from_symbol).collect())
    }

    /// The tiles, left to right.
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the level has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at a signed index; `None` off either end of the level.
    pub fn get(&self, index: isize) -> Option<TileKind> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tiles.get(i).copied())
    }
}

impl From<Vec<TileKind>> for Level {
    fn from(tiles: Vec<TileKind>) -> Self {
        Self::new(tiles)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(index, symbol)| {
                TileKind::from_symbol(symbol).ok_or(LevelError::UnknownTile { symbol, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(tiles))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.tiles {
            write!(f, "{tile}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let level: Level = "PPHE".parse().unwrap();
        assert_eq!(
            level.tiles(),
            &[
                TileKind::Plain,
                TileKind::Plain,
                TileKind::Hole,
                TileKind::Enemy
            ]
        );
        assert_eq!(level.to_string(), "PPHE");
    }

    #[test]
    fn test_parse_ignores_whitespace_and_case() {
        let level: Level = "p p\nh e".parse().unwrap();
        assert_eq!(level.to_string(), "PPHE");
    }

    #[test]
    fn test_parse_unknown_symbol() {
        let err = "PPX".parse::<Level>().unwrap_err();
        assert_eq!(
            err,
            LevelError::UnknownTile {
                symbol: 'X',
                index: 2
            }
        );
        assert_eq!(err.to_string(), "unknown tile symbol 'X' at index 2");
    }

    #[test]
    fn test_get_out_of_range() {
        let level: Level = "PH".parse().unwrap();
        assert_eq!(level.get(-1), None);
        assert_eq!(level.get(0), Some(TileKind::Plain));
        assert_eq!(level.get(1), Some(TileKind::Hole));
        assert_eq!(level.get(2), None);
    }

    #[test]
    fn test_builtin_levels() {
        assert_eq!(Level::training().len(), 20);
        assert_eq!(Level::classic().len(), 35);
        assert!(Level::training().tiles().contains(&TileKind::Enemy));
        assert_eq!(Level::training().get(0), Some(TileKind::Plain));
    }

    #[test]
    fn test_hazards() {
        assert!(!TileKind::Plain.is_hazard());
        assert!(TileKind::Hole.is_hazard());
        assert!(TileKind::Enemy.is_hazard());
    }
}
