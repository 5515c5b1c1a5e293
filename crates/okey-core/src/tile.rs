//! Tile model, deck construction and shuffling.
//!
//! A full Okey set is two copies of every rank 1-13 in four colors plus two
//! jokers, 106 tiles in total.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tiles in a complete set
pub const TILE_COUNT: usize = 106;

/// Highest tile rank
pub const MAX_RANK: u8 = 13;

/// Copies of each colored rank in a set
const COPIES: u8 = 2;

/// Tile colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Black,
    Yellow,
    Blue,
}

impl TileColor {
    pub const ALL: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Black,
        TileColor::Yellow,
        TileColor::Blue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Black => "black",
            TileColor::Yellow => "yellow",
            TileColor::Blue => "blue",
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A physical tile.
///
/// Jokers carry a display-only rank and color; they never take part in
/// rank or color comparisons. `is_okey` marks a tile that matches the
/// current deal's okey descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    pub rank: u8,
    pub color: TileColor,
    #[serde(default)]
    pub is_joker: bool,
    #[serde(default)]
    pub is_okey: bool,
}

impl Tile {
    /// Create a standard tile with the conventional `color-rank-copy` id
    pub fn new(color: TileColor, rank: u8, copy: u8) -> Self {
        Self {
            id: format!("{}-{}-{}", color, rank, copy),
            rank,
            color,
            is_joker: false,
            is_okey: false,
        }
    }

    /// Create one of the two jokers
    pub fn joker(index: u8, color: TileColor) -> Self {
        Self {
            id: format!("joker-{}", index),
            rank: 1,
            color,
            is_joker: true,
            is_okey: false,
        }
    }

    /// Jokers and the deal's okey tiles
    pub fn is_wildcard(&self) -> bool {
        self.is_joker || self.is_okey
    }

    /// Whether this is a non-joker tile of the given rank and color
    pub fn matches(&self, descriptor: &TileDescriptor) -> bool {
        !self.is_joker && self.rank == descriptor.rank && self.color == descriptor.color
    }

    pub fn descriptor(&self) -> TileDescriptor {
        TileDescriptor {
            rank: self.rank,
            color: self.color,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker {
            write!(f, "joker")
        } else if self.is_okey {
            write!(f, "{} {}*", self.rank, self.color)
        } else {
            write!(f, "{} {}", self.rank, self.color)
        }
    }
}

/// A rank and color without a physical identity, used for the okey tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDescriptor {
    pub rank: u8,
    pub color: TileColor,
}

impl fmt::Display for TileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rank, self.color)
    }
}

/// Build the full 106-tile set in a fixed order
pub fn build_deck() -> Vec<Tile> {
    let mut deck = Vec::with_capacity(TILE_COUNT);

    for color in TileColor::ALL {
        for copy in 1..=COPIES {
            for rank in 1..=MAX_RANK {
                deck.push(Tile::new(color, rank, copy));
            }
        }
    }

    deck.push(Tile::joker(1, TileColor::Red));
    deck.push(Tile::joker(2, TileColor::Black));

    deck
}

/// Return a uniformly shuffled copy of `tiles` (Fisher-Yates)
pub fn shuffle<R: Rng + ?Sized>(tiles: &[Tile], rng: &mut R) -> Vec<Tile> {
    let mut shuffled = tiles.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
