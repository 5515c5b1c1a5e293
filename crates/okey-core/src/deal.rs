//! Dealing tiles into hands, the center pool and the draw pile, and
//! deriving the deal's okey tile.

use crate::game::{GameError, SEATS};
use crate::tile::{Tile, TileDescriptor, MAX_RANK};
use serde::{Deserialize, Serialize};

/// Tiles dealt to every seat
pub const HAND_SIZE: usize = 14;

/// Tiles placed face up in the center at deal time
pub const CENTER_SIZE: usize = 8;

/// Smallest sequence that can be dealt
pub const MIN_DEAL_TILES: usize = HAND_SIZE * SEATS + CENTER_SIZE;

/// The indicator tile and the okey it designates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkeyInfo {
    pub indicator_tile: Tile,
    pub okey_tile: TileDescriptor,
}

impl OkeyInfo {
    /// The okey is one rank above the indicator in the same color, 13 wraps to 1
    pub fn from_indicator(indicator_tile: Tile) -> Self {
        let okey_tile = TileDescriptor {
            rank: (indicator_tile.rank % MAX_RANK) + 1,
            color: indicator_tile.color,
        };
        Self {
            indicator_tile,
            okey_tile,
        }
    }

    /// Whether a physical tile is this deal's wildcard
    pub fn is_okey(&self, tile: &Tile) -> bool {
        tile.matches(&self.okey_tile)
    }
}

/// Determine the okey from the center pool; the first center tile is the indicator
pub fn determine_okey_tile(center_tiles: &[Tile]) -> Option<OkeyInfo> {
    center_tiles
        .first()
        .cloned()
        .map(OkeyInfo::from_indicator)
}

/// The result of partitioning a shuffled set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    /// Hands by seat index (seat 1 at index 0)
    pub hands: [Vec<Tile>; SEATS],
    pub center_tiles: Vec<Tile>,
    pub draw_pile: Vec<Tile>,
}

impl Deal {
    pub fn total_tiles(&self) -> usize {
        self.hands.iter().map(Vec::len).sum::<usize>()
            + self.center_tiles.len()
            + self.draw_pile.len()
    }

    /// Mark every tile matching the okey descriptor, in every zone
    pub fn flag_okeys(&mut self, okey: &OkeyInfo) {
        let zones = self
            .hands
            .iter_mut()
            .chain(std::iter::once(&mut self.center_tiles))
            .chain(std::iter::once(&mut self.draw_pile));

        for zone in zones {
            for tile in zone.iter_mut() {
                tile.is_okey = okey.is_okey(tile);
            }
        }
    }
}

/// Deal 14 tiles to each seat round-robin, then 8 to the center; the rest is the draw pile
pub fn deal(tiles: Vec<Tile>) -> Result<Deal, GameError> {
    if tiles.len() < MIN_DEAL_TILES {
        return Err(GameError::NotEnoughTiles { found: tiles.len() });
    }

    let mut hands: [Vec<Tile>; SEATS] = Default::default();
    for hand in hands.iter_mut() {
        hand.reserve(HAND_SIZE + 1);
    }

    let mut source = tiles.into_iter();
    for _ in 0..HAND_SIZE {
        for hand in hands.iter_mut() {
            hand.extend(source.next());
        }
    }

    let center_tiles: Vec<Tile> = source.by_ref().take(CENTER_SIZE).collect();
    let draw_pile: Vec<Tile> = source.collect();

    Ok(Deal {
        hands,
        center_tiles,
        draw_pile,
    })
}
