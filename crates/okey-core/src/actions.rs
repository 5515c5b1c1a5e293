//! Moves a seat can make and the events they produce.

use crate::game::Seat;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// A move submitted through the checked entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Take the front tile of the draw pile
    Draw,
    /// Put a held tile on the center pool and end the turn
    Discard { tile_id: String },
    /// End the turn without touching any zone
    Pass,
}

/// The kind of move an opponent decided on, before a tile is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Draw,
    Discard,
    Pass,
}

/// Events emitted by transitions, consumed by presentation hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A seat took a tile from the draw pile
    TileDrawn { seat: Seat, tile: Tile },

    /// A seat discarded to the center
    TileDiscarded { seat: Seat, tile: Tile, next_player: Seat },

    /// A seat passed
    TurnPassed { seat: Seat, next_player: Seat },

    /// A draw was attempted on an empty pile; the deal is over
    DrawPileExhausted { seat: Seat },

    /// A seat completed a winning hand
    DealWon { seat: Seat },
}
