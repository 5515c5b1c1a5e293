//! Okey - a four-player Turkish tile game engine
//!
//! This crate provides the core game logic for a single-player Okey table:
//! - Tile set construction and shuffling
//! - Dealing and okey (wildcard) derivation
//! - A turn engine with pure draw / discard / pass transitions
//! - Hand evaluation and a simple opponent policy
//! - An orchestrator that runs the three opponents between human moves
//!
//! # Architecture
//!
//! The engine is platform-agnostic and synchronous. Randomness and time are
//! injected by the caller, so every deal can be replayed from a seed. It can
//! be compiled to:
//! - Native Rust for the terminal host
//! - WebAssembly for the browser client
//!
//! # Modules
//!
//! - [`tile`]: Tile set and shuffling
//! - [`deal`]: Dealing and okey derivation
//! - [`game`]: Game state and turn engine
//! - [`hand`]: Winning-hand check and hand analysis
//! - [`bot`]: Opponent policy
//! - [`table`]: Opponent loop and the single-player table

pub mod actions;
pub mod bot;
pub mod config;
pub mod deal;
pub mod game;
pub mod hand;
pub mod table;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent, MoveKind};
pub use bot::{Bot, BotDifficulty, Opponent};
pub use config::{TableConfig, DEFAULT_MAX_OPPONENT_MOVES};
pub use deal::{deal, determine_okey_tile, Deal, OkeyInfo};
pub use game::{
    next_seat, GameError, GamePhase, GameState, GameStateJson, GameStats, GameStatsJson,
    OtherPlayers, SeatScores, Seat, HUMAN_SEAT, SEATS,
};
pub use hand::{analyze_hand, is_winning_hand, HandAnalysis};
pub use table::{check_for_winner, process_opponent_turns, Table};
pub use tile::{build_deck, shuffle, Tile, TileColor, TileDescriptor, TILE_COUNT};
