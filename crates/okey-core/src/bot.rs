//! AI opponents for Okey.
//!
//! This module provides two difficulty levels:
//! - Easy: draws or discards a random tile
//! - Medium: reads its hand's finishing potential and discards the least useful tile

use crate::actions::{GameAction, GameEvent, MoveKind};
use crate::deal::OkeyInfo;
use crate::game::{GameState, HUMAN_SEAT};
use crate::hand::{analyze_hand, HandAnalysis};
use crate::tile::{Tile, TileColor};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Easy,
    #[default]
    Medium,
}

/// A bot that plays whichever opponent seat is current
pub struct Bot {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Decide between drawing, discarding and passing for the current seat.
    ///
    /// The human seat is never played by the bot and always gets `Pass`.
    pub fn choose_move(&mut self, state: &GameState) -> MoveKind {
        if state.current_player == HUMAN_SEAT {
            return MoveKind::Pass;
        }
        self.choose_for_current(state)
    }

    fn choose_for_current(&mut self, state: &GameState) -> MoveKind {
        match self.difficulty {
            BotDifficulty::Easy => self.choose_easy(),
            BotDifficulty::Medium => self.choose_medium(state),
        }
    }

    /// Easy: draw two times in five, otherwise discard
    fn choose_easy(&mut self) -> MoveKind {
        if self.rng.gen_bool(0.4) {
            MoveKind::Draw
        } else {
            MoveKind::Discard
        }
    }

    /// Medium: decide from the hand's finishing potential
    fn choose_medium(&mut self, state: &GameState) -> MoveKind {
        let tiles = state.current_hand();
        let analysis = analyze_hand(tiles);
        let can_draw = !state.draw_pile.is_empty();

        // Close to finishing: keep drawing
        if analysis.can_finish && can_draw {
            return MoveKind::Draw;
        }

        // Short hand with good potential
        if tiles.len() < 10 && analysis.finish_score > 50 {
            return if can_draw {
                MoveKind::Draw
            } else {
                MoveKind::Pass
            };
        }

        // Full hand with nothing going on
        if tiles.len() >= 12 && analysis.finish_score < 30 {
            return MoveKind::Discard;
        }

        if self.rng.gen_bool(0.6) {
            MoveKind::Draw
        } else {
            MoveKind::Discard
        }
    }

    /// Pick the tile to throw away.
    ///
    /// Jokers and okey tiles are kept unless nothing else is left. Returns
    /// `None` only for an empty hand.
    pub fn select_discard_tile(
        &mut self,
        tiles: &[Tile],
        analysis: &HandAnalysis,
        okey: Option<&OkeyInfo>,
    ) -> Option<Tile> {
        if tiles.is_empty() {
            return None;
        }

        let keep = |tile: &Tile| tile.is_wildcard() || okey.is_some_and(|o| o.is_okey(tile));

        // Excess duplicates: three or more of one rank
        let excess: Vec<&Tile> = tiles
            .iter()
            .filter(|t| !keep(*t) && analysis.pair_count(t.rank) > 2)
            .collect();
        if let Some(tile) = excess.choose(&mut self.rng) {
            return Some((*tile).clone());
        }

        // Tiles that break a same-color run
        let breakers = run_breakers(tiles, &keep);
        if let Some(tile) = breakers.choose(&mut self.rng) {
            return Some((*tile).clone());
        }

        // Lowest rank
        if let Some(tile) = tiles.iter().filter(|t| !keep(*t)).min_by_key(|t| t.rank) {
            return Some(tile.clone());
        }

        // Only wildcards left
        tiles.choose(&mut self.rng).cloned()
    }

    /// The move this policy would make for whoever is current, human included.
    ///
    /// Used for hints and for automated play of the human seat. A discard
    /// with nothing to throw becomes a pass.
    pub fn suggest_action(&mut self, state: &GameState) -> GameAction {
        let decision = self.choose_for_current(state);
        debug!(
            seat = state.current_player,
            ?decision,
            difficulty = ?self.difficulty,
            "Decided"
        );

        match decision {
            MoveKind::Draw => GameAction::Draw,
            MoveKind::Pass => GameAction::Pass,
            MoveKind::Discard => {
                let tile = match self.difficulty {
                    BotDifficulty::Easy => state.current_hand().choose(&mut self.rng).cloned(),
                    BotDifficulty::Medium => {
                        let tiles = state.current_hand();
                        let analysis = analyze_hand(tiles);
                        self.select_discard_tile(tiles, &analysis, state.okey_info.as_ref())
                    }
                };

                match tile {
                    Some(tile) => GameAction::Discard { tile_id: tile.id },
                    None => GameAction::Pass,
                }
            }
        }
    }

    /// Play one move for the current opponent seat
    pub fn make_move(&mut self, state: GameState) -> (GameState, Vec<GameEvent>) {
        if state.current_player == HUMAN_SEAT {
            return (state, Vec::new());
        }

        let action = self.suggest_action(&state);
        state.step(action)
    }
}

/// A policy that plays the current opponent seat
pub trait Opponent {
    /// Make one move for `state.current_player`
    fn make_move(&mut self, state: GameState) -> (GameState, Vec<GameEvent>);
}

impl Opponent for Bot {
    fn make_move(&mut self, state: GameState) -> (GameState, Vec<GameEvent>) {
        Bot::make_move(self, state)
    }
}

/// Tiles whose rank is not one above their sorted same-color neighbor
fn run_breakers<'a>(tiles: &'a [Tile], keep: &impl Fn(&Tile) -> bool) -> Vec<&'a Tile> {
    let mut by_color: BTreeMap<TileColor, Vec<&Tile>> = BTreeMap::new();
    for tile in tiles.iter().filter(|t| !t.is_joker) {
        by_color.entry(tile.color).or_default().push(tile);
    }

    let mut breakers = Vec::new();
    for group in by_color.values_mut() {
        group.sort_by_key(|t| t.rank);
        for pair in group.windows(2) {
            let (previous, tile) = (pair[0], pair[1]);
            if u16::from(tile.rank) != u16::from(previous.rank) + 1 && !keep(tile) {
                breakers.push(tile);
            }
        }
    }
    breakers
}
