//! Core game state and turn engine.
//!
//! Transitions consume a `GameState` and return the next one. The plain
//! transitions (`draw`, `discard`, `pass`) are fail-soft: invalid input
//! leaves the state unchanged and an empty draw pile ends the deal.
//! `apply_action` is the checked entry point for hosts that want errors.

use crate::actions::{GameAction, GameEvent};
use crate::deal::{deal, determine_okey_tile, OkeyInfo};
use crate::tile::{build_deck, shuffle, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Seat number, 1 through 4
pub type Seat = u8;

/// Number of seats at the table
pub const SEATS: usize = 4;

/// The seat played by the human
pub const HUMAN_SEAT: Seat = 1;

/// The seat that plays after `seat`
pub fn next_seat(seat: Seat) -> Seat {
    (seat % SEATS as Seat) + 1
}

fn seat_index(seat: Seat) -> Option<usize> {
    (1..=SEATS as Seat)
        .contains(&seat)
        .then(|| seat as usize - 1)
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// No active deal
    #[default]
    Waiting,
    /// Normal play
    Playing,
    /// A hand won or the draw pile ran out
    Finished,
}

/// Errors surfaced by the checked entry points
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Tile {0} is not in hand")]
    InvalidTile(String),

    #[error("Deal is over")]
    GameOver,

    #[error("Need at least 64 tiles to deal, got {found}")]
    NotEnoughTiles { found: usize },
}

/// Statistics that persist across deals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "GameStatsJson", from = "GameStatsJson")]
pub struct GameStats {
    /// Deals that ended with a winner
    pub total_games: u32,
    /// Wins by seat index
    pub wins: [u32; SEATS],
    /// Mean length of won deals, in seconds
    pub average_game_duration: f64,
}

/// The complete game state.
///
/// Serialized through [`GameStateJson`], the shape web clients read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "GameStateJson", from = "GameStateJson")]
pub struct GameState {
    /// Hands by seat index; index 0 is the human's tiles
    pub hands: [Vec<Tile>; SEATS],
    /// Center pool; the first tile is the okey indicator
    pub center_tiles: Vec<Tile>,
    pub draw_pile: Vec<Tile>,
    pub okey_info: Option<OkeyInfo>,
    pub current_player: Seat,
    pub game_phase: GamePhase,
    /// Tile id the human has highlighted
    pub selected_tile: Option<String>,
    /// Wins by seat index
    pub scores: [u32; SEATS],
    pub game_stats: GameStats,
    /// Unix milliseconds at which the deal started
    pub game_start_time: Option<u64>,
    pub winner: Option<Seat>,
}

/// Per-seat counters keyed `player1` to `player4`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatScores {
    pub player1: u32,
    pub player2: u32,
    pub player3: u32,
    pub player4: u32,
}

impl From<[u32; SEATS]> for SeatScores {
    fn from([player1, player2, player3, player4]: [u32; SEATS]) -> Self {
        Self {
            player1,
            player2,
            player3,
            player4,
        }
    }
}

impl From<SeatScores> for [u32; SEATS] {
    fn from(scores: SeatScores) -> Self {
        [scores.player1, scores.player2, scores.player3, scores.player4]
    }
}

/// JSON form of [`GameStats`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsJson {
    pub total_games: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub player3_wins: u32,
    pub player4_wins: u32,
    pub average_game_duration: f64,
}

impl From<GameStats> for GameStatsJson {
    fn from(stats: GameStats) -> Self {
        let [player1_wins, player2_wins, player3_wins, player4_wins] = stats.wins;
        Self {
            total_games: stats.total_games,
            player1_wins,
            player2_wins,
            player3_wins,
            player4_wins,
            average_game_duration: stats.average_game_duration,
        }
    }
}

impl From<GameStatsJson> for GameStats {
    fn from(json: GameStatsJson) -> Self {
        Self {
            total_games: json.total_games,
            wins: [
                json.player1_wins,
                json.player2_wins,
                json.player3_wins,
                json.player4_wins,
            ],
            average_game_duration: json.average_game_duration,
        }
    }
}

/// Opponent hands keyed by seat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPlayers {
    pub player2: Vec<Tile>,
    pub player3: Vec<Tile>,
    pub player4: Vec<Tile>,
}

/// JSON form of [`GameState`]: the human's tiles apart from the opponents'
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateJson {
    pub player_tiles: Vec<Tile>,
    pub other_players: OtherPlayers,
    pub center_tiles: Vec<Tile>,
    pub draw_pile: Vec<Tile>,
    pub okey_info: Option<OkeyInfo>,
    pub current_player: Seat,
    pub game_phase: GamePhase,
    pub selected_tile: Option<String>,
    pub scores: SeatScores,
    pub game_stats: GameStats,
    pub game_start_time: Option<u64>,
    #[serde(default)]
    pub winner: Option<Seat>,
}

impl From<GameState> for GameStateJson {
    fn from(state: GameState) -> Self {
        let [player_tiles, player2, player3, player4] = state.hands;
        Self {
            player_tiles,
            other_players: OtherPlayers {
                player2,
                player3,
                player4,
            },
            center_tiles: state.center_tiles,
            draw_pile: state.draw_pile,
            okey_info: state.okey_info,
            current_player: state.current_player,
            game_phase: state.game_phase,
            selected_tile: state.selected_tile,
            scores: state.scores.into(),
            game_stats: state.game_stats,
            game_start_time: state.game_start_time,
            winner: state.winner,
        }
    }
}

impl From<GameStateJson> for GameState {
    fn from(json: GameStateJson) -> Self {
        let others = json.other_players;
        Self {
            hands: [json.player_tiles, others.player2, others.player3, others.player4],
            center_tiles: json.center_tiles,
            draw_pile: json.draw_pile,
            okey_info: json.okey_info,
            current_player: json.current_player,
            game_phase: json.game_phase,
            selected_tile: json.selected_tile,
            scores: json.scores.into(),
            game_stats: json.game_stats,
            game_start_time: json.game_start_time,
            winner: json.winner,
        }
    }
}

impl GameState {
    /// A table with no active deal
    pub fn new() -> Self {
        Self {
            current_player: HUMAN_SEAT,
            ..Self::default()
        }
    }

    /// Shuffle a full set and deal the first deal of a session
    pub fn start_deal<R: Rng + ?Sized>(rng: &mut R, now_ms: u64) -> Result<Self, GameError> {
        Self::new().next_deal(rng, now_ms)
    }

    /// Deal again, keeping scores and statistics
    pub fn next_deal<R: Rng + ?Sized>(self, rng: &mut R, now_ms: u64) -> Result<Self, GameError> {
        let tiles = shuffle(&build_deck(), rng);
        self.redeal(tiles, now_ms)
    }

    /// Deal an already shuffled sequence, keeping scores and statistics
    pub fn redeal(self, tiles: Vec<Tile>, now_ms: u64) -> Result<Self, GameError> {
        let mut dealt = deal(tiles)?;
        let okey_info = determine_okey_tile(&dealt.center_tiles);
        if let Some(okey) = &okey_info {
            dealt.flag_okeys(okey);
            info!(
                indicator = %okey.indicator_tile,
                okey = %okey.okey_tile,
                "New deal"
            );
        }

        Ok(Self {
            hands: dealt.hands,
            center_tiles: dealt.center_tiles,
            draw_pile: dealt.draw_pile,
            okey_info,
            current_player: HUMAN_SEAT,
            game_phase: GamePhase::Playing,
            selected_tile: None,
            scores: self.scores,
            game_stats: self.game_stats,
            game_start_time: Some(now_ms),
            winner: None,
        })
    }

    /// Tiles held by a seat (empty for an unknown seat)
    pub fn hand(&self, seat: Seat) -> &[Tile] {
        seat_index(seat)
            .map(|i| self.hands[i].as_slice())
            .unwrap_or(&[])
    }

    /// The human's tiles
    pub fn player_tiles(&self) -> &[Tile] {
        self.hand(HUMAN_SEAT)
    }

    /// Tiles held by the seat whose turn it is
    pub fn current_hand(&self) -> &[Tile] {
        self.hand(self.current_player)
    }

    /// Tiles across every zone; constant for the lifetime of a deal
    pub fn total_tiles(&self) -> usize {
        self.hands.iter().map(Vec::len).sum::<usize>()
            + self.center_tiles.len()
            + self.draw_pile.len()
    }

    pub fn is_playing(&self) -> bool {
        self.game_phase == GamePhase::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.game_phase == GamePhase::Finished
    }

    /// Wins recorded for a seat
    pub fn score(&self, seat: Seat) -> u32 {
        seat_index(seat).map(|i| self.scores[i]).unwrap_or(0)
    }

    // ==================== Transitions ====================

    /// Move the front of the draw pile into the acting seat's hand.
    ///
    /// An empty pile finishes the deal. The turn does not advance. A
    /// finished deal is left as it is.
    pub fn draw(mut self) -> Self {
        if self.is_finished() {
            return self;
        }
        if self.draw_pile.is_empty() {
            self.game_phase = GamePhase::Finished;
            return self;
        }

        let Some(hand_index) = seat_index(self.current_player) else {
            return self;
        };

        let tile = self.draw_pile.remove(0);
        self.hands[hand_index].push(tile);
        self.game_phase = GamePhase::Playing;
        self.selected_tile = None;
        self
    }

    /// Move a held tile to the center and pass the turn on.
    ///
    /// A tile the acting seat does not hold leaves the state unchanged.
    pub fn discard(mut self, tile_id: &str) -> Self {
        let Some(hand_index) = seat_index(self.current_player) else {
            return self;
        };
        let Some(position) = self.hands[hand_index]
            .iter()
            .position(|t| t.id == tile_id)
        else {
            return self;
        };

        let tile = self.hands[hand_index].remove(position);
        self.center_tiles.push(tile);
        self.current_player = next_seat(self.current_player);
        self.selected_tile = None;
        self
    }

    /// Hand the turn to the next seat
    pub fn pass(mut self) -> Self {
        self.current_player = next_seat(self.current_player);
        self.selected_tile = None;
        self
    }

    /// Highlight one of the human's tiles; unknown ids are ignored
    pub fn select_tile(mut self, tile_id: &str) -> Self {
        if self.player_tiles().iter().any(|t| t.id == tile_id) {
            self.selected_tile = Some(tile_id.to_string());
        }
        self
    }

    /// Validate and apply a move for `seat`.
    ///
    /// Valid moves produce the same state as the plain transitions. Drawing
    /// from an empty pile is not an error: the deal finishes.
    pub fn apply_action(
        self,
        seat: Seat,
        action: GameAction,
    ) -> Result<(Self, Vec<GameEvent>), GameError> {
        self.validate(seat, &action)?;
        Ok(self.step(action))
    }

    /// Check that `seat` may make `action` right now
    pub fn validate(&self, seat: Seat, action: &GameAction) -> Result<(), GameError> {
        if !self.is_playing() {
            return Err(GameError::GameOver);
        }
        if seat != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        if let GameAction::Discard { tile_id } = action {
            if !self.hand(seat).iter().any(|t| &t.id == tile_id) {
                return Err(GameError::InvalidTile(tile_id.clone()));
            }
        }
        Ok(())
    }

    /// Apply a move for the acting seat without validation, reporting what happened
    pub fn step(self, action: GameAction) -> (Self, Vec<GameEvent>) {
        let seat = self.current_player;
        let mut events = Vec::new();

        let next = match action {
            GameAction::Draw => {
                match self.draw_pile.first() {
                    Some(tile) => {
                        debug!(seat, tile = %tile, "Draw");
                        events.push(GameEvent::TileDrawn {
                            seat,
                            tile: tile.clone(),
                        });
                    }
                    None => {
                        info!(seat, "Draw pile exhausted");
                        events.push(GameEvent::DrawPileExhausted { seat });
                    }
                }
                self.draw()
            }

            GameAction::Discard { tile_id } => {
                let held = self.current_hand().iter().find(|t| t.id == tile_id).cloned();
                let next = self.discard(&tile_id);
                if let Some(tile) = held {
                    debug!(seat, tile = %tile, "Discard");
                    events.push(GameEvent::TileDiscarded {
                        seat,
                        tile,
                        next_player: next.current_player,
                    });
                }
                next
            }

            GameAction::Pass => {
                debug!(seat, "Pass");
                let next = self.pass();
                events.push(GameEvent::TurnPassed {
                    seat,
                    next_player: next.current_player,
                });
                next
            }
        };

        (next, events)
    }

    // ==================== Scoring ====================

    /// Finish the deal with `seat` as winner and update scores and statistics.
    ///
    /// The duration of the deal is folded into the running average. A deal
    /// that already has a winner is left unchanged.
    pub fn record_win(mut self, seat: Seat, now_ms: u64) -> Self {
        let Some(index) = seat_index(seat) else {
            return self;
        };
        if self.winner.is_some() {
            return self;
        }

        let duration = self
            .game_start_time
            .map(|start| now_ms.saturating_sub(start) as f64 / 1000.0)
            .unwrap_or(0.0);

        let stats = &mut self.game_stats;
        let played = stats.total_games as f64;
        stats.average_game_duration = (stats.average_game_duration * played + duration) / (played + 1.0);
        stats.total_games += 1;
        stats.wins[index] += 1;

        self.scores[index] += 1;
        self.game_phase = GamePhase::Finished;
        self.winner = Some(seat);

        info!(seat, duration_secs = duration, "Deal won");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TILE_COUNT;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> GameState {
        GameState::start_deal(&mut StdRng::seed_from_u64(11), 1_000).unwrap()
    }

    #[test]
    fn test_new_state_is_waiting() {
        let state = GameState::new();
        assert_eq!(state.game_phase, GamePhase::Waiting);
        assert_eq!(state.current_player, HUMAN_SEAT);
        assert_eq!(state.total_tiles(), 0);
    }

    #[test]
    fn test_start_deal() {
        let state = started();
        assert!(state.is_playing());
        assert_eq!(state.current_player, 1);
        assert_eq!(state.total_tiles(), TILE_COUNT);
        assert_eq!(state.game_start_time, Some(1_000));

        let okey = state.okey_info.as_ref().unwrap();
        assert_eq!(okey.indicator_tile, state.center_tiles[0]);
    }

    #[test]
    fn test_seat_cycle() {
        assert_eq!(next_seat(1), 2);
        assert_eq!(next_seat(3), 4);
        assert_eq!(next_seat(4), 1);
    }

    #[test]
    fn test_draw_moves_one_tile() {
        let state = started();
        let front = state.draw_pile[0].clone();
        let pile = state.draw_pile.len();
        let center = state.center_tiles.clone();

        let after = state.draw();
        assert_eq!(after.draw_pile.len(), pile - 1);
        assert_eq!(after.player_tiles().len(), 15);
        assert_eq!(after.player_tiles().last(), Some(&front));
        assert_eq!(after.center_tiles, center);
        assert_eq!(after.hand(2).len(), 14);
        assert_eq!(after.current_player, 1);
        assert_eq!(after.total_tiles(), TILE_COUNT);
    }

    #[test]
    fn test_draw_fills_opponent_bucket() {
        let mut state = started();
        state.current_player = 3;
        let after = state.draw();
        assert_eq!(after.hand(3).len(), 15);
        assert_eq!(after.player_tiles().len(), 14);
    }

    #[test]
    fn test_draw_from_empty_pile_finishes() {
        let mut state = started();
        state.draw_pile.clear();
        let hands = state.hands.clone();

        let after = state.draw();
        assert!(after.is_finished());
        assert_eq!(after.hands, hands);
        assert_eq!(after.winner, None);
    }

    #[test]
    fn test_discard_moves_tile_and_advances() {
        let state = started().draw();
        let tile = state.player_tiles()[3].clone();

        let after = state.discard(&tile.id);
        assert_eq!(after.player_tiles().len(), 14);
        assert_eq!(after.center_tiles.len(), 9);
        assert_eq!(after.center_tiles.last(), Some(&tile));
        assert_eq!(after.current_player, 2);
        assert_eq!(after.total_tiles(), TILE_COUNT);
    }

    #[test]
    fn test_discard_unknown_tile_is_noop() {
        let state = started();
        let opponent_tile = state.hand(2)[0].id.clone();

        let after = state.clone().discard(&opponent_tile);
        assert_eq!(after, state);
        assert_eq!(state.clone().discard("no-such-tile"), state);
    }

    #[test]
    fn test_discard_clears_selection() {
        let state = started();
        let id = state.player_tiles()[0].id.clone();
        let state = state.select_tile(&id);
        assert_eq!(state.selected_tile.as_deref(), Some(id.as_str()));

        let after = state.discard(&id);
        assert_eq!(after.selected_tile, None);
    }

    #[test]
    fn test_select_tile_ignores_foreign_ids() {
        let state = started();
        let foreign = state.hand(4)[0].id.clone();
        assert_eq!(state.select_tile(&foreign).selected_tile, None);
    }

    #[test]
    fn test_pass_changes_only_turn() {
        let state = started();
        let after = state.clone().pass();
        assert_eq!(after.current_player, 2);
        assert_eq!(after.hands, state.hands);
        assert_eq!(after.center_tiles, state.center_tiles);
        assert_eq!(after.draw_pile, state.draw_pile);
    }

    #[test]
    fn test_apply_action_rejects_wrong_seat() {
        let state = started();
        let result = state.apply_action(2, GameAction::Draw);
        assert!(matches!(result, Err(GameError::NotYourTurn)));
    }

    #[test]
    fn test_apply_action_rejects_unknown_tile() {
        let state = started();
        let result = state.apply_action(
            1,
            GameAction::Discard {
                tile_id: "blue-99-1".into(),
            },
        );
        assert_eq!(
            result.unwrap_err(),
            GameError::InvalidTile("blue-99-1".into())
        );
    }

    #[test]
    fn test_apply_action_rejects_finished_deal() {
        let mut state = started();
        state.game_phase = GamePhase::Finished;
        assert!(matches!(
            state.apply_action(1, GameAction::Pass),
            Err(GameError::GameOver)
        ));
    }

    #[test]
    fn test_apply_action_matches_plain_transitions() {
        let state = started();
        let id = state.player_tiles()[5].id.clone();

        let (checked, events) = state
            .clone()
            .apply_action(1, GameAction::Discard { tile_id: id.clone() })
            .unwrap();
        assert_eq!(checked, state.clone().discard(&id));
        assert!(matches!(
            events.as_slice(),
            [GameEvent::TileDiscarded { seat: 1, next_player: 2, .. }]
        ));

        let (drawn, events) = state.clone().apply_action(1, GameAction::Draw).unwrap();
        assert_eq!(drawn, state.draw());
        assert!(matches!(events.as_slice(), [GameEvent::TileDrawn { seat: 1, .. }]));
    }

    #[test]
    fn test_apply_action_empty_pile_event() {
        let mut state = started();
        state.draw_pile.clear();
        let (after, events) = state.apply_action(1, GameAction::Draw).unwrap();
        assert!(after.is_finished());
        assert_eq!(events, vec![GameEvent::DrawPileExhausted { seat: 1 }]);
    }

    #[test]
    fn test_step_ignores_unknown_discard() {
        let state = started();
        let (after, events) = state.clone().step(GameAction::Discard {
            tile_id: "joker-9".into(),
        });
        assert_eq!(after, state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_record_win_updates_stats() {
        let state = started().record_win(3, 11_000);
        assert!(state.is_finished());
        assert_eq!(state.winner, Some(3));
        assert_eq!(state.score(3), 1);
        assert_eq!(state.game_stats.total_games, 1);
        assert_eq!(state.game_stats.wins, [0, 0, 1, 0]);
        assert_eq!(state.game_stats.average_game_duration, 10.0);
    }

    #[test]
    fn test_record_win_is_once_per_deal() {
        let state = started().record_win(2, 2_000).record_win(4, 3_000);
        assert_eq!(state.winner, Some(2));
        assert_eq!(state.scores, [0, 1, 0, 0]);
    }

    #[test]
    fn test_running_average_and_carry_over() {
        let mut rng = StdRng::seed_from_u64(5);
        let state = GameState::start_deal(&mut rng, 0)
            .unwrap()
            .record_win(1, 4_000);

        let state = state.next_deal(&mut rng, 10_000).unwrap();
        assert!(state.is_playing());
        assert_eq!(state.winner, None);
        assert_eq!(state.total_tiles(), TILE_COUNT);
        assert_eq!(state.score(1), 1);

        let state = state.record_win(1, 18_000);
        assert_eq!(state.score(1), 2);
        assert_eq!(state.game_stats.total_games, 2);
        assert_eq!(state.game_stats.average_game_duration, 6.0);
    }

    #[test]
    fn test_okey_tiles_are_flagged_at_deal() {
        let state = started();
        let okey = state.okey_info.clone().unwrap();
        let all = state
            .hands
            .iter()
            .flatten()
            .chain(&state.center_tiles)
            .chain(&state.draw_pile);

        for tile in all {
            assert_eq!(tile.is_okey, okey.is_okey(tile), "tile {}", tile.id);
        }
    }

    #[test]
    fn test_draw_leaves_finished_deal_alone() {
        let state = started().pass().record_win(2, 1_000);
        let after = state.clone().draw();
        assert_eq!(after, state);
        assert!(after.is_finished());
        assert_eq!(after.winner, Some(2));
    }

    #[test]
    fn test_json_uses_client_keys() {
        let state = started().record_win(3, 4_000);
        let json = serde_json::to_value(&state).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "centerTiles",
                "currentPlayer",
                "drawPile",
                "gamePhase",
                "gameStartTime",
                "gameStats",
                "okeyInfo",
                "otherPlayers",
                "playerTiles",
                "scores",
                "selectedTile",
                "winner",
            ]
        );

        assert_eq!(json["playerTiles"].as_array().unwrap().len(), 14);
        assert_eq!(json["otherPlayers"]["player4"].as_array().unwrap().len(), 14);
        assert_eq!(
            json["scores"],
            serde_json::json!({"player1": 0, "player2": 0, "player3": 1, "player4": 0})
        );
        assert_eq!(json["gameStats"]["totalGames"], 1);
        assert_eq!(json["gameStats"]["player3Wins"], 1);
        assert_eq!(json["gameStats"]["averageGameDuration"], 3.0);
        assert_eq!(json["gamePhase"], "finished");

        let back: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
