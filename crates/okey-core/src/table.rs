//! Game orchestration.
//!
//! After every human action the opponents play in seat order until the
//! turn comes back to the human, the deal finishes, or the safety cap on
//! opponent moves is reached. Events are reported through a callback so
//! presentation layers can hook sounds and animations onto them.

use crate::actions::{GameAction, GameEvent};
use crate::bot::{Bot, Opponent};
use crate::config::TableConfig;
use crate::game::{GameError, GameState, Seat, HUMAN_SEAT, SEATS};
use crate::hand::is_winning_hand;
use rand::rngs::StdRng;
use tracing::{debug, warn};

/// Let the opponents play until control returns to the human.
///
/// After each opponent move the seat that moved is checked for a winning
/// hand. At most `max_moves` moves are made.
pub fn process_opponent_turns<O, F>(
    mut state: GameState,
    opponent: &mut O,
    max_moves: usize,
    now_ms: u64,
    on_event: &mut F,
) -> GameState
where
    O: Opponent + ?Sized,
    F: FnMut(&GameEvent),
{
    let mut moves = 0;

    while state.current_player != HUMAN_SEAT && state.is_playing() && moves < max_moves {
        let seat = state.current_player;
        let (next, events) = opponent.make_move(state);
        state = next;
        moves += 1;

        for event in &events {
            on_event(event);
        }

        if state.winner.is_none() && is_winning_hand(state.hand(seat)) {
            state = state.record_win(seat, now_ms);
            on_event(&GameEvent::DealWon { seat });
        }
    }

    if state.current_player != HUMAN_SEAT && state.is_playing() {
        warn!(
            seat = state.current_player,
            moves, "Opponent move cap reached, handing control back"
        );
    }
    debug!(moves, current_player = state.current_player, "Opponent turns done");

    state
}

/// Check every seat, the human first, and record the first winning hand
pub fn check_for_winner(state: GameState, now_ms: u64) -> (GameState, Option<Seat>) {
    if state.winner.is_some() {
        let winner = state.winner;
        return (state, winner);
    }

    let winner = (1..=SEATS as Seat).find(|&seat| is_winning_hand(state.hand(seat)));
    match winner {
        Some(seat) => (state.record_win(seat, now_ms), Some(seat)),
        None => (state, None),
    }
}

/// A single-player table: one human seat and three opponents
pub struct Table {
    state: GameState,
    bot: Bot,
    rng: StdRng,
    config: TableConfig,
}

impl Table {
    pub fn new(config: TableConfig) -> Self {
        Self {
            state: GameState::new(),
            bot: config.bot(),
            rng: config.shuffle_rng(),
            config,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Deal a fresh round; scores and statistics carry over
    pub fn new_deal(&mut self, now_ms: u64) -> Result<(), GameError> {
        let state = std::mem::take(&mut self.state);
        self.state = state.next_deal(&mut self.rng, now_ms)?;
        Ok(())
    }

    /// Highlight one of the human's tiles
    pub fn select_tile(&mut self, tile_id: &str) {
        let state = std::mem::take(&mut self.state);
        self.state = state.select_tile(tile_id);
    }

    pub fn human_draw(&mut self, now_ms: u64) -> Result<Vec<GameEvent>, GameError> {
        self.human_action(GameAction::Draw, now_ms)
    }

    pub fn human_discard(
        &mut self,
        tile_id: &str,
        now_ms: u64,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.human_action(
            GameAction::Discard {
                tile_id: tile_id.to_string(),
            },
            now_ms,
        )
    }

    pub fn human_pass(&mut self, now_ms: u64) -> Result<Vec<GameEvent>, GameError> {
        self.human_action(GameAction::Pass, now_ms)
    }

    /// Apply a move for the human seat, check for a winner, then run the opponents
    pub fn human_action(
        &mut self,
        action: GameAction,
        now_ms: u64,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.state.validate(HUMAN_SEAT, &action)?;

        let state = std::mem::take(&mut self.state);
        let (state, mut events) = state.step(action);

        let (state, winner) = check_for_winner(state, now_ms);
        if let Some(seat) = winner {
            events.push(GameEvent::DealWon { seat });
        }
        self.state = state;

        events.append(&mut self.resume_opponents(now_ms));
        Ok(events)
    }

    /// Run the opponents again, e.g. after the move cap left one of them current
    pub fn resume_opponents(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let state = std::mem::take(&mut self.state);
        let max_moves = self.config.max_opponent_moves;

        self.state = process_opponent_turns(state, &mut self.bot, max_moves, now_ms, &mut |event| {
            events.push(event.clone())
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotDifficulty;
    use crate::game::GamePhase;
    use crate::hand::tests::hand;
    use crate::tile::{Tile, TileColor::*, TILE_COUNT};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always passes
    struct Passer;

    impl Opponent for Passer {
        fn make_move(&mut self, state: GameState) -> (GameState, Vec<GameEvent>) {
            state.step(GameAction::Pass)
        }
    }

    /// Always draws, so the turn never advances
    struct Hoarder;

    impl Opponent for Hoarder {
        fn make_move(&mut self, state: GameState) -> (GameState, Vec<GameEvent>) {
            state.step(GameAction::Draw)
        }
    }

    fn four_sevens() -> Vec<Tile> {
        hand(&[
            (Red, 7),
            (Black, 7),
            (Yellow, 7),
            (Blue, 7),
            (Red, 1),
            (Red, 3),
            (Black, 5),
            (Black, 9),
            (Yellow, 11),
            (Yellow, 2),
            (Blue, 4),
            (Blue, 13),
            (Red, 10),
            (Black, 12),
        ])
    }

    /// A dealt state with no winning hands, at `seat`'s turn
    fn dealt(seed: u64, seat: Seat) -> GameState {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = GameState::start_deal(&mut rng, 0).unwrap();
        for hand in state.hands.iter_mut() {
            hand.truncate(13);
        }
        state.current_player = seat;
        state
    }

    #[test]
    fn test_passing_opponents_return_control() {
        let state = dealt(1, 2);
        let mut events = Vec::new();
        let after = process_opponent_turns(state, &mut Passer, 10, 0, &mut |e| {
            events.push(e.clone())
        });

        assert_eq!(after.current_player, HUMAN_SEAT);
        assert_eq!(events.len(), 3);
        assert!(after.is_playing());
    }

    #[test]
    fn test_human_turn_is_left_alone() {
        let state = dealt(1, HUMAN_SEAT);
        let after = process_opponent_turns(state.clone(), &mut Passer, 10, 0, &mut |_| {});
        assert_eq!(after, state);
    }

    #[test]
    fn test_cap_stops_runaway_opponent() {
        let mut state = dealt(2, 3);
        // Fourteen tiles that cannot win, so every draw leaves a longer losing hand
        state.hands[2] = hand(&[
            (Red, 1),
            (Red, 3),
            (Red, 5),
            (Black, 2),
            (Black, 4),
            (Black, 6),
            (Yellow, 8),
            (Yellow, 10),
            (Yellow, 12),
            (Blue, 9),
            (Blue, 11),
            (Blue, 13),
            (Red, 7),
            (Black, 8),
        ]);
        let pile = state.draw_pile.len();
        let mut events = Vec::new();
        let after = process_opponent_turns(state, &mut Hoarder, 10, 0, &mut |e| {
            events.push(e.clone())
        });

        assert_eq!(events.len(), 10);
        assert_eq!(after.current_player, 3);
        assert_eq!(after.draw_pile.len(), pile - 10);
        assert_eq!(after.hand(3).len(), 24);
    }

    #[test]
    fn test_opponent_win_is_recorded() {
        let mut state = dealt(3, 2);
        state.hands[2] = four_sevens();
        state.game_start_time = Some(1_000);

        let mut events = Vec::new();
        let after = process_opponent_turns(state, &mut Passer, 10, 6_000, &mut |e| {
            events.push(e.clone())
        });

        assert_eq!(after.game_phase, GamePhase::Finished);
        assert_eq!(after.winner, Some(3));
        assert_eq!(after.scores, [0, 0, 1, 0]);
        assert_eq!(after.game_stats.wins, [0, 0, 1, 0]);
        assert_eq!(after.game_stats.average_game_duration, 5.0);
        assert_eq!(after.current_player, 4);
        assert_eq!(events.last(), Some(&GameEvent::DealWon { seat: 3 }));
    }

    #[test]
    fn test_only_the_moving_seat_is_checked() {
        let mut state = dealt(3, 3);
        state.hands[1] = four_sevens();

        let after = process_opponent_turns(state, &mut Passer, 10, 0, &mut |_| {});
        assert!(after.is_playing());
        assert_eq!(after.winner, None);
        assert_eq!(after.current_player, HUMAN_SEAT);
    }

    #[test]
    fn test_real_bot_terminates_within_cap() {
        for seed in 0..30 {
            let state = dealt(seed, 2);
            let mut bot = Bot::with_seed(BotDifficulty::Medium, seed);
            let mut moves = 0;
            let after = process_opponent_turns(state, &mut bot, 10, 0, &mut |e| {
                if !matches!(e, GameEvent::DealWon { .. }) {
                    moves += 1;
                }
            });

            assert!(moves <= 10, "seed {} made {} moves", seed, moves);
            assert!(
                after.current_player == HUMAN_SEAT || after.is_finished() || moves == 10,
                "seed {} stopped early",
                seed
            );
            assert_eq!(after.total_tiles(), TILE_COUNT - 4);
        }
    }

    #[test]
    fn test_check_for_winner_prefers_human() {
        let mut state = dealt(4, HUMAN_SEAT);
        state.hands[0] = four_sevens();
        state.hands[3] = four_sevens();

        let (after, winner) = check_for_winner(state, 0);
        assert_eq!(winner, Some(1));
        assert_eq!(after.scores, [1, 0, 0, 0]);
    }

    #[test]
    fn test_check_for_winner_without_winner() {
        let state = dealt(4, HUMAN_SEAT);
        let (after, winner) = check_for_winner(state.clone(), 0);
        assert_eq!(winner, None);
        assert_eq!(after, state);
    }

    fn seeded_table(seed: u64) -> Table {
        let mut table = Table::new(TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        });
        table.new_deal(0).unwrap();
        table
    }

    #[test]
    fn test_table_rejects_moves_before_deal() {
        let mut table = Table::new(TableConfig::default());
        assert_eq!(table.human_pass(0), Err(GameError::GameOver));
    }

    #[test]
    fn test_table_human_draw_keeps_turn() {
        let mut table = seeded_table(8);
        assert!(table.state().is_playing());

        // Drawing never hands the turn on, even if it completes a hand
        let events = table.human_draw(10).unwrap();
        assert!(matches!(events[0], GameEvent::TileDrawn { seat: 1, .. }));
        assert_eq!(table.state().current_player, HUMAN_SEAT);
        assert_eq!(table.state().player_tiles().len(), 15);
    }

    #[test]
    fn test_table_human_discard_runs_opponents() {
        let mut table = seeded_table(8);
        assert!(table.state().is_playing());
        assert_eq!(table.state().current_player, HUMAN_SEAT);

        let id = table.state().player_tiles()[0].id.clone();
        table.select_tile(&id);
        assert_eq!(table.state().selected_tile.as_deref(), Some(id.as_str()));

        let events = table.human_discard(&id, 20).unwrap();
        assert!(matches!(
            events[0],
            GameEvent::TileDiscarded { seat: 1, next_player: 2, .. }
        ));
        assert!(events.len() > 1);
        assert_eq!(table.state().total_tiles(), TILE_COUNT);
        assert!(table.state().center_tiles.iter().any(|t| t.id == id));
    }

    #[test]
    fn test_table_rejects_unknown_tile() {
        let mut table = seeded_table(8);
        let before = table.state().clone();
        assert_eq!(
            table.human_discard("red-0-1", 0),
            Err(GameError::InvalidTile("red-0-1".into()))
        );
        assert_eq!(table.state(), &before);
    }

    #[test]
    fn test_table_scores_carry_over() {
        let mut table = seeded_table(12);
        let state = std::mem::take(&mut table.state);
        table.state = state.record_win(2, 0);

        table.new_deal(100).unwrap();
        assert!(table.state().is_playing());
        assert_eq!(table.state().score(2), 1);
        assert_eq!(table.state().game_start_time, Some(100));
    }

    #[test]
    fn test_table_resume_after_cap() {
        let mut table = Table::new(TableConfig {
            max_opponent_moves: 1,
            seed: Some(21),
            ..TableConfig::default()
        });
        table.new_deal(0).unwrap();

        let id = table.state().player_tiles()[0].id.clone();
        table.human_discard(&id, 0).unwrap();

        let mut resumes = 0;
        while table.state().current_player != HUMAN_SEAT && table.state().is_playing() {
            assert_eq!(table.human_pass(0), Err(GameError::NotYourTurn));
            let events = table.resume_opponents(0);
            assert!(events.len() <= 2);
            resumes += 1;
            assert!(resumes < 200, "opponents never handed back control");
        }
        assert_eq!(table.state().total_tiles(), TILE_COUNT);
    }
}
