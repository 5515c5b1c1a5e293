//! Plain-text views of the table.

use okey_core::{GameEvent, GamePhase, GameState, Seat, Tile, HUMAN_SEAT, SEATS};
use std::fmt;

fn seat_name(seat: Seat) -> String {
    if seat == HUMAN_SEAT {
        "You".to_string()
    } else {
        format!("Seat {}", seat)
    }
}

/// The human's tiles grouped by color and sorted by rank, jokers last
pub fn hand_lines(tiles: &[Tile], selected: Option<&str>) -> Vec<String> {
    let mut sorted: Vec<&Tile> = tiles.iter().collect();
    sorted.sort_by_key(|t| (t.is_joker, t.color, t.rank, t.id.clone()));

    sorted
        .into_iter()
        .map(|tile| {
            let marker = if selected == Some(tile.id.as_str()) { ">" } else { " " };
            format!("{} {:<8} {}", marker, tile.to_string(), tile.id)
        })
        .collect()
}

/// Everything the human may look at
pub struct TableView<'a>(pub &'a GameState);

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        if let Some(okey) = &state.okey_info {
            writeln!(
                f,
                "Indicator: {}   Okey: {}",
                okey.indicator_tile, okey.okey_tile
            )?;
        }

        let top = state
            .center_tiles
            .last()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "Center: {} tiles, top {}   Draw pile: {}",
            state.center_tiles.len(),
            top,
            state.draw_pile.len()
        )?;

        let opponents: Vec<String> = (2..=SEATS as Seat)
            .map(|seat| format!("{}: {} tiles", seat_name(seat), state.hand(seat).len()))
            .collect();
        writeln!(f, "{}", opponents.join("   "))?;

        writeln!(f, "Your hand ({}):", state.player_tiles().len())?;
        for line in hand_lines(state.player_tiles(), state.selected_tile.as_deref()) {
            writeln!(f, "{}", line)?;
        }

        match state.game_phase {
            GamePhase::Waiting => write!(f, "Waiting for a deal"),
            GamePhase::Playing => write!(f, "{} to play", seat_name(state.current_player)),
            GamePhase::Finished => match state.winner {
                Some(seat) => write!(f, "{} won the deal", seat_name(seat)),
                None => write!(f, "Draw pile exhausted, no winner"),
            },
        }
    }
}

pub fn table_view(state: &GameState) -> String {
    TableView(state).to_string()
}

pub fn scores_line(state: &GameState) -> String {
    let scores: Vec<String> = (1..=SEATS as Seat)
        .map(|seat| format!("{} {}", seat_name(seat), state.score(seat)))
        .collect();
    format!(
        "Scores: {}   Deals won: {}",
        scores.join(", "),
        state.game_stats.total_games
    )
}

pub fn event_line(event: &GameEvent) -> String {
    match event {
        GameEvent::TileDrawn { seat, tile } => {
            if *seat == HUMAN_SEAT {
                format!("You drew {}", tile)
            } else {
                format!("{} drew a tile", seat_name(*seat))
            }
        }
        GameEvent::TileDiscarded { seat, tile, .. } => {
            format!("{} discarded {}", seat_name(*seat), tile)
        }
        GameEvent::TurnPassed { seat, .. } => format!("{} passed", seat_name(*seat)),
        GameEvent::DrawPileExhausted { .. } => "The draw pile is empty".to_string(),
        GameEvent::DealWon { seat } => format!("{} won the deal!", seat_name(*seat)),
    }
}
