//! WebAssembly bindings for the Okey engine.
//!
//! The browser owns the clock, so every call that can end a deal takes the
//! current time in milliseconds.

use wasm_bindgen::prelude::*;

use crate::actions::GameEvent;
use crate::bot::BotDifficulty;
use crate::config::TableConfig;
use crate::game::GameError;
use crate::hand::{analyze_hand, is_winning_hand};
use crate::table::Table;
use crate::tile::Tile;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn events_json(events: &[GameEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

/// WASM-exposed single-player table
#[wasm_bindgen]
pub struct WasmGame {
    table: Table,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a table; difficulty is "easy" or "medium"
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str, seed: Option<u64>) -> WasmGame {
        let difficulty = match difficulty {
            "easy" | "Easy" => BotDifficulty::Easy,
            _ => BotDifficulty::Medium,
        };

        WasmGame {
            table: Table::new(TableConfig {
                seed,
                difficulty,
                ..TableConfig::default()
            }),
        }
    }

    /// Deal a new round, keeping scores
    #[wasm_bindgen(js_name = startDeal)]
    pub fn start_deal(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.table.new_deal(now_ms as u64).map_err(to_js)
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.table.state()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.table.state().current_player
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.table.state().is_finished()
    }

    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.table.state().winner
    }

    #[wasm_bindgen(js_name = selectTile)]
    pub fn select_tile(&mut self, tile_id: &str) {
        self.table.select_tile(tile_id);
    }

    /// Draw for the human, then let the opponents play; returns events JSON
    pub fn draw(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let events = self.table.human_draw(now_ms as u64).map_err(to_js)?;
        Ok(events_json(&events))
    }

    /// Discard for the human, then let the opponents play; returns events JSON
    pub fn discard(&mut self, tile_id: &str, now_ms: f64) -> Result<String, JsValue> {
        let events = self
            .table
            .human_discard(tile_id, now_ms as u64)
            .map_err(to_js)?;
        Ok(events_json(&events))
    }

    /// Pass for the human, then let the opponents play; returns events JSON
    pub fn pass(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let events = self.table.human_pass(now_ms as u64).map_err(to_js)?;
        Ok(events_json(&events))
    }

    /// Continue the opponents' turns when the move cap left one of them current
    #[wasm_bindgen(js_name = processOpponentTurns)]
    pub fn process_opponent_turns(&mut self, now_ms: f64) -> String {
        events_json(&self.table.resume_opponents(now_ms as u64))
    }

    /// Check a JSON array of tiles against the winning rule
    #[wasm_bindgen(js_name = isWinningHand)]
    pub fn is_winning_hand(tiles_json: &str) -> Result<bool, JsValue> {
        let tiles: Vec<Tile> = serde_json::from_str(tiles_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid tiles JSON: {}", e)))?;
        Ok(is_winning_hand(&tiles))
    }

    /// Analysis of the human's hand as JSON (for hints)
    #[wasm_bindgen(js_name = analyzePlayerHand)]
    pub fn analyze_player_hand(&self) -> String {
        let analysis = analyze_hand(self.table.state().player_tiles());
        serde_json::to_string(&analysis).unwrap_or_else(|_| "{}".to_string())
    }
}
