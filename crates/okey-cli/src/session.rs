//! Terminal session driving a single-player table.

use crate::command::{Command, CommandError, HELP};
use crate::render::{event_line, scores_line, table_view};
use okey_core::{
    Bot, GameAction, GameError, GameEvent, GameStats, Table, TableConfig, HUMAN_SEAT, SEATS,
};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Upper bound on seat-1 turns in one simulated deal
const MAX_AUTO_TURNS: usize = 1_000;

/// Upper bound on back-to-back opponent resumes
const MAX_RESUMES: usize = 100;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Whether the read loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Outcome of a batch of simulated deals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSummary {
    pub deals: u32,
    /// Wins by seat index
    pub wins: [u32; SEATS],
    /// Deals that ended on an empty draw pile
    pub exhausted: u32,
    /// Deals cut off while still in play
    pub stalled: u32,
    pub stats: GameStats,
}

pub struct Session {
    table: Table,
    /// Plays seat 1 in auto mode and answers hints
    advisor: Bot,
}

impl Session {
    pub fn new(config: TableConfig) -> Self {
        let advisor = match config.seed {
            Some(seed) => Bot::with_seed(config.difficulty, seed.wrapping_add(2)),
            None => Bot::new(config.difficulty),
        };

        Self {
            table: Table::new(config),
            advisor,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Let the opponents finish their turns if the move cap interrupted them
    fn settle(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut resumes = 0;

        while self.table.state().is_playing() && self.table.state().current_player != HUMAN_SEAT {
            if resumes == MAX_RESUMES {
                warn!(resumes, "Opponents did not hand back control");
                break;
            }
            events.append(&mut self.table.resume_opponents(now_ms()));
            resumes += 1;
        }
        events
    }

    /// Read commands until `quit` or end of input
    pub fn run_interactive<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> anyhow::Result<()> {
        self.table.new_deal(now_ms())?;
        writeln!(output, "{}\n", HELP)?;
        writeln!(output, "{}", table_view(self.table.state()))?;

        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    writeln!(output, "{}", e)?;
                    continue;
                }
            };

            if self.execute(command, output)? == Flow::Quit {
                break;
            }
        }

        writeln!(output, "{}", scores_line(self.table.state()))?;
        Ok(())
    }

    /// Carry out one command, writing what happened
    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> anyhow::Result<Flow> {
        debug!(?command, "Command");

        match command {
            Command::Play(action) => {
                let result = self.table.human_action(action, now_ms());
                match result {
                    Ok(mut events) => {
                        events.append(&mut self.settle());
                        for event in &events {
                            writeln!(output, "{}", event_line(event))?;
                        }
                        writeln!(output, "{}", table_view(self.table.state()))?;
                        if self.table.state().is_finished() {
                            writeln!(output, "{}", scores_line(self.table.state()))?;
                            writeln!(output, "Type `deal` for the next deal.")?;
                        }
                    }
                    Err(GameError::GameOver) => {
                        writeln!(output, "The deal is over. Type `deal` for the next one.")?;
                    }
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }

            Command::Select(tile_id) => {
                self.table.select_tile(&tile_id);
                writeln!(output, "{}", table_view(self.table.state()))?;
            }

            Command::Hint => {
                let state = self.table.state();
                if state.is_playing() && state.current_player == HUMAN_SEAT {
                    let hint = match self.advisor.suggest_action(state) {
                        GameAction::Draw => "draw".to_string(),
                        GameAction::Pass => "pass".to_string(),
                        GameAction::Discard { tile_id } => format!("discard {}", tile_id),
                    };
                    writeln!(output, "Hint: {}", hint)?;
                } else {
                    writeln!(output, "Nothing to suggest right now.")?;
                }
            }

            Command::State => {
                writeln!(output, "{}", serde_json::to_string_pretty(self.table.state())?)?;
            }

            Command::Deal => {
                self.table.new_deal(now_ms())?;
                writeln!(output, "{}", table_view(self.table.state()))?;
            }

            Command::Help => writeln!(output, "{}", HELP)?,

            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Simulate `deals` deals with the advisor playing seat 1
    pub fn run_auto(&mut self, deals: u32) -> Result<AutoSummary, GameError> {
        let mut summary = AutoSummary {
            deals,
            wins: [0; SEATS],
            exhausted: 0,
            stalled: 0,
            stats: GameStats::default(),
        };

        for deal in 1..=deals {
            self.table.new_deal(now_ms())?;
            let mut turns = 0;

            while self.table.state().is_playing() && turns < MAX_AUTO_TURNS {
                turns += 1;
                if self.table.state().current_player != HUMAN_SEAT {
                    self.settle();
                    continue;
                }
                let action = self.advisor.suggest_action(self.table.state());
                self.table.human_action(action, now_ms())?;
            }

            let state = self.table.state();
            match state.winner {
                Some(seat) => summary.wins[usize::from(seat) - 1] += 1,
                None if state.is_finished() => summary.exhausted += 1,
                None => {
                    warn!(deal, turns, "Deal stalled");
                    summary.stalled += 1;
                }
            }
            info!(deal, winner = ?state.winner, turns, "Deal over");
        }

        summary.stats = self.table.state().game_stats.clone();
        Ok(summary)
    }
}
