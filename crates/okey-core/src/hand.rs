//! Hand evaluation.
//!
//! Win detection is an approximation of real Okey melds: a hand of 14
//! wins with four tiles of one rank, or with a seven-tile run in a single
//! color. Neither check gives credit for jokers or okey tiles.

use crate::deal::HAND_SIZE;
use crate::tile::{Tile, TileColor, MAX_RANK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tiles of one rank needed for a set win
const SET_WIN_COUNT: usize = 4;

/// Consecutive same-color ranks needed for a run win
const RUN_WIN_LENGTH: usize = 7;

/// Shortest run reported by the analyzer
const MIN_RUN: usize = 3;

/// Score at which a hand is considered close to finishing
const CAN_FINISH_SCORE: u32 = 70;

/// Count of each rank among non-joker tiles, indexed by rank
fn rank_counts(tiles: &[Tile]) -> [usize; MAX_RANK as usize + 1] {
    let mut counts = [0; MAX_RANK as usize + 1];
    for tile in tiles.iter().filter(|t| !t.is_joker) {
        if let Some(count) = counts.get_mut(tile.rank as usize) {
            *count += 1;
        }
    }
    counts
}

/// Sorted ranks of the non-joker tiles of one color
fn color_ranks(tiles: &[Tile], color: TileColor) -> Vec<u8> {
    let mut ranks: Vec<u8> = tiles
        .iter()
        .filter(|t| !t.is_joker && t.color == color)
        .map(|t| t.rank)
        .collect();
    ranks.sort_unstable();
    ranks
}

/// Maximal streaks of sorted ranks where each rank is one above the last,
/// as `(start_rank, length)`. A repeated rank ends the streak.
fn streaks(ranks: &[u8]) -> Vec<(u8, usize)> {
    let mut result = Vec::new();
    let Some(&first) = ranks.first() else {
        return result;
    };

    let mut start = first;
    let mut length = 1;
    for pair in ranks.windows(2) {
        if u16::from(pair[1]) == u16::from(pair[0]) + 1 {
            length += 1;
        } else {
            result.push((start, length));
            start = pair[1];
            length = 1;
        }
    }
    result.push((start, length));
    result
}

/// Whether a 14-tile hand is a finished hand.
///
/// Any other hand size is never a win.
pub fn is_winning_hand(tiles: &[Tile]) -> bool {
    if tiles.len() != HAND_SIZE {
        return false;
    }

    if rank_counts(tiles).iter().any(|&c| c >= SET_WIN_COUNT) {
        return true;
    }

    TileColor::ALL.iter().any(|&color| {
        streaks(&color_ranks(tiles, color))
            .iter()
            .any(|&(_, length)| length >= RUN_WIN_LENGTH)
    })
}

/// Progress of a hand toward finishing, used by the opponents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandAnalysis {
    /// Non-joker tiles by color, sorted by rank
    pub colors: BTreeMap<TileColor, Vec<Tile>>,
    /// Jokers plus okey tiles
    pub wildcard_count: usize,
    /// `(rank, count)` for every rank held at least twice
    pub pairs: Vec<(u8, usize)>,
    /// `(start_rank, length)` for every same-color run of three or more
    pub runs: Vec<(u8, usize)>,
    pub total_tiles: usize,
    /// 0 to 100
    pub finish_score: u32,
    pub can_finish: bool,
}

impl HandAnalysis {
    /// How many tiles of `rank` the hand holds, if at least two
    pub fn pair_count(&self, rank: u8) -> usize {
        self.pairs
            .iter()
            .find(|&&(r, _)| r == rank)
            .map(|&(_, count)| count)
            .unwrap_or(0)
    }

    pub fn max_pair(&self) -> usize {
        self.pairs.iter().map(|&(_, c)| c).max().unwrap_or(0)
    }

    pub fn max_run(&self) -> usize {
        self.runs.iter().map(|&(_, len)| len).max().unwrap_or(0)
    }
}

/// Group, count and score a hand
pub fn analyze_hand(tiles: &[Tile]) -> HandAnalysis {
    let mut colors = BTreeMap::new();
    for color in TileColor::ALL {
        let mut group: Vec<Tile> = tiles
            .iter()
            .filter(|t| !t.is_joker && t.color == color)
            .cloned()
            .collect();
        group.sort_by_key(|t| t.rank);
        colors.insert(color, group);
    }

    let wildcard_count = tiles.iter().filter(|t| t.is_wildcard()).count();

    let pairs: Vec<(u8, usize)> = rank_counts(tiles)
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count >= 2)
        .map(|(rank, &count)| (rank as u8, count))
        .collect();

    let runs: Vec<(u8, usize)> = TileColor::ALL
        .iter()
        .flat_map(|&color| streaks(&color_ranks(tiles, color)))
        .filter(|&(_, length)| length >= MIN_RUN)
        .collect();

    let mut analysis = HandAnalysis {
        colors,
        wildcard_count,
        pairs,
        runs,
        total_tiles: tiles.len(),
        finish_score: 0,
        can_finish: false,
    };

    let pair_score = (analysis.max_pair() as u32 * 20).min(60);
    let run_score = (analysis.max_run() as u32 * 10).min(40);
    let wildcard_score = wildcard_count as u32 * 5;
    analysis.finish_score = (pair_score + run_score + wildcard_score).min(100);
    analysis.can_finish = analysis.finish_score >= CAN_FINISH_SCORE;

    analysis
}
