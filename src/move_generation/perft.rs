//! Perft: exhaustive legal-move tree counts.
//!
//! The walk applies and undoes every move on one state, so each visited node
//! also exercises the apply/undo round trip and the incremental hash. The
//! cache is flushed after every apply and undo, exactly as a session does.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::move_generation::legal_move_apply::{apply_move, undo_last_move};
use crate::move_generation::legal_move_validator::all_legal_moves;
use crate::move_generation::move_cache::MoveCache;

/// Leaf statistics. Move-kind counters describe the last ply only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }

    fn record_leaf(&mut self, entry: &HistoryEntry) {
        self.nodes += 1;
        if entry.record().captured.is_some() {
            self.captures += 1;
        }
        match entry {
            HistoryEntry::EnPassant { .. } => self.en_passant += 1,
            HistoryEntry::Castling { .. } => self.castles += 1,
            HistoryEntry::Move(_) | HistoryEntry::AttackMove(_) => {}
        }
        if entry.promotion().is_some() {
            self.promotions += 1;
        }
    }
}

/// Count the legal-move tree below `game_state` to `depth` plies. The state
/// is returned to its starting value on success.
pub fn perft(game_state: &mut GameState, depth: u8) -> RulesResult<PerftCounts> {
    let mut cache = MoveCache::new();
    perft_with_cache(game_state, depth, &mut cache)
}

pub fn perft_with_cache(
    game_state: &mut GameState,
    depth: u8,
    cache: &mut MoveCache,
) -> RulesResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let moves = all_legal_moves(game_state, cache)?;
    let mut total = PerftCounts::default();

    if depth == 1 {
        for entry in &moves {
            total.record_leaf(entry);
        }
        return Ok(total);
    }

    for entry in moves {
        apply_move(game_state, entry)?;
        cache.flush();
        let child = perft_with_cache(game_state, depth - 1, cache);
        let undone = undo_last_move(game_state)?;
        cache.flush();
        total.merge(child?);
        if undone.is_none() {
            return Err(RulesError::invariant("perft undo found an empty history"));
        }
    }

    Ok(total)
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(
    game_state: &mut GameState,
    depth: u8,
) -> RulesResult<Vec<(HistoryEntry, usize)>> {
    let mut cache = MoveCache::new();
    let moves = all_legal_moves(game_state, &mut cache)?;
    let mut out = Vec::with_capacity(moves.len());

    for entry in moves {
        apply_move(game_state, entry.clone())?;
        cache.flush();
        let child = perft_with_cache(game_state, depth.saturating_sub(1), &mut cache);
        undo_last_move(game_state)?;
        cache.flush();
        out.push((entry, child?.nodes));
    }

    Ok(out)
}
