//! Legality on top of pseudo-legal generation.
//!
//! A candidate is legal when it does not leave its own king attacked.
//! Castling additionally needs the king out of check and every square it
//! crosses, destination included, safe.

use crate::errors::RulesResult;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::move_generation::legal_move_checks::{is_king_attacked_after_move, is_king_in_check};
use crate::move_generation::move_cache::{CacheKey, CacheTable, MoveCache};
use crate::move_generation::move_dispatch::pseudo_legal_moves;
use crate::moves::move_builder::build_entry;

/// Full legality check for an externally supplied entry.
pub fn validate_move(
    game_state: &GameState,
    entry: &HistoryEntry,
    cache: &mut MoveCache,
) -> RulesResult<bool> {
    if entry.player() != game_state.side_to_move {
        return Ok(false);
    }
    let candidates = pseudo_legal_moves(game_state, entry.mv().start, Some(entry.kind()), cache)?;
    if !candidates.iter().any(|candidate| candidate.same_move(entry)) {
        return Ok(false);
    }
    is_safe_for_mover(game_state, entry, cache)
}

/// Keep the pseudo-legal candidates that do not expose the mover's king.
pub fn filter_moves(
    game_state: &GameState,
    pseudo_legal: Vec<HistoryEntry>,
    cache: &mut MoveCache,
) -> RulesResult<Vec<HistoryEntry>> {
    let mut legal = Vec::with_capacity(pseudo_legal.len());
    for entry in pseudo_legal {
        if is_safe_for_mover(game_state, &entry, cache)? {
            legal.push(entry);
        }
    }
    Ok(legal)
}

/// Legal moves of the figure on `from`, read through the cache.
pub fn legal_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    cache: &mut MoveCache,
) -> RulesResult<Vec<HistoryEntry>> {
    let key = CacheKey::new(game_state.require_hash()?, from, kinds);
    cache.get_or_compute(CacheTable::Legal, key, |cache| {
        let pseudo_legal = pseudo_legal_moves(game_state, from, kinds, cache)?;
        filter_moves(game_state, pseudo_legal, cache)
    })
}

/// Legal moves of every figure belonging to the side to move, in board
/// order.
pub fn all_legal_moves(
    game_state: &GameState,
    cache: &mut MoveCache,
) -> RulesResult<Vec<HistoryEntry>> {
    let side = game_state.side_to_move;
    let squares: Vec<Position> = game_state
        .board
        .occupied()
        .filter(|(_, id)| {
            game_state
                .figures
                .get(*id)
                .is_some_and(|figure| figure.color == side)
        })
        .map(|(position, _)| position)
        .collect();

    let mut out = Vec::with_capacity(48);
    for from in squares {
        out.extend(legal_moves(game_state, from, None, cache)?);
    }
    Ok(out)
}

fn is_safe_for_mover(
    game_state: &GameState,
    entry: &HistoryEntry,
    cache: &mut MoveCache,
) -> RulesResult<bool> {
    match entry {
        HistoryEntry::Castling { record, .. } => {
            if is_king_in_check(game_state, record.player, cache)? {
                return Ok(false);
            }
            let (from, to) = (record.mv.start, record.mv.end);
            let step: i8 = if to.file() > from.file() { 1 } else { -1 };
            let mut square = from;
            while square != to {
                let Some(next) = square.offset(step, 0) else {
                    return Ok(false);
                };
                square = next;
                let king_step = build_entry(
                    game_state,
                    record.figure,
                    record.player,
                    Move::new(from, square),
                    None,
                    None,
                );
                if is_king_attacked_after_move(game_state, &king_step, cache)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(!is_king_attacked_after_move(game_state, entry, cache)?),
    }
}
