//! Attack and check queries.
//!
//! Attacks are found by asking every figure of the attacking side for its
//! capture candidates, so a square only counts as attacked when a figure of
//! the other side stands on it. Callers that need to test an empty square
//! simulate a king step onto it first.

use crate::errors::RulesResult;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::move_generation::move_cache::MoveCache;
use crate::move_generation::move_dispatch::pseudo_legal_moves;
use crate::move_generation::move_simulator::simulate_move;

/// True if any figure of `attacker` has a capture candidate landing on
/// `square`.
pub fn is_square_attacked_by(
    game_state: &GameState,
    square: Position,
    attacker: Color,
    cache: &mut MoveCache,
) -> RulesResult<bool> {
    let attackers: Vec<Position> = game_state
        .board
        .occupied()
        .filter(|(_, id)| {
            game_state
                .figures
                .get(*id)
                .is_some_and(|figure| figure.color == attacker)
        })
        .map(|(position, _)| position)
        .collect();

    for from in attackers {
        let captures = pseudo_legal_moves(game_state, from, Some(MoveKinds::ATTACK_MOVE), cache)?;
        if captures.iter().any(|entry| entry.mv().end == square) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// A side without a king is never in check.
pub fn is_king_in_check(
    game_state: &GameState,
    color: Color,
    cache: &mut MoveCache,
) -> RulesResult<bool> {
    let Some(king) = game_state.king_position(color) else {
        return Ok(false);
    };
    is_square_attacked_by(game_state, king, color.opposite(), cache)
}

/// Would the mover's king be attacked once `entry` is played?
pub fn is_king_attacked_after_move(
    game_state: &GameState,
    entry: &HistoryEntry,
    cache: &mut MoveCache,
) -> RulesResult<bool> {
    let next = simulate_move(game_state, entry)?;
    is_king_in_check(&next, entry.player(), cache)
}
