//! Apply and undo: the only primitives that mutate a `GameState`.
//!
//! Both primitives keep the Zobrist hash in step with every change by
//! XOR-ing old terms out and new terms in. They perform every fallible
//! lookup before the first write, so an error leaves the state untouched.

use tracing::trace;

use crate::errors::{RulesError, RulesResult};
use crate::game_state::board::Figure;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::hashing::zobrist::{
    castling_rights_key, en_passant_key, piece_square_key, side_to_move_key,
};

/// Apply `entry` to `game_state` without checking legality.
///
/// The entry's board snapshot and pre-move clocks are overwritten with the
/// live values, so entries taken from a cache shared across transpositions
/// still undo correctly.
pub fn apply_move(game_state: &mut GameState, mut entry: HistoryEntry) -> RulesResult<()> {
    let mut hash = game_state.require_hash()?;
    let record = entry.record();
    let mv = record.mv;

    // --- Preconditions, before any mutation ---
    if game_state.board.get(mv.start) != Some(record.figure) {
        return Err(RulesError::invariant(format!(
            "{:?} is not on {} for move {entry}",
            record.figure, mv.start
        )));
    }
    let mover = game_state.figures.require(record.figure)?;

    let capture = match record.captured {
        Some(captured) => {
            let square = game_state.board.find(captured).ok_or_else(|| {
                RulesError::invariant(format!("captured {captured:?} is not on the board"))
            })?;
            Some((captured, game_state.figures.require(captured)?, square))
        }
        None => None,
    };
    let vacated_by_capture = capture.map(|(_, _, square)| square);
    if !game_state.board.is_empty_at(mv.end) && vacated_by_capture != Some(mv.end) {
        return Err(RulesError::invariant(format!(
            "destination {} of {entry} is occupied",
            mv.end
        )));
    }

    let rook_step = match &entry {
        HistoryEntry::Castling {
            rook, rook_move, ..
        } => {
            if game_state.board.get(rook_move.start) != Some(*rook) {
                return Err(RulesError::invariant(format!(
                    "castling rook {rook:?} is not on {}",
                    rook_move.start
                )));
            }
            Some((*rook_move, game_state.figures.require(*rook)?))
        }
        _ => None,
    };

    // --- Mutation ---
    {
        let record = entry.record_mut();
        record.board_before = game_state.board;
        record.prev_half_move_clock = game_state.half_move_clock;
        record.prev_full_move_counter = game_state.full_move_counter;
    }

    if let Some((_, figure, square)) = capture {
        game_state.board.remove(square);
        hash ^= piece_square_key(figure.color, figure.kind, square);
    }

    // Castling moves the rook first, then the king below.
    if let Some((rook_move, rook)) = rook_step {
        game_state.board.relocate(rook_move.start, rook_move.end)?;
        hash ^= relocation_key(rook, rook.kind, rook_move);
    }

    game_state.board.relocate(mv.start, mv.end)?;
    hash ^= piece_square_key(mover.color, mover.kind, mv.start);
    let arrived_kind = match entry.promotion() {
        Some(kind) => {
            game_state.figures.set_kind(entry.figure(), kind)?;
            kind
        }
        None => mover.kind,
    };
    hash ^= piece_square_key(mover.color, arrived_kind, mv.end);

    let resets_clock = capture.is_some()
        || matches!(entry, HistoryEntry::EnPassant { .. })
        || mover.kind == PieceKind::Pawn;
    let player = entry.player();

    trace!(%entry, ?player, "applying move");
    game_state.history.push(entry);

    game_state.side_to_move = game_state.side_to_move.opposite();
    hash ^= side_to_move_key();

    hash ^= refresh_derived_terms(game_state);

    game_state.half_move_clock = if resets_clock {
        0
    } else {
        game_state.half_move_clock.saturating_add(1)
    };
    if player == Color::Dark {
        game_state.full_move_counter = game_state.full_move_counter.saturating_add(1);
    }

    game_state.hash = Some(hash);
    Ok(())
}

/// Revert the most recent history entry. `Ok(None)` when there is nothing
/// to undo.
pub fn undo_last_move(game_state: &mut GameState) -> RulesResult<Option<HistoryEntry>> {
    let Some(entry) = game_state.history.last() else {
        return Ok(None);
    };
    let mut hash = game_state.require_hash()?;
    let record = entry.record();
    let mv = record.mv;

    // --- Preconditions, before any mutation ---
    if game_state.board.get(mv.end) != Some(record.figure) {
        return Err(RulesError::invariant(format!(
            "{:?} is not on {} to undo {entry}",
            record.figure, mv.end
        )));
    }
    let mover = game_state.figures.require(record.figure)?;

    let restore = match record.captured {
        Some(captured) => {
            let square = entry.capture_square().ok_or_else(|| {
                RulesError::invariant(format!("{entry} records a capture but no capture square"))
            })?;
            Some((captured, game_state.figures.require(captured)?, square))
        }
        None => None,
    };

    let rook_step = match entry {
        HistoryEntry::Castling {
            rook, rook_move, ..
        } => {
            if game_state.board.get(rook_move.end) != Some(*rook) {
                return Err(RulesError::invariant(format!(
                    "castling rook {rook:?} is not on {}",
                    rook_move.end
                )));
            }
            Some((*rook_move, game_state.figures.require(*rook)?))
        }
        _ => None,
    };

    // --- Mutation ---
    let Some(entry) = game_state.history.pop() else {
        return Ok(None);
    };
    let record = entry.record();

    // Remove the destination term with the kind that actually stands there,
    // then restore the pawn before adding the origin term back.
    hash ^= piece_square_key(mover.color, mover.kind, mv.end);
    let departed_kind = if record.promotion.is_some() {
        game_state.figures.set_kind(record.figure, PieceKind::Pawn)?;
        PieceKind::Pawn
    } else {
        mover.kind
    };
    game_state.board.relocate(mv.end, mv.start)?;
    hash ^= piece_square_key(mover.color, departed_kind, mv.start);

    if let Some((rook_move, rook)) = rook_step {
        game_state
            .board
            .relocate(rook_move.end, rook_move.start)?;
        hash ^= relocation_key(rook, rook.kind, rook_move);
    }

    if let Some((captured, figure, square)) = restore {
        game_state.board.place(square, captured)?;
        hash ^= piece_square_key(figure.color, figure.kind, square);
    }

    game_state.half_move_clock = record.prev_half_move_clock;
    game_state.full_move_counter = record.prev_full_move_counter;

    game_state.side_to_move = game_state.side_to_move.opposite();
    hash ^= side_to_move_key();

    hash ^= refresh_derived_terms(game_state);

    debug_assert_eq!(game_state.board, record.board_before);
    trace!(%entry, "undid move");

    game_state.hash = Some(hash);
    Ok(Some(entry))
}

#[inline]
fn relocation_key(figure: Figure, kind: PieceKind, mv: Move) -> u64 {
    piece_square_key(figure.color, kind, mv.start) ^ piece_square_key(figure.color, kind, mv.end)
}

/// Recompute the en-passant file and castling rights, returning the XOR
/// delta of their hash terms.
fn refresh_derived_terms(game_state: &mut GameState) -> u64 {
    let old_en_passant = game_state.en_passant_file;
    let old_rights = game_state.castling_rights;
    game_state.refresh_derived_flags();
    en_passant_key(old_en_passant)
        ^ en_passant_key(game_state.en_passant_file)
        ^ castling_rights_key(old_rights)
        ^ castling_rights_key(game_state.castling_rights)
}
