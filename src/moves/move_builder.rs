//! Helpers shared by the per-piece generators for building history entries.

use crate::game_state::board::{Figure, FigureId};
use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::game_state::GameState;
use crate::game_state::history::{HistoryEntry, MoveRecord};
use crate::game_state::chess_types::*;

/// Record for `figure` travelling along `mv`, stamped with the current
/// board and clocks of `game_state`.
#[inline]
pub fn build_record(
    game_state: &GameState,
    figure: FigureId,
    player: Color,
    mv: Move,
    captured: Option<FigureId>,
    promotion: Option<PieceKind>,
) -> MoveRecord {
    MoveRecord {
        player,
        figure,
        mv,
        captured,
        promotion,
        board_before: game_state.board,
        prev_half_move_clock: game_state.half_move_clock,
        prev_full_move_counter: game_state.full_move_counter,
    }
}

/// `AttackMove` when something is captured on the destination, else `Move`.
#[inline]
pub fn build_entry(
    game_state: &GameState,
    figure: FigureId,
    player: Color,
    mv: Move,
    captured: Option<FigureId>,
    promotion: Option<PieceKind>,
) -> HistoryEntry {
    let record = build_record(game_state, figure, player, mv, captured, promotion);
    if captured.is_some() {
        HistoryEntry::AttackMove(record)
    } else {
        HistoryEntry::Move(record)
    }
}

/// What a single step onto `to` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Empty,
    Capture,
    Blocked,
}

/// Emit the step `from -> to` for `mover` if the kind is requested. Friendly
/// pieces block; enemy pieces are captured.
pub fn push_step(
    game_state: &GameState,
    mover: (FigureId, Figure),
    from: Position,
    to: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) -> StepOutcome {
    let (id, figure) = mover;
    match game_state.figure_at(to) {
        None => {
            if MoveKinds::allows(kinds, MoveKinds::MOVE) {
                out.push(build_entry(game_state, id, figure.color, Move::new(from, to), None, None));
            }
            StepOutcome::Empty
        }
        Some((victim, target)) if target.color != figure.color => {
            if MoveKinds::allows(kinds, MoveKinds::ATTACK_MOVE) {
                out.push(build_entry(
                    game_state,
                    id,
                    figure.color,
                    Move::new(from, to),
                    Some(victim),
                    None,
                ));
            }
            StepOutcome::Capture
        }
        Some(_) => StepOutcome::Blocked,
    }
}

/// Push one entry per promotion kind, or a single plain entry when `to` is
/// not on the mover's far rank.
pub fn push_pawn_entries(
    game_state: &GameState,
    mover: (FigureId, Figure),
    mv: Move,
    captured: Option<FigureId>,
    out: &mut Vec<HistoryEntry>,
) {
    let (id, figure) = mover;
    if mv.end.rank() == figure.color.promotion_rank() {
        for kind in PROMOTION_KINDS {
            out.push(build_entry(game_state, id, figure.color, mv, captured, Some(kind)));
        }
    } else {
        out.push(build_entry(game_state, id, figure.color, mv, captured, None));
    }
}
