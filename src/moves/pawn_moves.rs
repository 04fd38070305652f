//! Pseudo-legal pawn moves.
//!
//! Directions are relative to the pawn's own color: Light pawns advance
//! toward rank 8, Dark pawns toward rank 1. Pushes need empty squares,
//! diagonal steps need an enemy figure, and reaching the far rank fans out
//! into one candidate per promotion kind.
//!
//! En passant is offered only when the previous history entry was an enemy
//! pawn double push that landed directly beside this pawn.

use crate::game_state::board::{Figure, FigureId};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::move_builder::{build_record, push_pawn_entries};

pub fn generate_pawn_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };
    let color = mover.1.color;
    let forward = color.forward();

    if MoveKinds::allows(kinds, MoveKinds::MOVE) {
        generate_pushes(game_state, mover, from, out);
    }

    if MoveKinds::allows(kinds, MoveKinds::ATTACK_MOVE) {
        for file_delta in [-1i8, 1i8] {
            let Some(to) = from.offset(file_delta, forward) else {
                continue;
            };
            if let Some((victim, target)) = game_state.figure_at(to) {
                if target.color != color {
                    push_pawn_entries(game_state, mover, Move::new(from, to), Some(victim), out);
                }
            }
        }
    }

    if MoveKinds::allows(kinds, MoveKinds::EN_PASSANT) {
        generate_en_passant(game_state, mover, from, out);
    }
}

fn generate_pushes(
    game_state: &GameState,
    mover: (FigureId, Figure),
    from: Position,
    out: &mut Vec<HistoryEntry>,
) {
    let color = mover.1.color;
    let forward = color.forward();

    let Some(one_step) = from.offset(0, forward) else {
        return;
    };
    if !game_state.board.is_empty_at(one_step) {
        return;
    }
    push_pawn_entries(game_state, mover, Move::new(from, one_step), None, out);

    if from.rank() != color.pawn_start_rank() {
        return;
    }
    if let Some(two_step) = from.offset(0, 2 * forward) {
        if game_state.board.is_empty_at(two_step) {
            push_pawn_entries(game_state, mover, Move::new(from, two_step), None, out);
        }
    }
}

fn generate_en_passant(
    game_state: &GameState,
    mover: (FigureId, Figure),
    from: Position,
    out: &mut Vec<HistoryEntry>,
) {
    let (id, figure) = mover;
    // Only the side that replies to the double push may take it.
    if game_state.side_to_move != figure.color {
        return;
    }
    let Some(landing) = game_state.last_double_push() else {
        return;
    };
    if landing.rank() != from.rank() || landing.file().abs_diff(from.file()) != 1 {
        return;
    }
    let Some((victim, target)) = game_state.figure_at(landing) else {
        return;
    };
    if target.kind != PieceKind::Pawn || target.color == figure.color {
        return;
    }
    let Some(to) = landing.offset(0, figure.color.forward()) else {
        return;
    };
    if !game_state.board.is_empty_at(to) {
        return;
    }

    out.push(HistoryEntry::EnPassant {
        record: build_record(game_state, id, figure.color, Move::new(from, to), Some(victim), None),
        captured_square: landing,
    });
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::{MoveKinds, PieceKind, Position};
    use crate::game_state::game_state::GameState;
    use crate::game_state::history::HistoryEntry;
    use crate::utils::algebraic::algebraic_to_position;

    fn sq(text: &str) -> Position {
        algebraic_to_position(text).expect("square should parse")
    }

    fn ends(out: &[HistoryEntry]) -> Vec<String> {
        out.iter().map(|entry| entry.mv().end.to_string()).collect()
    }

    #[test]
    fn starting_pawn_has_single_and_double_push() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("a2"), None, &mut out);
        assert_eq!(ends(&out), ["a3", "a4"]);

        out.clear();
        generate_pawn_moves(&game, sq("h7"), None, &mut out);
        assert_eq!(ends(&out), ["h6", "h5"]);
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let game =
            GameState::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("e2"), None, &mut out);
        assert_eq!(ends(&out), ["e3"]);

        let blocked =
            GameState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").expect("FEN should parse");
        out.clear();
        generate_pawn_moves(&blocked, sq("e2"), None, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn diagonal_steps_require_an_enemy() {
        let game =
            GameState::from_fen("4k3/8/8/8/8/3p1N2/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("e2"), Some(MoveKinds::ATTACK_MOVE), &mut out);
        assert_eq!(ends(&out), ["d3"]);
        assert!(matches!(out[0], HistoryEntry::AttackMove(_)));
    }

    #[test]
    fn reaching_the_far_rank_fans_out_into_promotions() {
        let game = GameState::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("a7"), None, &mut out);

        let promotions: Vec<Option<PieceKind>> = out.iter().map(|entry| entry.promotion()).collect();
        assert_eq!(
            promotions,
            [
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight),
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight),
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
            ]
        );
        assert_eq!(out.iter().filter(|e| matches!(e, HistoryEntry::AttackMove(_))).count(), 4);
    }

    #[test]
    fn imported_en_passant_file_offers_the_capture() {
        let game =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("e5"), Some(MoveKinds::EN_PASSANT), &mut out);
        assert_eq!(out.len(), 1);
        match &out[0] {
            HistoryEntry::EnPassant {
                record,
                captured_square,
            } => {
                assert_eq!(record.mv.end, sq("d6"));
                assert_eq!(*captured_square, sq("d5"));
            }
            other => panic!("expected en passant, got {other:?}"),
        }
    }

    #[test]
    fn no_en_passant_without_a_double_push() {
        let game =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, sq("e5"), Some(MoveKinds::EN_PASSANT), &mut out);
        assert!(out.is_empty());
    }
}
