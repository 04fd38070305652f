//! Pseudo-legal king moves, castling included.
//!
//! Castling candidates only check that king and rook are unmoved on their
//! original squares and that the squares between them are empty. Whether the
//! king is in check or crosses an attacked square is decided by the legality
//! validator.

use crate::game_state::chess_rules::KING_START_FILE;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::knight_moves::set_if_valid;
use crate::moves::move_builder::{build_record, push_step};

pub const KING_ATTACKS: [u64; 64] = generate_king_attacks();

#[inline]
pub const fn king_attacks(square: Position) -> u64 {
    KING_ATTACKS[square.index()]
}

pub fn generate_king_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };

    let mut targets = king_attacks(from);
    while targets != 0 {
        let to = Position::from_index(targets.trailing_zeros() as u8);
        push_step(game_state, mover, from, to, kinds, out);
        targets &= targets - 1;
    }

    if MoveKinds::allows(kinds, MoveKinds::CASTLING) {
        generate_castling_moves(game_state, from, out);
    }
}

fn generate_castling_moves(game_state: &GameState, king_from: Position, out: &mut Vec<HistoryEntry>) {
    let Some((king, figure)) = game_state.figure_at(king_from) else {
        return;
    };
    let color = figure.color;
    let home = color.home_rank() * 8;
    if king_from != Position::from_index(home + KING_START_FILE) {
        return;
    }

    for side in CastlingSide::BOTH {
        if !game_state.castling_available(color, side) {
            continue;
        }
        let rook_from = Position::from_index(home + side.rook_file());

        let (low, high) = if side.rook_file() < king_from.file() {
            (side.rook_file(), king_from.file())
        } else {
            (king_from.file(), side.rook_file())
        };
        let path_clear = (low + 1..high)
            .all(|file| game_state.board.is_empty_at(Position::from_index(home + file)));
        if !path_clear {
            continue;
        }

        let Some(rook) = game_state.board.get(rook_from) else {
            continue;
        };
        let king_to = Position::from_index(home + side.king_target_file());
        let rook_to = Position::from_index(home + side.rook_target_file());
        out.push(HistoryEntry::Castling {
            record: build_record(game_state, king, color, Move::new(king_from, king_to), None, None),
            rook,
            rook_move: Move::new(rook_from, rook_to),
        });
    }
}

const fn generate_king_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;

        attacks |= set_if_valid(file - 1, rank - 1);
        attacks |= set_if_valid(file, rank - 1);
        attacks |= set_if_valid(file + 1, rank - 1);
        attacks |= set_if_valid(file - 1, rank);
        attacks |= set_if_valid(file + 1, rank);
        attacks |= set_if_valid(file - 1, rank + 1);
        attacks |= set_if_valid(file, rank + 1);
        attacks |= set_if_valid(file + 1, rank + 1);

        table[sq] = attacks;
        sq += 1;
    }

    table
}
