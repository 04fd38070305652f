//! Pseudo-legal rook moves.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::sliding_rays::{generate_sliding_moves, ROOK_RAYS};

pub fn generate_rook_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };
    generate_sliding_moves(game_state, mover, from, &ROOK_RAYS[from.index()], kinds, out);
}
