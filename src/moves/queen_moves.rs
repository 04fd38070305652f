use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::sliding_rays::{generate_sliding_moves, BISHOP_RAYS, ROOK_RAYS};

/// Rook rays first, then bishop rays.
pub fn generate_queen_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };
    generate_sliding_moves(game_state, mover, from, &ROOK_RAYS[from.index()], kinds, out);
    generate_sliding_moves(game_state, mover, from, &BISHOP_RAYS[from.index()], kinds, out);
}
