use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::sliding_rays::{generate_sliding_moves, BISHOP_RAYS};

pub fn generate_bishop_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };
    generate_sliding_moves(game_state, mover, from, &BISHOP_RAYS[from.index()], kinds, out);
}

#[cfg(test)]
mod tests {
    use super::generate_bishop_moves;
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_position;

    #[test]
    fn bishop_is_boxed_in_at_the_start() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        let c1 = algebraic_to_position("c1").expect("c1 should parse");
        generate_bishop_moves(&game, c1, None, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn centralized_bishop_on_empty_board_sees_thirteen_squares() {
        let game = GameState::from_fen("k7/8/8/8/3B4/8/8/7K w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        let d4 = algebraic_to_position("d4").expect("d4 should parse");
        generate_bishop_moves(&game, d4, None, &mut out);
        // 4 toward h8, 3 toward g1, 3 toward a1, 3 toward a7.
        assert_eq!(out.len(), 13);
    }
}
