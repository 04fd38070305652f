//! Hypothetical moves on a cloned state.

use crate::errors::RulesResult;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::move_generation::legal_move_apply::apply_move;

/// Clone `game_state` and apply `entry` to the copy. The original is never
/// touched.
#[inline]
pub fn simulate_move(game_state: &GameState, entry: &HistoryEntry) -> RulesResult<GameState> {
    let mut next = game_state.clone();
    apply_move(&mut next, entry.clone())?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::simulate_move;
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_dispatch::generate_pseudo_legal_moves;
    use crate::utils::algebraic::algebraic_to_position;

    #[test]
    fn simulation_leaves_the_source_untouched() {
        let game = GameState::new_game();
        let e2 = algebraic_to_position("e2").expect("e2 should parse");
        let entry = generate_pseudo_legal_moves(&game, e2, None)
            .pop()
            .expect("e2 has moves");

        let next = simulate_move(&game, &entry).expect("simulation should succeed");

        assert_eq!(game, GameState::new_game());
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.side_to_move, Color::Dark);
    }
}
