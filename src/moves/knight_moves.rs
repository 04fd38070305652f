use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::move_builder::push_step;

pub const KNIGHT_ATTACKS: [u64; 64] = generate_knight_attacks();

#[inline]
pub const fn knight_attacks(square: Position) -> u64 {
    KNIGHT_ATTACKS[square.index()]
}

pub fn generate_knight_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    let Some(mover) = game_state.figure_at(from) else {
        return;
    };

    let mut targets = knight_attacks(from);
    while targets != 0 {
        let to = Position::from_index(targets.trailing_zeros() as u8);
        push_step(game_state, mover, from, to, kinds, out);
        targets &= targets - 1;
    }
}

const fn generate_knight_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;

        attacks |= set_if_valid(file + 1, rank + 2);
        attacks |= set_if_valid(file + 2, rank + 1);
        attacks |= set_if_valid(file + 2, rank - 1);
        attacks |= set_if_valid(file + 1, rank - 2);
        attacks |= set_if_valid(file - 1, rank - 2);
        attacks |= set_if_valid(file - 2, rank - 1);
        attacks |= set_if_valid(file - 2, rank + 1);
        attacks |= set_if_valid(file - 1, rank + 2);

        table[sq] = attacks;
        sq += 1;
    }

    table
}

pub(crate) const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    let square = (rank as usize) * 8 + (file as usize);
    1u64 << square
}

#[cfg(test)]
mod tests {
    use super::{generate_knight_moves, KNIGHT_ATTACKS};
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_position;

    #[test]
    fn knight_attacks_from_d4_has_eight_targets() {
        let d4 = 27usize;
        assert_eq!(KNIGHT_ATTACKS[d4].count_ones(), 8);
    }

    #[test]
    fn knight_on_b1_skips_friendly_d2() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        let b1 = algebraic_to_position("b1").expect("b1 should parse");
        generate_knight_moves(&game, b1, None, &mut out);

        let ends: Vec<String> = out.iter().map(|entry| entry.mv().end.to_string()).collect();
        assert_eq!(ends, ["a3", "c3"]);
    }
}
