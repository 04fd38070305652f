//! Routes pseudo-legal generation to the per-piece generators.

use crate::errors::RulesResult;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::move_generation::move_cache::{CacheKey, CacheTable, MoveCache};
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::queen_moves::generate_queen_moves;
use crate::moves::rook_moves::generate_rook_moves;

/// Pseudo-legal candidates for the figure on `from` (empty for an empty
/// square), restricted to `kinds` when given.
pub fn generate_pseudo_legal_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
) -> Vec<HistoryEntry> {
    let mut out = Vec::with_capacity(32);
    let Some((_, figure)) = game_state.figure_at(from) else {
        return out;
    };

    match figure.kind {
        PieceKind::Pawn => generate_pawn_moves(game_state, from, kinds, &mut out),
        PieceKind::Knight => generate_knight_moves(game_state, from, kinds, &mut out),
        PieceKind::Bishop => generate_bishop_moves(game_state, from, kinds, &mut out),
        PieceKind::Rook => generate_rook_moves(game_state, from, kinds, &mut out),
        PieceKind::Queen => generate_queen_moves(game_state, from, kinds, &mut out),
        PieceKind::King => generate_king_moves(game_state, from, kinds, &mut out),
    }

    out
}

/// Cached variant of `generate_pseudo_legal_moves`.
pub fn pseudo_legal_moves(
    game_state: &GameState,
    from: Position,
    kinds: Option<MoveKinds>,
    cache: &mut MoveCache,
) -> RulesResult<Vec<HistoryEntry>> {
    let key = CacheKey::new(game_state.require_hash()?, from, kinds);
    cache.get_or_compute(CacheTable::PseudoLegal, key, |_| {
        Ok(generate_pseudo_legal_moves(game_state, from, kinds))
    })
}

#[cfg(test)]
mod tests {
    use super::{generate_pseudo_legal_moves, pseudo_legal_moves};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_cache::{CacheTable, MoveCache};
    use crate::utils::algebraic::algebraic_to_position;

    #[test]
    fn empty_square_has_no_moves() {
        let game = GameState::new_game();
        let e4 = algebraic_to_position("e4").expect("e4 should parse");
        assert!(generate_pseudo_legal_moves(&game, e4, None).is_empty());
    }

    #[test]
    fn cached_generation_matches_direct_generation() {
        let game = GameState::new_game();
        let mut cache = MoveCache::new();
        let g1 = algebraic_to_position("g1").expect("g1 should parse");

        let direct = generate_pseudo_legal_moves(&game, g1, None);
        let cached = pseudo_legal_moves(&game, g1, None, &mut cache).expect("hash is present");
        let again = pseudo_legal_moves(&game, g1, None, &mut cache).expect("hash is present");

        assert_eq!(direct, cached);
        assert_eq!(cached, again);
        assert_eq!(cache.len(CacheTable::PseudoLegal), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn missing_hash_is_an_invariant_violation() {
        let mut game = GameState::new_game();
        game.hash = None;
        let mut cache = MoveCache::new();
        let g1 = algebraic_to_position("g1").expect("g1 should parse");
        assert!(pseudo_legal_moves(&game, g1, None, &mut cache).is_err());
    }
}
