//! Precomputed per-direction rays for the sliding pieces.
//!
//! Each ray lists up to seven squares in walking order from the origin to the
//! board edge. Generators walk them until they hit a figure.

use crate::game_state::board::{Figure, FigureId};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::history::HistoryEntry;
use crate::moves::move_builder::{push_step, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    squares: [u8; 7],
    len: u8,
}

impl Ray {
    const EMPTY: Ray = Ray {
        squares: [0; 7],
        len: 0,
    };

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn squares(&self) -> impl Iterator<Item = Position> + '_ {
        self.squares[..self.len()]
            .iter()
            .map(|index| Position::from_index(*index))
    }
}

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

pub const ROOK_RAYS: [[Ray; 4]; 64] = generate_rays(ROOK_DIRECTIONS);
pub const BISHOP_RAYS: [[Ray; 4]; 64] = generate_rays(BISHOP_DIRECTIONS);

const fn generate_rays(directions: [(i8, i8); 4]) -> [[Ray; 4]; 64] {
    let mut table = [[Ray::EMPTY; 4]; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut dir = 0usize;
        while dir < 4 {
            table[sq][dir] = trace_ray_const(sq as i8, directions[dir].0, directions[dir].1);
            dir += 1;
        }
        sq += 1;
    }

    table
}

const fn trace_ray_const(square: i8, file_step: i8, rank_step: i8) -> Ray {
    let mut ray = Ray::EMPTY;
    let mut file = (square % 8) + file_step;
    let mut rank = (square / 8) + rank_step;

    while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
        ray.squares[ray.len as usize] = (rank * 8 + file) as u8;
        ray.len += 1;
        file += file_step;
        rank += rank_step;
    }

    ray
}

/// Walk every ray from `from` in order, stopping before friendly pieces and
/// right after a capture.
pub fn generate_sliding_moves(
    game_state: &GameState,
    mover: (FigureId, Figure),
    from: Position,
    rays: &[Ray],
    kinds: Option<MoveKinds>,
    out: &mut Vec<HistoryEntry>,
) {
    for ray in rays {
        for to in ray.squares() {
            if push_step(game_state, mover, from, to, kinds, out) != StepOutcome::Empty {
                break;
            }
        }
    }
}
