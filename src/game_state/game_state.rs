//! Core game state representation.
//!
//! `GameState` aggregates the board, the figure arena, the move history, the
//! Zobrist hash, and the derived rule flags (castling rights, en-passant
//! file). It is mutated only through `legal_move_apply::{apply_move,
//! undo_last_move}` and cloned by value for move simulation.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::board::{Board, Figure, FigureArena, FigureId};
use crate::game_state::chess_rules::{BACK_RANK, KING_START_FILE, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::game_state::history::HistoryEntry;
use crate::hashing::zobrist::ensure_hash;
use crate::utils::fen_parser::parse_fen;

/// One figure to put on the board when building a custom setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub figure: Figure,
}

impl Placement {
    pub const fn new(position: Position, color: Color, kind: PieceKind) -> Self {
        Self {
            position,
            figure: Figure::new(color, kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub figures: FigureArena,
    pub history: Vec<HistoryEntry>,

    // `None` until computed; zero is a valid hash.
    pub hash: Option<u64>,

    // Derived from board + history, recomputed on every apply/undo.
    pub castling_rights: CastlingRights,
    pub en_passant_file: Option<u8>,

    pub half_move_clock: u16,
    pub full_move_counter: u16,
    pub side_to_move: Color,

    // Facts carried over from an imported position description.
    pub moved_before_setup: Vec<FigureId>,
    pub setup_en_passant_file: Option<u8>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::default(),
            figures: FigureArena::default(),
            history: Vec::new(),
            hash: None,
            castling_rights: CastlingRights::NONE,
            en_passant_file: None,
            half_move_clock: 0,
            full_move_counter: 1,
            side_to_move: Color::Light,
            moved_before_setup: Vec::new(),
            setup_en_passant_file: None,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        parse_fen(fen)
    }

    /// Standard starting layout as a placement list.
    pub fn standard_placements() -> Vec<Placement> {
        let mut out = Vec::with_capacity(32);
        for color in [Color::Light, Color::Dark] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                out.push(Placement::new(
                    Position::from_index(color.home_rank() * 8 + file as u8),
                    color,
                    *kind,
                ));
            }
            for file in 0..8u8 {
                out.push(Placement::new(
                    Position::from_index(color.pawn_start_rank() * 8 + file),
                    color,
                    PieceKind::Pawn,
                ));
            }
        }
        out
    }

    /// Build a fresh position from a placement list. Every figure counts as
    /// never moved, so castling rights follow from where kings and rooks stand.
    pub fn from_placements(placements: &[Placement], side_to_move: Color) -> RulesResult<Self> {
        let mut state = Self::new_empty();
        for placement in placements {
            state.add_figure(placement.position, placement.figure)?;
        }
        state.side_to_move = side_to_move;
        state.refresh_derived_flags();
        ensure_hash(&mut state);
        Ok(state)
    }

    /// Register a new figure and put it on `position`.
    pub fn add_figure(&mut self, position: Position, figure: Figure) -> RulesResult<FigureId> {
        let id = self.figures.add(figure);
        self.board.place(position, id)?;
        Ok(id)
    }

    #[inline]
    pub fn figure_at(&self, position: Position) -> Option<(FigureId, Figure)> {
        let id = self.board.get(position)?;
        self.figures.get(id).map(|figure| (id, figure))
    }

    #[inline]
    pub fn hash(&self) -> Option<u64> {
        self.hash
    }

    /// Hash of a state that is about to be mutated or used as a cache key.
    /// A missing hash is an invariant violation.
    #[inline]
    pub fn require_hash(&self) -> RulesResult<u64> {
        self.hash
            .ok_or_else(|| RulesError::invariant("game state has no hash"))
    }

    /// A figure has moved if any history entry relocated it, or the imported
    /// position said so.
    pub fn has_moved(&self, id: FigureId) -> bool {
        self.moved_before_setup.contains(&id)
            || self.history.iter().any(|entry| entry.moves_figure(id))
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.board.occupied().find_map(|(position, id)| {
            let figure = self.figures.get(id)?;
            (figure.color == color && figure.kind == PieceKind::King).then_some(position)
        })
    }

    /// Landing square of a pawn that double-pushed on the previous move.
    ///
    /// With an empty history this falls back to the en-passant file of the
    /// imported position; the pawn then sits on the fifth rank from the
    /// perspective of the side to move.
    pub fn last_double_push(&self) -> Option<Position> {
        match self.history.last() {
            Some(HistoryEntry::Move(record)) => {
                let figure = self.figures.get(record.figure)?;
                let rank_delta = record.mv.end.rank().abs_diff(record.mv.start.rank());
                (figure.kind == PieceKind::Pawn && rank_delta == 2).then_some(record.mv.end)
            }
            Some(_) => None,
            None => {
                let file = self.setup_en_passant_file?;
                let rank = match self.side_to_move {
                    Color::Light => 4,
                    Color::Dark => 3,
                };
                Some(Position::from_index(rank * 8 + file))
            }
        }
    }

    pub fn derive_en_passant_file(&self) -> Option<u8> {
        self.last_double_push().map(Position::file)
    }

    /// King and same-side rook on their original squares, neither ever moved.
    pub fn castling_available(&self, color: Color, side: CastlingSide) -> bool {
        let home = color.home_rank() * 8;
        let king_square = Position::from_index(home + KING_START_FILE);
        let rook_square = Position::from_index(home + side.rook_file());
        self.is_unmoved(king_square, color, PieceKind::King)
            && self.is_unmoved(rook_square, color, PieceKind::Rook)
    }

    fn is_unmoved(&self, position: Position, color: Color, kind: PieceKind) -> bool {
        match self.figure_at(position) {
            Some((id, figure)) => {
                figure.color == color && figure.kind == kind && !self.has_moved(id)
            }
            None => false,
        }
    }

    pub fn derive_castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for color in [Color::Light, Color::Dark] {
            for side in CastlingSide::BOTH {
                rights.set(color, side, self.castling_available(color, side));
            }
        }
        rights
    }

    /// Recompute castling rights and en-passant file from board and history.
    /// Does not touch the hash.
    pub fn refresh_derived_flags(&mut self) {
        self.castling_rights = self.derive_castling_rights();
        self.en_passant_file = self.derive_en_passant_file();
    }
}
