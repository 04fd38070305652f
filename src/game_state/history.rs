//! Move-history records.
//!
//! A `HistoryEntry` is both a candidate move (as produced by the generators)
//! and, once applied, the undo record for it. Every variant carries a
//! `MoveRecord`; castling and en passant add the extra squares/figures their
//! undo needs.

use std::fmt;

use crate::game_state::board::{Board, FigureId};
use crate::game_state::chess_types::{Color, Move, MoveKinds, PieceKind, Position};

/// Fields common to every kind of history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Color,
    pub figure: FigureId,
    pub mv: Move,
    pub captured: Option<FigureId>,
    /// Target kind when this move promotes a pawn.
    pub promotion: Option<PieceKind>,
    /// Board as it stood before the move.
    pub board_before: Board,
    pub prev_half_move_clock: u16,
    pub prev_full_move_counter: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// Relocation onto an empty square.
    Move(MoveRecord),
    /// Capture on the destination square.
    AttackMove(MoveRecord),
    EnPassant {
        record: MoveRecord,
        /// Square of the captured pawn (beside the mover, not the destination).
        captured_square: Position,
    },
    /// `record` describes the king; the rook travels separately.
    Castling {
        record: MoveRecord,
        rook: FigureId,
        rook_move: Move,
    },
}

impl HistoryEntry {
    #[inline]
    pub fn record(&self) -> &MoveRecord {
        match self {
            HistoryEntry::Move(record) | HistoryEntry::AttackMove(record) => record,
            HistoryEntry::EnPassant { record, .. } | HistoryEntry::Castling { record, .. } => {
                record
            }
        }
    }

    #[inline]
    pub fn record_mut(&mut self) -> &mut MoveRecord {
        match self {
            HistoryEntry::Move(record) | HistoryEntry::AttackMove(record) => record,
            HistoryEntry::EnPassant { record, .. } | HistoryEntry::Castling { record, .. } => {
                record
            }
        }
    }

    pub fn kind(&self) -> MoveKinds {
        match self {
            HistoryEntry::Move(_) => MoveKinds::MOVE,
            HistoryEntry::AttackMove(_) => MoveKinds::ATTACK_MOVE,
            HistoryEntry::EnPassant { .. } => MoveKinds::EN_PASSANT,
            HistoryEntry::Castling { .. } => MoveKinds::CASTLING,
        }
    }

    #[inline]
    pub fn mv(&self) -> Move {
        self.record().mv
    }

    #[inline]
    pub fn player(&self) -> Color {
        self.record().player
    }

    #[inline]
    pub fn figure(&self) -> FigureId {
        self.record().figure
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.record().promotion
    }

    /// Square the captured figure stood on, if this entry captures.
    pub fn capture_square(&self) -> Option<Position> {
        match self {
            HistoryEntry::Move(_) | HistoryEntry::Castling { .. } => None,
            HistoryEntry::AttackMove(record) => record.captured.map(|_| record.mv.end),
            HistoryEntry::EnPassant {
                captured_square, ..
            } => Some(*captured_square),
        }
    }

    /// True if `id` is relocated by this entry (the castling rook included).
    pub fn moves_figure(&self, id: FigureId) -> bool {
        match self {
            HistoryEntry::Castling { record, rook, .. } => record.figure == id || *rook == id,
            _ => self.figure() == id,
        }
    }

    /// Compare two entries as moves, ignoring the snapshot and clock fields
    /// that are stamped when the entry is applied.
    pub fn same_move(&self, other: &HistoryEntry) -> bool {
        let (a, b) = (self.record(), other.record());
        let extras_match = match (self, other) {
            (HistoryEntry::Move(_), HistoryEntry::Move(_))
            | (HistoryEntry::AttackMove(_), HistoryEntry::AttackMove(_)) => true,
            (
                HistoryEntry::EnPassant {
                    captured_square: sa,
                    ..
                },
                HistoryEntry::EnPassant {
                    captured_square: sb,
                    ..
                },
            ) => sa == sb,
            (
                HistoryEntry::Castling {
                    rook: ra,
                    rook_move: ma,
                    ..
                },
                HistoryEntry::Castling {
                    rook: rb,
                    rook_move: mb,
                    ..
                },
            ) => ra == rb && ma == mb,
            _ => false,
        };
        extras_match
            && a.player == b.player
            && a.figure == b.figure
            && a.mv == b.mv
            && a.captured == b.captured
            && a.promotion == b.promotion
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv())?;
        if let Some(kind) = self.promotion() {
            write!(f, "={}", kind.letter())?;
        }
        Ok(())
    }
}
