//! Value types shared by every layer of the rules engine.

use std::fmt;

use crate::errors::{RulesError, RulesResult};

/// Side to move / owner of a figure. `Light` is white, `Dark` is black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank delta of a pawn step for this color.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Rank holding this color's king and rooks at the start of the game.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lower-case letter used in FEN and move text.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A board square as `(file, rank)`, both in `0..=7`. `a1 == (0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    pub fn new(file: u8, rank: u8) -> RulesResult<Self> {
        if file > 7 || rank > 7 {
            return Err(RulesError::malformed(
                "position",
                format!("({file}, {rank}) is off the board"),
            ));
        }
        Ok(Self { file, rank })
    }

    /// Build from a `0..=63` square index (`rank * 8 + file`).
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self {
            file: index % 8,
            rank: (index / 8) % 8,
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn index(self) -> usize {
        (self.rank as usize) * 8 + self.file as usize
    }

    /// Step by a delta, returning `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

/// Origin and destination of a single figure's relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Position,
    pub end: Position,
}

impl Move {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Set of history-entry kinds a generator should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveKinds(u8);

impl MoveKinds {
    pub const MOVE: MoveKinds = MoveKinds(1 << 0);
    pub const ATTACK_MOVE: MoveKinds = MoveKinds(1 << 1);
    pub const CASTLING: MoveKinds = MoveKinds(1 << 2);
    pub const EN_PASSANT: MoveKinds = MoveKinds(1 << 3);
    pub const ALL: MoveKinds = MoveKinds(0x0F);

    #[inline]
    pub const fn union(self, other: MoveKinds) -> MoveKinds {
        MoveKinds(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: MoveKinds) -> bool {
        (self.0 & other.0) == other.0
    }

    /// `None` in a query means every kind.
    #[inline]
    pub fn allows(kinds: Option<MoveKinds>, kind: MoveKinds) -> bool {
        kinds.unwrap_or(MoveKinds::ALL).contains(kind)
    }
}

impl std::ops::BitOr for MoveKinds {
    type Output = MoveKinds;

    fn bitor(self, rhs: MoveKinds) -> MoveKinds {
        self.union(rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastlingSide::KingSide => 0,
            CastlingSide::QueenSide => 1,
        }
    }

    /// File of the rook that castles on this side.
    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        }
    }

    #[inline]
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastlingSide::KingSide => 6,
            CastlingSide::QueenSide => 2,
        }
    }

    #[inline]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastlingSide::KingSide => 5,
            CastlingSide::QueenSide => 3,
        }
    }
}

/// Castling-rights matrix, `[color][side]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights([[bool; 2]; 2]);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights([[false; 2]; 2]);

    #[inline]
    pub const fn get(self, color: Color, side: CastlingSide) -> bool {
        self.0[color.index()][side.index()]
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastlingSide, value: bool) {
        self.0[color.index()][side.index()] = value;
    }

    /// Bit index of a right inside the four-key castling table.
    #[inline]
    pub const fn bit(color: Color, side: CastlingSide) -> usize {
        color.index() * 2 + side.index()
    }
}
