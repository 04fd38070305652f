//! Board occupancy and the figure arena.
//!
//! Figures are stored once in a `FigureArena` and addressed by `FigureId`.
//! The board and the move history only hold ids, so a figure keeps its
//! identity when it is relocated, promoted, or captured and later restored.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::chess_types::{Color, PieceKind, Position};

/// Stable identity of a figure for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureId(u32);

impl FigureId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece: color is fixed, kind changes only on promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Figure {
    pub color: Color,
    pub kind: PieceKind,
}

impl Figure {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigureArena {
    figures: Vec<Figure>,
}

impl FigureArena {
    pub fn add(&mut self, figure: Figure) -> FigureId {
        let id = FigureId(self.figures.len() as u32);
        self.figures.push(figure);
        id
    }

    #[inline]
    pub fn get(&self, id: FigureId) -> Option<Figure> {
        self.figures.get(id.index()).copied()
    }

    /// Like `get`, but a dangling id is an internal defect.
    pub fn require(&self, id: FigureId) -> RulesResult<Figure> {
        self.get(id)
            .ok_or_else(|| RulesError::invariant(format!("figure {id:?} is not in the arena")))
    }

    pub fn set_kind(&mut self, id: FigureId, kind: PieceKind) -> RulesResult<()> {
        let figure = self
            .figures
            .get_mut(id.index())
            .ok_or_else(|| RulesError::invariant(format!("figure {id:?} is not in the arena")))?;
        figure.kind = kind;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

/// 8×8 grid of optional figure ids, indexed `rank * 8 + file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<FigureId>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self { cells: [None; 64] }
    }
}

impl Board {
    #[inline]
    pub fn get(&self, position: Position) -> Option<FigureId> {
        self.cells[position.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.cells[position.index()].is_none()
    }

    pub fn place(&mut self, position: Position, id: FigureId) -> RulesResult<()> {
        let cell = &mut self.cells[position.index()];
        if let Some(existing) = cell {
            return Err(RulesError::invariant(format!(
                "cannot place {id:?} on {position}: already holds {existing:?}"
            )));
        }
        *cell = Some(id);
        Ok(())
    }

    #[inline]
    pub fn remove(&mut self, position: Position) -> Option<FigureId> {
        self.cells[position.index()].take()
    }

    /// Move whatever stands on `from` to the empty square `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> RulesResult<FigureId> {
        let id = self
            .remove(from)
            .ok_or_else(|| RulesError::invariant(format!("no figure on {from} to relocate")))?;
        if let Err(err) = self.place(to, id) {
            self.cells[from.index()] = Some(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Identity scan for a figure's current square.
    pub fn find(&self, id: FigureId) -> Option<Position> {
        self.cells
            .iter()
            .position(|cell| *cell == Some(id))
            .map(|index| Position::from_index(index as u8))
    }

    /// Occupied squares in index order (a1, b1, ..., h8).
    pub fn occupied(&self) -> impl Iterator<Item = (Position, FigureId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|id| (Position::from_index(index as u8), id)))
    }
}
