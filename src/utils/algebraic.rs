//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and `Position`
//! values reused by FEN import and move text parsing.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::chess_types::Position;

const FIELD: &str = "algebraic square";

/// Convert algebraic notation (for example: "e4") to a position.
#[inline]
pub fn algebraic_to_position(square: &str) -> RulesResult<Position> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(RulesError::malformed(
            FIELD,
            format!("expected two characters, got {square:?}"),
        ));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(RulesError::malformed(
            FIELD,
            format!("invalid file {:?}", file as char),
        ));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(RulesError::malformed(
            FIELD,
            format!("invalid rank {:?}", rank as char),
        ));
    }

    Position::new(file - b'a', rank - b'1')
}

/// Convert a position to algebraic notation (for example: "e4").
#[inline]
pub fn position_to_algebraic(position: Position) -> String {
    let file_char = char::from(b'a' + position.file());
    let rank_char = char::from(b'1' + position.rank());
    format!("{file_char}{rank_char}")
}
