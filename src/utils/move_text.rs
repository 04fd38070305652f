//! Coordinate move text such as `e2-e4`, `e2e4`, `d5xe6` or `e7-e8=q`.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::chess_types::{Move, PieceKind};
use crate::utils::algebraic::algebraic_to_position;

const FIELD: &str = "move text";

/// Parse two squares joined by `-`, `x`, whitespace or nothing, followed by
/// an optional promotion letter (itself optionally prefixed by `=`).
pub fn parse_move_text(text: &str) -> RulesResult<(Move, Option<PieceKind>)> {
    let text = text.trim();
    if !text.is_ascii() {
        return Err(RulesError::malformed(FIELD, format!("non-ASCII text {text:?}")));
    }
    if text.len() < 4 {
        return Err(RulesError::malformed(FIELD, format!("too short: {text:?}")));
    }

    let start = algebraic_to_position(&text[0..2])?;

    let rest = text[2..].trim_start();
    let rest = rest
        .strip_prefix(['-', 'x', 'X'])
        .unwrap_or(rest)
        .trim_start();
    if rest.len() < 2 {
        return Err(RulesError::malformed(
            FIELD,
            format!("missing destination in {text:?}"),
        ));
    }
    let end = algebraic_to_position(&rest[0..2])?;

    let suffix = &rest[2..];
    let suffix = suffix.strip_prefix('=').unwrap_or(suffix);
    let promotion = match suffix.chars().collect::<Vec<_>>().as_slice() {
        [] => None,
        [letter] => match PieceKind::from_letter(*letter) {
            Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
                Some(kind)
            }
            _ => {
                return Err(RulesError::malformed(
                    FIELD,
                    format!("invalid promotion letter '{letter}'"),
                ))
            }
        },
        _ => {
            return Err(RulesError::malformed(
                FIELD,
                format!("unexpected trailing text {suffix:?}"),
            ))
        }
    };

    Ok((Move::new(start, end), promotion))
}
