//! FEN-to-GameState parser.
//!
//! Builds a fully-populated state from a Forsyth-Edwards Notation string.
//! Each of the six fields fails with its own `MalformedInput` field name.
//!
//! Castling rights and the en-passant file are derived from history in this
//! crate, so the imported fields are turned into facts the derivation can
//! see: a rook (or king) whose right is absent is recorded as already moved,
//! and the en-passant file seeds the double-push lookup while the history is
//! still empty.

use crate::errors::{RulesError, RulesResult};
use crate::game_state::board::Figure;
use crate::game_state::chess_rules::KING_START_FILE;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::hashing::zobrist::ensure_hash;
use crate::utils::algebraic::algebraic_to_position;

pub fn parse_fen(fen: &str) -> RulesResult<GameState> {
    let mut parts = fen.split_whitespace();
    let mut next_field = |field: &'static str| {
        parts
            .next()
            .ok_or_else(|| RulesError::malformed(field, "missing field"))
    };

    let board_part = next_field("piece placement")?;
    let side_part = next_field("side to move")?;
    let castling_part = next_field("castling rights")?;
    let en_passant_part = next_field("en passant")?;
    let halfmove_part = next_field("half-move clock")?;
    let fullmove_part = next_field("full-move counter")?;

    if parts.next().is_some() {
        return Err(RulesError::malformed("fen", "extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    apply_castling_field(castling_part, &mut game_state)?;
    game_state.setup_en_passant_file = parse_en_passant(en_passant_part, &game_state)?;
    game_state.half_move_clock = halfmove_part.parse::<u16>().map_err(|_| {
        RulesError::malformed("half-move clock", format!("not a number: {halfmove_part}"))
    })?;
    game_state.full_move_counter = fullmove_part.parse::<u16>().map_err(|_| {
        RulesError::malformed("full-move counter", format!("not a number: {fullmove_part}"))
    })?;

    game_state.refresh_derived_flags();
    ensure_hash(&mut game_state);
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> RulesResult<()> {
    const FIELD: &str = "piece placement";

    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(RulesError::malformed(
            FIELD,
            format!("expected 8 ranks, got {}", ranks.len()),
        ));
    }

    let mut kings = [0u8; 2];
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(RulesError::malformed(
                        FIELD,
                        format!("invalid empty-square count '{ch}'"),
                    ));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(RulesError::malformed(
                        FIELD,
                        format!("rank {} has more than 8 files", rank + 1),
                    ));
                }
                continue;
            }

            let figure = figure_from_fen_char(ch).ok_or_else(|| {
                RulesError::malformed(FIELD, format!("invalid piece character '{ch}'"))
            })?;
            if file >= 8 {
                return Err(RulesError::malformed(
                    FIELD,
                    format!("rank {} has more than 8 files", rank + 1),
                ));
            }
            if figure.kind == PieceKind::Pawn && (rank == 0 || rank == 7) {
                return Err(RulesError::malformed(
                    FIELD,
                    format!("pawn on back rank {}", rank + 1),
                ));
            }
            if figure.kind == PieceKind::King {
                kings[figure.color.index()] += 1;
            }

            game_state.add_figure(Position::new(file, rank)?, figure)?;
            file += 1;
        }

        if file != 8 {
            return Err(RulesError::malformed(
                FIELD,
                format!("rank {} covers {file} files instead of 8", rank + 1),
            ));
        }
    }

    if kings.iter().any(|count| *count > 1) {
        return Err(RulesError::malformed(FIELD, "more than one king per side"));
    }
    Ok(())
}

fn parse_side_to_move(side_part: &str) -> RulesResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(RulesError::malformed(
            "side to move",
            format!("expected 'w' or 'b', got {side_part:?}"),
        )),
    }
}

/// Check the castling field against the placement, then mark the figures
/// whose rights are absent as already moved.
fn apply_castling_field(castling_part: &str, game_state: &mut GameState) -> RulesResult<()> {
    const FIELD: &str = "castling rights";

    let mut claimed = CastlingRights::NONE;
    if castling_part != "-" {
        for ch in castling_part.chars() {
            let (color, side) = match ch {
                'K' => (Color::Light, CastlingSide::KingSide),
                'Q' => (Color::Light, CastlingSide::QueenSide),
                'k' => (Color::Dark, CastlingSide::KingSide),
                'q' => (Color::Dark, CastlingSide::QueenSide),
                _ => {
                    return Err(RulesError::malformed(
                        FIELD,
                        format!("invalid character '{ch}'"),
                    ))
                }
            };
            if claimed.get(color, side) {
                return Err(RulesError::malformed(FIELD, format!("duplicate '{ch}'")));
            }
            if !game_state.castling_available(color, side) {
                return Err(RulesError::malformed(
                    FIELD,
                    format!("'{ch}' needs king and rook on their original squares"),
                ));
            }
            claimed.set(color, side, true);
        }
    }

    for color in [Color::Light, Color::Dark] {
        let home = color.home_rank() * 8;
        let mut any_right = false;
        for side in CastlingSide::BOTH {
            if claimed.get(color, side) {
                any_right = true;
                continue;
            }
            let corner = Position::from_index(home + side.rook_file());
            mark_moved_if(game_state, corner, color, PieceKind::Rook);
        }
        if !any_right {
            let king_home = Position::from_index(home + KING_START_FILE);
            mark_moved_if(game_state, king_home, color, PieceKind::King);
        }
    }
    Ok(())
}

fn mark_moved_if(game_state: &mut GameState, position: Position, color: Color, kind: PieceKind) {
    if let Some((id, figure)) = game_state.figure_at(position) {
        if figure.color == color && figure.kind == kind && !game_state.moved_before_setup.contains(&id)
        {
            game_state.moved_before_setup.push(id);
        }
    }
}

/// The target square must sit behind an enemy pawn that could just have
/// double-pushed.
fn parse_en_passant(en_passant_part: &str, game_state: &GameState) -> RulesResult<Option<u8>> {
    const FIELD: &str = "en passant";

    if en_passant_part == "-" {
        return Ok(None);
    }

    let target = algebraic_to_position(en_passant_part)
        .map_err(|err| RulesError::malformed(FIELD, err.to_string()))?;
    let mover = game_state.side_to_move;
    let pushed = mover.opposite();

    // Light to move captures onto rank 6, Dark onto rank 3.
    let expected_rank = pushed.pawn_start_rank() as i8 + pushed.forward();
    if target.rank() as i8 != expected_rank {
        return Err(RulesError::malformed(
            FIELD,
            format!("{target} is not on the en-passant rank for the side to move"),
        ));
    }
    if !game_state.board.is_empty_at(target) {
        return Err(RulesError::malformed(FIELD, format!("{target} is occupied")));
    }
    let has_pushed_pawn = target
        .offset(0, pushed.forward())
        .and_then(|landing| game_state.figure_at(landing))
        .is_some_and(|(_, figure)| figure.color == pushed && figure.kind == PieceKind::Pawn);
    if !has_pushed_pawn {
        return Err(RulesError::malformed(
            FIELD,
            format!("no pawn could have double-pushed past {target}"),
        ));
    }

    Ok(Some(target.file()))
}

fn figure_from_fen_char(ch: char) -> Option<Figure> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|kind| Figure::new(color, kind))
}
