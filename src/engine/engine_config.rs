//! Session configuration.

use crate::game_state::chess_types::PieceKind;

pub const MOVE_CACHE_ENV: &str = "GAMBIT_MOVE_CACHE";
pub const DEFAULT_PROMOTION_ENV: &str = "GAMBIT_DEFAULT_PROMOTION";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Memoize legal and pseudo-legal moves per position hash.
    pub move_cache: bool,
    /// Kind chosen by coordinate application when a promotion is not named.
    pub default_promotion: PieceKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_cache: true,
            default_promotion: PieceKind::Queen,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `GAMBIT_MOVE_CACHE` and
    /// `GAMBIT_DEFAULT_PROMOTION`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(MOVE_CACHE_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "off" | "no" => config.move_cache = false,
                "1" | "true" | "on" | "yes" => config.move_cache = true,
                _ => {}
            }
        }

        if let Some(value) = lookup(DEFAULT_PROMOTION_ENV) {
            let mut chars = value.trim().chars();
            if let (Some(letter), None) = (chars.next(), chars.next()) {
                if let Some(
                    kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight),
                ) = PieceKind::from_letter(letter)
                {
                    config.default_promotion = kind;
                }
            }
        }

        config
    }
}
