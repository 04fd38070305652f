//! Crate root module declarations for the gambit chess rules engine.
//!
//! Exposes the game-state model, Zobrist hashing, per-piece move generation,
//! legality/apply/undo, the session engine, and text utilities so tests,
//! benches, and callers can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod history;
}

pub mod hashing {
    pub mod zobrist;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod move_builder;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
    pub mod sliding_rays;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_validator;
    pub mod move_cache;
    pub mod move_dispatch;
    pub mod move_simulator;
    pub mod perft;
}

pub mod engine {
    pub mod engine;
    pub mod engine_config;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod move_text;
}

pub use engine::engine::Engine;
pub use engine::engine_config::EngineConfig;
pub use errors::{RulesError, RulesResult};
