//! Rules-engine session.
//!
//! An `Engine` owns one `GameState` and the move cache that belongs to it.
//! Every query goes through the cache; every successful apply or undo
//! flushes it. Mutations validate first and commit afterwards, so a rejected
//! move leaves the session unchanged.

use tracing::{debug, error, warn};

use crate::engine::engine_config::EngineConfig;
use crate::errors::{RulesError, RulesResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, Placement};
use crate::game_state::history::HistoryEntry;
use crate::move_generation::legal_move_apply;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_validator::{self, validate_move};
use crate::move_generation::move_cache::{CacheStats, MoveCache};
use crate::utils::move_text::parse_move_text;

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    cache: MoveCache,
}

impl Engine {
    /// Start a session from a setup. `None` falls back to the standard
    /// layout and Light to move.
    pub fn init_game(
        config: EngineConfig,
        setup: Option<&[Placement]>,
        side_to_move: Option<Color>,
    ) -> RulesResult<Self> {
        let standard;
        let setup = match setup {
            Some(setup) => setup,
            None => {
                standard = GameState::standard_placements();
                standard.as_slice()
            }
        };
        let state = GameState::from_placements(setup, side_to_move.unwrap_or(Color::Light))?;
        Ok(Self::with_state(config, state))
    }

    /// Start a session from the standard opening position.
    pub fn new_game(config: EngineConfig) -> Self {
        Self::with_state(config, GameState::new_game())
    }

    pub fn from_fen(config: EngineConfig, fen: &str) -> RulesResult<Self> {
        let state = GameState::from_fen(fen)?;
        Ok(Self::with_state(config, state))
    }

    fn with_state(config: EngineConfig, state: GameState) -> Self {
        debug!(
            figures = state.figures.len(),
            side_to_move = ?state.side_to_move,
            hash = ?state.hash,
            cache = config.move_cache,
            "engine session initialised"
        );
        Self {
            config,
            state,
            cache: MoveCache::with_enabled(config.move_cache),
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    #[inline]
    pub fn hash(&self) -> Option<u64> {
        self.state.hash
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    #[inline]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn legal_moves(&mut self, position: Position) -> RulesResult<Vec<HistoryEntry>> {
        legal_move_validator::legal_moves(&self.state, position, None, &mut self.cache)
    }

    pub fn legal_moves_of_kinds(
        &mut self,
        position: Position,
        kinds: MoveKinds,
    ) -> RulesResult<Vec<HistoryEntry>> {
        legal_move_validator::legal_moves(&self.state, position, Some(kinds), &mut self.cache)
    }

    /// Legal moves of every figure of the side to move.
    pub fn all_legal_moves(&mut self) -> RulesResult<Vec<HistoryEntry>> {
        legal_move_validator::all_legal_moves(&self.state, &mut self.cache)
    }

    pub fn is_in_check(&mut self) -> RulesResult<bool> {
        is_king_in_check(&self.state, self.state.side_to_move, &mut self.cache)
    }

    /// Validate and apply `entry`. Illegal entries are rejected with
    /// `IllegalMove` and the session is left untouched.
    pub fn apply_move(&mut self, entry: HistoryEntry) -> RulesResult<()> {
        let legal = validate_move(&self.state, &entry, &mut self.cache).inspect_err(|err| {
            error!(%err, mv = %entry, "validation failed");
        })?;
        if !legal {
            warn!(%entry, side_to_move = ?self.state.side_to_move, "rejected illegal move");
            return Err(RulesError::IllegalMove(entry.to_string()));
        }

        let description = entry.to_string();
        if let Err(err) = legal_move_apply::apply_move(&mut self.state, entry) {
            error!(%err, mv = %description, "apply failed");
            return Err(err);
        }
        self.cache.flush();

        debug!(
            mv = %description,
            hash = ?self.state.hash,
            side_to_move = ?self.state.side_to_move,
            "applied move"
        );
        Ok(())
    }

    /// Undo the most recent move. `Ok(false)` when there is nothing to undo;
    /// a corrupted state surfaces as an invariant violation.
    pub fn try_undo_last_move(&mut self) -> RulesResult<bool> {
        let undone = legal_move_apply::undo_last_move(&mut self.state)
            .inspect_err(|err| error!(%err, "undo failed"))?;
        let Some(entry) = undone else {
            return Ok(false);
        };
        self.cache.flush();
        debug!(mv = %entry, hash = ?self.state.hash, "undid move");
        Ok(true)
    }

    /// Undo the most recent move. `false` when nothing was undone.
    ///
    /// Invariant violations are logged and folded into `false`; use
    /// [`Engine::try_undo_last_move`] to tell them apart from an empty
    /// history.
    pub fn undo_last_move(&mut self) -> bool {
        self.try_undo_last_move().unwrap_or(false)
    }

    /// Strict coordinate application. Returns the applied history entry.
    ///
    /// A promoting move without a named kind promotes to the configured
    /// default; naming a kind for a move that does not promote is illegal.
    pub fn apply_coordinates(
        &mut self,
        mv: Move,
        promotion: Option<PieceKind>,
    ) -> RulesResult<HistoryEntry> {
        let candidates = self.legal_moves(mv.start)?;
        let wanted = promotion.unwrap_or(self.config.default_promotion);
        let Some(entry) = candidates.into_iter().find(|entry| {
            entry.mv().end == mv.end
                && match entry.promotion() {
                    Some(kind) => kind == wanted,
                    None => promotion.is_none(),
                }
        }) else {
            warn!(%mv, ?promotion, "no legal move matches coordinates");
            return Err(RulesError::IllegalMove(mv.to_string()));
        };

        self.apply_move(entry)?;
        self.state
            .history
            .last()
            .cloned()
            .ok_or_else(|| RulesError::invariant("history is empty after apply"))
    }

    /// Permissive coordinate application: any failure is reported as `false`.
    pub fn try_apply_coordinates(&mut self, mv: Move, promotion: Option<PieceKind>) -> bool {
        self.apply_coordinates(mv, promotion).is_ok()
    }

    /// Strict application of move text such as `e2-e4` or `e7e8=n`.
    pub fn apply_move_text(&mut self, text: &str) -> RulesResult<HistoryEntry> {
        let (mv, promotion) = parse_move_text(text)?;
        self.apply_coordinates(mv, promotion)
    }
}

#[cfg(test)]
mod tests {
    use super::Engine;
    use crate::engine::engine_config::EngineConfig;
    use crate::errors::RulesError;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::{GameState, Placement};
    use crate::game_state::history::HistoryEntry;
    use crate::hashing::zobrist::compute_hash;
    use crate::utils::algebraic::algebraic_to_position;
    use crate::utils::move_text::parse_move_text;

    fn sq(text: &str) -> Position {
        algebraic_to_position(text).expect("square should parse")
    }

    fn play(engine: &mut Engine, moves: &[&str]) {
        for text in moves {
            engine
                .apply_move_text(text)
                .unwrap_or_else(|err| panic!("{text} should be legal: {err}"));
        }
    }

    fn ends(entries: &[HistoryEntry]) -> Vec<String> {
        entries.iter().map(|entry| entry.mv().end.to_string()).collect()
    }

    #[test]
    fn opening_position_counts() {
        let mut engine = Engine::new_game(EngineConfig::default());
        assert_eq!(engine.all_legal_moves().expect("generation should succeed").len(), 20);
        assert_eq!(engine.legal_moves(sq("a2")).expect("generation should succeed").len(), 2);
        assert_eq!(ends(&engine.legal_moves(sq("b1")).expect("generation should succeed")), ["a3", "c3"]);
        assert!(!engine.is_in_check().expect("query should succeed"));
    }

    #[test]
    fn init_game_from_placements() {
        let setup = [
            Placement::new(sq("e1"), Color::Light, PieceKind::King),
            Placement::new(sq("h1"), Color::Light, PieceKind::Rook),
            Placement::new(sq("e8"), Color::Dark, PieceKind::King),
        ];
        let mut engine =
            Engine::init_game(EngineConfig::default(), Some(&setup[..]), Some(Color::Light))
                .expect("setup is valid");
        assert!(engine.state().castling_rights.get(Color::Light, CastlingSide::KingSide));
        let castles = engine
            .legal_moves_of_kinds(sq("e1"), MoveKinds::CASTLING)
            .expect("generation should succeed");
        assert_eq!(ends(&castles), ["g1"]);
    }

    #[test]
    fn en_passant_window_is_one_move() {
        let mut engine = Engine::new_game(EngineConfig::default());
        play(&mut engine, &["e2-e4", "a7-a6", "e4-e5", "d7-d5"]);

        let captures = engine
            .legal_moves_of_kinds(sq("e5"), MoveKinds::EN_PASSANT)
            .expect("generation should succeed");
        assert_eq!(ends(&captures), ["d6"]);

        play(&mut engine, &["h2-h3", "h7-h6"]);
        let captures = engine
            .legal_moves_of_kinds(sq("e5"), MoveKinds::EN_PASSANT)
            .expect("generation should succeed");
        assert!(captures.is_empty());
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut engine = Engine::new_game(EngineConfig::default());
        play(&mut engine, &["e2-e4", "a7-a6", "e4-e5", "d7-d5", "e5xd6"]);
        assert!(engine.state().board.is_empty_at(sq("d5")));
        assert!(matches!(
            engine.history().last(),
            Some(HistoryEntry::EnPassant { .. })
        ));

        assert!(engine.undo_last_move());
        assert!(!engine.state().board.is_empty_at(sq("d5")));
    }

    #[test]
    fn castling_is_rejected_until_the_path_is_clear() {
        let mut engine = Engine::new_game(EngineConfig::default());
        assert!(!engine.try_apply_coordinates(
            Move::new(sq("e1"), sq("g1")),
            None
        ));
        play(&mut engine, &["e2-e4", "e7-e5", "g1-f3", "b8-c6", "f1-c4", "g8-f6"]);
        let entry = engine
            .apply_coordinates(Move::new(sq("e1"), sq("g1")), None)
            .expect("castling should be legal");
        assert!(matches!(entry, HistoryEntry::Castling { .. }));
        assert!(engine.state().figure_at(sq("f1")).is_some());
        assert!(!engine.state().castling_rights.get(Color::Light, CastlingSide::KingSide));
        assert_eq!(engine.hash(), Some(compute_hash(engine.state())));
    }

    #[test]
    fn illegal_moves_leave_the_session_untouched() {
        let mut engine = Engine::new_game(EngineConfig::default());
        let before = engine.state().clone();

        match engine.apply_move_text("e2-e5") {
            Err(RulesError::IllegalMove(_)) => {}
            other => panic!("expected IllegalMove, got {other:?}"),
        }
        assert!(!engine.try_apply_coordinates(Move::new(sq("e7"), sq("e5")), None));
        assert!(matches!(
            engine.apply_move_text("e2e9"),
            Err(RulesError::MalformedInput { .. })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn generated_entry_for_the_wrong_side_is_rejected() {
        let mut engine = Engine::new_game(EngineConfig::default());
        let dark_push = engine
            .legal_moves(sq("e7"))
            .expect("generation should succeed")
            .remove(0);
        assert!(matches!(engine.apply_move(dark_push), Err(RulesError::IllegalMove(_))));
    }

    #[test]
    fn init_game_defaults_to_the_standard_layout() {
        let mut engine =
            Engine::init_game(EngineConfig::default(), None, None).expect("default setup is valid");
        let standard = Engine::new_game(EngineConfig::default());
        assert_eq!(engine.side_to_move(), Color::Light);
        assert_eq!(engine.hash(), standard.hash());
        assert_eq!(engine.state().castling_rights, standard.state().castling_rights);
        assert_eq!(engine.all_legal_moves().expect("generation should succeed").len(), 20);

        let dark_first = Engine::init_game(EngineConfig::default(), None, Some(Color::Dark))
            .expect("default setup is valid");
        assert_eq!(dark_first.side_to_move(), Color::Dark);
        assert_ne!(dark_first.hash(), standard.hash());
    }

    #[test]
    fn try_undo_distinguishes_empty_history_from_corruption() {
        let mut engine = Engine::new_game(EngineConfig::default());
        assert!(matches!(engine.try_undo_last_move(), Ok(false)));

        play(&mut engine, &["g1-f3"]);
        engine.state.board.remove(sq("f3"));
        assert!(matches!(
            engine.try_undo_last_move(),
            Err(RulesError::InvariantViolation(_))
        ));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn undo_restores_hash_and_reports_empty_history() {
        let mut engine = Engine::new_game(EngineConfig::default());
        assert!(!engine.undo_last_move());

        let start = engine.hash();
        play(&mut engine, &["g1-f3"]);
        assert_ne!(engine.hash(), start);
        assert!(engine.undo_last_move());
        assert_eq!(engine.hash(), start);
        assert_eq!(engine.state(), &GameState::new_game());
        assert!(!engine.undo_last_move());
    }

    #[test]
    fn promotion_defaults_and_named_kinds() {
        let fen = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1";
        let mut engine = Engine::from_fen(EngineConfig::default(), fen).expect("FEN should parse");
        let entry = engine.apply_move_text("a7-a8").expect("promotion should be legal");
        assert_eq!(entry.promotion(), Some(PieceKind::Queen));

        let knights = EngineConfig {
            default_promotion: PieceKind::Knight,
            ..EngineConfig::default()
        };
        let mut engine = Engine::from_fen(knights, fen).expect("FEN should parse");
        let entry = engine.apply_move_text("a7a8=r").expect("promotion should be legal");
        assert_eq!(entry.promotion(), Some(PieceKind::Rook));
        assert!(engine.undo_last_move());

        let entry = engine.apply_move_text("a7a8").expect("promotion should be legal");
        assert_eq!(entry.promotion(), Some(PieceKind::Knight));
    }

    #[test]
    fn promotion_letter_on_a_quiet_move_is_illegal() {
        let mut engine = Engine::new_game(EngineConfig::default());
        let (mv, _) = parse_move_text("e2e4").expect("move text should parse");
        assert!(matches!(
            engine.apply_coordinates(mv, Some(PieceKind::Queen)),
            Err(RulesError::IllegalMove(_))
        ));
    }

    #[test]
    fn check_is_reported_for_the_side_to_move() {
        let mut engine = Engine::new_game(EngineConfig::default());
        play(&mut engine, &["f2-f3", "e7-e5", "g2-g4", "d8-h4"]);
        assert!(engine.is_in_check().expect("query should succeed"));
        assert!(engine.all_legal_moves().expect("generation should succeed").is_empty());
    }

    #[test]
    fn cache_hits_on_repeat_and_never_returns_stale_moves() {
        let mut engine = Engine::new_game(EngineConfig::default());
        let first = engine.legal_moves(sq("d1")).expect("generation should succeed");
        let hits = engine.cache_stats().hits;
        let again = engine.legal_moves(sq("d1")).expect("generation should succeed");
        assert_eq!(first, again);
        assert!(first.is_empty());
        assert_eq!(engine.cache_stats().hits, hits + 1);

        play(&mut engine, &["e2-e4", "e7-e5"]);
        let opened = engine.legal_moves(sq("d1")).expect("generation should succeed");
        assert_eq!(opened.len(), 4);
    }

    #[test]
    fn disabled_cache_gives_the_same_answers() {
        let no_cache = EngineConfig {
            move_cache: false,
            ..EngineConfig::default()
        };
        let mut cached = Engine::new_game(EngineConfig::default());
        let mut uncached = Engine::new_game(no_cache);
        for text in ["e2-e4", "c7-c5", "g1-f3"] {
            play(&mut cached, &[text]);
            play(&mut uncached, &[text]);
            assert_eq!(
                cached.all_legal_moves().expect("generation should succeed"),
                uncached.all_legal_moves().expect("generation should succeed")
            );
        }
        assert_eq!(uncached.cache_stats().stores, 0);
        assert_eq!(cached.hash(), uncached.hash());
    }
}
