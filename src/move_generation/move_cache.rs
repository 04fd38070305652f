//! Per-session move cache keyed by position hash.
//!
//! Two read-through tables, one for legal moves and one for pseudo-legal
//! moves, keyed by `(hash, square, requested kinds)`. There is no eviction:
//! the owning engine flushes both tables whenever the position changes.
//! Distinct states that share a hash share entries, which is also why a true
//! Zobrist collision would return wrong moves.

use std::collections::HashMap;

use tracing::trace;

use crate::errors::RulesResult;
use crate::game_state::chess_types::{MoveKinds, Position};
use crate::game_state::history::HistoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub hash: u64,
    pub square: Position,
    pub kinds: Option<MoveKinds>,
}

impl CacheKey {
    #[inline]
    pub const fn new(hash: u64, square: Position, kinds: Option<MoveKinds>) -> Self {
        Self {
            hash,
            square,
            kinds,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub flushes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTable {
    Legal,
    PseudoLegal,
}

#[derive(Debug, Clone)]
pub struct MoveCache {
    legal: HashMap<CacheKey, Vec<HistoryEntry>>,
    pseudo_legal: HashMap<CacheKey, Vec<HistoryEntry>>,
    enabled: bool,
    stats: CacheStats,
}

impl Default for MoveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveCache {
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// A disabled cache stores nothing and always computes.
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            legal: HashMap::new(),
            pseudo_legal: HashMap::new(),
            enabled,
            stats: CacheStats::default(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Entries currently held in `table`.
    pub fn len(&self, table: CacheTable) -> usize {
        match table {
            CacheTable::Legal => self.legal.len(),
            CacheTable::PseudoLegal => self.pseudo_legal.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.legal.is_empty() && self.pseudo_legal.is_empty()
    }

    pub fn get(&mut self, table: CacheTable, key: &CacheKey) -> Option<Vec<HistoryEntry>> {
        if !self.enabled {
            return None;
        }
        self.stats.probes += 1;
        let hit = self.table(table).get(key).cloned();
        if hit.is_some() {
            self.stats.hits += 1;
            trace!(?table, hash = key.hash, square = %key.square, "move cache hit");
        } else {
            trace!(?table, hash = key.hash, square = %key.square, "move cache miss");
        }
        hit
    }

    pub fn store(&mut self, table: CacheTable, key: CacheKey, moves: Vec<HistoryEntry>) {
        if !self.enabled {
            return;
        }
        self.stats.stores += 1;
        self.table_mut(table).insert(key, moves);
    }

    /// Look `key` up in `table`, computing and storing the value on a miss.
    pub fn get_or_compute<F>(
        &mut self,
        table: CacheTable,
        key: CacheKey,
        compute: F,
    ) -> RulesResult<Vec<HistoryEntry>>
    where
        F: FnOnce(&mut MoveCache) -> RulesResult<Vec<HistoryEntry>>,
    {
        if let Some(moves) = self.get(table, &key) {
            return Ok(moves);
        }
        let moves = compute(self)?;
        self.store(table, key, moves.clone());
        Ok(moves)
    }

    /// Drop every entry of both tables.
    pub fn flush(&mut self) {
        let dropped = self.legal.len() + self.pseudo_legal.len();
        self.legal.clear();
        self.pseudo_legal.clear();
        self.stats.flushes += 1;
        trace!(dropped, "move cache flushed");
    }

    fn table(&self, table: CacheTable) -> &HashMap<CacheKey, Vec<HistoryEntry>> {
        match table {
            CacheTable::Legal => &self.legal,
            CacheTable::PseudoLegal => &self.pseudo_legal,
        }
    }

    fn table_mut(&mut self, table: CacheTable) -> &mut HashMap<CacheKey, Vec<HistoryEntry>> {
        match table {
            CacheTable::Legal => &mut self.legal,
            CacheTable::PseudoLegal => &mut self.pseudo_legal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheKey, CacheTable, MoveCache};
    use crate::game_state::chess_types::{MoveKinds, Position};

    #[test]
    fn read_through_computes_once() {
        let mut cache = MoveCache::new();
        let key = CacheKey::new(42, Position::from_index(8), None);
        let mut calls = 0;

        for _ in 0..3 {
            let moves = cache
                .get_or_compute(CacheTable::Legal, key, |_| {
                    calls += 1;
                    Ok(Vec::new())
                })
                .expect("compute should succeed");
            assert!(moves.is_empty());
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.len(CacheTable::Legal), 1);
        assert_eq!(cache.len(CacheTable::PseudoLegal), 0);
    }

    #[test]
    fn kinds_are_part_of_the_key() {
        let mut cache = MoveCache::new();
        let all = CacheKey::new(7, Position::from_index(0), None);
        let attacks = CacheKey::new(7, Position::from_index(0), Some(MoveKinds::ATTACK_MOVE));
        cache.store(CacheTable::PseudoLegal, all, Vec::new());
        assert!(cache.get(CacheTable::PseudoLegal, &attacks).is_none());
    }

    #[test]
    fn flush_clears_both_tables() {
        let mut cache = MoveCache::new();
        let key = CacheKey::new(1, Position::from_index(12), None);
        cache.store(CacheTable::Legal, key, Vec::new());
        cache.store(CacheTable::PseudoLegal, key, Vec::new());
        cache.flush();
        assert!(cache.is_empty());
        assert!(cache.get(CacheTable::Legal, &key).is_none());
    }

    #[test]
    fn disabled_cache_never_stores() {
        let mut cache = MoveCache::with_enabled(false);
        let key = CacheKey::new(1, Position::from_index(12), None);
        cache.store(CacheTable::Legal, key, Vec::new());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().stores, 0);
    }
}
