//! Local leaderboard
//!
//! Persisted as a single JSON list under one fixed key, tracks top 10 results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{Store, StoreError};
use crate::settings::Difficulty;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 10;

/// A single leaderboard record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Final rating (0-100)
    pub score: u32,
    /// When the run was saved (RFC 3339)
    pub date: DateTime<Utc>,
    /// Earned labels, e.g. the rating tier and the flavor title
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Top 10 list, sorted descending by score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Storage key for the serialized list
    pub const STORAGE_KEY: &'static str = "meidoufu_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, restoring order and cap
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        // Stable sort keeps earlier records ahead of later ties
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Whether `score` earns a place on the board
    ///
    /// A board with free slots takes anything; a full one only takes scores
    /// strictly above its last entry.
    pub fn qualifies(&self, score: u32) -> bool {
        match self.entries.get(MAX_ENTRIES - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// 1-based slot `score` would land in, after any equal scores
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let above = self.entries.iter().take_while(|e| e.score >= score).count();
        Some(above + 1)
    }

    /// Place an entry at its rank, dropping whatever falls past the cap
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    /// Load from the store; missing or malformed data is an empty board
    pub fn load(store: &dyn Store) -> Self {
        let raw = match store.read(Self::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::warn!("Leaderboard unreadable ({e}), starting fresh");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
            Ok(entries) => {
                log::info!("Loaded {} leaderboard entries", entries.len());
                Self::from_entries(entries)
            }
            Err(e) => {
                log::warn!("Leaderboard data malformed ({e}), treating as empty");
                Self::new()
            }
        }
    }

    /// Save the list under the fixed key
    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries)?;
        store.write(Self::STORAGE_KEY, &json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Normalize a player name: trimmed, at most `MAX_NAME_LEN` characters
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            titles: vec!["Tofu Artisan".to_string()],
            difficulty: None,
        }
    }

    fn full_board() -> Leaderboard {
        let mut board = Leaderboard::new();
        for i in 0..10 {
            board.insert(entry(&format!("p{i}"), 50 + i * 5));
        }
        board
    }

    #[test]
    fn test_new_score_evicts_lowest() {
        let mut board = full_board();
        assert_eq!(board.len(), 10);
        assert_eq!(board.entries().last().unwrap().score, 50);

        let rank = board.insert(entry("new", 51));
        assert_eq!(rank, Some(10));
        assert_eq!(board.len(), 10);
        assert!(board.entries().iter().all(|e| e.name != "p0"));
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_tie_with_lowest_does_not_qualify() {
        let mut board = full_board();
        assert!(!board.qualifies(50));
        assert_eq!(board.insert(entry("tie", 50)), None);
        assert_eq!(board.len(), 10);
    }

    #[test]
    fn test_short_board_always_qualifies() {
        let mut board = Leaderboard::new();
        board.insert(entry("a", 90));
        assert!(board.qualifies(0));
        assert_eq!(board.potential_rank(95), Some(1));
        assert_eq!(board.potential_rank(10), Some(2));
    }

    #[test]
    fn test_ties_keep_earlier_entry_first() {
        let mut board = Leaderboard::new();
        board.insert(entry("first", 80));
        board.insert(entry("second", 80));
        assert_eq!(board.entries()[0].name, "first");
        assert_eq!(board.entries()[1].name, "second");
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut store = MemoryStore::new();
        store.write(Leaderboard::STORAGE_KEY, "{not json").unwrap();
        assert!(Leaderboard::load(&store).is_empty());

        store.write(Leaderboard::STORAGE_KEY, "{\"score\": 3}").unwrap();
        assert!(Leaderboard::load(&store).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::new();
        board.insert(entry("chef", 88));
        board.save(&mut store).unwrap();

        let loaded = Leaderboard::load(&store);
        assert_eq!(loaded, board);
        let raw = store.read(Leaderboard::STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_load_unsorted_data_is_sorted_and_capped() {
        let mut store = MemoryStore::new();
        let entries: Vec<_> = (0..12).map(|i| entry(&format!("p{i}"), i * 3)).collect();
        store
            .write(Leaderboard::STORAGE_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        let board = Leaderboard::load(&store);
        assert_eq!(board.len(), 10);
        assert_eq!(board.top_score(), Some(33));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name("  Mei  ").as_deref(), Some("Mei"));
        assert_eq!(normalize_name("abcdefghijklmno").as_deref(), Some("abcdefghij"));
    }
}
