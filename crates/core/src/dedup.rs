//! First-seen key deduplication
//!
//! Rows are deduplicated on their raw first-column value: the first
//! row with a given key wins, later rows are dropped and counted.

use ahash::AHashSet;

/// Statistics for deduplication
#[derive(Debug, Clone, Default)]
pub struct DedupStats {
    /// Total number of keys checked
    pub total_seen: usize,
    /// Number of rows dropped as duplicates
    pub duplicates_dropped: usize,
    /// Number of unique keys kept
    pub unique_count: usize,
}

impl DedupStats {
    /// Drop rate as a percentage
    pub fn drop_rate(&self) -> f64 {
        if self.total_seen == 0 {
            0.0
        } else {
            (self.duplicates_dropped as f64 / self.total_seen as f64) * 100.0
        }
    }
}

/// Tracks seen first-column keys across one load
pub struct KeyDeduplicator {
    seen: AHashSet<String>,
    stats: DedupStats,
}

impl KeyDeduplicator {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: AHashSet::with_capacity(capacity),
            stats: DedupStats::default(),
        }
    }

    /// Check a key, recording it as seen.
    ///
    /// Returns `true` if the key was already seen (the row should be
    /// dropped), `false` if this is its first occurrence.
    pub fn is_duplicate(&mut self, key: &str) -> bool {
        self.stats.total_seen += 1;
        if self.seen.contains(key) {
            self.stats.duplicates_dropped += 1;
            true
        } else {
            self.seen.insert(key.to_string());
            self.stats.unique_count += 1;
            false
        }
    }

    /// Current statistics
    pub fn stats(&self) -> &DedupStats {
        &self.stats
    }

    /// Number of unique keys stored
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }
}

impl Default for KeyDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut dedup = KeyDeduplicator::new();
        assert!(!dedup.is_duplicate("Facebook"));
        assert!(dedup.is_duplicate("Facebook"));
        assert!(!dedup.is_duplicate("Spotify"));

        assert_eq!(dedup.stats().total_seen, 3);
        assert_eq!(dedup.stats().duplicates_dropped, 1);
        assert_eq!(dedup.stats().unique_count, 2);
        assert_eq!(dedup.unique_count(), 2);
    }

    #[test]
    fn test_consecutive_duplicate_counts_once() {
        let mut dedup = KeyDeduplicator::new();
        assert!(!dedup.is_duplicate("App"));
        assert!(dedup.is_duplicate("App"));
        assert_eq!(dedup.stats().duplicates_dropped, 1);
    }

    #[test]
    fn test_keys_are_exact_raw_text() {
        let mut dedup = KeyDeduplicator::new();
        assert!(!dedup.is_duplicate("app"));
        // Case differences are distinct keys
        assert!(!dedup.is_duplicate("App"));
        assert!(!dedup.is_duplicate(r#""app""#));
        assert_eq!(dedup.stats().duplicates_dropped, 0);
    }

    #[test]
    fn test_drop_rate() {
        let mut dedup = KeyDeduplicator::new();
        dedup.is_duplicate("a");
        dedup.is_duplicate("a");
        dedup.is_duplicate("a");
        dedup.is_duplicate("b");
        assert_eq!(dedup.stats().drop_rate(), 50.0);
    }
}
