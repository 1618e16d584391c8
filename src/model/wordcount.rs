//! Daily word-count log.
//!
//! yw7 stores the log as `WCLog/WC` rows (Date, Count, TotalCount); novx
//! stores it as `PROGRESS/WC` rows (Date, Count, WithUnused). Counts are
//! kept as the original strings; the ISO date keys sort chronologically.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// One day's counts: words in use, and words including unused sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WcEntry {
    pub count: String,
    pub with_unused: String,
}

#[derive(Debug, Clone, Default)]
pub struct WordCountLog {
    entries: BTreeMap<String, WcEntry>,
}

impl WordCountLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: impl Into<String>, entry: WcEntry) {
        self.entries.insert(date.into(), entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Chronological iteration.
    pub fn iter(&self) -> btree_map::Iter<'_, String, WcEntry> {
        self.entries.iter()
    }

    /// The most recent entry, if any.
    pub fn latest(&self) -> Option<(&String, &WcEntry)> {
        self.entries.iter().next_back()
    }

    /// Merges `other` into this log, overwriting same-day entries.
    pub fn merge(&mut self, other: &WordCountLog) {
        for (date, entry) in other.iter() {
            self.entries.insert(date.clone(), entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(count: &str, with_unused: &str) -> WcEntry {
        WcEntry {
            count: count.to_string(),
            with_unused: with_unused.to_string(),
        }
    }

    #[test]
    fn test_latest_is_chronological() {
        let mut log = WordCountLog::new();
        log.insert("2024-03-02", entry("120", "150"));
        log.insert("2024-03-01", entry("100", "130"));
        let (date, e) = log.latest().unwrap();
        assert_eq!(date, "2024-03-02");
        assert_eq!(e.count, "120");
    }

    #[test]
    fn test_merge_overwrites() {
        let mut log = WordCountLog::new();
        log.insert("2024-03-01", entry("100", "130"));
        let mut update = WordCountLog::new();
        update.insert("2024-03-01", entry("110", "140"));
        log.merge(&update);
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().1.count, "110");
    }
}
