use std::cmp::Ordering;

use serde::Serialize;

use crate::running_average;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    /// Position (1-based) in the order of the previous link, or of the ledger for the first link.
    pub rank: usize,
    pub landed_total: u32,
    pub opportunities: u32,
    pub average: f64,
    pub cumulative_score: f64,
}

impl RankEntry {
    fn new(rank: usize) -> Self {
        Self {
            rank,
            landed_total: 0,
            opportunities: 0,
            average: 0.0,
            cumulative_score: 0.0,
        }
    }
}

/// One entry per rank value, re-sorted by average independently of the rank it carries.
#[derive(Debug, Clone)]
pub struct RankTable {
    entries: Vec<RankEntry>,
}

impl RankTable {
    pub fn new(size: usize) -> Self {
        Self {
            entries: (1..=size).map(RankEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    fn index_of(&self, rank: usize) -> usize {
        self.entries
            .iter()
            .position(|e| e.rank == rank)
            .unwrap_or_else(|| panic!("rang {rank} absent de la table (1-{})", self.entries.len()))
    }

    /// Counts a landing on `rank` and returns the entry's current 1-based position.
    pub fn record_land(&mut self, rank: usize) -> usize {
        let idx = self.index_of(rank);
        let entry = &mut self.entries[idx];
        entry.landed_total += 1;
        entry.opportunities += 1;
        entry.average = running_average(entry.landed_total, entry.opportunities);
        idx + 1
    }

    /// Counts a missed chance on `rank` and returns the entry's current 1-based position.
    pub fn record_rank_opportunity(&mut self, rank: usize) -> usize {
        let idx = self.index_of(rank);
        let entry = &mut self.entries[idx];
        entry.opportunities += 1;
        entry.average = running_average(entry.landed_total, entry.opportunities);
        idx + 1
    }

    pub fn sort_by_average(&mut self) {
        self.entries
            .sort_by(|a, b| a.average.partial_cmp(&b.average).unwrap_or(Ordering::Equal));
    }

    /// 1-based position of the entry carrying `rank`.
    pub fn rank_of(&self, rank: usize) -> usize {
        self.index_of(rank) + 1
    }

    pub fn entry_with_rank(&self, rank: usize) -> &RankEntry {
        &self.entries[self.index_of(rank)]
    }

    pub fn set_cumulative_score(&mut self, rank: usize, value: f64) {
        let idx = self.index_of(rank);
        self.entries[idx].cumulative_score = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(table: &RankTable) -> Vec<usize> {
        table.entries().iter().map(|e| e.rank).collect()
    }

    #[test]
    fn test_new_table_has_one_entry_per_rank() {
        let table = RankTable::new(49);
        assert_eq!(table.len(), 49);
        assert_eq!(ranks(&table), (1..=49).collect::<Vec<_>>());
    }

    #[test]
    fn test_record_land() {
        let mut table = RankTable::new(5);
        assert_eq!(table.record_land(3), 3);
        let e = table.entry_with_rank(3);
        assert_eq!((e.landed_total, e.opportunities), (1, 1));
        assert!((e.average - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_record_rank_opportunity() {
        let mut table = RankTable::new(5);
        table.record_land(2);
        table.record_rank_opportunity(2);
        let e = table.entry_with_rank(2);
        assert_eq!((e.landed_total, e.opportunities), (1, 2));
        assert!((e.average - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sort_moves_rank_with_entry() {
        let mut table = RankTable::new(4);
        table.record_land(1);
        for r in 2..=4 {
            table.record_rank_opportunity(r);
        }
        table.sort_by_average();
        assert_eq!(ranks(&table), vec![2, 3, 4, 1]);
        assert_eq!(table.rank_of(1), 4);
        assert_eq!(table.entries()[3].landed_total, 1);
        // la position renvoyée suit le dernier tri
        assert_eq!(table.record_land(1), 4);
    }

    #[test]
    fn test_cumulative_score() {
        let mut table = RankTable::new(3);
        table.set_cumulative_score(2, 0.75);
        assert_eq!(table.entry_with_rank(2).cumulative_score, 0.75);
    }

    #[test]
    #[should_panic(expected = "absent de la table")]
    fn test_missing_rank_panics() {
        let mut table = RankTable::new(3);
        table.record_land(4);
    }
}
