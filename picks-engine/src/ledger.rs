use std::cmp::Ordering;

use serde::Serialize;

use crate::running_average;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberEntry {
    pub id: u8,
    pub total_drawn: u32,
    pub opportunities: u32,
    pub average: f64,
    /// Index (1-based) of the last draw that contained this number, 0 if never drawn.
    pub last_drawn_at: u64,
    pub cumulative_score: f64,
    #[serde(skip)]
    seen: bool,
}

impl NumberEntry {
    fn new(id: u8) -> Self {
        Self {
            id,
            total_drawn: 0,
            opportunities: 0,
            average: 0.0,
            last_drawn_at: 0,
            cumulative_score: 0.0,
            seen: false,
        }
    }

    pub fn is_seen(&self) -> bool {
        self.seen
    }
}

/// Per-number counters, kept in ascending order of average after each sort.
///
/// Before the first sort entries sit in id order. A number hit in the current
/// draw is flagged as seen until [`NumberLedger::clear_seen`]; further hits or
/// opportunities for it in the same draw are ignored.
#[derive(Debug, Clone)]
pub struct NumberLedger {
    entries: Vec<NumberEntry>,
}

impl NumberLedger {
    pub fn new(range: u8) -> Self {
        Self {
            entries: (1..=range).map(NumberEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in their current order.
    pub fn entries(&self) -> &[NumberEntry] {
        &self.entries
    }

    pub fn get(&self, id: u8) -> Option<&NumberEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn index_of(&self, id: u8) -> usize {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .unwrap_or_else(|| panic!("numéro {id} absent du registre ({} entrées)", self.entries.len()))
    }

    /// Returns `false` when `id` was already hit in the current draw.
    pub fn record_hit(&mut self, id: u8, event_index: u64) -> bool {
        let idx = self.index_of(id);
        let entry = &mut self.entries[idx];
        if entry.seen {
            return false;
        }
        entry.seen = true;
        entry.total_drawn += 1;
        entry.opportunities += 1;
        entry.average = running_average(entry.total_drawn, entry.opportunities);
        entry.last_drawn_at = event_index;
        true
    }

    /// Returns `false` when `id` was already hit in the current draw.
    pub fn record_opportunity(&mut self, id: u8) -> bool {
        let idx = self.index_of(id);
        let entry = &mut self.entries[idx];
        if entry.seen {
            return false;
        }
        entry.opportunities += 1;
        entry.average = running_average(entry.total_drawn, entry.opportunities);
        true
    }

    pub fn clear_seen(&mut self) {
        for entry in &mut self.entries {
            entry.seen = false;
        }
    }

    /// Stable ascending sort on the average; ties keep their current relative order.
    pub fn sort_by_average(&mut self) {
        self.entries
            .sort_by(|a, b| a.average.partial_cmp(&b.average).unwrap_or(Ordering::Equal));
    }

    /// 1-based position of `id` in the current order.
    pub fn rank_of(&self, id: u8) -> usize {
        self.index_of(id) + 1
    }

    /// Entry sitting at the 1-based position `rank`.
    pub fn entry_at_rank(&self, rank: usize) -> &NumberEntry {
        rank.checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
            .unwrap_or_else(|| panic!("rang {rank} hors du registre (1-{})", self.entries.len()))
    }

    pub fn set_cumulative_score(&mut self, id: u8, value: f64) {
        let idx = self.index_of(id);
        self.entries[idx].cumulative_score = value;
    }
}
