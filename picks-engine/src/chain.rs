use tracing::{debug, info};

use crate::ledger::NumberLedger;
use crate::rank_table::RankTable;

#[derive(Debug, Clone)]
pub struct OrdinalLink {
    table: RankTable,
    /// Events recorded on this link.
    sample_size: u64,
}

impl OrdinalLink {
    fn new(size: usize) -> Self {
        Self {
            table: RankTable::new(size),
            sample_size: 0,
        }
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }
}

/// Chain of rank tables stored front to back in an arena.
///
/// Link `i` interprets its ranks as positions in the sorted order of link
/// `i - 1`; link 0 reads positions in the [`NumberLedger`]. The last link is
/// the frontier: once its sample count exceeds `growth_threshold`, the next
/// event appends a fresh link behind it.
#[derive(Debug, Clone)]
pub struct OrdinalChain {
    links: Vec<OrdinalLink>,
    size: usize,
    growth_threshold: u64,
}

impl OrdinalChain {
    pub fn new(size: usize, growth_threshold: u64) -> Self {
        assert!(growth_threshold > 0, "un seuil de croissance nul étendrait la chaîne sans fin");
        Self {
            links: vec![OrdinalLink::new(size)],
            size,
            growth_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always false: a chain starts with one link and never drops any.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[OrdinalLink] {
        &self.links
    }

    pub fn link(&self, index: usize) -> Option<&OrdinalLink> {
        self.links.get(index)
    }

    pub fn frontier(&self) -> &OrdinalLink {
        &self.links[self.links.len() - 1]
    }

    pub fn growth_threshold(&self) -> u64 {
        self.growth_threshold
    }

    pub fn predecessor(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    pub fn successor(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.links.len()).then_some(next)
    }

    /// Records a landing on `rank` in the first link and feeds each link's output
    /// position into the next one, growing the chain from a saturated frontier.
    pub fn record_event(&mut self, rank: usize) {
        let mut index = 0;
        let mut rank = rank;
        loop {
            let link = &mut self.links[index];
            let position = link.table.record_land(rank);
            link.sample_size += 1;

            match self.successor(index) {
                Some(next) => {
                    index = next;
                    rank = position;
                }
                None if self.links[index].sample_size > self.growth_threshold => {
                    self.links.push(OrdinalLink::new(self.size));
                    info!(
                        depth = self.links.len(),
                        samples = self.links[index].sample_size,
                        "nouveau maillon ordinal"
                    );
                    index += 1;
                    rank = position;
                }
                None => break,
            }
        }
    }

    /// Records a missed chance on `rank` through every existing link. Never grows the chain.
    pub fn record_opportunity(&mut self, rank: usize) {
        let mut rank = rank;
        for link in &mut self.links {
            rank = link.table.record_rank_opportunity(rank);
        }
    }

    pub fn sort_all(&mut self) {
        for link in &mut self.links {
            link.table.sort_by_average();
        }
    }

    /// Folds the per-rank averages from the frontier back to the ledger.
    ///
    /// Every frontier entry seeds a sum with its own average and walks towards
    /// link 0; each visited entry (same rank value) stores the running sum as its
    /// cumulative score and adds its average. Past link 0 the sum lands on the
    /// ledger entry sitting at that rank.
    pub fn correlate(&mut self, ledger: &mut NumberLedger) {
        let tail = self.links.len() - 1;
        let seeds: Vec<(usize, f64)> = self.links[tail]
            .table
            .entries()
            .iter()
            .map(|e| (e.rank, e.average))
            .collect();

        for (rank, average) in seeds {
            self.links[tail].table.set_cumulative_score(rank, average);
            self.propagate(rank, average, self.predecessor(tail), ledger);
        }
        debug!(links = self.links.len(), "corrélation terminée");
    }

    fn propagate(&mut self, rank: usize, seed: f64, start: Option<usize>, ledger: &mut NumberLedger) {
        let mut sum = seed;
        let mut current = start;
        while let Some(index) = current {
            let table = &mut self.links[index].table;
            table.set_cumulative_score(rank, sum);
            sum += table.entry_with_rank(rank).average;
            current = self.predecessor(index);
        }
        let id = ledger.entry_at_rank(rank).id;
        ledger.set_cumulative_score(id, sum);
    }
}
