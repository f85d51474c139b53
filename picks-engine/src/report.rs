use serde::Serialize;

use crate::engine::EngineState;
use crate::ledger::NumberEntry;
use crate::rank_table::RankEntry;

/// Snapshot of the engine after ingestion, ready to render or export.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReport {
    pub state: EngineState,
    /// Ledger entries in ascending order of average.
    pub ledger: Vec<NumberEntry>,
    pub links: Vec<LinkReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    /// 1 for the link reading ledger ranks.
    pub level: usize,
    pub sample_size: u64,
    pub entries: Vec<RankEntry>,
}

impl EngineReport {
    /// Ledger entries ordered by cumulative score, highest first (stable on ties).
    pub fn ranked_by_score(&self) -> Vec<&NumberEntry> {
        let mut ranked: Vec<&NumberEntry> = self.ledger.iter().collect();
        ranked.sort_by(|a, b| {
            b.cumulative_score
                .partial_cmp(&a.cumulative_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use crate::{EngineConfig, StatEngine};

    #[test]
    fn test_ranked_by_score_descending() {
        let mut engine = StatEngine::new(EngineConfig {
            range: 8,
            warmup_threshold: 1,
            growth_threshold: 50,
        })
        .unwrap();
        engine
            .ingest([[1u8, 2, 3], [1, 4, 5], [1, 2, 6], [7, 8, 1]])
            .unwrap();
        engine.correlate();

        let report = engine.report();
        let ranked = report.ranked_by_score();
        assert_eq!(ranked.len(), 8);
        for pair in ranked.windows(2) {
            assert!(pair[0].cumulative_score >= pair[1].cumulative_score);
        }
    }
}
