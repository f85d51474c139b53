use serde::Serialize;
use tracing::{debug, info};

use crate::chain::OrdinalChain;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::ledger::NumberLedger;
use crate::report::{EngineReport, LinkReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No draw processed yet.
    Uninitialized,
    /// Draw count at or below the warm-up threshold: only the ledger is fed.
    Warming,
    /// The ordinal chain receives events. Never left once entered.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineState {
    pub draws_processed: u64,
    pub phase: Phase,
    /// Index of the first draw processed in the active phase.
    pub activated_at: Option<u64>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            draws_processed: 0,
            phase: Phase::Uninitialized,
            activated_at: None,
        }
    }

    /// Counts one more draw and returns `true` if this draw switched the engine to `Active`.
    fn advance(&mut self, warmup_threshold: u64) -> bool {
        self.draws_processed += 1;
        match self.phase {
            Phase::Uninitialized | Phase::Warming if self.draws_processed > warmup_threshold => {
                self.phase = Phase::Active;
                self.activated_at = Some(self.draws_processed);
                true
            }
            Phase::Uninitialized => {
                self.phase = Phase::Warming;
                false
            }
            Phase::Warming | Phase::Active => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }
}

/// Applies draws in order to the number ledger and, after warm-up, to the ordinal chain.
#[derive(Debug, Clone)]
pub struct StatEngine {
    config: EngineConfig,
    ledger: NumberLedger,
    chain: OrdinalChain,
    state: EngineState,
}

impl StatEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let size = config.range as usize;
        Ok(Self {
            ledger: NumberLedger::new(config.range),
            chain: OrdinalChain::new(size, config.growth_threshold),
            state: EngineState::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &NumberLedger {
        &self.ledger
    }

    pub fn chain(&self) -> &OrdinalChain {
        &self.chain
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Applies one draw.
    ///
    /// Every number of the range is either hit or given an opportunity. Once
    /// active, the chain is fed with each number's rank in the ledger order left
    /// by the previous draw; the ledger (and the chain, when active) is re-sorted
    /// only after the whole draw has been applied. Duplicate numbers in `drawn`
    /// count once.
    pub fn process_draw(&mut self, drawn: &[u8]) -> Result<(), EngineError> {
        let range = self.config.range;
        let draw_index = self.state.draws_processed + 1;
        if let Some(&number) = drawn.iter().find(|&&n| n == 0 || n > range) {
            return Err(EngineError::NumberOutOfRange {
                draw_index,
                number,
                range,
            });
        }

        if self.state.advance(self.config.warmup_threshold) {
            info!(draw = draw_index, "préchauffage terminé, chaîne ordinale activée");
        }
        let active = self.state.is_active();

        for id in 1..=range {
            let rank = self.ledger.rank_of(id);
            if drawn.contains(&id) {
                if self.ledger.record_hit(id, draw_index) && active {
                    self.chain.record_event(rank);
                }
            } else if self.ledger.record_opportunity(id) && active {
                self.chain.record_opportunity(rank);
            }
        }

        self.ledger.clear_seen();
        self.ledger.sort_by_average();
        if active {
            self.chain.sort_all();
        }
        debug!(draw = draw_index, links = self.chain.len(), "tirage traité");
        Ok(())
    }

    /// Applies draws in order, stopping at the first invalid one.
    pub fn ingest<I, D>(&mut self, draws: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        for draw in draws {
            self.process_draw(draw.as_ref())?;
        }
        info!(
            draws = self.state.draws_processed,
            links = self.chain.len(),
            "ingestion terminée"
        );
        Ok(())
    }

    /// Writes the folded chain scores onto the ledger entries.
    pub fn correlate(&mut self) {
        self.chain.correlate(&mut self.ledger);
    }

    pub fn report(&self) -> EngineReport {
        EngineReport {
            state: self.state,
            ledger: self.ledger.entries().to_vec(),
            links: self
                .chain
                .links()
                .iter()
                .enumerate()
                .map(|(i, link)| LinkReport {
                    level: i + 1,
                    sample_size: link.sample_size(),
                    entries: link.table().entries().to_vec(),
                })
                .collect(),
        }
    }
}
