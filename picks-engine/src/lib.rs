//! Frequency ledger and self-extending ordinal chain over a draw history.
//!
//! [`StatEngine`] is the entry point: feed it draw vectors in file order with
//! [`StatEngine::process_draw`], then call [`StatEngine::correlate`] to fold the
//! chain back onto the per-number ledger.

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rank_table;
pub mod report;

pub use chain::{OrdinalChain, OrdinalLink};
pub use config::EngineConfig;
pub use engine::{EngineState, Phase, StatEngine};
pub use error::EngineError;
pub use ledger::{NumberEntry, NumberLedger};
pub use rank_table::{RankEntry, RankTable};
pub use report::{EngineReport, LinkReport};

/// Running average of `hits` over `opportunities`, 0 when nothing was observed yet.
pub(crate) fn running_average(hits: u32, opportunities: u32) -> f64 {
    if opportunities == 0 {
        return 0.0;
    }
    hits as f64 / opportunities as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_average_zero_opportunities() {
        assert_eq!(running_average(0, 0), 0.0);
        assert!(running_average(0, 0).is_finite());
    }

    #[test]
    fn test_running_average_ratio() {
        assert!((running_average(1, 4) - 0.25).abs() < 1e-12);
        assert!((running_average(3, 3) - 1.0).abs() < 1e-12);
    }
}
