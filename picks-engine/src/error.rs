use thiserror::Error;

/// Recoverable failures of the statistics core.
///
/// Broken internal invariants (a rank missing from a table, an unknown id in
/// the ledger) are not represented here: they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("tirage {draw_index} : numéro {number} hors limites (1-{range})")]
    NumberOutOfRange {
        draw_index: u64,
        number: u8,
        range: u8,
    },

    #[error("configuration invalide : {0}")]
    InvalidConfig(String),
}
