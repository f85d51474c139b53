use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Highest number that can be drawn; ids run over `1..=range`.
    pub range: u8,
    /// Draws processed before the ordinal chain starts receiving events.
    pub warmup_threshold: u64,
    /// Samples a frontier link must exceed before a new link is appended.
    pub growth_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range: 49,
            warmup_threshold: 500,
            growth_threshold: 500,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.range == 0 {
            return Err(EngineError::InvalidConfig(
                "la plage de numéros doit contenir au moins 1 numéro".to_string(),
            ));
        }
        if self.growth_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "le seuil de croissance de la chaîne doit être supérieur à 0".to_string(),
            ));
        }
        Ok(())
    }
}
