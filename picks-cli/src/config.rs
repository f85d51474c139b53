use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use picks_db::models::DrawFormat;
use picks_engine::EngineConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PicksConfig {
    pub draw_history_file: PathBuf,
    pub combination_file: PathBuf,
    pub debug_mode: bool,
    pub engine: EngineConfig,
    pub draw: DrawSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSection {
    /// Numéros par tirage, complémentaire compris.
    pub slots: usize,
}

impl Default for DrawSection {
    fn default() -> Self {
        Self { slots: 7 }
    }
}

impl Default for PicksConfig {
    fn default() -> Self {
        Self {
            draw_history_file: PathBuf::from("./new_draw_order.csv"),
            combination_file: PathBuf::from("./combinationCollectionFile.dat"),
            debug_mode: false,
            engine: EngineConfig::default(),
            draw: DrawSection::default(),
        }
    }
}

impl PicksConfig {
    pub fn draw_format(&self) -> DrawFormat {
        DrawFormat {
            range: self.engine.range,
            slots: self.draw.slots,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.draw.slots == 0 || self.draw.slots > self.engine.range as usize {
            bail!(
                "Nombre de numéros par tirage invalide : {} (1-{})",
                self.draw.slots,
                self.engine.range
            );
        }
        Ok(())
    }
}

/// Charge la configuration TOML ; `None` quand le fichier n'existe pas.
pub fn load_config(path: &Path) -> Result<Option<PicksConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config = parse_config(&text)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    Ok(Some(config))
}

/// Configuration chargée, ou paramètres par défaut avec un avertissement.
///
/// À appeler une fois le journal installé.
pub fn config_or_default(loaded: Option<PicksConfig>, path: &Path) -> PicksConfig {
    loaded.unwrap_or_else(|| {
        warn!(path = %path.display(), "fichier de configuration absent, paramètres par défaut");
        PicksConfig::default()
    })
}

pub fn parse_config(text: &str) -> Result<PicksConfig> {
    let config: PicksConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
