use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    /// Position (1-based) dans l'ordre du fichier d'origine.
    pub index: u64,
    pub date: NaiveDate,
    /// Numéros dans l'ordre du fichier, complémentaire en dernier.
    pub numbers: Vec<u8>,
}

/// Forme d'un tirage : numéros possibles `1..=range`, `slots` numéros par tirage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawFormat {
    pub range: u8,
    pub slots: usize,
}

impl Default for DrawFormat {
    fn default() -> Self {
        // 6/49 + complémentaire
        Self { range: 49, slots: 7 }
    }
}

impl DrawFormat {
    /// Numéros principaux : tous sauf le complémentaire quand il y en a un.
    pub fn main_slots(&self) -> usize {
        if self.slots > 1 { self.slots - 1 } else { self.slots }
    }
}

pub fn validate_draw(numbers: &[u8], format: DrawFormat) -> Result<()> {
    if numbers.len() != format.slots {
        bail!(
            "{} numéros au lieu de {}",
            numbers.len(),
            format.slots
        );
    }
    for &n in numbers {
        if n < 1 || n > format.range {
            bail!("Numéro {} hors limites (1-{})", n, format.range);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_numbers(s: &str) -> Result<Vec<u8>> {
    s.split_whitespace()
        .map(|tok| {
            tok.parse::<u8>()
                .map_err(|e| anyhow::anyhow!("Numéro invalide '{}': {}", tok, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        let format = DrawFormat::default();
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], format).is_ok());
        assert!(validate_draw(&[49, 48, 47, 46, 45, 44, 43], format).is_ok());
    }

    #[test]
    fn test_validate_draw_wrong_count() {
        let format = DrawFormat::default();
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], format).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7, 8], format).is_err());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        let format = DrawFormat::default();
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6, 7], format).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 50], format).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate() {
        let format = DrawFormat::default();
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6, 7], format).is_err());
    }

    #[test]
    fn test_main_slots() {
        assert_eq!(DrawFormat::default().main_slots(), 6);
        assert_eq!(DrawFormat { range: 10, slots: 1 }.main_slots(), 1);
    }

    #[test]
    fn test_numbers_text_roundtrip() {
        let text = format_numbers(&[3, 14, 15, 9]);
        assert_eq!(text, "3 14 15 9");
        assert_eq!(parse_numbers(&text).unwrap(), vec![3, 14, 15, 9]);
        assert!(parse_numbers("3 x 5").is_err());
    }
}
