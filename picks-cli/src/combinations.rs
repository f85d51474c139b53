use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use picks_db::models::{DrawFormat, format_numbers};

/// Nombre de combinaisons filtrées en parallèle avant écriture.
const BATCH_SIZE: usize = 1 << 16;

fn is_prime(n: u8) -> bool {
    if n < 2 {
        return false;
    }
    let n = n as u16;
    (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

/// Filtre arithmétique appliqué aux numéros principaux d'une combinaison.
///
/// Rejette une combinaison sans nombre premier, avec moins de 2 ou plus de 4
/// pairs, de somme hors de [121, 200], avec moins de 2 ou plus de 4 numéros
/// sous 25, avec plus de 3 numéros dans une même dizaine (0-9 … 40-49), ou qui
/// occupe les cinq dizaines à la fois.
pub fn is_valid_combination(main: &[u8]) -> bool {
    if !main.iter().any(|&n| is_prime(n)) {
        return false;
    }

    let even = main.iter().filter(|&&n| n % 2 == 0).count();
    let sum: u32 = main.iter().map(|&n| n as u32).sum();
    let low = main.iter().filter(|&&n| n < 25).count();
    let mut decades = [0usize; 5];
    for &n in main {
        if let Some(count) = decades.get_mut((n / 10) as usize) {
            *count += 1;
        }
    }

    if !(2..=4).contains(&even) {
        return false;
    }
    if !(121..=200).contains(&sum) {
        return false;
    }
    if !(2..=4).contains(&low) {
        return false;
    }
    if decades.iter().any(|&c| c > 3) {
        return false;
    }
    if decades.iter().all(|&c| c > 0) {
        return false;
    }
    true
}

/// Passe à la combinaison suivante dans l'ordre lexicographique ; `false` après la dernière.
pub fn next_combination(current: &mut [u8], range: u8) -> bool {
    let k = current.len();
    let n = range as usize;
    for i in (0..k).rev() {
        let max = (n - (k - 1 - i)) as u8;
        if current[i] < max {
            current[i] += 1;
            for j in (i + 1)..k {
                current[j] = current[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}

pub struct CombinationSummary {
    pub generated: u64,
    pub accepted: u64,
}

/// Énumère toutes les combinaisons de `format.slots` numéros et écrit celles acceptées par
/// `accept`, une par ligne, dans l'ordre lexicographique.
pub fn write_combinations<W, F>(
    out: &mut W,
    format: DrawFormat,
    accept: F,
    pb: &ProgressBar,
) -> Result<CombinationSummary>
where
    W: Write,
    F: Fn(&[u8]) -> bool + Sync,
{
    let slots = format.slots;
    let mut summary = CombinationSummary {
        generated: 0,
        accepted: 0,
    };
    if slots == 0 || slots > format.range as usize {
        return Ok(summary);
    }

    let mut current: Vec<u8> = (1..=slots as u8).collect();
    let mut has_more = true;
    let mut batch: Vec<u8> = Vec::with_capacity(BATCH_SIZE * slots);

    while has_more {
        batch.clear();
        while has_more && batch.len() < BATCH_SIZE * slots {
            batch.extend_from_slice(&current);
            has_more = next_combination(&mut current, format.range);
        }

        let verdicts: Vec<bool> = batch.par_chunks(slots).map(|combo| accept(combo)).collect();
        for (combo, &ok) in batch.chunks(slots).zip(&verdicts) {
            if ok {
                writeln!(out, "{}", format_numbers(combo))?;
                summary.accepted += 1;
            }
        }

        let count = verdicts.len() as u64;
        summary.generated += count;
        pb.inc(count);
    }

    out.flush()?;
    Ok(summary)
}

/// Crée le fichier des combinaisons valides s'il n'existe pas encore (ou si `force`).
///
/// Retourne `None` quand le fichier existant est conservé.
pub fn generate_combination_file(
    path: &Path,
    format: DrawFormat,
    force: bool,
) -> Result<Option<CombinationSummary>> {
    if path.exists() && !force {
        info!(path = %path.display(), "fichier de combinaisons déjà présent");
        return Ok(None);
    }

    let file = File::create(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;
    let mut out = BufWriter::new(file);

    let total = binomial(format.range as u64, format.slots as u64).unwrap_or(0);
    let pb = ProgressBar::new(total);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .context("Gabarit de progression invalide")?
        .progress_chars("=> "));

    let main_slots = format.main_slots();
    let summary = write_combinations(&mut out, format, |combo| is_valid_combination(&combo[..main_slots]), &pb)
        .with_context(|| format!("Échec de l'écriture de {:?}", path))?;
    pb.finish_with_message("Combinaisons générées");

    info!(
        generated = summary.generated,
        accepted = summary.accepted,
        "combinaisons écrites"
    );
    Ok(Some(summary))
}
