use std::cmp::Ordering;

use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::combinations::CombinationSummary;
use crate::import::{ImportResult, ReadResult};
use picks_db::models::Draw;
use picks_engine::{EngineReport, LinkReport, Phase};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", "Complémentaire"]);

    for draw in draws {
        let (main, bonus) = match draw.numbers.split_last() {
            Some((bonus, main)) if !main.is_empty() => (main.to_vec(), bonus.to_string()),
            _ => (draw.numbers.clone(), "—".to_string()),
        };
        let mut sorted = main;
        sorted.sort();

        let numbers_str = sorted
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        table.add_row(vec![draw.date.to_string(), numbers_str, bonus]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_read_summary(result: &ReadResult) {
    println!("Lecture terminée :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Tirages retenus   : {}", result.draws.len());
    if result.errors > 0 {
        println!("  Lignes ignorées   : {}", result.errors);
    }
}

pub fn display_combination_summary(summary: Option<&CombinationSummary>, path: &std::path::Path) {
    match summary {
        Some(s) => {
            println!("Combinaisons générées : {}", s.generated);
            println!("Combinaisons retenues : {}", s.accepted);
            println!("Fichier : {}", path.display());
        }
        None => println!(
            "Fichier de combinaisons déjà présent : {} (--force pour régénérer)",
            path.display()
        ),
    }
}

pub fn display_engine_state(report: &EngineReport) {
    let state = &report.state;
    let phase = match state.phase {
        Phase::Uninitialized => "non initialisé",
        Phase::Warming => "préchauffage",
        Phase::Active => "actif",
    };
    println!("\n📊 Moteur : {} tirages traités, phase {}", state.draws_processed, phase);
    if let Some(draw) = state.activated_at {
        println!("   Chaîne ordinale active depuis le tirage {draw}, {} maillon(s)", report.links.len());
    }
}

pub fn display_ledger(report: &EngineReport) {
    println!("\n── Registre des numéros (moyenne croissante) ──");
    let mut table = new_table(vec![
        "Rang", "Numéro", "Tirés", "Occasions", "Moyenne", "Dernier tirage", "Score ordinal",
    ]);

    for (i, entry) in report.ledger.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            format!("{:2}", entry.id),
            entry.total_drawn.to_string(),
            entry.opportunities.to_string(),
            format!("{:.4}", entry.average),
            entry.last_drawn_at.to_string(),
            format!("{:.4}", entry.cumulative_score),
        ]);
    }
    println!("{table}");
}

pub fn display_ranking(report: &EngineReport, top: usize) {
    println!("\n🎯 Classement par score ordinal\n");
    let mut table = new_table(vec!["#", "Numéro", "Score ordinal", "Moyenne"]);

    for (i, entry) in report.ranked_by_score().into_iter().take(top).enumerate() {
        let color = if i < 6 { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:2}", entry.id)).fg(color),
            Cell::new(format!("{:.4}", entry.cumulative_score)),
            Cell::new(format!("{:.4}", entry.average)),
        ]);
    }
    println!("{table}");
}

/// Rang de meilleure moyenne d'un maillon, « — » tant qu'il n'a reçu aucun événement.
fn link_leader(link: &LinkReport) -> (String, String) {
    if link.sample_size == 0 {
        return ("—".to_string(), "—".to_string());
    }
    link.entries
        .iter()
        .max_by(|a, b| a.average.partial_cmp(&b.average).unwrap_or(Ordering::Equal))
        .map(|e| (e.rank.to_string(), format!("{:.4}", e.average)))
        .unwrap_or_else(|| ("—".to_string(), "—".to_string()))
}

pub fn display_chain_summary(report: &EngineReport) {
    println!("\n── Chaîne ordinale ──");
    let mut table = new_table(vec!["Niveau", "Échantillons", "Moyenne max", "Rang en tête"]);

    for link in &report.links {
        let (best_rank, best_avg) = link_leader(link);
        table.add_row(vec![
            link.level.to_string(),
            link.sample_size.to_string(),
            best_avg,
            best_rank,
        ]);
    }
    println!("{table}");
}

pub fn display_link(link: &LinkReport) {
    println!("\n── Niveau ordinal {} ({} échantillons) ──", link.level, link.sample_size);
    let mut table = new_table(vec!["Position", "Rang", "Tombés", "Occasions", "Moyenne", "Score cumulé"]);

    for (i, entry) in link.entries.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            entry.rank.to_string(),
            entry.landed_total.to_string(),
            entry.opportunities.to_string(),
            format!("{:.4}", entry.average),
            format!("{:.4}", entry.cumulative_score),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use picks_engine::RankEntry;

    fn entry(rank: usize, landed_total: u32, opportunities: u32) -> RankEntry {
        RankEntry {
            rank,
            landed_total,
            opportunities,
            average: if opportunities == 0 { 0.0 } else { landed_total as f64 / opportunities as f64 },
            cumulative_score: 0.0,
        }
    }

    #[test]
    fn test_link_leader_empty_link() {
        let link = LinkReport {
            level: 1,
            sample_size: 0,
            entries: vec![entry(1, 0, 0), entry(2, 0, 0), entry(3, 0, 0)],
        };
        assert_eq!(link_leader(&link), ("—".to_string(), "—".to_string()));
    }

    #[test]
    fn test_link_leader_best_average() {
        // table non triée : le meilleur rang n'est pas en dernière position
        let link = LinkReport {
            level: 2,
            sample_size: 3,
            entries: vec![entry(2, 1, 4), entry(3, 2, 2), entry(1, 0, 3)],
        };
        assert_eq!(link_leader(&link), ("3".to_string(), "1.0000".to_string()));
    }
}
