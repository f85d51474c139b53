mod combinations;
mod config;
mod display;
mod import;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::combinations::generate_combination_file;
use crate::config::{PicksConfig, config_or_default, load_config};
use crate::display::{
    display_chain_summary, display_combination_summary, display_draws, display_engine_state,
    display_import_summary, display_ledger, display_link, display_ranking, display_read_summary,
};
use picks_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, migrate, open_db};
use picks_db::models::Draw;
use picks_db::rusqlite::Connection;
use picks_engine::{EngineReport, StatEngine};

#[derive(Parser)]
#[command(name = "picks", about = "Statistiques ordinales sur l'historique des tirages 6/49")]
struct Cli {
    /// Fichier de configuration TOML
    #[arg(short, long, global = true, default_value = "picks.toml")]
    config: PathBuf,

    /// Journalisation détaillée
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'historique des tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (défaut : draw_history_file de la configuration)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Calculer le registre et la chaîne ordinale sur tout l'historique
    Analyse {
        /// Lire directement ce CSV au lieu de la base
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Nombre de niveaux ordinaux à détailler
        #[arg(long, default_value = "1")]
        links: usize,

        /// Nombre de numéros dans le classement
        #[arg(long, default_value = "10")]
        top: usize,

        /// Exporter le rapport complet en JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Tirages de préchauffage avant activation de la chaîne
        #[arg(long)]
        warmup: Option<u64>,

        /// Échantillons par maillon avant extension de la chaîne
        #[arg(long)]
        growth: Option<u64>,
    },

    /// Générer le fichier des combinaisons valides
    Combinations {
        /// Fichier de sortie (défaut : combination_file de la configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Régénérer même si le fichier existe
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(&cli.config)?;
    let debug_mode = loaded.as_ref().is_some_and(|c| c.debug_mode);
    logging::init_tracing(cli.debug || debug_mode);
    let mut config = config_or_default(loaded, &cli.config);
    debug!(?config, "configuration chargée");

    match cli.command {
        Command::Import { file } => {
            let file = file.unwrap_or_else(|| config.draw_history_file.clone());
            cmd_import(&open_store()?, &file, &config)
        }
        Command::DbPath => {
            println!("{}", db_path().display());
            Ok(())
        }
        Command::List { last } => cmd_list(&open_store()?, last),
        Command::Analyse {
            file,
            links,
            top,
            json,
            warmup,
            growth,
        } => {
            if let Some(w) = warmup {
                config.engine.warmup_threshold = w;
            }
            if let Some(g) = growth {
                config.engine.growth_threshold = g;
            }
            config.validate()?;
            cmd_analyse(&config, file.as_deref(), links, top, json.as_deref())
        }
        Command::Combinations { output, force } => {
            let output = output.unwrap_or_else(|| config.combination_file.clone());
            cmd_combinations(&config, &output, force)
        }
    }
}

fn open_store() -> Result<Connection> {
    let conn = open_db(&db_path())?;
    migrate(&conn)?;
    Ok(conn)
}

fn cmd_import(conn: &Connection, file: &Path, config: &PicksConfig) -> Result<()> {
    let result = import::import_csv(conn, file, config.draw_format())?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : picks import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_analyse(
    config: &PicksConfig,
    file: Option<&Path>,
    links: usize,
    top: usize,
    json: Option<&Path>,
) -> Result<()> {
    let draws: Vec<Draw> = match file {
        Some(path) => {
            let read = import::read_draw_history(path, config.draw_format())?;
            display_read_summary(&read);
            read.draws
        }
        None => {
            let conn = open_store()?;
            if count_draws(&conn)? == 0 {
                println!("Base vide. Lancez d'abord : picks import");
                return Ok(());
            }
            fetch_all_draws(&conn)?
        }
    };

    let report = run_engine(config, &draws)?;

    display_engine_state(&report);
    display_ledger(&report);
    display_ranking(&report, top);
    display_chain_summary(&report);
    for link in report.links.iter().take(links) {
        display_link(link);
    }

    if let Some(path) = json {
        save_report(&report, path)?;
        println!("\nRapport sauvegardé dans : {}", path.display());
    }
    Ok(())
}

fn run_engine(config: &PicksConfig, draws: &[Draw]) -> Result<EngineReport> {
    let mut engine = StatEngine::new(config.engine.clone())?;

    let pb = ProgressBar::new(draws.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .context("Gabarit de progression invalide")?
        .progress_chars("=> "));

    for draw in draws {
        engine
            .process_draw(&draw.numbers)
            .with_context(|| format!("Tirage n°{} du {} rejeté", draw.index, draw.date))?;
        pb.set_message(format!("{} maillon(s)", engine.chain().len()));
        pb.inc(1);
    }
    pb.finish_with_message("Ingestion terminée");

    engine.correlate();
    Ok(engine.report())
}

fn save_report(report: &EngineReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

fn cmd_combinations(config: &PicksConfig, output: &Path, force: bool) -> Result<()> {
    let summary = generate_combination_file(output, config.draw_format(), force)?;
    display_combination_summary(summary.as_ref(), output);
    Ok(())
}
