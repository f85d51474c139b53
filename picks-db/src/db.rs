use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{format_numbers, parse_numbers, Draw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    date     TEXT NOT NULL,
    numbers  TEXT NOT NULL,
    UNIQUE (date, numbers)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("picks.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (date, numbers) VALUES (?1, ?2)",
        rusqlite::params![draw.date, format_numbers(&draw.numbers)],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row) -> rusqlite::Result<Draw> {
    let numbers: String = row.get(2)?;
    let numbers = parse_numbers(&numbers).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Draw {
        index: row.get(0)?,
        date: row.get(1)?,
        numbers,
    })
}

/// Tous les tirages dans l'ordre d'import, c'est-à-dire l'ordre des fichiers lus.
///
/// Le moteur rejoue les tirages dans cet ordre : trier par date changerait ses résultats
/// pour un historique écrit du plus récent au plus ancien.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, numbers FROM draws ORDER BY id ASC"
    )?;
    let draws = stmt.query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, numbers FROM draws ORDER BY date DESC, id DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
