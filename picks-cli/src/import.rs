use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use picks_db::rusqlite::Connection;
use std::path::Path;
use tracing::warn;

use picks_db::db::insert_draw;
use picks_db::models::{Draw, DrawFormat, validate_draw};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

fn parse_record(record: &csv::StringRecord, index: u64, format: DrawFormat) -> Result<Draw> {
    if record.len() != format.slots + 1 {
        bail!(
            "{} champs au lieu de {} (date + {} numéros)",
            record.len(),
            format.slots + 1,
            format.slots
        );
    }

    let date = parse_date(&record[0])?;
    let numbers = record
        .iter()
        .skip(1)
        .enumerate()
        .map(|(idx, field)| {
            let field = field.trim();
            field
                .parse::<u8>()
                .with_context(|| format!("Impossible de parser '{}' (numéro {})", field, idx + 1))
        })
        .collect::<Result<Vec<u8>>>()?;

    validate_draw(&numbers, format)?;
    Ok(Draw { index, date, numbers })
}

pub struct ReadResult {
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub errors: u32,
}

/// Lit l'historique des tirages (en-tête ignoré) dans l'ordre du fichier.
///
/// Les lignes invalides sont signalées et écartées ; elles n'atteignent jamais le moteur.
pub fn read_draw_history(path: &Path, format: DrawFormat) -> Result<ReadResult> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut result = ReadResult {
        draws: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        // ligne 1 = en-tête
        let line = result.total_records + 1;
        match record_result {
            Ok(record) => match parse_record(&record, result.total_records as u64, format) {
                Ok(draw) => result.draws.push(draw),
                Err(e) => {
                    warn!(line, "ligne ignorée : {e:#}");
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line, "erreur de lecture : {e}");
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, format: DrawFormat) -> Result<ImportResult> {
    let read = read_draw_history(path, format)?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: read.total_records,
        inserted: 0,
        skipped: 0,
        errors: read.errors,
    };

    for draw in &read.draws {
        match insert_draw(&tx, draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                warn!(date = %draw.date, "erreur insertion : {e:#}");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use picks_db::db::{count_draws, fetch_all_draws, migrate};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = "\
date,n1,n2,n3,n4,n5,n6,bonus
2015-01-03,1,2,3,4,5,6,7
2015-01-07,8,9,10,11,12,13,14
2015-01-10,8,9,10,11,12,13
2015-01-14,8,9,10,11,12,13,50
2015-01-17,8,8,10,11,12,13,14
pas-une-date,1,2,3,4,5,6,7
01/21/2015, 15, 16, 17, 18, 19, 20, 21
";

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2015-10-31").unwrap().to_string(), "2015-10-31");
        assert_eq!(parse_date("10/31/2015").unwrap().to_string(), "2015-10-31");
        assert!(parse_date("31.10.2015").is_err());
    }

    #[test]
    fn test_read_skips_malformed_rows() {
        let file = write_csv(SAMPLE);
        let result = read_draw_history(file.path(), DrawFormat::default()).unwrap();
        assert_eq!(result.total_records, 7);
        assert_eq!(result.errors, 4);
        assert_eq!(result.draws.len(), 3);
        assert_eq!(result.draws[0].numbers, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.draws[2].numbers, vec![15, 16, 17, 18, 19, 20, 21]);
        assert_eq!(result.draws[2].date.to_string(), "2015-01-21");
        let indices: Vec<u64> = result.draws.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![1, 2, 7]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_draw_history(&dir.path().join("absent.csv"), DrawFormat::default()).is_err());
    }

    #[test]
    fn test_import_ignores_duplicates() {
        let file = write_csv(SAMPLE);
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let first = import_csv(&conn, file.path(), DrawFormat::default()).unwrap();
        assert_eq!(first.inserted, 3);
        assert_eq!(first.errors, 4);

        let second = import_csv(&conn, file.path(), DrawFormat::default()).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(count_draws(&conn).unwrap(), 3);

        let stored = fetch_all_draws(&conn).unwrap();
        assert_eq!(stored[1].numbers, vec![8, 9, 10, 11, 12, 13, 14]);
    }
}
