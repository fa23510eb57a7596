use anyhow::{bail, Context, Result};
use loto45_db::rusqlite::Connection;
use std::path::Path;

use loto45_db::db::insert_draw;
use loto45_db::models::{validate_draw, Draw};

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let sequence: u32 = get(0)?
        .parse()
        .with_context(|| "Numéro de tirage invalide".to_string())?;
    let date = parse_date(&get(1)?)?;

    let numbers: [u8; 6] = [
        get_u8(2)?,
        get_u8(3)?,
        get_u8(4)?,
        get_u8(5)?,
        get_u8(6)?,
        get_u8(7)?,
    ];
    let bonus = get_u8(8)?;

    validate_draw(&numbers, bonus)?;

    Ok(Draw { sequence, date, numbers, bonus })
}

fn parse_date(raw: &str) -> Result<String> {
    // Accepte AAAA-MM-JJ tel quel, ou JJ/MM/AAAA.
    if raw.len() == 10 && raw.as_bytes()[4] == b'-' {
        return Ok(raw.to_string());
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide : '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        eprintln!("Erreur insertion tirage {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
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

    #[test]
    fn test_parse_date_iso_kept() {
        assert_eq!(parse_date("2024-03-09").unwrap(), "2024-03-09");
    }

    #[test]
    fn test_parse_date_slash_converted() {
        assert_eq!(parse_date("09/03/2024").unwrap(), "2024-03-09");
        assert!(parse_date("09-03").is_err());
    }

    #[test]
    fn test_parse_record_valid() {
        let record = csv::StringRecord::from(vec![
            "1104", "2024-03-09", "3", "8", "19", "27", "30", "41", "22",
        ]);
        let draw = parse_record(&record).unwrap();
        assert_eq!(draw.sequence, 1104);
        assert_eq!(draw.numbers, [3, 8, 19, 27, 30, 41]);
        assert_eq!(draw.bonus, 22);
    }

    #[test]
    fn test_parse_record_rejects_out_of_range() {
        let record = csv::StringRecord::from(vec![
            "1104", "2024-03-09", "3", "8", "19", "27", "30", "46", "22",
        ]);
        assert!(parse_record(&record).is_err());
    }
}
