mod analysis;
mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};

use loto45_db::db::{count_draws, db_path, fetch_last_draws, insert_draw, migrate, open_db};
use loto45_db::models::{validate_draw, Draw};
use loto45_engine::engine::{run, EngineRequest};
use loto45_engine::filter::{FilterConfig, Strategy};
use loto45_engine::metrics;

#[derive(Parser)]
#[command(name = "loto45", about = "Synthèse de combinaisons sous contraintes (6/45)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'archive des tirages depuis un CSV (séquence;date;n1..n6;bonus)
    Import {
        /// Fichier CSV
        file: PathBuf,
    },

    /// Ajouter un tirage : numéro de séquence, date, 6 numéros, bonus
    Add {
        sequence: u32,
        date: String,
        /// 6 numéros principaux puis le bonus (7 nombres)
        numbers: Vec<u8>,
    },

    /// Historique des derniers tirages
    History {
        /// Nombre de tirages
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Générer une grille satisfaisant un jeu de contraintes
    Generate {
        /// Fichier de contraintes JSON (défaut : contraintes larges)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stratégie : uniform, zones, entropy, frequency, coverage, wheel
        #[arg(short, long)]
        strategy: Option<String>,

        /// Somme minimale
        #[arg(long)]
        sum_min: Option<u32>,

        /// Somme maximale
        #[arg(long)]
        sum_max: Option<u32>,

        /// Indice AC minimal
        #[arg(long)]
        ac_min: Option<u8>,

        /// Parité exacte, p.ex. 3:3
        #[arg(long)]
        parity: Option<String>,

        /// Numéros imposés (au plus 2)
        #[arg(long, value_delimiter = ',')]
        fixed: Vec<u8>,

        /// Numéros exclus
        #[arg(long, value_delimiter = ',')]
        excluded: Vec<u8>,

        /// Réservoir de la roue (7 à 12 numéros)
        #[arg(long, value_delimiter = ',')]
        pool: Vec<u8>,

        /// Graine pour la reproductibilité (défaut : date du jour AAAAMMJJ)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Roue réduite : tickets couvrant toutes les paires d'un réservoir
    Wheel {
        /// 7 à 12 numéros du réservoir
        numbers: Vec<u8>,
    },

    /// Statistiques côté appelant d'une grille (z-score, chi-deux de zones)
    Stats {
        /// 6 numéros
        numbers: Vec<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Add { sequence, date, numbers } => cmd_add(&conn, sequence, &date, &numbers),
        Command::History { last } => cmd_history(&conn, last),
        Command::Generate {
            config,
            strategy,
            sum_min,
            sum_max,
            ac_min,
            parity,
            fixed,
            excluded,
            pool,
            seed,
        } => {
            let config = build_config(
                config.as_deref(),
                strategy.as_deref(),
                sum_min,
                sum_max,
                ac_min,
                parity,
                fixed,
                excluded,
                pool,
            )?;
            cmd_generate(&conn, config, seed)
        }
        Command::Wheel { numbers } => cmd_wheel(&conn, numbers),
        Command::Stats { numbers } => cmd_stats(&conn, &numbers),
    }
}

/// Graine déterministe basée sur la date du jour (AAAAMMJJ).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn parse_strategy(s: &str) -> Result<Strategy> {
    match s.trim().to_lowercase().as_str() {
        "uniform" | "uniforme" => Ok(Strategy::Uniform),
        "zones" => Ok(Strategy::Zones),
        "entropy" | "entropie" => Ok(Strategy::Entropy),
        "frequency" | "frequence" | "fréquence" => Ok(Strategy::Frequency),
        "coverage" | "couverture" => Ok(Strategy::Coverage),
        "wheel" | "roue" => Ok(Strategy::Wheel),
        other => bail!("Stratégie inconnue : '{}'", other),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_config(
    config_path: Option<&Path>,
    strategy: Option<&str>,
    sum_min: Option<u32>,
    sum_max: Option<u32>,
    ac_min: Option<u8>,
    parity: Option<String>,
    fixed: Vec<u8>,
    excluded: Vec<u8>,
    pool: Vec<u8>,
) -> Result<FilterConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Impossible de lire {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Contraintes invalides dans {:?}", path))?
        }
        None => FilterConfig::default(),
    };

    if let Some(s) = strategy {
        config.strategy = parse_strategy(s)?;
    }
    if let Some(lo) = sum_min {
        config.sum_range.0 = lo;
    }
    if let Some(hi) = sum_max {
        config.sum_range.1 = hi;
    }
    if let Some(ac) = ac_min {
        config.ac_min = ac;
    }
    if parity.is_some() {
        config.parity = parity;
    }
    if !fixed.is_empty() {
        config.fixed = fixed;
    }
    if !excluded.is_empty() {
        config.excluded = excluded;
    }
    if !pool.is_empty() {
        config.pool = pool;
    }

    // Validation côté appelant : le moteur suppose une configuration saine.
    config.validate()?;
    Ok(config)
}

fn cmd_import(conn: &loto45_db::rusqlite::Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    println!(
        "Import terminé : {} lignes, {} insérées, {} ignorées, {} erreurs.",
        result.total_records, result.inserted, result.skipped, result.errors
    );
    Ok(())
}

fn cmd_add(
    conn: &loto45_db::rusqlite::Connection,
    sequence: u32,
    date: &str,
    numbers: &[u8],
) -> Result<()> {
    if numbers.len() != 7 {
        bail!("Attendu 7 nombres : 6 numéros + le bonus. Reçu : {}", numbers.len());
    }
    let mut nums: [u8; 6] = [
        numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5],
    ];
    let bonus = numbers[6];
    validate_draw(&nums, bonus)?;
    nums.sort();

    let draw = Draw {
        sequence,
        date: date.to_string(),
        numbers: nums,
        bonus,
    };
    if insert_draw(conn, &draw)? {
        println!("Tirage {} ajouté.", sequence);
    } else {
        println!("Tirage {} déjà présent, ignoré.", sequence);
    }
    Ok(())
}

fn cmd_history(conn: &loto45_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : loto45 import");
    }
    let draws = fetch_last_draws(conn, last)?;
    display::display_history(&draws);
    Ok(())
}

fn cmd_generate(
    conn: &loto45_db::rusqlite::Connection,
    config: FilterConfig,
    seed: Option<u64>,
) -> Result<()> {
    let n = count_draws(conn)?;
    let history = if n > 0 { fetch_last_draws(conn, n)? } else { Vec::new() };
    if history.is_empty() {
        println!("(Archive vide : répartition de référence par défaut)");
    }

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Graine du jour : {ds})");
        ds
    });

    let strategy_label = config.strategy.to_string();
    let request = EngineRequest {
        config,
        history,
        lead_ref: None,
        seed: Some(effective_seed),
    };
    let outcome = run(request)?;
    display::display_outcome(&outcome, &strategy_label);
    Ok(())
}

fn cmd_wheel(conn: &loto45_db::rusqlite::Connection, numbers: Vec<u8>) -> Result<()> {
    let config = FilterConfig {
        strategy: Strategy::Wheel,
        pool: numbers,
        ..Default::default()
    };
    config.validate()?;
    cmd_generate(conn, config, None)
}

fn cmd_stats(conn: &loto45_db::rusqlite::Connection, numbers: &[u8]) -> Result<()> {
    if numbers.len() != 6 {
        bail!("Attendu 6 numéros. Reçu : {}", numbers.len());
    }
    let mut combo: [u8; 6] = [
        numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5],
    ];
    validate_draw(&combo, 1)?;
    combo.sort();

    let n = count_draws(conn)?;
    let history = if n > 0 { fetch_last_draws(conn, n)? } else { Vec::new() };

    let lead_ref = metrics::lead_digit_reference(&history);
    let prior = history.first().map(|d| &d.numbers);
    let m = metrics::score(&combo, prior, &lead_ref);
    display::display_metrics(&m);

    let zscore = analysis::sum_zscore(m.sum, &history);
    let chi2 = analysis::zone_chi2(&combo);
    display::display_grid_stats(&combo, zscore, chi2);
    Ok(())
}
