use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use loto45_db::models::Draw;
use loto45_engine::combo::Combination;
use loto45_engine::metrics::Metrics;
use loto45_engine::search::SearchOutcome;

fn format_combo(combo: &Combination) -> String {
    combo
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_history(draws: &[Draw]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros", "Bonus"]);

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();
        table.add_row(vec![
            draw.sequence.to_string(),
            draw.date.clone(),
            format_combo(&sorted),
            draw.bonus.to_string(),
        ]);
    }

    println!("{table}");
}

pub fn display_metrics(m: &Metrics) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Descripteur", "Valeur"]);

    table.add_row(vec!["Somme".to_string(), m.sum.to_string()]);
    table.add_row(vec!["Somme avant (3 premiers)".to_string(), m.front_sum.to_string()]);
    table.add_row(vec!["Somme arrière (3 derniers)".to_string(), m.back_sum.to_string()]);
    table.add_row(vec!["Indice AC".to_string(), m.ac_index.to_string()]);
    table.add_row(vec!["Parité (impairs:pairs)".to_string(), m.parity.clone()]);
    table.add_row(vec!["Bas:hauts".to_string(), m.high_low.clone()]);
    table.add_row(vec!["Suites consécutives".to_string(), m.runs.to_string()]);
    table.add_row(vec!["Terminaisons en double".to_string(), m.same_endings.to_string()]);
    table.add_row(vec!["Nombres premiers".to_string(), m.primes.to_string()]);
    table.add_row(vec!["Report".to_string(), m.carry_over.to_string()]);
    table.add_row(vec!["Voisins".to_string(), m.neighbors.to_string()]);
    table.add_row(vec!["Écart minimal".to_string(), m.min_gap.to_string()]);
    table.add_row(vec!["Écart moyen".to_string(), format!("{:.2}", m.avg_gap)]);
    table.add_row(vec!["Score d'ajustement".to_string(), format!("{:.1}", m.fit_score)]);

    println!("{table}");
}

pub fn display_outcome(outcome: &SearchOutcome, strategy_label: &str) {
    println!("\n== Grille proposée ({strategy_label}) ==\n");
    println!("  {}", format_combo(&outcome.candidate));
    if outcome.accepted {
        println!("  Contraintes satisfaites en {} itération(s).", outcome.iterations);
    } else {
        println!(
            "  Budget épuisé ({} itérations) : meilleure tentative, contraintes non satisfaites.",
            outcome.iterations
        );
    }
    display_metrics(&outcome.metrics);

    if !outcome.auxiliary.is_empty() {
        display_tickets(&outcome.auxiliary);
    }
}

pub fn display_tickets(tickets: &[Combination]) {
    println!("\n== Tickets complémentaires ==\n");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros"]);
    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(vec![(i + 2).to_string(), format_combo(ticket)]);
    }
    println!("{table}");
}

pub fn display_grid_stats(combo: &Combination, zscore: f64, chi2: f64) {
    println!("\n== Statistiques de la grille ==\n");
    println!("  {}", format_combo(combo));
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Statistique", "Valeur"]);
    table.add_row(vec!["Z-score de la somme".to_string(), format!("{:+.3}", zscore)]);
    table.add_row(vec!["Chi-deux des zones".to_string(), format!("{:.3}", chi2)]);
    println!("{table}");
}
