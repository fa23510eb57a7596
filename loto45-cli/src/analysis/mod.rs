//! Statistiques côté appelant : elles consomment la sortie du moteur et
//! l'archive complète. Le moteur ne calcule que des descripteurs internes à
//! la combinaison ; le z-score de somme et le chi-deux de zones vivent ici.

use loto45_db::models::Draw;
use loto45_engine::combo::Combination;
use loto45_engine::metrics::ZONES;

/// Écart réduit de la somme d'une grille par rapport à la distribution des
/// sommes observées dans l'archive.
pub fn sum_zscore(sum: u32, draws: &[Draw]) -> f64 {
    if draws.is_empty() {
        return 0.0;
    }
    let sums: Vec<f64> = draws
        .iter()
        .map(|d| d.numbers.iter().map(|&n| n as f64).sum())
        .collect();
    let mean = sums.iter().sum::<f64>() / sums.len() as f64;
    let variance = sums.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sums.len() as f64;
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    (sum as f64 - mean) / std
}

/// Chi-deux d'uniformité des zones : répartition des 6 numéros sur les 5
/// zones fixes contre l'attendu proportionnel à la taille de chaque zone.
pub fn zone_chi2(combo: &Combination) -> f64 {
    let mut observed = [0.0f64; 5];
    for &n in combo {
        for (z, &(lo, hi)) in ZONES.iter().enumerate() {
            if n >= lo && n <= hi {
                observed[z] += 1.0;
            }
        }
    }
    ZONES
        .iter()
        .enumerate()
        .map(|(z, &(lo, hi))| {
            let expected = 6.0 * (hi - lo + 1) as f64 / 45.0;
            (observed[z] - expected).powi(2) / expected
        })
        .sum()
}
