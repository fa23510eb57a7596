use loto45_db::models::Draw;

use crate::combo::Combination;

/// Les 14 nombres premiers ≤ 43.
pub const PRIMES: [u8; 14] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43];

/// Zones fixes du domaine (bornes incluses).
pub const ZONES: [(u8, u8); 5] = [(1, 9), (10, 19), (20, 29), (30, 39), (40, 45)];

/// Frontière bas/haut : 1-22 bas, 23-45 haut.
pub const LOW_MAX: u8 = 22;

/// Facteur d'échelle du score d'ajustement aux premiers chiffres.
const FIT_SCALE: f64 = 120.0;

/// Répartition des premiers chiffres sur un domaine [1,45] uniforme.
/// Utilisée uniquement quand l'archive est vide.
pub const DEFAULT_LEAD_DIGITS: [f64; 9] = [
    11.0 / 45.0,
    11.0 / 45.0,
    11.0 / 45.0,
    7.0 / 45.0,
    1.0 / 45.0,
    1.0 / 45.0,
    1.0 / 45.0,
    1.0 / 45.0,
    1.0 / 45.0,
];

/// Descripteurs d'une combinaison. Recalculés à chaque évaluation, jamais
/// mis en cache : une combinaison n'est jamais réévaluée.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub sum: u32,
    pub front_sum: u32,
    pub back_sum: u32,
    pub ac_index: u8,
    pub parity: String,
    pub high_low: String,
    pub runs: u8,
    pub same_endings: u8,
    pub primes: u8,
    pub carry_over: u8,
    pub neighbors: u8,
    pub min_gap: u8,
    pub avg_gap: f64,
    pub fit_score: f64,
    pub lead_digits: [u8; 9],
}

/// Indice de complexité arithmétique : nombre de différences absolues
/// distinctes parmi les C(6,2)=15 paires, moins 5. Borné à [0,10].
/// Une progression arithmétique stricte donne 0.
pub fn ac_index(combo: &Combination) -> u8 {
    let mut diffs = Vec::with_capacity(15);
    for i in 0..combo.len() {
        for j in (i + 1)..combo.len() {
            diffs.push(combo[j].abs_diff(combo[i]));
        }
    }
    diffs.sort();
    diffs.dedup();
    (diffs.len() as u8).saturating_sub(5)
}

fn lead_digit(n: u8) -> usize {
    if n < 10 { n as usize } else { (n / 10) as usize }
}

/// Évalue une combinaison triée. Fonction pure : mêmes entrées, mêmes
/// descripteurs. `prior` est le tirage le plus récent de l'archive.
pub fn score(combo: &Combination, prior: Option<&[u8; 6]>, lead_ref: &[f64; 9]) -> Metrics {
    let sum: u32 = combo.iter().map(|&n| n as u32).sum();
    let front_sum: u32 = combo[..3].iter().map(|&n| n as u32).sum();
    let back_sum: u32 = combo[3..].iter().map(|&n| n as u32).sum();

    let odd = combo.iter().filter(|&&n| n % 2 == 1).count();
    let parity = format!("{}:{}", odd, combo.len() - odd);

    let low = combo.iter().filter(|&&n| n <= LOW_MAX).count();
    let high_low = format!("{}:{}", low, combo.len() - low);

    let runs = combo.windows(2).filter(|w| w[1] - w[0] == 1).count() as u8;

    let mut endings: Vec<u8> = combo.iter().map(|&n| n % 10).collect();
    endings.sort();
    endings.dedup();
    let same_endings = combo.len() as u8 - endings.len() as u8;

    let primes = combo.iter().filter(|n| PRIMES.contains(n)).count() as u8;

    // Report et voisinage : deux comptes indépendants, un numéro repris peut
    // aussi compter comme voisin d'un autre numéro du tirage précédent.
    let (carry_over, neighbors) = match prior {
        Some(prev) => {
            let carry = combo.iter().filter(|n| prev.contains(n)).count() as u8;
            let neigh = combo
                .iter()
                .filter(|&&n| {
                    prev.iter().any(|&p| {
                        (n > 1 && p == n - 1) || (n < 45 && p == n + 1)
                    })
                })
                .count() as u8;
            (carry, neigh)
        }
        None => (0, 0),
    };

    let gaps: Vec<u8> = combo.windows(2).map(|w| w[1] - w[0]).collect();
    let min_gap = gaps.iter().copied().min().unwrap_or(0);
    let avg_gap = gaps.iter().map(|&g| g as f64).sum::<f64>() / gaps.len() as f64;

    let mut lead_digits = [0u8; 9];
    for &n in combo {
        lead_digits[lead_digit(n) - 1] += 1;
    }
    let deviation: f64 = (0..9)
        .map(|d| {
            let observed = lead_digits[d] as f64 / combo.len() as f64;
            (observed - lead_ref[d]).powi(2)
        })
        .sum();
    let fit_score = (100.0 - FIT_SCALE * deviation.sqrt()).clamp(0.0, 100.0);

    Metrics {
        sum,
        front_sum,
        back_sum,
        ac_index: ac_index(combo),
        parity,
        high_low,
        runs,
        same_endings,
        primes,
        carry_over,
        neighbors,
        min_gap,
        avg_gap,
        fit_score,
        lead_digits,
    }
}

/// Répartition de référence des premiers chiffres, dérivée de l'archive
/// réelle. Le domaine [1,45] ne suit pas une loi logarithmique : la
/// référence doit venir des tirages observés, pas d'une constante théorique.
pub fn lead_digit_reference(draws: &[Draw]) -> [f64; 9] {
    if draws.is_empty() {
        return DEFAULT_LEAD_DIGITS;
    }
    let mut counts = [0u32; 9];
    for draw in draws {
        for &n in &draw.numbers {
            counts[lead_digit(n) - 1] += 1;
        }
    }
    let total: u32 = counts.iter().sum();
    let mut dist = [0.0f64; 9];
    for d in 0..9 {
        dist[d] = counts[d] as f64 / total as f64;
    }
    dist
}
