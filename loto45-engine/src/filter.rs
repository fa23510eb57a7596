use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use loto45_db::models::{DOMAIN_SIZE, PICK_COUNT};

use crate::metrics::Metrics;

/// Stratégies de génération disponibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Uniform,
    Zones,
    Entropy,
    Frequency,
    Coverage,
    Wheel,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Uniform => write!(f, "uniforme"),
            Strategy::Zones => write!(f, "zones équilibrées"),
            Strategy::Entropy => write!(f, "entropie maximale"),
            Strategy::Frequency => write!(f, "pondérée par fréquence"),
            Strategy::Coverage => write!(f, "couverture complète"),
            Strategy::Wheel => write!(f, "roue réduite"),
        }
    }
}

/// Jeu de contraintes. Un champ laissé à sa valeur par défaut (plage large,
/// option absente) est toujours vrai pour l'évaluateur. La validation est à
/// la charge de l'appelant : le moteur suppose une configuration bien formée.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub sum_range: (u32, u32),
    pub front_sum_max: u32,
    pub back_sum_max: u32,
    pub ac_min: u8,
    pub parity: Option<String>,
    pub high_low: Option<String>,
    pub prime_range: (u8, u8),
    pub max_run: u8,
    pub max_same_ending: u8,
    pub min_gap: u8,
    pub carry_range: (u8, u8),
    pub neighbor_range: (u8, u8),
    pub min_fit: Option<f64>,
    pub strategy: Strategy,
    pub fixed: Vec<u8>,
    pub excluded: Vec<u8>,
    pub pool: Vec<u8>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sum_range: (21, 255),
            front_sum_max: 132,
            back_sum_max: 132,
            ac_min: 0,
            parity: None,
            high_low: None,
            prime_range: (0, 6),
            max_run: 5,
            max_same_ending: 5,
            min_gap: 1,
            carry_range: (0, 6),
            neighbor_range: (0, 6),
            min_fit: None,
            strategy: Strategy::Uniform,
            fixed: Vec::new(),
            excluded: Vec::new(),
            pool: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// ET logique de tous les prédicats configurés. Aucun crédit partiel :
    /// un seul prédicat en échec rejette la combinaison.
    pub fn passes(&self, m: &Metrics) -> bool {
        if m.sum < self.sum_range.0 || m.sum > self.sum_range.1 {
            return false;
        }
        if m.front_sum > self.front_sum_max || m.back_sum > self.back_sum_max {
            return false;
        }
        if m.ac_index < self.ac_min {
            return false;
        }
        if let Some(parity) = &self.parity {
            if !parity.is_empty() && &m.parity != parity {
                return false;
            }
        }
        if let Some(high_low) = &self.high_low {
            if !high_low.is_empty() && &m.high_low != high_low {
                return false;
            }
        }
        if m.primes < self.prime_range.0 || m.primes > self.prime_range.1 {
            return false;
        }
        if m.runs > self.max_run {
            return false;
        }
        if m.same_endings > self.max_same_ending {
            return false;
        }
        if m.min_gap < self.min_gap {
            return false;
        }
        if m.carry_over < self.carry_range.0 || m.carry_over > self.carry_range.1 {
            return false;
        }
        if m.neighbors < self.neighbor_range.0 || m.neighbors > self.neighbor_range.1 {
            return false;
        }
        if let Some(min_fit) = self.min_fit {
            if m.fit_score < min_fit {
                return false;
            }
        }
        true
    }

    /// Validation côté appelant, à exécuter avant d'invoquer le moteur.
    pub fn validate(&self) -> Result<()> {
        for &(lo, hi) in &[self.carry_range, self.neighbor_range, self.prime_range] {
            if lo > hi {
                bail!("Plage invalide : {} > {}", lo, hi);
            }
        }
        if self.sum_range.0 > self.sum_range.1 {
            bail!("Plage de somme invalide : {} > {}", self.sum_range.0, self.sum_range.1);
        }
        if self.fixed.len() > 2 {
            bail!("Au plus 2 numéros imposés (reçu : {})", self.fixed.len());
        }
        for &n in self.fixed.iter().chain(&self.excluded).chain(&self.pool) {
            if n < 1 || n > DOMAIN_SIZE {
                bail!("Numéro {} hors limites (1-{})", n, DOMAIN_SIZE);
            }
        }
        if let Some(n) = self.fixed.iter().find(|n| self.excluded.contains(n)) {
            bail!("Le numéro {} est à la fois imposé et exclu", n);
        }
        if self.strategy == Strategy::Wheel {
            if self.pool.len() < 7 || self.pool.len() > 12 {
                bail!("La roue exige un réservoir de 7 à 12 numéros (reçu : {})", self.pool.len());
            }
            let mut sorted = self.pool.clone();
            sorted.sort();
            sorted.dedup();
            if sorted.len() != self.pool.len() {
                bail!("Le réservoir contient des doublons");
            }
        }
        // Le domaine restant doit permettre une combinaison complète.
        let eligible = DOMAIN_SIZE as usize - self.excluded.len();
        if eligible < PICK_COUNT {
            bail!("Trop de numéros exclus : il reste {} numéros éligibles", eligible);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{score, DEFAULT_LEAD_DIGITS};

    #[test]
    fn test_default_config_accepts_everything() {
        let config = FilterConfig::default();
        let m = score(&[1, 2, 3, 4, 5, 6], None, &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&m));
        let m = score(&[40, 41, 42, 43, 44, 45], None, &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&m));
    }

    #[test]
    fn test_sum_range_rejects() {
        let config = FilterConfig { sum_range: (121, 180), ..Default::default() };
        let low = score(&[1, 2, 3, 4, 5, 6], None, &DEFAULT_LEAD_DIGITS);
        assert!(!config.passes(&low));
        let mid = score(&[10, 15, 20, 25, 30, 35], None, &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&mid));
    }

    #[test]
    fn test_parity_exact_match() {
        let config = FilterConfig { parity: Some("3:3".to_string()), ..Default::default() };
        let m = score(&[1, 2, 3, 4, 5, 7], None, &DEFAULT_LEAD_DIGITS);
        assert_eq!(m.parity, "4:2");
        assert!(!config.passes(&m));
        let m = score(&[1, 2, 3, 4, 5, 6], None, &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&m));
    }

    #[test]
    fn test_empty_parity_string_is_unset() {
        let config = FilterConfig { parity: Some(String::new()), ..Default::default() };
        let m = score(&[1, 2, 3, 4, 5, 7], None, &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&m));
    }

    #[test]
    fn test_ac_min_rejects_progression() {
        let config = FilterConfig { ac_min: 7, ..Default::default() };
        let m = score(&[1, 2, 3, 4, 5, 6], None, &DEFAULT_LEAD_DIGITS);
        assert!(!config.passes(&m));
    }

    #[test]
    fn test_carry_range() {
        let prior = [1, 7, 13, 19, 25, 31];
        let config = FilterConfig { carry_range: (0, 0), ..Default::default() };
        let m = score(&[7, 8, 14, 20, 33, 40], Some(&prior), &DEFAULT_LEAD_DIGITS);
        assert!(!config.passes(&m));
        let m = score(&[2, 8, 14, 20, 33, 40], Some(&prior), &DEFAULT_LEAD_DIGITS);
        assert!(config.passes(&m));
    }

    #[test]
    fn test_min_fit_toggle() {
        let m = score(&[40, 41, 42, 43, 44, 45], None, &DEFAULT_LEAD_DIGITS);
        let off = FilterConfig::default();
        assert!(off.passes(&m));
        let on = FilterConfig { min_fit: Some(70.0), ..Default::default() };
        assert!(!on.passes(&m));
    }

    #[test]
    fn test_validate_fixed_excluded_overlap() {
        let config = FilterConfig {
            fixed: vec![7, 23],
            excluded: vec![23],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_too_many_fixed() {
        let config = FilterConfig { fixed: vec![1, 2, 3], ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_wheel_pool_size() {
        let mut config = FilterConfig { strategy: Strategy::Wheel, ..Default::default() };
        config.pool = vec![1, 2, 3, 4, 5, 6];
        assert!(config.validate().is_err());
        config.pool = vec![1, 2, 3, 4, 5, 6, 7];
        assert!(config.validate().is_ok());
        config.pool = (1..=13).collect();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = FilterConfig {
            sum_range: (100, 170),
            ac_min: 7,
            parity: Some("3:3".to_string()),
            strategy: Strategy::Entropy,
            fixed: vec![7, 23],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sum_range, (100, 170));
        assert_eq!(back.strategy, Strategy::Entropy);
        assert_eq!(back.fixed, vec![7, 23]);
    }
}
