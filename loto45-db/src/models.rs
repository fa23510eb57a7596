use anyhow::{bail, Result};

/// Taille du domaine : numéros de 1 à 45.
pub const DOMAIN_SIZE: u8 = 45;

/// Nombre de numéros par combinaison.
pub const PICK_COUNT: usize = 6;

/// Un tirage historique. Immuable une fois importé ; le moteur de synthèse
/// ne lit l'archive qu'en lecture seule.
#[derive(Debug, Clone)]
pub struct Draw {
    pub sequence: u32,
    pub date: String,
    pub numbers: [u8; 6],
    pub bonus: u8,
}

pub fn validate_draw(numbers: &[u8; 6], bonus: u8) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > DOMAIN_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, DOMAIN_SIZE);
        }
    }
    if bonus < 1 || bonus > DOMAIN_SIZE {
        bail!("Numéro bonus {} hors limites (1-{})", bonus, DOMAIN_SIZE);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Tirages de test synthétiques, du plus récent au plus ancien.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 8) as u8;
            Draw {
                sequence: (n - i) as u32,
                date: format!("2024-01-{:02}", (i % 28) + 1),
                numbers: [
                    base * 5 + 1,
                    base * 5 + 2,
                    base * 5 + 3,
                    base * 5 + 4,
                    base * 5 + 5,
                    (base * 5 + 10).min(DOMAIN_SIZE),
                ],
                bonus: (base % DOMAIN_SIZE) + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[40, 41, 42, 43, 44, 45], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 46], 7).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 0).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 46).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
    }

    #[test]
    fn test_make_test_draws_valid() {
        for draw in make_test_draws(20) {
            assert!(validate_draw(&draw.numbers, draw.bonus).is_ok());
        }
    }
}
