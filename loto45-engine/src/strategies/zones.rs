use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::combo::{assemble, Combination};
use crate::metrics::ZONES;
use super::{Generator, StrategyContext};

/// Un numéro par zone, zones parcourues dans un ordre mélangé, en cycle
/// jusqu'à remplir la grille. Si les zones s'épuisent, repli uniforme sur
/// les numéros éligibles restants.
pub struct ZoneBalancedGenerator;

impl Generator for ZoneBalancedGenerator {
    fn name(&self) -> &str {
        "zones équilibrées"
    }

    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination> {
        let mut buckets: Vec<Vec<u8>> = ZONES
            .iter()
            .map(|&(lo, hi)| {
                ctx.eligible.iter().copied().filter(|&n| n >= lo && n <= hi).collect()
            })
            .collect();
        buckets.shuffle(rng);

        let mut drawn: Vec<u8> = Vec::with_capacity(ctx.slots());
        while drawn.len() < ctx.slots() && buckets.iter().any(|b| !b.is_empty()) {
            for bucket in &mut buckets {
                if drawn.len() >= ctx.slots() {
                    break;
                }
                if bucket.is_empty() {
                    continue;
                }
                let idx = rng.random_range(0..bucket.len());
                drawn.push(bucket.swap_remove(idx));
            }
        }

        // Repli uniforme : zones épuisées avant d'avoir rempli la grille.
        if drawn.len() < ctx.slots() {
            let mut rest: Vec<u8> = ctx
                .eligible
                .iter()
                .copied()
                .filter(|n| !drawn.contains(n))
                .collect();
            rest.shuffle(rng);
            drawn.extend(rest.into_iter().take(ctx.slots() - drawn.len()));
        }

        Ok(assemble(&ctx.fixed, drawn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::is_valid;
    use crate::filter::FilterConfig;
    use rand::SeedableRng;

    fn zone_of(n: u8) -> usize {
        ZONES.iter().position(|&(lo, hi)| n >= lo && n <= hi).unwrap()
    }

    #[test]
    fn test_zones_spread_across_zones() {
        let config = FilterConfig::default();
        let ctx = StrategyContext::new(&config, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let combo = ZoneBalancedGenerator.generate(&ctx, &mut rng).unwrap();
            assert!(is_valid(&combo));
            // 6 numéros sur 5 zones : chaque zone porte au plus 2 numéros.
            let mut per_zone = [0u8; 5];
            for &n in &combo {
                per_zone[zone_of(n)] += 1;
            }
            assert!(per_zone.iter().all(|&c| c <= 2), "{:?}", combo);
        }
    }

    #[test]
    fn test_zones_fallback_when_zones_exhausted() {
        // Tout le domaine exclu sauf la première zone : le repli uniforme
        // doit quand même produire une grille complète.
        let config = FilterConfig {
            excluded: (10..=45).collect(),
            ..Default::default()
        };
        let ctx = StrategyContext::new(&config, &[]);
        let mut rng = StdRng::seed_from_u64(9);
        let combo = ZoneBalancedGenerator.generate(&ctx, &mut rng).unwrap();
        assert!(is_valid(&combo));
        assert!(combo.iter().all(|&n| n <= 9));
    }
}
