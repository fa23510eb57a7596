use anyhow::Result;
use rand::rngs::StdRng;

use crate::combo::Combination;
use crate::metrics::ac_index;
use super::uniform::UniformGenerator;
use super::{Generator, StrategyContext};

/// Candidats uniformes tirés par appel ; le meilleur indice AC l'emporte.
pub const CANDIDATES_PER_CALL: usize = 50;

/// Recherche d'entropie : 50 candidats uniformes, garde celui dont l'indice
/// de complexité arithmétique est le plus élevé.
pub struct EntropyGenerator;

impl Generator for EntropyGenerator {
    fn name(&self) -> &str {
        "entropie maximale"
    }

    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination> {
        let mut best = UniformGenerator.generate(ctx, rng)?;
        let mut best_ac = ac_index(&best);
        for _ in 1..CANDIDATES_PER_CALL {
            let candidate = UniformGenerator.generate(ctx, rng)?;
            let ac = ac_index(&candidate);
            if ac > best_ac {
                best = candidate;
                best_ac = ac;
            }
        }
        Ok(best)
    }
}
