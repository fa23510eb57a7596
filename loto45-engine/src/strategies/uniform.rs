use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::combo::{assemble, Combination};
use super::{Generator, StrategyContext};

/// Mélange de Fisher-Yates sur le domaine éligible, puis prise des premiers
/// numéros pour remplir les places restantes.
pub struct UniformGenerator;

impl Generator for UniformGenerator {
    fn name(&self) -> &str {
        "uniforme"
    }

    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination> {
        let mut pool = ctx.eligible.clone();
        pool.shuffle(rng);
        Ok(assemble(&ctx.fixed, pool.into_iter().take(ctx.slots())))
    }
}
