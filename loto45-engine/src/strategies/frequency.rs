use anyhow::Result;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use crate::combo::{assemble, Combination};
use super::{Generator, StrategyContext};

/// Fenêtre d'observation des fréquences (tirages les plus récents).
pub const LOOKBACK: usize = 50;

/// Pondération inverse de la fréquence observée : un numéro peu sorti sur la
/// fenêtre reçoit un poids plus fort. poids = fréquence max + 1 − fréquence.
pub struct FrequencyGenerator;

/// Fréquence d'apparition de chaque numéro sur la fenêtre d'observation.
pub fn frequency_counts(ctx: &StrategyContext) -> [u32; 46] {
    let mut counts = [0u32; 46];
    let window = &ctx.history[..ctx.history.len().min(LOOKBACK)];
    for draw in window {
        for &n in &draw.numbers {
            counts[n as usize] += 1;
        }
    }
    counts
}

impl Generator for FrequencyGenerator {
    fn name(&self) -> &str {
        "pondérée par fréquence"
    }

    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination> {
        let counts = frequency_counts(ctx);
        let max_freq = ctx
            .eligible
            .iter()
            .map(|&n| counts[n as usize])
            .max()
            .unwrap_or(0);

        // Tirage pondéré sans remise jusqu'à remplir les places restantes.
        let mut available: Vec<(u8, f64)> = ctx
            .eligible
            .iter()
            .map(|&n| (n, (max_freq + 1 - counts[n as usize]) as f64))
            .collect();
        let mut drawn = Vec::with_capacity(ctx.slots());

        for _ in 0..ctx.slots() {
            let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
            let dist = WeightedIndex::new(&weights)?;
            let idx = dist.sample(rng);
            let (number, _) = available.remove(idx);
            drawn.push(number);
        }

        Ok(assemble(&ctx.fixed, drawn))
    }
}
