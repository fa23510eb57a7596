pub mod coverage;
pub mod entropy;
pub mod frequency;
pub mod uniform;
pub mod zones;

use anyhow::Result;
use rand::rngs::StdRng;

use loto45_db::models::{Draw, DOMAIN_SIZE, PICK_COUNT};

use crate::combo::Combination;
use crate::filter::{FilterConfig, Strategy};

/// Contexte partagé par les générateurs : domaine éligible, numéros imposés,
/// archive des tirages (du plus récent au plus ancien).
pub struct StrategyContext<'a> {
    pub eligible: Vec<u8>,
    pub fixed: Vec<u8>,
    pub history: &'a [Draw],
}

impl<'a> StrategyContext<'a> {
    pub fn new(config: &FilterConfig, history: &'a [Draw]) -> Self {
        let eligible: Vec<u8> = (1..=DOMAIN_SIZE)
            .filter(|n| !config.excluded.contains(n) && !config.fixed.contains(n))
            .collect();
        Self {
            eligible,
            fixed: config.fixed.clone(),
            history,
        }
    }

    /// Nombre de numéros restant à tirer une fois les imposés placés.
    pub fn slots(&self) -> usize {
        PICK_COUNT.saturating_sub(self.fixed.len())
    }
}

/// Un générateur propose une combinaison candidate. Les numéros imposés sont
/// toujours présents, les exclus jamais : le contexte les a déjà retirés du
/// domaine éligible.
pub trait Generator {
    fn name(&self) -> &str;
    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination>;
}

/// Générateur associé à une stratégie de boucle. La couverture complète et la
/// roue court-circuitent la boucle de recherche et sont traitées à part.
pub fn generator_for(strategy: Strategy) -> Box<dyn Generator> {
    match strategy {
        Strategy::Zones => Box::new(zones::ZoneBalancedGenerator),
        Strategy::Entropy => Box::new(entropy::EntropyGenerator),
        Strategy::Frequency => Box::new(frequency::FrequencyGenerator),
        Strategy::Uniform | Strategy::Coverage | Strategy::Wheel => {
            Box::new(uniform::UniformGenerator)
        }
    }
}
