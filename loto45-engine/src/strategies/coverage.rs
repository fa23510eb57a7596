use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};

use loto45_db::models::PICK_COUNT;

use crate::combo::Combination;
use super::{Generator, StrategyContext};

/// Partition de couverture complète : le domaine éligible mélangé est découpé
/// en groupes consécutifs de 6 ; les numéros restants forment un dernier
/// groupe complété par des numéros repris dans les autres groupes. L'union
/// des tickets couvre tout le domaine éligible (45 numéros → 8 tickets).
pub struct CoverageGenerator;

impl CoverageGenerator {
    pub fn partition(ctx: &StrategyContext, rng: &mut StdRng) -> Vec<Combination> {
        // La couverture ignore la distinction imposé/tiré : tout numéro non
        // exclu doit apparaître dans au moins un ticket.
        let mut domain: Vec<u8> = ctx.eligible.iter().chain(ctx.fixed.iter()).copied().collect();
        domain.shuffle(rng);

        let full_groups = domain.len() / PICK_COUNT;
        let mut tickets: Vec<Combination> = Vec::with_capacity(full_groups + 1);
        for group in 0..full_groups {
            let mut ticket = [0u8; 6];
            ticket.copy_from_slice(&domain[group * PICK_COUNT..(group + 1) * PICK_COUNT]);
            ticket.sort();
            tickets.push(ticket);
        }

        let leftover = &domain[full_groups * PICK_COUNT..];
        if !leftover.is_empty() {
            let mut last: Vec<u8> = leftover.to_vec();
            // Complément repris dans les groupes déjà placés.
            let placed = &domain[..full_groups * PICK_COUNT];
            let mut padding: Vec<u8> = placed
                .choose_multiple(rng, PICK_COUNT - last.len())
                .copied()
                .collect();
            last.append(&mut padding);
            last.sort();
            let mut ticket = [0u8; 6];
            ticket.copy_from_slice(&last[..6]);
            tickets.push(ticket);
        }

        tickets
    }
}

impl Generator for CoverageGenerator {
    fn name(&self) -> &str {
        "couverture complète"
    }

    fn generate(&self, ctx: &StrategyContext, rng: &mut StdRng) -> Result<Combination> {
        Ok(Self::partition(ctx, rng)[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::is_valid;
    use crate::filter::FilterConfig;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn test_partition_covers_full_domain() {
        let config = FilterConfig::default();
        let ctx = StrategyContext::new(&config, &[]);
        let mut rng = StdRng::seed_from_u64(17);

        let tickets = CoverageGenerator::partition(&ctx, &mut rng);
        assert_eq!(tickets.len(), 8);

        let union: BTreeSet<u8> = tickets.iter().flatten().copied().collect();
        let expected: BTreeSet<u8> = (1..=45).collect();
        assert_eq!(union, expected);

        for ticket in &tickets {
            assert!(is_valid(ticket), "{:?}", ticket);
        }
    }

    #[test]
    fn test_partition_respects_exclusions() {
        let config = FilterConfig {
            excluded: vec![13, 14, 15],
            ..Default::default()
        };
        let ctx = StrategyContext::new(&config, &[]);
        let mut rng = StdRng::seed_from_u64(19);

        let tickets = CoverageGenerator::partition(&ctx, &mut rng);
        // 42 numéros éligibles → 7 groupes pleins, pas de reliquat.
        assert_eq!(tickets.len(), 7);

        let union: BTreeSet<u8> = tickets.iter().flatten().copied().collect();
        assert_eq!(union.len(), 42);
        assert!(!union.contains(&13));
        assert!(!union.contains(&14));
        assert!(!union.contains(&15));
    }

    #[test]
    fn test_partition_last_ticket_distinct() {
        let config = FilterConfig::default();
        for seed in 0..20 {
            let ctx = StrategyContext::new(&config, &[]);
            let mut rng = StdRng::seed_from_u64(seed);
            let tickets = CoverageGenerator::partition(&ctx, &mut rng);
            let last = tickets.last().unwrap();
            assert!(is_valid(last), "seed {} : {:?}", seed, last);
        }
    }
}
