use anyhow::Result;
use rand::rngs::StdRng;

use loto45_db::models::Draw;

use crate::combo::Combination;
use crate::filter::{FilterConfig, Strategy};
use crate::metrics::{self, Metrics};
use crate::strategies::{generator_for, StrategyContext};
use crate::strategies::coverage::CoverageGenerator;
use crate::wheel::wheel_tickets;

/// Budget d'itérations de la boucle de recherche.
pub const MAX_ITERATIONS: usize = 20_000;

/// La stratégie entropie s'arrête après ce nombre de candidats conformes et
/// retourne le meilleur d'entre eux.
pub const ENTROPY_TARGET_PASSES: usize = 10;

/// Résultat d'une recherche. `accepted` indique si le candidat satisfait
/// réellement les contraintes : à l'épuisement du budget, la dernière
/// combinaison générée est retournée avec ses vrais descripteurs, jamais une
/// erreur. L'appelant qui exige une garantie dure vérifie ce drapeau.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub candidate: Combination,
    pub metrics: Metrics,
    pub auxiliary: Vec<Combination>,
    pub accepted: bool,
    pub iterations: usize,
}

/// Boucle de recherche : générer → évaluer → accepter ou réessayer, bornée
/// par le budget d'itérations. La couverture complète et la roue produisent
/// leurs tickets en une passe et court-circuitent la boucle.
pub fn search(
    config: &FilterConfig,
    history: &[Draw],
    lead_ref: &[f64; 9],
    rng: &mut StdRng,
) -> Result<SearchOutcome> {
    let prior = history.first().map(|d| &d.numbers);
    let ctx = StrategyContext::new(config, history);

    match config.strategy {
        Strategy::Coverage => {
            let tickets = CoverageGenerator::partition(&ctx, rng);
            return Ok(outcome_from_tickets(tickets, config, prior, lead_ref));
        }
        Strategy::Wheel => {
            let tickets = wheel_tickets(&config.pool);
            return Ok(outcome_from_tickets(tickets, config, prior, lead_ref));
        }
        _ => {}
    }

    let generator = generator_for(config.strategy);
    let optimizing = config.strategy == Strategy::Entropy;

    let mut last: Option<(Combination, Metrics)> = None;
    let mut best: Option<(Combination, Metrics)> = None;
    let mut passes_seen = 0usize;

    for iteration in 1..=MAX_ITERATIONS {
        let candidate = generator.generate(&ctx, rng)?;
        let m = metrics::score(&candidate, prior, lead_ref);

        if config.passes(&m) {
            if !optimizing {
                return Ok(SearchOutcome {
                    candidate,
                    metrics: m,
                    auxiliary: Vec::new(),
                    accepted: true,
                    iterations: iteration,
                });
            }
            passes_seen += 1;
            if best.as_ref().map_or(true, |(_, b)| m.ac_index > b.ac_index) {
                best = Some((candidate, m.clone()));
            }
            if passes_seen >= ENTROPY_TARGET_PASSES {
                let (candidate, metrics) = best.take().unwrap_or((candidate, m));
                return Ok(SearchOutcome {
                    candidate,
                    metrics,
                    auxiliary: Vec::new(),
                    accepted: true,
                    iterations: iteration,
                });
            }
        }
        last = Some((candidate, m));
    }

    // Épuisement du budget. Pour l'entropie, au moins un candidat conforme
    // suffit ; sinon, la dernière combinaison générée fait foi, avec ses
    // descripteurs réels, même non conformes.
    if let Some((candidate, metrics)) = best {
        return Ok(SearchOutcome {
            candidate,
            metrics,
            auxiliary: Vec::new(),
            accepted: true,
            iterations: MAX_ITERATIONS,
        });
    }
    let (candidate, metrics) = match last {
        Some(pair) => pair,
        None => {
            // Budget nul n'arrive pas ; on couvre le cas sans paniquer.
            let candidate = generator.generate(&ctx, rng)?;
            let m = metrics::score(&candidate, prior, lead_ref);
            (candidate, m)
        }
    };
    Ok(SearchOutcome {
        accepted: config.passes(&metrics),
        candidate,
        metrics,
        auxiliary: Vec::new(),
        iterations: MAX_ITERATIONS,
    })
}

/// Premier ticket en résultat principal, le reste en tickets auxiliaires.
fn outcome_from_tickets(
    tickets: Vec<Combination>,
    config: &FilterConfig,
    prior: Option<&[u8; 6]>,
    lead_ref: &[f64; 9],
) -> SearchOutcome {
    let candidate = tickets[0];
    let metrics = metrics::score(&candidate, prior, lead_ref);
    SearchOutcome {
        accepted: config.passes(&metrics),
        candidate,
        metrics,
        auxiliary: tickets[1..].to_vec(),
        iterations: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::is_valid;
    use loto45_db::models::make_test_draws;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn run(config: &FilterConfig, history: &[Draw], seed: u64) -> SearchOutcome {
        let lead_ref = metrics::lead_digit_reference(history);
        let mut rng = StdRng::seed_from_u64(seed);
        search(config, history, &lead_ref, &mut rng).unwrap()
    }

    #[test]
    fn test_search_accepts_within_budget() {
        // Contraintes larges : l'acceptation doit survenir bien avant le
        // budget, sur toutes les graines.
        let config = FilterConfig {
            sum_range: (121, 180),
            ac_min: 7,
            ..Default::default()
        };
        let draws = make_test_draws(30);
        for seed in 0..50 {
            let outcome = run(&config, &draws, seed);
            assert!(outcome.accepted);
            assert!(outcome.iterations < MAX_ITERATIONS);
            assert!(is_valid(&outcome.candidate));
            assert!(config.passes(&outcome.metrics));
        }
    }

    #[test]
    fn test_search_fixed_and_excluded_scenario() {
        let config = FilterConfig {
            fixed: vec![7, 23],
            excluded: vec![1, 2, 3, 4, 5, 6],
            ..Default::default()
        };
        let draws = make_test_draws(30);
        for seed in 0..30 {
            let outcome = run(&config, &draws, seed);
            assert!(outcome.accepted);
            assert!(outcome.candidate.contains(&7));
            assert!(outcome.candidate.contains(&23));
            for n in 1..=6u8 {
                assert!(!outcome.candidate.contains(&n));
            }
        }
    }

    #[test]
    fn test_search_zero_carry_over_scenario() {
        let mut draws = make_test_draws(10);
        draws[0].numbers = [1, 7, 13, 19, 25, 31];
        let config = FilterConfig {
            carry_range: (0, 0),
            ..Default::default()
        };
        for seed in 0..30 {
            let outcome = run(&config, &draws, seed);
            assert!(outcome.accepted);
            for n in [1u8, 7, 13, 19, 25, 31] {
                assert!(!outcome.candidate.contains(&n), "{:?}", outcome.candidate);
            }
        }
    }

    #[test]
    fn test_search_entropy_returns_best_of_passing() {
        let config = FilterConfig {
            strategy: Strategy::Entropy,
            sum_range: (100, 200),
            ..Default::default()
        };
        let draws = make_test_draws(30);
        let outcome = run(&config, &draws, 42);
        assert!(outcome.accepted);
        // Le meilleur de 10 candidats conformes issus de lots de 50 atteint
        // un indice AC maximal ou presque.
        assert!(outcome.metrics.ac_index >= 9);
    }

    #[test]
    fn test_search_exhaustion_fail_soft() {
        // Contrainte insatisfaisable : somme minimale 21 exigée sous 21.
        let config = FilterConfig {
            sum_range: (0, 20),
            ..Default::default()
        };
        let draws = make_test_draws(10);
        let outcome = run(&config, &draws, 42);
        assert!(!outcome.accepted);
        assert_eq!(outcome.iterations, MAX_ITERATIONS);
        // La combinaison retournée reste bien formée, descripteurs réels.
        assert!(is_valid(&outcome.candidate));
        assert!(outcome.metrics.sum >= 21);
    }

    #[test]
    fn test_search_coverage_bypasses_loop() {
        let config = FilterConfig {
            strategy: Strategy::Coverage,
            ..Default::default()
        };
        let draws = make_test_draws(10);
        let outcome = run(&config, &draws, 42);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.auxiliary.len(), 7);

        let mut union: BTreeSet<u8> = outcome.auxiliary.iter().flatten().copied().collect();
        union.extend(outcome.candidate.iter());
        assert_eq!(union.len(), 45);
    }

    #[test]
    fn test_search_wheel_uses_pool_only() {
        let pool: Vec<u8> = vec![3, 7, 12, 19, 24, 31, 38, 42];
        let config = FilterConfig {
            strategy: Strategy::Wheel,
            pool: pool.clone(),
            ..Default::default()
        };
        let draws = make_test_draws(10);
        let outcome = run(&config, &draws, 42);
        assert!(outcome.candidate.iter().all(|n| pool.contains(n)));
        for ticket in &outcome.auxiliary {
            assert!(ticket.iter().all(|n| pool.contains(n)));
        }
    }

    #[test]
    fn test_search_acceptance_rate_stable() {
        // Somme [121,180], AC ≥ 7 : le taux d'acceptation au premier essai
        // doit rester stable entre deux lots de graines.
        let config = FilterConfig {
            sum_range: (121, 180),
            ac_min: 7,
            ..Default::default()
        };
        let draws = make_test_draws(30);
        let rate = |seed_base: u64| {
            let mut hits = 0;
            for seed in 0..500 {
                let outcome = run(&config, &draws, seed_base + seed);
                if outcome.iterations == 1 {
                    hits += 1;
                }
            }
            hits as f64 / 500.0
        };
        let r1 = rate(0);
        let r2 = rate(10_000);
        assert!((r1 - r2).abs() < 0.15, "taux instables : {} vs {}", r1, r2);
        assert!(r1 > 0.05, "taux anormalement bas : {}", r1);
    }
}
