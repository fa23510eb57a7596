use crate::combo::Combination;

/// Roue réduite par couverture de paires : à chaque étape, le 6-sous-ensemble
/// encore inutilisé couvrant le plus de paires non couvertes est retenu,
/// jusqu'à couvrir les C(|réservoir|,2) paires ou épuiser le budget de
/// tickets (un ticket par numéro du réservoir).
pub fn wheel_tickets(pool: &[u8]) -> Vec<Combination> {
    let mut pool: Vec<u8> = pool.to_vec();
    pool.sort();
    let p = pool.len();
    if p < 6 {
        return Vec::new();
    }

    let subsets = six_subsets(p);
    let total_pairs = p * (p - 1) / 2;
    let pair_index = |i: usize, j: usize| i * p + j; // i < j

    let mut covered = vec![false; p * p];
    let mut covered_count = 0usize;
    let mut used = vec![false; subsets.len()];
    let mut tickets: Vec<Combination> = Vec::new();

    while tickets.len() < p && covered_count < total_pairs {
        let mut best: Option<(usize, usize)> = None; // (gain, indice)
        for (s, subset) in subsets.iter().enumerate() {
            if used[s] {
                continue;
            }
            let mut gain = 0;
            for a in 0..6 {
                for b in (a + 1)..6 {
                    if !covered[pair_index(subset[a], subset[b])] {
                        gain += 1;
                    }
                }
            }
            if best.map_or(true, |(g, _)| gain > g) {
                best = Some((gain, s));
            }
        }

        match best {
            Some((gain, s)) if gain > 0 => {
                used[s] = true;
                let subset = &subsets[s];
                for a in 0..6 {
                    for b in (a + 1)..6 {
                        let idx = pair_index(subset[a], subset[b]);
                        if !covered[idx] {
                            covered[idx] = true;
                            covered_count += 1;
                        }
                    }
                }
                let mut ticket = [0u8; 6];
                for (k, &i) in subset.iter().enumerate() {
                    ticket[k] = pool[i];
                }
                tickets.push(ticket);
            }
            _ => break,
        }
    }

    tickets
}

/// Tous les 6-sous-ensembles d'indices de [0,p), ordre lexicographique.
fn six_subsets(p: usize) -> Vec<[usize; 6]> {
    let mut subsets = Vec::new();
    for a in 0..p {
        for b in (a + 1)..p {
            for c in (b + 1)..p {
                for d in (c + 1)..p {
                    for e in (d + 1)..p {
                        for f in (e + 1)..p {
                            subsets.push([a, b, c, d, e, f]);
                        }
                    }
                }
            }
        }
    }
    subsets
}
