use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use loto45_db::models::Draw;

use crate::filter::FilterConfig;
use crate::metrics::lead_digit_reference;
use crate::search::{search, SearchOutcome};

/// Requête d'invocation du moteur. L'archive est copiée dans la requête,
/// jamais partagée : la boucle de recherche est insensible aux mutations
/// concurrentes de l'archive.
pub struct EngineRequest {
    pub config: FilterConfig,
    pub history: Vec<Draw>,
    /// Répartition de référence des premiers chiffres. Absente, elle est
    /// dérivée de l'archive fournie.
    pub lead_ref: Option<[f64; 9]>,
    /// Graine du générateur pseudo-aléatoire. Absente, graine d'entropie.
    pub seed: Option<u64>,
}

/// Lance une invocation sur un fil de calcul dédié, frais à chaque appel :
/// aucun état ne fuit d'une invocation à l'autre. Le canal porte exactement
/// un message de résultat ; s'il se ferme sans message (panique ou erreur
/// interne), l'invocation est un échec complet, sans résultat partiel.
/// Pas de primitive d'annulation : abandonner le récepteur suffit.
pub fn spawn(request: EngineRequest) -> mpsc::Receiver<SearchOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let lead_ref = request
            .lead_ref
            .unwrap_or_else(|| lead_digit_reference(&request.history));
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        if let Ok(outcome) = search(&request.config, &request.history, &lead_ref, &mut rng) {
            let _ = tx.send(outcome);
        }
    });
    rx
}

/// Variante bloquante : attend le message unique du fil de calcul.
pub fn run(request: EngineRequest) -> Result<SearchOutcome> {
    spawn(request)
        .recv()
        .context("Le moteur s'est arrêté sans produire de résultat")
}
