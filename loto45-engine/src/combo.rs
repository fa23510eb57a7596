use loto45_db::models::DOMAIN_SIZE;

/// Une combinaison : 6 numéros distincts de [1,45], toujours triés par ordre
/// croissant. Le tri est porteur de sens pour les écarts et l'indice AC.
pub type Combination = [u8; 6];

pub fn is_valid(combo: &Combination) -> bool {
    combo.iter().all(|&n| n >= 1 && n <= DOMAIN_SIZE)
        && combo.windows(2).all(|w| w[0] < w[1])
}

/// Assemble une combinaison triée à partir de numéros fixes et de numéros
/// tirés. L'appelant garantit 6 numéros distincts au total.
pub(crate) fn assemble(fixed: &[u8], drawn: impl IntoIterator<Item = u8>) -> Combination {
    let mut nums: Vec<u8> = fixed.to_vec();
    nums.extend(drawn);
    nums.sort();
    let mut combo = [0u8; 6];
    combo.copy_from_slice(&nums[..6]);
    combo
}
