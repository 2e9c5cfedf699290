use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::{LotteryError, Result};
use crate::models::{WeightedPopulation, Winner};

/// Tirage pondéré avec remise sur un vecteur de poids immuable.
///
/// Les poids cumulés sont construits une fois (O(N)), chaque tirage est une
/// recherche dichotomique (O(log N)).
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    index: WeightedIndex<f64>,
}

impl WeightedSampler {
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(LotteryError::state("aucun poids à échantillonner"));
        }
        let index = WeightedIndex::new(weights)
            .map_err(|e| LotteryError::state(format!("poids d'échantillonnage invalides : {e}")))?;
        Ok(Self { index })
    }

    /// `count` indices tirés avec remise, dans l'ordre des tirages.
    pub fn draw_many(&self, count: usize, rng: &mut impl Rng) -> Vec<usize> {
        (0..count).map(|_| self.index.sample(rng)).collect()
    }
}

/// Tire `winners_count` gagnants avec remise et répartit `pool` au prorata
/// des poids tirés (répétitions comprises).
///
/// Chaque tirage produit son propre enregistrement, même pour un participant
/// déjà tiré.
pub fn distribute_winnings(
    population: &WeightedPopulation,
    winners_count: usize,
    pool: f64,
    rng: &mut impl Rng,
) -> Result<Vec<Winner>> {
    if winners_count < 1 {
        return Err(LotteryError::config("nombre de gagnants doit être >= 1"));
    }
    if !pool.is_finite() || pool < 0.0 {
        return Err(LotteryError::config(format!("cagnotte invalide ({pool})")));
    }
    if population.is_empty() {
        return Err(LotteryError::state("population vide à la sélection"));
    }

    let sampler = WeightedSampler::new(population.probabilities())?;
    let drawn = sampler.draw_many(winners_count, rng);

    let weights = population.weights();
    let total_selected_weight: f64 = drawn.iter().map(|&i| weights[i]).sum();
    if total_selected_weight <= 0.0 {
        return Err(LotteryError::state("poids total des gagnants nul"));
    }

    let participants = population.participants();
    let winners: Vec<Winner> = drawn
        .iter()
        .map(|&i| {
            let p = &participants[i];
            Winner {
                id: p.id,
                stake: p.stake,
                streak: p.streak,
                weight: weights[i],
                winning_amount: weights[i] / total_selected_weight * pool,
            }
        })
        .collect();

    log::debug!(
        "{} gagnants tirés sur {} participants (poids {:.4} sur {:.4}), cagnotte {:.2}",
        winners.len(),
        population.len(),
        total_selected_weight,
        population.total_weight(),
        pool
    );

    Ok(winners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::models::{Participant, ParticipantId};
    use crate::weights::{compute_weights, WeightParams};

    fn population(stakes: &[u64]) -> WeightedPopulation {
        let players = stakes
            .iter()
            .enumerate()
            .map(|(i, &stake)| {
                let id = ParticipantId(i as u32 + 1);
                Participant { id, stake, streak: 1 + i as u32 % 4 }
            })
            .collect();
        compute_weights(players, &WeightParams::default()).unwrap()
    }

    #[test]
    fn test_sampler_respects_zero_weight() {
        let sampler = WeightedSampler::new(&[0.0, 1.0, 0.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(sampler.draw_many(200, &mut rng).iter().all(|&i| i == 1));
    }

    #[test]
    fn test_sampler_frequencies_follow_weights() {
        let sampler = WeightedSampler::new(&[1.0, 3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let draws = sampler.draw_many(40_000, &mut rng);
        let ones = draws.iter().filter(|&&i| i == 1).count() as f64 / draws.len() as f64;
        assert!((ones - 0.75).abs() < 0.02, "fréquence = {ones}");
    }

    #[test]
    fn test_sampler_rejects_empty_and_invalid() {
        assert!(WeightedSampler::new(&[]).unwrap_err().is_state());
        assert!(WeightedSampler::new(&[0.0, 0.0]).unwrap_err().is_state());
        assert!(WeightedSampler::new(&[1.0, -1.0]).is_err());
    }

    #[test]
    fn test_amounts_sum_to_pool() {
        let pop = population(&[3, 10, 50, 120, 400, 7, 9, 31]);
        let mut rng = StdRng::seed_from_u64(5);
        let winners = distribute_winnings(&pop, 6, 142.5, &mut rng).unwrap();
        assert_eq!(winners.len(), 6);
        let sum: f64 = winners.iter().map(|w| w.winning_amount).sum();
        assert!((sum - 142.5).abs() < 1e-9, "Sum = {sum}");
    }

    #[test]
    fn test_amount_proportional_to_weight() {
        let pop = population(&[3, 10, 50, 120, 400]);
        let mut rng = StdRng::seed_from_u64(8);
        let winners = distribute_winnings(&pop, 10, 1000.0, &mut rng).unwrap();
        let total: f64 = winners.iter().map(|w| w.weight).sum();
        for w in &winners {
            assert!((w.winning_amount - w.weight / total * 1000.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_duplicates_kept_as_separate_records() {
        // 3 participants, 30 tirages : répétitions garanties.
        let pop = population(&[5, 6, 7]);
        let mut rng = StdRng::seed_from_u64(21);
        let winners = distribute_winnings(&pop, 30, 90.0, &mut rng).unwrap();
        assert_eq!(winners.len(), 30);
        let first = winners[0].id;
        let repeats: Vec<&Winner> = winners.iter().filter(|w| w.id == first).collect();
        assert!(repeats.len() > 1);
        assert!(repeats.iter().all(|w| w.winning_amount == repeats[0].winning_amount));
    }

    #[test]
    fn test_single_participant_gets_whole_pool() {
        let pop = population(&[42]);
        let mut rng = StdRng::seed_from_u64(0);
        let winners = distribute_winnings(&pop, 4, 100.0, &mut rng).unwrap();
        assert_eq!(winners.len(), 4);
        assert!(winners.iter().all(|w| w.id == ParticipantId(1)));
        let sum: f64 = winners.iter().map(|w| w.winning_amount).sum();
        assert!((sum - 100.0).abs() < 1e-12, "Sum = {sum}");
    }

    #[test]
    fn test_zero_winners_fails() {
        let pop = population(&[3, 4]);
        let err = distribute_winnings(&pop, 0, 10.0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_negative_pool_fails() {
        let pop = population(&[3, 4]);
        let err = distribute_winnings(&pop, 1, -1.0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_zero_pool_gives_zero_amounts() {
        let pop = population(&[3, 4, 5]);
        let winners = distribute_winnings(&pop, 2, 0.0, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(winners.iter().all(|w| w.winning_amount == 0.0));
    }

    #[test]
    fn test_empty_population_fails() {
        let empty = WeightedPopulation {
            participants: Vec::new(),
            weights: Vec::new(),
            probabilities: Vec::new(),
            total_weight: 0.0,
        };
        let err =
            distribute_winnings(&empty, 1, 10.0, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(err.is_state());
    }

    #[test]
    fn test_seed_determinism() {
        let pop = population(&[3, 10, 50, 120, 400, 7]);
        let a = distribute_winnings(&pop, 5, 50.0, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = distribute_winnings(&pop, 5, 50.0, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }
}
