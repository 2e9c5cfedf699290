use crate::config::{check_log_base, DEFAULT_STAKE_LOG_BASE, DEFAULT_STREAK_MULTIPLIER};
use crate::error::{LotteryError, Result};
use crate::models::{Participant, WeightedPopulation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    pub stake_log_base: f64,
    pub streak_multiplier: f64,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            stake_log_base: DEFAULT_STAKE_LOG_BASE,
            streak_multiplier: DEFAULT_STREAK_MULTIPLIER,
        }
    }
}

/// `log_base(mise) + série × multiplicateur`.
pub fn participant_weight(participant: &Participant, params: &WeightParams) -> Result<f64> {
    if participant.stake == 0 {
        return Err(LotteryError::state(format!(
            "{} : logarithme d'une mise nulle",
            participant.id
        )));
    }
    let stake_weight = (participant.stake as f64).ln() / params.stake_log_base.ln();
    let streak_weight = participant.streak as f64 * params.streak_multiplier;
    Ok(stake_weight + streak_weight)
}

/// Calcule les poids puis les normalise en distribution de probabilité.
pub fn compute_weights(
    participants: Vec<Participant>,
    params: &WeightParams,
) -> Result<WeightedPopulation> {
    check_log_base(params.stake_log_base)?;
    if !params.streak_multiplier.is_finite() {
        return Err(LotteryError::config("streak_multiplier doit être fini"));
    }
    if participants.is_empty() {
        return Err(LotteryError::state("population vide : normalisation impossible"));
    }

    let weights = participants
        .iter()
        .map(|p| participant_weight(p, params))
        .collect::<Result<Vec<f64>>>()?;

    if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| **w < 0.0) {
        return Err(LotteryError::state(format!(
            "poids négatif ({w:.4}) pour {}",
            participants[i].id
        )));
    }

    let total_weight: f64 = weights.iter().sum();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return Err(LotteryError::state(format!(
            "poids total non positif ({total_weight})"
        )));
    }

    let probabilities: Vec<f64> = weights.iter().map(|w| w / total_weight).collect();
    debug_assert!(validate_distribution(&probabilities));

    log::debug!(
        "poids calculés : total {:.4}, moyenne {:.4}",
        total_weight,
        total_weight / participants.len() as f64
    );

    Ok(WeightedPopulation {
        participants,
        weights,
        probabilities,
        total_weight,
    })
}

/// Distribution valide : probabilités positives, somme 1 à 1e-9 près.
pub fn validate_distribution(probabilities: &[f64]) -> bool {
    if probabilities.is_empty() || probabilities.iter().any(|&p| p < 0.0) {
        return false;
    }
    let sum: f64 = probabilities.iter().sum();
    (sum - 1.0).abs() < 1e-9
}
