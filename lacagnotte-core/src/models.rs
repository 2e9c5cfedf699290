use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, Result};

/// Identifiant 1-based d'un participant, affiché `Player N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub stake: u64,
    pub streak: u32,
}

impl Participant {
    pub fn new(id: ParticipantId, stake: u64, streak: u32) -> Result<Self> {
        if stake == 0 {
            return Err(LotteryError::state(format!("{id} : mise nulle")));
        }
        if streak == 0 {
            return Err(LotteryError::state(format!("{id} : série nulle")));
        }
        Ok(Self { id, stake, streak })
    }
}

/// Population pondérée : `weights[i]` et `probabilities[i]` se rapportent à
/// `participants[i]`. Construite uniquement par le calculateur de poids.
#[derive(Debug, Clone)]
pub struct WeightedPopulation {
    pub(crate) participants: Vec<Participant>,
    pub(crate) weights: Vec<f64>,
    pub(crate) probabilities: Vec<f64>,
    pub(crate) total_weight: f64,
}

impl WeightedPopulation {
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }
}

/// Un tirage gagnant. Un même participant peut apparaître plusieurs fois.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub id: ParticipantId,
    pub stake: u64,
    pub streak: u32,
    pub weight: f64,
    pub winning_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub total_pool: f64,
    pub reward_pool: f64,
    pub pool_after_fee: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerCounts {
    /// Joueurs au-dessus du seuil de perdants. Calculé mais jamais tiré.
    pub eligible: usize,
    /// Nombre de tirages effectivement rémunérés.
    pub distributed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    pub counts: WinnerCounts,
    pub total_pool: f64,
    pub reward_pool: f64,
    pub pool_after_fee: f64,
    pub winners: Vec<Winner>,
}

impl RunResult {
    pub fn pool(&self) -> PoolSummary {
        PoolSummary {
            total_pool: self.total_pool,
            reward_pool: self.reward_pool,
            pool_after_fee: self.pool_after_fee,
        }
    }

    pub fn distributed_total(&self) -> f64 {
        self.winners.iter().map(|w| w.winning_amount).sum()
    }
}

/// Résultat complet d'un tirage, population incluse (histogrammes).
#[derive(Debug, Clone)]
pub struct RunReport {
    pub participants: Vec<Participant>,
    pub result: RunResult,
}
