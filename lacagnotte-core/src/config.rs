use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, Result};
use crate::models::WinnerCounts;

/// Taille de population au-delà de laquelle un tirage est refusé.
pub const MAX_POPULATION: u32 = 150_000;

/// Borne haute de `max_stake`.
pub const MAX_STAKE: u64 = 1_000_000;

pub const DEFAULT_MIN_STAKE: u64 = 3;
pub const DEFAULT_STAKE_LOG_BASE: f64 = 3.0;
pub const DEFAULT_STREAK_MULTIPLIER: f64 = 0.3;
pub const DEFAULT_REWARD_FRACTION: f64 = 0.15;
pub const DEFAULT_FEE_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub population_size: u32,
    /// Pourcentage de perdants, 0-100.
    pub loser_percentage: f64,
    /// Pourcentage des gagnants effectivement payés, 1-100.
    pub distribution_percentage: f64,
    pub min_stake: u64,
    pub max_stake: u64,
    pub stake_decay_rate: f64,
    pub streak_decay_rate: f64,
    pub streak_multiplier: f64,
    pub stake_log_base: f64,
    pub reward_fraction: f64,
    pub fee_fraction: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            loser_percentage: 15.0,
            distribution_percentage: 5.0,
            min_stake: DEFAULT_MIN_STAKE,
            max_stake: 500,
            stake_decay_rate: 10.0,
            streak_decay_rate: 5.0,
            streak_multiplier: DEFAULT_STREAK_MULTIPLIER,
            stake_log_base: DEFAULT_STAKE_LOG_BASE,
            reward_fraction: DEFAULT_REWARD_FRACTION,
            fee_fraction: DEFAULT_FEE_FRACTION,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 || self.population_size > MAX_POPULATION {
            return Err(LotteryError::config(format!(
                "population_size = {} hors limites (1-{MAX_POPULATION})",
                self.population_size
            )));
        }
        check_range("loser_percentage", self.loser_percentage, 0.0, 100.0)?;
        check_range("distribution_percentage", self.distribution_percentage, 1.0, 100.0)?;
        if self.min_stake == 0 {
            return Err(LotteryError::config("min_stake doit être >= 1"));
        }
        if self.max_stake > MAX_STAKE {
            return Err(LotteryError::config(format!(
                "max_stake = {} hors limites (<= {MAX_STAKE})",
                self.max_stake
            )));
        }
        if self.min_stake > self.max_stake {
            return Err(LotteryError::config(format!(
                "min_stake ({}) > max_stake ({})",
                self.min_stake, self.max_stake
            )));
        }
        check_positive("stake_decay_rate", self.stake_decay_rate)?;
        check_positive("streak_decay_rate", self.streak_decay_rate)?;
        if !self.streak_multiplier.is_finite() {
            return Err(LotteryError::config("streak_multiplier doit être fini"));
        }
        check_log_base(self.stake_log_base)?;
        check_range("reward_fraction", self.reward_fraction, 0.0, 1.0)?;
        check_range("fee_fraction", self.fee_fraction, 0.0, 1.0)?;
        Ok(())
    }

    /// Gagnants éligibles et gagnants payés.
    ///
    /// `distributed = max(1, round(N × (1 − perdants%) × distribution%))`.
    /// Seul `distributed` est tiré au sort.
    pub fn winner_counts(&self) -> WinnerCounts {
        let n = self.population_size as f64;
        let winner_share = 100.0 - self.loser_percentage;
        let eligible = (n * winner_share / 100.0).round();
        let distributed = (n * winner_share * self.distribution_percentage / 10_000.0).round();
        WinnerCounts {
            eligible: (eligible as usize).max(1),
            distributed: (distributed as usize).max(1),
        }
    }
}

pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(LotteryError::config(format!(
            "{name} = {value} hors limites ({min}-{max})"
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LotteryError::config(format!("{name} = {value} doit être > 0")));
    }
    Ok(())
}

pub(crate) fn check_log_base(base: f64) -> Result<()> {
    if !base.is_finite() || base <= 1.0 {
        return Err(LotteryError::config(format!(
            "stake_log_base = {base} doit être > 1"
        )));
    }
    Ok(())
}
