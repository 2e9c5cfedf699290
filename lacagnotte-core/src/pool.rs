use crate::config::check_range;
use crate::error::{LotteryError, Result};
use crate::models::{Participant, PoolSummary};

impl PoolSummary {
    /// Cagnotte de récompense puis déduction des frais, à partir d'un total.
    pub fn from_total(total_pool: f64, reward_fraction: f64, fee_fraction: f64) -> Result<Self> {
        check_range("reward_fraction", reward_fraction, 0.0, 1.0)?;
        check_range("fee_fraction", fee_fraction, 0.0, 1.0)?;
        let reward_pool = total_pool * reward_fraction;
        let pool_after_fee = reward_pool * (1.0 - fee_fraction);
        Ok(Self {
            total_pool,
            reward_pool,
            pool_after_fee,
        })
    }
}

/// Somme des mises, en erreur si elle dépasse `u64::MAX`.
pub fn total_stake(participants: &[Participant]) -> Result<u64> {
    participants
        .iter()
        .try_fold(0u64, |acc, p| acc.checked_add(p.stake))
        .ok_or_else(|| LotteryError::state("somme des mises hors de la plage u64"))
}

pub fn account_pool(
    participants: &[Participant],
    reward_fraction: f64,
    fee_fraction: f64,
) -> Result<PoolSummary> {
    let total = total_stake(participants)?;
    let summary = PoolSummary::from_total(total as f64, reward_fraction, fee_fraction)?;
    log::debug!(
        "cagnotte totale {:.2}, récompenses {:.2}, après frais {:.2}",
        summary.total_pool,
        summary.reward_pool,
        summary.pool_after_fee
    );
    Ok(summary)
}
