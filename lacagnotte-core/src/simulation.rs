use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::generator::{generate_participants, GeneratorParams};
use crate::models::{RunReport, RunResult};
use crate::pool::account_pool;
use crate::sampler::distribute_winnings;
use crate::weights::{compute_weights, WeightParams};

impl SimulationConfig {
    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            population_size: self.population_size,
            min_stake: self.min_stake,
            max_stake: self.max_stake,
            stake_decay_rate: self.stake_decay_rate,
            streak_decay_rate: self.streak_decay_rate,
        }
    }

    pub fn weight_params(&self) -> WeightParams {
        WeightParams {
            stake_log_base: self.stake_log_base,
            streak_multiplier: self.streak_multiplier,
        }
    }

    /// Seed explicite, sinon un seed frais tiré du générateur du thread.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

/// Déroule un tirage complet : génération, poids, cagnotte, gagnants.
pub fn simulate(config: &SimulationConfig) -> Result<RunReport> {
    config.validate()?;
    let seed = config.resolve_seed();
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_with_rng(config, seed, &mut rng)
}

pub fn run_simulation(config: &SimulationConfig) -> Result<RunResult> {
    simulate(config).map(|report| report.result)
}

/// Même pipeline avec un générateur fourni. `seed` n'est que reporté.
pub fn simulate_with_rng(
    config: &SimulationConfig,
    seed: u64,
    rng: &mut impl Rng,
) -> Result<RunReport> {
    config.validate()?;

    let participants = generate_participants(&config.generator_params(), rng)?;
    let pool = account_pool(&participants, config.reward_fraction, config.fee_fraction)?;
    let population = compute_weights(participants, &config.weight_params())?;
    let counts = config.winner_counts();
    let winners = distribute_winnings(&population, counts.distributed, pool.pool_after_fee, rng)?;

    log::info!(
        "tirage seed={seed} : {} participants, {} gagnants payés (éligibles {}), cagnotte {:.2}",
        population.len(),
        winners.len(),
        counts.eligible,
        pool.pool_after_fee
    );

    Ok(RunReport {
        participants: population.into_participants(),
        result: RunResult {
            seed,
            counts,
            total_pool: pool.total_pool,
            reward_pool: pool.reward_pool,
            pool_after_fee: pool.pool_after_fee,
            winners,
        },
    })
}
