use std::collections::HashSet;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{LotteryError, Result};
use crate::models::RunResult;
use crate::simulation::run_simulation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub base_seed: u64,
    pub mean_total_pool: f64,
    pub mean_pool_after_fee: f64,
    pub mean_winner_records: f64,
    pub mean_distinct_winners: f64,
    /// Part moyenne de la cagnotte captée par le plus gros gain d'un tirage.
    pub mean_top_share: f64,
    pub max_top_share: f64,
    /// Part des tirages qui retombent sur un participant déjà tiré.
    pub duplicate_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RunStats {
    total_pool: f64,
    pool_after_fee: f64,
    records: usize,
    distinct: usize,
    top_share: f64,
}

impl RunStats {
    fn from_result(result: &RunResult) -> Self {
        let distinct = result.winners.iter().map(|w| w.id).collect::<HashSet<_>>().len();
        let top = result.winners.iter().map(|w| w.winning_amount).fold(0.0f64, f64::max);
        let top_share = if result.pool_after_fee > 0.0 { top / result.pool_after_fee } else { 0.0 };
        Self {
            total_pool: result.total_pool,
            pool_after_fee: result.pool_after_fee,
            records: result.winners.len(),
            distinct,
            top_share,
        }
    }
}

/// Répète le tirage `runs` fois en parallèle ; le tirage `i` utilise le seed
/// `base_seed + i` et son propre générateur.
pub fn run_batch(
    config: &SimulationConfig,
    runs: usize,
    base_seed: u64,
    show_progress: bool,
) -> Result<BatchSummary> {
    if runs == 0 {
        return Err(LotteryError::config("runs doit être >= 1"));
    }
    config.validate()?;

    let pb = if show_progress {
        ProgressBar::new(runs as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }

    let stats: Vec<RunStats> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let run_config = config.clone().with_seed(seed);
            let result = run_simulation(&run_config);
            pb.inc(1);
            match result {
                Ok(result) => Ok(RunStats::from_result(&result)),
                Err(e) => {
                    log::warn!("tirage seed={seed} en échec : {e}");
                    Err(e)
                }
            }
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_and_clear();

    Ok(summarize(&stats, base_seed))
}

fn mean_of(stats: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    stats.iter().map(f).sum::<f64>() / stats.len() as f64
}

fn summarize(stats: &[RunStats], base_seed: u64) -> BatchSummary {
    let records: usize = stats.iter().map(|s| s.records).sum();
    let distinct: usize = stats.iter().map(|s| s.distinct).sum();
    let duplicate_rate = if records > 0 {
        (records - distinct) as f64 / records as f64
    } else {
        0.0
    };

    BatchSummary {
        runs: stats.len(),
        base_seed,
        mean_total_pool: mean_of(stats, |s| s.total_pool),
        mean_pool_after_fee: mean_of(stats, |s| s.pool_after_fee),
        mean_winner_records: mean_of(stats, |s| s.records as f64),
        mean_distinct_winners: mean_of(stats, |s| s.distinct as f64),
        mean_top_share: mean_of(stats, |s| s.top_share),
        max_top_share: stats.iter().map(|s| s.top_share).fold(0.0f64, f64::max),
        duplicate_rate,
    }
}
