mod display;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};

use lacagnotte_core::batch::run_batch;
use lacagnotte_core::{simulate, SimulationConfig};

use crate::display::{
    display_batch, display_defaults, display_histograms, display_merged, display_summary,
    display_winners, merge_winners,
};

#[derive(Parser)]
#[command(name = "lacagnotte", about = "Simulateur de loterie pondérée par mise et série")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct SimArgs {
    /// Nombre de joueurs
    #[arg(short = 'n', long, default_value = "100")]
    players: u32,

    /// Pourcentage de perdants (0-100)
    #[arg(short, long, default_value = "15")]
    losers: f64,

    /// Pourcentage des gagnants effectivement payés (1-100)
    #[arg(short, long, default_value = "5")]
    distribution: f64,

    /// Mise minimale
    #[arg(long, default_value = "3")]
    min_stake: u64,

    /// Mise maximale
    #[arg(long, default_value = "500")]
    max_stake: u64,

    /// Taux de décroissance des mises (moyenne = max_stake / taux)
    #[arg(long, default_value = "10.0")]
    stake_decay: f64,

    /// Taux de décroissance des séries (moyenne des séries)
    #[arg(long, default_value = "5.0")]
    streak_decay: f64,

    /// Multiplicateur de série dans le poids
    #[arg(long, default_value = "0.3", allow_hyphen_values = true)]
    streak_multiplier: f64,

    /// Base du logarithme appliqué aux mises
    #[arg(long, default_value = "3.0")]
    log_base: f64,

    /// Part de la cagnotte réservée aux récompenses (0-1)
    #[arg(long, default_value = "0.15")]
    reward_fraction: f64,

    /// Frais prélevés sur la cagnotte de récompense (0-1)
    #[arg(long, default_value = "0.05")]
    fee_fraction: f64,

    /// Fichier JSON de configuration (remplace les options ci-dessus)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SimArgs {
    fn to_config(&self) -> Result<SimulationConfig> {
        if let Some(path) = &self.config {
            return load_config(path);
        }
        Ok(SimulationConfig {
            population_size: self.players,
            loser_percentage: self.losers,
            distribution_percentage: self.distribution,
            min_stake: self.min_stake,
            max_stake: self.max_stake,
            stake_decay_rate: self.stake_decay,
            streak_decay_rate: self.streak_decay,
            streak_multiplier: self.streak_multiplier,
            stake_log_base: self.log_base,
            reward_fraction: self.reward_fraction,
            fee_fraction: self.fee_fraction,
            seed: None,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Lancer un tirage
    Run {
        #[command(flatten)]
        params: SimArgs,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Seed déterministe basé sur la date du jour (YYYYMMDD)
        #[arg(long, conflicts_with = "seed")]
        daily_seed: bool,

        /// Fichier de sortie JSON du résultat
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Regrouper les gains par joueur
        #[arg(long)]
        merge: bool,

        /// Afficher les histogrammes des mises et des séries
        #[arg(long)]
        histograms: bool,

        /// Nombre maximal de lignes de gagnants affichées
        #[arg(long, default_value = "50")]
        top: usize,
    },

    /// Afficher les paramètres par défaut
    Defaults {
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Répéter le tirage sur une série de seeds et résumer la concentration des gains
    Batch {
        #[command(flatten)]
        params: SimArgs,

        /// Nombre de tirages
        #[arg(short, long, default_value = "100")]
        runs: usize,

        /// Premier seed (défaut : date du jour YYYYMMDD)
        #[arg(long)]
        base_seed: Option<u64>,

        /// Fichier de sortie JSON du résumé
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mode interactif
    Interactive,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            params,
            seed,
            daily_seed,
            output,
            merge,
            histograms,
            top,
        } => {
            let mut config = params.to_config()?;
            if let Some(s) = seed {
                config.seed = Some(s);
            } else if daily_seed {
                config.seed = Some(date_seed());
            }
            cmd_run(&config, output.as_deref(), merge, histograms, top)
        }
        Command::Defaults { json } => cmd_defaults(json),
        Command::Batch {
            params,
            runs,
            base_seed,
            output,
        } => {
            let config = params.to_config()?;
            cmd_batch(&config, runs, base_seed.unwrap_or_else(date_seed), output.as_deref())
        }
        Command::Interactive => interactive::run_interactive(),
    }
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
pub(crate) fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {}", path.display()))?;
    Ok(config)
}

pub(crate) fn cmd_run(
    config: &SimulationConfig,
    output: Option<&Path>,
    merge: bool,
    histograms: bool,
    top: usize,
) -> Result<()> {
    let report = simulate(config).context("Échec du tirage")?;
    let result = &report.result;

    display_summary(result, config);
    if merge {
        display_merged(&merge_winners(&result.winners), top);
    } else {
        display_winners(&result.winners, top);
    }
    if histograms {
        display_histograms(&report.participants);
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        println!("\nRésultat sauvegardé dans {}", path.display());
    }

    Ok(())
}

fn cmd_defaults(json: bool) -> Result<()> {
    let config = SimulationConfig::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        display_defaults(&config);
    }
    Ok(())
}

fn cmd_batch(
    config: &SimulationConfig,
    runs: usize,
    base_seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    println!("{runs} tirages à simuler (premier seed {base_seed})");
    let start = std::time::Instant::now();
    let summary =
        run_batch(config, runs, base_seed, true).context("Échec de la série de tirages")?;
    let elapsed = start.elapsed();
    println!("Série terminée en {:.2}s", elapsed.as_secs_f64());

    display_batch(&summary);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!("Résumé sauvegardé dans {}", path.display());
    }

    Ok(())
}
