use std::io::{self, Write};
use std::str::FromStr;

use anyhow::{Context, Result};

use lacagnotte_core::SimulationConfig;

use crate::cmd_run;

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Redemande tant que la saisie ne se parse pas.
fn prompt_value<T: FromStr + ToString>(msg: &str, default: T) -> Result<T> {
    let default = default.to_string();
    loop {
        let input = prompt_with_default(msg, &default)?;
        match parse_value(&input) {
            Some(v) => return Ok(v),
            None => println!("Valeur invalide : '{input}'. Réessayez."),
        }
    }
}

fn parse_value<T: FromStr>(input: &str) -> Option<T> {
    input.trim().replace(',', ".").parse::<T>().ok()
}

fn parse_seed(input: &str) -> Option<Option<u64>> {
    let input = input.trim();
    if input.is_empty() || input == "-" {
        return Some(None);
    }
    input.parse::<u64>().ok().map(Some)
}

/// `o`/`oui`/`y`/`yes` → vrai, `n`/`non`/`no` → faux, vide → `default`.
fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "o" | "oui" | "y" | "yes" => Some(true),
        "n" | "non" | "no" => Some(false),
        _ => None,
    }
}

fn prompt_yes_no(msg: &str, default: bool) -> Result<bool> {
    let hint = if default { "O/n" } else { "o/N" };
    loop {
        let input = prompt(&format!("{msg} ({hint}) : "))?;
        match parse_yes_no(&input, default) {
            Some(answer) => return Ok(answer),
            None => println!("Répondez o ou n."),
        }
    }
}

fn prompt_config(previous: &SimulationConfig) -> Result<SimulationConfig> {
    println!();
    println!("── Paramètres de la simulation ──");
    let p = previous;
    let mut config = SimulationConfig {
        population_size: prompt_value("Nombre de joueurs", p.population_size)?,
        loser_percentage: prompt_value("Pourcentage de perdants", p.loser_percentage)?,
        distribution_percentage: prompt_value(
            "Pourcentage de distribution",
            p.distribution_percentage,
        )?,
        min_stake: prompt_value("Mise minimale", p.min_stake)?,
        max_stake: prompt_value("Mise maximale", p.max_stake)?,
        stake_decay_rate: prompt_value("Décroissance des mises", p.stake_decay_rate)?,
        streak_decay_rate: prompt_value("Décroissance des séries", p.streak_decay_rate)?,
        streak_multiplier: prompt_value("Multiplicateur de série", p.streak_multiplier)?,
        stake_log_base: prompt_value("Base du logarithme des mises", p.stake_log_base)?,
        reward_fraction: prompt_value("Part de récompense (0-1)", p.reward_fraction)?,
        fee_fraction: prompt_value("Frais (0-1)", p.fee_fraction)?,
        ..p.clone()
    };

    loop {
        let input = prompt("Seed (vide = aléatoire) : ")?;
        match parse_seed(&input) {
            Some(seed) => {
                config.seed = seed;
                break;
            }
            None => println!("Seed invalide. Réessayez."),
        }
    }

    Ok(config)
}

pub fn run_interactive() -> Result<()> {
    println!("── Mode interactif ──");
    let mut config = SimulationConfig::default();
    let mut merge = false;
    let mut histograms = true;

    loop {
        config = prompt_config(&config)?;
        merge = prompt_yes_no("Fusionner les gagnants par joueur ?", merge)?;
        histograms = prompt_yes_no("Afficher les histogrammes ?", histograms)?;

        let top = config.winner_counts().distributed.max(1);
        if let Err(e) = cmd_run(&config, None, merge, histograms, top) {
            println!("Erreur : {e:#}");
        }

        if !prompt_yes_no("\nRelancer ?", false)? {
            break;
        }
    }

    Ok(())
}
