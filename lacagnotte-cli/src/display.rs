use std::collections::HashMap;

use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::{Chart, Plot, Shape};

use lacagnotte_core::SimulationConfig;
use lacagnotte_core::batch::BatchSummary;
use lacagnotte_core::models::{Participant, ParticipantId, RunResult, Winner};

/// Gains cumulés d'un même participant sur plusieurs tirages.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWinner {
    pub id: ParticipantId,
    pub stake: u64,
    pub streak: u32,
    pub draws: usize,
    pub total_amount: f64,
}

/// Regroupe les tirages par identifiant, tri par gain décroissant.
pub fn merge_winners(winners: &[Winner]) -> Vec<MergedWinner> {
    let mut by_id: HashMap<ParticipantId, MergedWinner> = HashMap::new();
    for w in winners {
        let entry = by_id.entry(w.id).or_insert_with(|| MergedWinner {
            id: w.id,
            stake: w.stake,
            streak: w.streak,
            draws: 0,
            total_amount: 0.0,
        });
        entry.draws += 1;
        entry.total_amount += w.winning_amount;
    }

    let mut merged: Vec<MergedWinner> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    merged
}

fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

pub fn display_summary(result: &RunResult, config: &SimulationConfig) {
    println!("\n── Résumé du tirage (seed {}) ──", result.seed);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Indicateur", "Valeur"]);

    let pool = result.pool();
    table.add_row(vec!["Cagnotte totale".to_string(), money(pool.total_pool)]);
    table.add_row(vec![
        format!("Cagnotte de récompense ({} du total)", percent(config.reward_fraction)),
        money(pool.reward_pool),
    ]);
    table.add_row(vec![
        format!("Après frais ({} déduits)", percent(config.fee_fraction)),
        money(pool.pool_after_fee),
    ]);
    table.add_row(vec!["Gagnants éligibles".to_string(), result.counts.eligible.to_string()]);
    table.add_row(vec!["Gagnants payés".to_string(), result.counts.distributed.to_string()]);

    println!("{table}");
}

pub fn display_winners(winners: &[Winner], top: usize) {
    println!("\n── Gagnants ──");
    if winners.is_empty() {
        println!("Aucun gagnant.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Joueur", "Mise", "Série", "Poids", "Gain"]);

    for (i, w) in winners.iter().take(top).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(w.id),
            Cell::new(w.stake),
            Cell::new(w.streak),
            Cell::new(format!("{:.4}", w.weight)),
            Cell::new(money(w.winning_amount)).fg(Color::Green),
        ]);
    }
    println!("{table}");

    if winners.len() > top {
        println!("  … {} tirages supplémentaires non affichés", winners.len() - top);
    }
}

pub fn display_merged(merged: &[MergedWinner], top: usize) {
    println!("\n── Gagnants regroupés par joueur ──");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Joueur", "Mise", "Série", "Tirages", "Gain total"]);

    for m in merged.iter().take(top) {
        let draws = if m.draws > 1 {
            Cell::new(m.draws).fg(Color::Yellow)
        } else {
            Cell::new(m.draws)
        };
        table.add_row(vec![
            Cell::new(m.id),
            Cell::new(m.stake),
            Cell::new(m.streak),
            draws,
            Cell::new(money(m.total_amount)).fg(Color::Green),
        ]);
    }
    println!("{table}");
}

/// Histogramme en `bins` classes égales : (borne basse, effectif).
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f32, f32)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = ((max - min) / bins as f64).max(f64::EPSILON);

    let mut counts = vec![0u32; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| ((min + i as f64 * width) as f32, c as f32))
        .collect()
}

fn display_histogram(title: &str, values: &[f64]) {
    println!("\n── {title} ──\n");
    let points = histogram_bins(values, 50);
    if points.len() < 2 {
        println!("  (Pas assez de données à afficher)");
        return;
    }
    let x_min = points[0].0;
    let x_max = points[points.len() - 1].0;
    if x_max <= x_min {
        println!("  (Valeurs toutes identiques : {x_min})");
        return;
    }
    let shape = Shape::Bars(&points);
    println!("{}", Chart::new(120, 40, x_min, x_max).lineplot(&shape));
}

pub fn display_histograms(participants: &[Participant]) {
    let stakes: Vec<f64> = participants.iter().map(|p| p.stake as f64).collect();
    let streaks: Vec<f64> = participants.iter().map(|p| p.streak as f64).collect();
    display_histogram("Distribution des mises", &stakes);
    display_histogram("Distribution des séries", &streaks);
}

pub fn display_defaults(config: &SimulationConfig) {
    println!("\nParamètres par défaut\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Paramètre", "Valeur"]);

    let rows: Vec<(&str, String)> = vec![
        ("Nombre de joueurs", config.population_size.to_string()),
        ("Pourcentage de perdants", format!("{}%", config.loser_percentage)),
        ("Pourcentage de distribution", format!("{}%", config.distribution_percentage)),
        ("Mise minimale", money(config.min_stake as f64)),
        ("Mise maximale", money(config.max_stake as f64)),
        ("Décroissance des mises", format!("{:.1}", config.stake_decay_rate)),
        ("Décroissance des séries", format!("{:.1}", config.streak_decay_rate)),
        ("Multiplicateur de série", format!("{:.2}", config.streak_multiplier)),
        ("Base du logarithme des mises", format!("{}", config.stake_log_base)),
        ("Part de récompense", percent(config.reward_fraction)),
        ("Frais", percent(config.fee_fraction)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
}

pub fn display_batch(summary: &BatchSummary) {
    let end_seed = summary.base_seed.wrapping_add(summary.runs as u64);
    println!("\n── {} tirages (seeds {}..{end_seed}) ──", summary.runs, summary.base_seed);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Indicateur", "Valeur"]);

    let rows = [
        ("Cagnotte totale moyenne", money(summary.mean_total_pool)),
        ("Cagnotte après frais moyenne", money(summary.mean_pool_after_fee)),
        ("Tirages gagnants par run", format!("{:.2}", summary.mean_winner_records)),
        ("Joueurs distincts par run", format!("{:.2}", summary.mean_distinct_winners)),
        ("Part du plus gros gain (moy.)", format!("{:.2}%", summary.mean_top_share * 100.0)),
        ("Part du plus gros gain (max)", format!("{:.2}%", summary.max_top_share * 100.0)),
        ("Taux de doublons", format!("{:.2}%", summary.duplicate_rate * 100.0)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(id: u32, amount: f64) -> Winner {
        Winner {
            id: ParticipantId(id),
            stake: 10 * id as u64,
            streak: id,
            weight: 1.0,
            winning_amount: amount,
        }
    }

    #[test]
    fn test_merge_winners_sums_repeats() {
        let winners = vec![winner(2, 10.0), winner(5, 30.0), winner(2, 10.0), winner(7, 1.0)];
        let merged = merge_winners(&winners);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id, ParticipantId(5));
        assert_eq!(merged[1].id, ParticipantId(2));
        assert_eq!(merged[1].draws, 2);
        assert!((merged[1].total_amount - 20.0).abs() < 1e-12);
        let total: f64 = merged.iter().map(|m| m.total_amount).sum();
        assert!((total - 51.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_winners_ties_sorted_by_id() {
        let merged = merge_winners(&[winner(9, 5.0), winner(3, 5.0)]);
        assert_eq!(merged[0].id, ParticipantId(3));
        assert_eq!(merged[1].id, ParticipantId(9));
    }

    #[test]
    fn test_histogram_counts_everything() {
        let values: Vec<f64> = (0..1000).map(|i| (i % 97) as f64).collect();
        let bins = histogram_bins(&values, 10);
        assert_eq!(bins.len(), 10);
        let total: f32 = bins.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 1000.0);
        assert_eq!(bins[0].0, 0.0);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram_bins(&[3.0; 20], 5);
        assert_eq!(bins[0].1, 20.0);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram_bins(&[], 10).is_empty());
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(142.5), "$142.50");
        assert_eq!(percent(0.15), "15%");
    }
}
