//! Folding result rows into per-player aggregates.

use std::collections::HashMap;

use crate::models::{AggregateRecord, AggregatedStatRow, GameTally, ResultRow};

/// Weight of one tournament's performance contribution.
///
/// Games played when any were recorded, else points when positive, else 1,
/// so a tournament can never contribute zero weight.
pub fn performance_weight(tally: &GameTally, points: f64) -> f64 {
    let games = tally.games_played();
    if games > 0 {
        games as f64
    } else if points > 0.0 {
        points
    } else {
        1.0
    }
}

/// Fold one tournament's result rows into the running per-player records.
///
/// `order` records each player's first appearance so the caller can produce
/// deterministic output. Rows with an empty identity are skipped.
pub fn fold_rows(
    records: &mut HashMap<String, AggregateRecord>,
    order: &mut Vec<String>,
    rows: &[ResultRow],
    tallies: Option<&HashMap<String, GameTally>>,
) {
    for row in rows {
        if row.player.is_empty() {
            continue;
        }

        let tally = tallies
            .and_then(|t| t.get(&row.player))
            .copied()
            .unwrap_or_default();
        let weight = performance_weight(&tally, row.points);

        let record = records.entry(row.player.clone()).or_insert_with(|| {
            order.push(row.player.clone());
            AggregateRecord::new(row.player.clone())
        });

        record.points += row.points;
        record.wins += tally.wins;
        record.draws += tally.draws;
        record.losses += tally.losses;
        record.tournaments_counted += 1;
        record.performance_weighted_sum += row.performance * weight;
        record.performance_weight_total += weight;
    }
}

/// Convert a fully folded record into a display row.
pub fn finalize(record: &AggregateRecord) -> AggregatedStatRow {
    let games_played = record.wins + record.draws + record.losses;

    let win_rate = if games_played > 0 {
        record.wins as f64 / games_played as f64 * 100.0
    } else {
        0.0
    };

    let performance_rating = if record.performance_weight_total > 0.0 {
        record.performance_weighted_sum / record.performance_weight_total
    } else {
        0.0
    };

    AggregatedStatRow {
        name: record.name.clone(),
        points: record.points,
        wins: record.wins,
        draws: record.draws,
        losses: record.losses,
        games_played,
        tournaments_counted: record.tournaments_counted,
        win_rate,
        performance_rating,
    }
}
