//! Statistics aggregation engine.
//!
//! The pure core of the crate. Raw per-tournament data goes in, sorted
//! per-player statistics come out:
//!
//! 1. Filter tournaments by month and name
//! 2. Reduce each tournament's games into a per-player tally
//! 3. Fold result rows + tallies into one running record per player
//! 4. Finalize derived metrics (win rate, weighted performance) and sort
//!
//! No I/O, no shared state. Malformed rows are skipped or defaulted rather
//! than failing the whole computation, so one corrupt record never blanks
//! out an otherwise-valid report.

mod filter;
mod fold;
mod tally;

pub use filter::{filter_tournaments, StatsFilter};
pub use fold::{finalize, fold_rows, performance_weight};
pub use tally::build_tally;

use std::collections::HashMap;

use crate::models::{AggregatedStatRow, GameTally, ResultRow, Tournament};

/// Aggregate player statistics across the filtered tournament set.
///
/// Deterministic: identical inputs produce identical output, including row
/// order. Rows are sorted descending by points, ties broken descending by
/// win rate, and further ties keep fold-insertion order (the sort is
/// stable). Tournaments with no entry in `results_by_id` contribute
/// nothing; a tournament with no entry in `tallies_by_id` contributes
/// points only.
pub fn aggregate_stats(
    tournaments: &[Tournament],
    filter: &StatsFilter,
    results_by_id: &HashMap<String, Vec<ResultRow>>,
    tallies_by_id: &HashMap<String, HashMap<String, GameTally>>,
) -> Vec<AggregatedStatRow> {
    let mut records: HashMap<String, _> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for tournament in filter_tournaments(tournaments, filter) {
        let Some(rows) = results_by_id.get(&tournament.id) else {
            continue;
        };
        fold_rows(
            &mut records,
            &mut order,
            rows,
            tallies_by_id.get(&tournament.id),
        );
    }

    let mut stats: Vec<AggregatedStatRow> = order
        .iter()
        .filter_map(|name| records.get(name))
        .map(finalize)
        .collect();

    stats.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then(b.win_rate.total_cmp(&a.win_rate))
    });

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 2024-03-15T12:00:00Z
    const MARCH: f64 = 1_710_504_000.0;

    fn tournament(id: &str, name: &str) -> Tournament {
        Tournament::new(id.to_string(), name.to_string(), Some(MARCH), Some(60), None)
    }

    fn row(player: &str, points: f64, performance: f64) -> ResultRow {
        ResultRow::new(player.to_string(), points, performance)
    }

    fn alice_inputs() -> (
        Vec<Tournament>,
        HashMap<String, Vec<ResultRow>>,
        HashMap<String, HashMap<String, GameTally>>,
    ) {
        let tournaments = vec![tournament("t1", "Blitz One"), tournament("t2", "Blitz Two")];
        let results = HashMap::from([
            ("t1".to_string(), vec![row("alice", 10.0, 1500.0)]),
            ("t2".to_string(), vec![row("alice", 8.0, 1600.0)]),
        ]);
        let tallies = HashMap::from([
            (
                "t1".to_string(),
                HashMap::from([("alice".to_string(), GameTally::new(3, 1, 0))]),
            ),
            (
                "t2".to_string(),
                HashMap::from([("alice".to_string(), GameTally::new(2, 0, 2))]),
            ),
        ]);
        (tournaments, results, tallies)
    }

    #[test]
    fn test_two_tournament_aggregate() {
        let (tournaments, results, tallies) = alice_inputs();
        let stats = aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies);

        assert_eq!(stats.len(), 1);
        let alice = &stats[0];
        assert_eq!(alice.name, "alice");
        assert_eq!(alice.points, 18.0);
        assert_eq!((alice.wins, alice.draws, alice.losses), (5, 1, 2));
        assert_eq!(alice.games_played, 8);
        assert_eq!(alice.tournaments_counted, 2);
        // (1500*4 + 1600*4) / 8
        assert_eq!(alice.performance_rating, 1550.0);
        assert!((alice.win_rate - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_tally_contributes_points_only() {
        let tournaments = vec![tournament("t1", "Blitz One")];
        let results = HashMap::from([("t1".to_string(), vec![row("bob", 6.0, 1450.0)])]);
        let tallies = HashMap::new();

        let stats = aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies);

        let bob = &stats[0];
        assert_eq!(bob.points, 6.0);
        assert_eq!((bob.wins, bob.draws, bob.losses), (0, 0, 0));
        assert_eq!(bob.games_played, 0);
        assert_eq!(bob.win_rate, 0.0);
        // Weighted by points (6.0), so the single performance carries through
        assert_eq!(bob.performance_rating, 1450.0);
    }

    #[test]
    fn test_month_filter_excludes_tournament() {
        let (tournaments, results, tallies) = alice_inputs();
        let filter = StatsFilter::new(Some("2030-01".to_string()), None);
        assert!(aggregate_stats(&tournaments, &filter, &results, &tallies).is_empty());
    }

    #[test]
    fn test_sort_by_points_then_win_rate() {
        let tournaments = vec![tournament("t1", "Blitz One")];
        let results = HashMap::from([(
            "t1".to_string(),
            vec![
                row("low", 10.0, 1500.0),
                row("high", 10.0, 1500.0),
                row("top", 12.0, 1500.0),
            ],
        )]);
        let tallies = HashMap::from([(
            "t1".to_string(),
            HashMap::from([
                ("low".to_string(), GameTally::new(1, 0, 3)),
                ("high".to_string(), GameTally::new(3, 0, 1)),
                ("top".to_string(), GameTally::new(2, 0, 2)),
            ]),
        )]);

        let names: Vec<String> =
            aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies)
                .into_iter()
                .map(|r| r.name)
                .collect();

        assert_eq!(names, vec!["top", "high", "low"]);
    }

    #[test]
    fn test_full_ties_keep_insertion_order() {
        let tournaments = vec![tournament("t1", "Blitz One")];
        let results = HashMap::from([(
            "t1".to_string(),
            vec![
                row("first", 5.0, 1500.0),
                row("second", 5.0, 1500.0),
                row("third", 5.0, 1500.0),
            ],
        )]);
        let tallies = HashMap::new();

        let names: Vec<String> =
            aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies)
                .into_iter()
                .map(|r| r.name)
                .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_idempotent() {
        let (tournaments, mut results, tallies) = alice_inputs();
        results
            .get_mut("t1")
            .unwrap()
            .extend([row("bob", 10.0, 1480.0), row("carol", 3.0, 1390.0)]);

        let first = aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies);
        let second = aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tournament_without_results_ignored() {
        let tournaments = vec![tournament("t1", "Blitz One"), tournament("t9", "Orphan")];
        let results = HashMap::from([("t1".to_string(), vec![row("alice", 4.0, 1500.0)])]);
        let tallies = HashMap::new();

        let stats = aggregate_stats(&tournaments, &StatsFilter::default(), &results, &tallies);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].tournaments_counted, 1);
    }
}
