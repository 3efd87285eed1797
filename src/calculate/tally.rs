//! Per-tournament game tallying.

use std::collections::HashMap;

use crate::models::{Color, GameRecord, GameTally};

/// Reduce one tournament's game list into per-player win/draw/loss counts.
///
/// A game where either side's identity is missing is skipped entirely and
/// alters no player's totals.
pub fn build_tally(games: &[GameRecord]) -> HashMap<String, GameTally> {
    let mut tallies: HashMap<String, GameTally> = HashMap::new();

    for game in games {
        let (white, black) = match (game.white.as_deref(), game.black.as_deref()) {
            (Some(w), Some(b)) if !w.is_empty() && !b.is_empty() => (w, b),
            _ => continue,
        };

        match game.winner {
            Some(Color::White) => {
                tallies.entry(white.to_string()).or_default().wins += 1;
                tallies.entry(black.to_string()).or_default().losses += 1;
            }
            Some(Color::Black) => {
                tallies.entry(black.to_string()).or_default().wins += 1;
                tallies.entry(white.to_string()).or_default().losses += 1;
            }
            None => {
                tallies.entry(white.to_string()).or_default().draws += 1;
                tallies.entry(black.to_string()).or_default().draws += 1;
            }
        }
    }

    tallies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(white: &str, black: &str, winner: Option<Color>) -> GameRecord {
        GameRecord::new(Some(white.to_string()), Some(black.to_string()), winner)
    }

    #[test]
    fn test_decisive_games() {
        let games = vec![
            game("alice", "bob", Some(Color::White)),
            game("carol", "alice", Some(Color::Black)),
        ];
        let tallies = build_tally(&games);

        assert_eq!(tallies["alice"], GameTally::new(2, 0, 0));
        assert_eq!(tallies["bob"], GameTally::new(0, 0, 1));
        assert_eq!(tallies["carol"], GameTally::new(0, 0, 1));
    }

    #[test]
    fn test_missing_winner_is_a_draw() {
        let games = vec![game("alice", "bob", None)];
        let tallies = build_tally(&games);

        assert_eq!(tallies["alice"], GameTally::new(0, 1, 0));
        assert_eq!(tallies["bob"], GameTally::new(0, 1, 0));
    }

    #[test]
    fn test_game_with_missing_side_skipped() {
        let games = vec![
            GameRecord::new(None, Some("bob".to_string()), Some(Color::White)),
            GameRecord::new(Some("alice".to_string()), None, Some(Color::Black)),
            GameRecord::new(Some(String::new()), Some("bob".to_string()), None),
        ];
        assert!(build_tally(&games).is_empty());
    }

    #[test]
    fn test_wins_balance_losses_and_draws_are_even() {
        let games = vec![
            game("a", "b", Some(Color::White)),
            game("b", "c", Some(Color::Black)),
            game("c", "a", None),
            game("a", "b", None),
            game("c", "b", Some(Color::White)),
        ];
        let tallies = build_tally(&games);

        let wins: u32 = tallies.values().map(|t| t.wins).sum();
        let losses: u32 = tallies.values().map(|t| t.losses).sum();
        let draws: u32 = tallies.values().map(|t| t.draws).sum();

        assert_eq!(wins, losses);
        assert_eq!(draws % 2, 0);

        let games_counted: u32 = tallies.values().map(|t| t.games_played()).sum();
        assert_eq!(games_counted, 2 * games.len() as u32);
    }
}
