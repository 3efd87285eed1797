//! Tournament filtering.

use crate::models::Tournament;

/// Filters applied to the tournament list before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    /// UTC calendar month key, `YYYY-MM`
    pub month: Option<String>,

    /// Case-insensitive substring of the tournament name
    pub name: Option<String>,
}

impl StatsFilter {
    pub fn new(month: Option<String>, name: Option<String>) -> Self {
        Self { month, name }
    }
}

/// Select the tournaments matching the filter, preserving input order.
pub fn filter_tournaments<'a>(
    tournaments: &'a [Tournament],
    filter: &StatsFilter,
) -> Vec<&'a Tournament> {
    tournaments.iter().filter(|t| matches(t, filter)).collect()
}

fn matches(tournament: &Tournament, filter: &StatsFilter) -> bool {
    if let Some(month) = &filter.month {
        if tournament.month_key() != *month {
            return false;
        }
    }
    if let Some(name) = &filter.name {
        if !tournament
            .full_name
            .to_lowercase()
            .contains(&name.to_lowercase())
        {
            return false;
        }
    }
    true
}
