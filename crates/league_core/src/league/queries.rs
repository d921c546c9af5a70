use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::analytics::{season_progress, SeasonProgress};
use crate::engine::standings::round_to;
use crate::models::{Game, Season, SeasonStatus, Team};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeasonStats {
    pub total_games: usize,
    pub completed_games: usize,
    pub remaining_games: usize,
    /// One decimal, 0 without fixtures.
    pub completion_percentage: f64,
    pub current_week: u32,
    pub total_weeks: u32,
    pub status: SeasonStatus,
    pub is_completed: bool,
}

impl Season {
    pub fn progress(&self) -> SeasonProgress {
        season_progress(&self.games)
    }

    pub fn stats(&self) -> SeasonStats {
        let progress = self.progress();
        let total_weeks = self.max_week();
        let current_week = self.last_completed_week().map_or(1, |w| w + 1).min(total_weeks);

        SeasonStats {
            total_games: progress.total_games,
            completed_games: progress.completed_games,
            remaining_games: progress.total_games - progress.completed_games,
            completion_percentage: round_to(progress.progress * 100.0, 1),
            current_week,
            total_weeks,
            status: self.status,
            is_completed: progress.is_complete,
        }
    }

    /// Games of one week, by id.
    pub fn week_games(&self, week: u32) -> Vec<&Game> {
        let mut games: Vec<&Game> = self.games.iter().filter(|g| g.week == week).collect();
        games.sort_by_key(|g| g.id);
        games
    }

    pub fn results_by_week(&self) -> BTreeMap<u32, Vec<&Game>> {
        group_by_week(self.completed_games())
    }

    pub fn upcoming_by_week(&self) -> BTreeMap<u32, Vec<&Game>> {
        group_by_week(self.scheduled_games())
    }

    /// First week with a scheduled game.
    pub fn next_week(&self) -> Option<u32> {
        self.scheduled_games().map(|g| g.week).min()
    }

    pub fn week_exists(&self, week: u32) -> bool {
        self.games.iter().any(|g| g.week == week)
    }

    /// Roster teams that appear in this season's fixtures, in roster order.
    pub fn participating_teams<'a>(&self, roster: &'a [Team]) -> Vec<&'a Team> {
        let ids = self.team_ids();
        roster.iter().filter(|t| ids.binary_search(&t.id).is_ok()).collect()
    }
}

fn group_by_week<'a>(games: impl Iterator<Item = &'a Game>) -> BTreeMap<u32, Vec<&'a Game>> {
    let mut weeks: BTreeMap<u32, Vec<&Game>> = BTreeMap::new();
    for game in games {
        weeks.entry(game.week).or_default().push(game);
    }
    for games in weeks.values_mut() {
        games.sort_by_key(|g| g.id);
    }
    weeks
}
