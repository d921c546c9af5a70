//! League table aggregation and ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::view::SeasonView;
use crate::models::{Game, Outcome, TeamId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamStats {
    pub team_id: TeamId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl TeamStats {
    pub fn new(team_id: TeamId) -> Self {
        Self { team_id, ..Self::default() }
    }

    /// Adds one finished game from this team's side.
    pub fn record(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += scored as u32;
        self.goals_against += conceded as u32;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;

        let outcome = Outcome::from_goals(scored, conceded);
        match outcome {
            Outcome::Win => self.won += 1,
            Outcome::Draw => self.drawn += 1,
            Outcome::Loss => self.lost += 1,
        }
        self.points += outcome.points();
    }

    /// Percentage of games won, one decimal.
    pub fn win_percentage(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        round_to(self.won as f64 / self.played as f64 * 100.0, 1)
    }

    /// Goals scored per game, two decimals.
    pub fn average_goals_per_game(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        round_to(self.goals_for as f64 / self.played as f64, 2)
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    pub position: usize,
    #[serde(flatten)]
    pub stats: TeamStats,
}

/// Aggregate for one team over the completed games given.
pub fn team_stats<'a, I>(team_id: TeamId, games: I) -> TeamStats
where
    I: IntoIterator<Item = &'a Game>,
{
    let mut stats = TeamStats::new(team_id);
    for game in games {
        if let Some((scored, conceded)) = game.goals_for(team_id) {
            stats.record(scored, conceded);
        }
    }
    stats
}

/// Points, then goal difference, then goals scored; all descending.
pub fn compare_stats(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Stable sort and 1-based positions. Full ties keep input order.
pub fn rank(mut stats: Vec<TeamStats>) -> Vec<Standing> {
    stats.sort_by(compare_stats);
    stats
        .into_iter()
        .enumerate()
        .map(|(i, stats)| Standing { position: i + 1, stats })
        .collect()
}

/// Standings for `team_ids`, in that order before sorting.
pub fn standings_for<'a, I>(team_ids: &[TeamId], games: I) -> Vec<Standing>
where
    I: IntoIterator<Item = &'a Game>,
{
    let mut stats: Vec<TeamStats> = team_ids.iter().map(|&id| TeamStats::new(id)).collect();
    for game in games {
        let Some((home, away)) = game.score() else { continue };
        for entry in stats.iter_mut() {
            if entry.team_id == game.home_team_id {
                entry.record(home, away);
            } else if entry.team_id == game.away_team_id {
                entry.record(away, home);
            }
        }
    }
    rank(stats)
}

/// Current table of the season over its active roster.
pub fn league_table(view: &SeasonView<'_>) -> Vec<Standing> {
    let ids: Vec<TeamId> = view.roster().iter().map(|t| t.id).collect();
    standings_for(&ids, view.completed_games())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadToHead {
    pub team_id: TeamId,
    pub opponent_id: TeamId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// Record of `team_id` against `opponent_id` over the completed games given.
pub fn head_to_head<'a, I>(team_id: TeamId, opponent_id: TeamId, games: I) -> HeadToHead
where
    I: IntoIterator<Item = &'a Game>,
{
    let mut record = HeadToHead { team_id, opponent_id, ..HeadToHead::default() };
    for game in games {
        if game.opponent_of(team_id) != Some(opponent_id) {
            continue;
        }
        let Some((scored, conceded)) = game.goals_for(team_id) else { continue };
        record.played += 1;
        record.goals_for += scored as u32;
        record.goals_against += conceded as u32;
        match Outcome::from_goals(scored, conceded) {
            Outcome::Win => record.won += 1,
            Outcome::Draw => record.drawn += 1,
            Outcome::Loss => record.lost += 1,
        }
    }
    record
}
