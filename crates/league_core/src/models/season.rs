use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Game, GameId, TeamId};

pub type SeasonId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeasonStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeasonStatus::Upcoming => "upcoming",
            SeasonStatus::Active => "active",
            SeasonStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// A season and its fixture list, in generation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    #[serde(default)]
    pub status: SeasonStatus,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub games: Vec<Game>,
}

impl Season {
    pub fn new(id: SeasonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: SeasonStatus::Upcoming,
            is_current: false,
            games: Vec::new(),
        }
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }

    pub(crate) fn game_mut(&mut self, game_id: GameId) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.id == game_id)
    }

    pub fn completed_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.is_completed())
    }

    pub fn scheduled_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.is_scheduled())
    }

    /// Highest fixture week, 0 without fixtures.
    pub fn max_week(&self) -> u32 {
        self.games.iter().map(|g| g.week).max().unwrap_or(0)
    }

    /// Highest week with a completed game.
    pub fn last_completed_week(&self) -> Option<u32> {
        self.completed_games().map(|g| g.week).max()
    }

    /// Teams appearing in any fixture, ascending by id.
    pub fn team_ids(&self) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> =
            self.games.iter().flat_map(|g| [g.home_team_id, g.away_team_id]).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
