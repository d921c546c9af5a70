//! Whole-league document: the in-memory stand-in for persisted records.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Game, GameId, Season, SeasonId, Team, TeamId};
use crate::error::{LeagueError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeagueSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl LeagueSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LeagueError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)
            .map_err(|e| LeagueError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Team strengths in range, team and game ids unique, every fixture
    /// belongs to its season, references known and distinct teams, and has
    /// goals recorded exactly when completed.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for team in &self.teams {
            team.validate()?;
            if !seen.insert(team.id) {
                return Err(LeagueError::DuplicateTeam { team_id: team.id });
            }
        }
        let mut game_ids = HashSet::new();
        for season in &self.seasons {
            for game in &season.games {
                if game.season_id != season.id {
                    return Err(LeagueError::ForeignGame {
                        game_id: game.id,
                        found: game.season_id,
                        expected: season.id,
                    });
                }
                if !game_ids.insert(game.id) {
                    return Err(LeagueError::DuplicateGame { game_id: game.id });
                }
                game.validate()?;
                for team_id in [game.home_team_id, game.away_team_id] {
                    if !seen.contains(&team_id) {
                        return Err(LeagueError::UnknownTeam { team_id });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn season(&self, season_id: SeasonId) -> Result<&Season> {
        self.seasons
            .iter()
            .find(|s| s.id == season_id)
            .ok_or(LeagueError::UnknownSeason { season_id })
    }

    pub fn season_mut(&mut self, season_id: SeasonId) -> Result<&mut Season> {
        self.seasons
            .iter_mut()
            .find(|s| s.id == season_id)
            .ok_or(LeagueError::UnknownSeason { season_id })
    }

    pub fn current_season(&self) -> Option<&Season> {
        self.seasons.iter().find(|s| s.is_current)
    }

    /// Completed games from seasons created before `season_id`, for form.
    /// Season ids are allocated in creation order.
    pub fn prior_games(&self, season_id: SeasonId) -> Vec<Game> {
        self.seasons
            .iter()
            .filter(|s| s.id < season_id)
            .flat_map(|s| s.completed_games().cloned())
            .collect()
    }

    pub fn next_game_id(&self) -> GameId {
        self.seasons.iter().flat_map(|s| s.games.iter().map(|g| g.id)).max().unwrap_or(0) + 1
    }

    pub fn next_season_id(&self) -> SeasonId {
        self.seasons.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }
}
