//! Read-only season snapshot handed to every engine operation.

use std::collections::{HashMap, HashSet};

use crate::error::{LeagueError, Result};
use crate::models::{Game, Season, SeasonId, Team, TeamId};

/// One season's games plus the team roster, checked once up front so the
/// engine never meets a dangling team reference mid-simulation.
///
/// `prior_games` are completed games from other seasons; they only feed
/// form, never standings.
#[derive(Debug, Clone)]
pub struct SeasonView<'a> {
    season_id: SeasonId,
    teams: &'a [Team],
    games: &'a [Game],
    prior_games: &'a [Game],
    strengths: HashMap<TeamId, u8>,
}

impl<'a> SeasonView<'a> {
    pub fn new(season_id: SeasonId, teams: &'a [Team], games: &'a [Game]) -> Result<Self> {
        let mut strengths = HashMap::with_capacity(teams.len());
        for team in teams {
            team.validate()?;
            if strengths.insert(team.id, team.strength).is_some() {
                return Err(LeagueError::DuplicateTeam { team_id: team.id });
            }
        }

        let mut game_ids = HashSet::with_capacity(games.len());
        for game in games {
            if game.season_id != season_id {
                return Err(LeagueError::ForeignGame {
                    game_id: game.id,
                    found: game.season_id,
                    expected: season_id,
                });
            }
            if !game_ids.insert(game.id) {
                return Err(LeagueError::DuplicateGame { game_id: game.id });
            }
            game.validate()?;
            for team_id in [game.home_team_id, game.away_team_id] {
                if !strengths.contains_key(&team_id) {
                    return Err(LeagueError::UnknownTeam { team_id });
                }
            }
        }

        Ok(Self { season_id, teams, games, prior_games: &[], strengths })
    }

    pub fn of_season(season: &'a Season, teams: &'a [Team]) -> Result<Self> {
        Self::new(season.id, teams, &season.games)
    }

    pub fn with_prior_games(mut self, prior_games: &'a [Game]) -> Self {
        self.prior_games = prior_games;
        self
    }

    pub fn season_id(&self) -> SeasonId {
        self.season_id
    }

    pub fn teams(&self) -> &'a [Team] {
        self.teams
    }

    pub fn games(&self) -> &'a [Game] {
        self.games
    }

    pub fn prior_games(&self) -> &'a [Game] {
        self.prior_games
    }

    pub fn team(&self, team_id: TeamId) -> Result<&'a Team> {
        self.teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or(LeagueError::UnknownTeam { team_id })
    }

    pub fn strength(&self, team_id: TeamId) -> Result<u8> {
        self.strengths.get(&team_id).copied().ok_or(LeagueError::UnknownTeam { team_id })
    }

    /// Active teams in roster order.
    pub fn roster(&self) -> Vec<&'a Team> {
        self.teams.iter().filter(|t| t.is_active).collect()
    }

    /// Everything form may look at: prior seasons, then this season.
    /// Consumers order by (season, week, id); see `form::recent_games`.
    pub fn history(&self) -> impl Iterator<Item = &'a Game> + Clone {
        self.prior_games.iter().chain(self.games.iter())
    }

    pub fn completed_games(&self) -> impl Iterator<Item = &'a Game> + Clone {
        self.games.iter().filter(|g| g.is_completed())
    }

    pub fn scheduled_games(&self) -> impl Iterator<Item = &'a Game> + Clone {
        self.games.iter().filter(|g| g.is_scheduled())
    }

    pub fn remaining_games_for(&self, team_id: TeamId) -> usize {
        self.scheduled_games().filter(|g| g.involves(team_id)).count()
    }

    pub fn max_week(&self) -> u32 {
        self.games.iter().map(|g| g.week).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<Team> {
        vec![Team::new(1, "A", 80).unwrap(), Team::new(2, "B", 60).unwrap()]
    }

    #[test]
    fn test_rejects_unknown_team() {
        let teams = teams();
        let games = vec![Game::scheduled(1, 1, 1, 3, 1)];
        assert!(matches!(
            SeasonView::new(1, &teams, &games),
            Err(LeagueError::UnknownTeam { team_id: 3 })
        ));
    }

    #[test]
    fn test_rejects_game_from_other_season() {
        let teams = teams();
        let games = vec![Game::scheduled(4, 2, 1, 2, 1)];
        assert!(matches!(
            SeasonView::new(1, &teams, &games),
            Err(LeagueError::ForeignGame { game_id: 4, found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_rejects_team_playing_itself() {
        let teams = teams();
        let games = vec![Game::scheduled(1, 1, 2, 2, 1)];
        assert!(matches!(SeasonView::new(1, &teams, &games), Err(LeagueError::SameTeam { .. })));
    }

    #[test]
    fn test_rejects_duplicate_game_id() {
        let teams = teams();
        let games = vec![Game::scheduled(1, 1, 1, 2, 1), Game::scheduled(1, 1, 2, 1, 2)];
        assert!(matches!(
            SeasonView::new(1, &teams, &games),
            Err(LeagueError::DuplicateGame { game_id: 1 })
        ));
    }

    #[test]
    fn test_rejects_completed_game_without_goals() {
        let teams = teams();
        let mut games = vec![Game::scheduled(1, 1, 1, 2, 1)];
        games[0].status = crate::models::GameStatus::Completed;
        assert!(matches!(
            SeasonView::new(1, &teams, &games),
            Err(LeagueError::InconsistentResult { game_id: 1 })
        ));
    }

    #[test]
    fn test_roster_skips_inactive() {
        let mut teams = teams();
        teams[1].is_active = false;
        let view = SeasonView::new(1, &teams, &[]).unwrap();
        let ids: Vec<TeamId> = view.roster().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(view.strength(2).unwrap(), 60);
        assert_eq!(view.max_week(), 0);
    }
}
