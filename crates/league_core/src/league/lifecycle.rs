//! Season state transitions and result entry.
//!
//! Every operation validates first and mutates only on success.

use chrono::Utc;
use log::info;

use crate::error::{LeagueError, Result};
use crate::models::{Game, GameCompletion, GameId, Season, SeasonId, SeasonStatus};

impl Season {
    /// upcoming -> active. Use [`start_season`] to also make it current.
    pub fn start(&mut self) -> Result<()> {
        if self.status != SeasonStatus::Upcoming {
            return Err(LeagueError::InvalidSeasonState {
                season_id: self.id,
                status: self.status,
                action: "start",
            });
        }
        self.status = SeasonStatus::Active;
        info!("season {} ({}) started", self.id, self.name);
        Ok(())
    }

    /// Manual score entry; may correct an already entered result.
    pub fn update_result(&mut self, game_id: GameId, home_goals: i32, away_goals: i32) -> Result<&Game> {
        let (home, away) = Game::validate_goals(home_goals, away_goals)?;
        let game = self.game_mut(game_id).ok_or(LeagueError::UnknownGame { game_id })?;
        game.complete(home, away, Utc::now());
        Ok(game)
    }

    /// Applies a simulation directive. Completes the season once nothing
    /// is left to play.
    pub fn apply_completion(&mut self, completion: &GameCompletion) -> Result<()> {
        self.check_completion(completion)?;
        if let Some(game) = self.game_mut(completion.game_id) {
            game.apply(completion);
        }
        self.refresh_status();
        Ok(())
    }

    /// All-or-nothing: one bad directive rejects the whole batch.
    pub fn apply_completions(&mut self, completions: &[GameCompletion]) -> Result<()> {
        for (i, completion) in completions.iter().enumerate() {
            self.check_completion(completion)?;
            if completions[..i].iter().any(|c| c.game_id == completion.game_id) {
                return Err(LeagueError::GameAlreadyCompleted { game_id: completion.game_id });
            }
        }
        for completion in completions {
            if let Some(game) = self.game_mut(completion.game_id) {
                game.apply(completion);
            }
        }
        self.refresh_status();
        Ok(())
    }

    fn check_completion(&self, completion: &GameCompletion) -> Result<()> {
        let game_id = completion.game_id;
        let game = self.game(game_id).ok_or(LeagueError::UnknownGame { game_id })?;
        if game.is_completed() {
            return Err(LeagueError::GameAlreadyCompleted { game_id });
        }
        Game::validate_goals(completion.home_goals as i32, completion.away_goals as i32)?;
        Ok(())
    }

    fn refresh_status(&mut self) {
        if self.status != SeasonStatus::Completed
            && !self.games.is_empty()
            && self.scheduled_games().next().is_none()
        {
            self.status = SeasonStatus::Completed;
            info!("season {} ({}) completed", self.id, self.name);
        }
    }

    /// Back to scheduled with goals and timestamp cleared. A completed
    /// season becomes active again.
    pub fn reset_game(&mut self, game_id: GameId) -> Result<()> {
        let game = self.game_mut(game_id).ok_or(LeagueError::UnknownGame { game_id })?;
        game.reset();
        if self.status == SeasonStatus::Completed {
            self.status = SeasonStatus::Active;
        }
        Ok(())
    }

    /// Every game back to scheduled.
    pub fn reset(&mut self) {
        for game in &mut self.games {
            game.reset();
        }
        if self.status == SeasonStatus::Completed {
            self.status = SeasonStatus::Active;
        }
        info!("season {} ({}) reset: {} games rescheduled", self.id, self.name, self.games.len());
    }
}

/// Makes `season_id` the only current season and marks it active.
pub fn select_current(seasons: &mut [Season], season_id: SeasonId) -> Result<()> {
    if !seasons.iter().any(|s| s.id == season_id) {
        return Err(LeagueError::UnknownSeason { season_id });
    }
    for season in seasons.iter_mut() {
        if season.id == season_id {
            season.is_current = true;
            season.status = SeasonStatus::Active;
        } else {
            season.is_current = false;
        }
    }
    Ok(())
}

/// Starts an upcoming season and makes it current.
pub fn start_season(seasons: &mut [Season], season_id: SeasonId) -> Result<()> {
    let season = seasons
        .iter_mut()
        .find(|s| s.id == season_id)
        .ok_or(LeagueError::UnknownSeason { season_id })?;
    season.start()?;
    select_current(seasons, season_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::generate_fixtures;
    use crate::models::GameStatus;

    fn season() -> Season {
        let mut season = Season::new(1, "Test");
        season.games = generate_fixtures(1, &[1, 2], 1).unwrap();
        season
    }

    #[test]
    fn test_start_only_from_upcoming() {
        let mut s = season();
        s.start().unwrap();
        assert_eq!(s.status, SeasonStatus::Active);
        let err = s.start().unwrap_err();
        assert_eq!(err.to_string(), "Season 1 cannot start while active");
    }

    #[test]
    fn test_select_current_is_exclusive() {
        let mut seasons = vec![season(), Season::new(2, "Next")];
        seasons[0].is_current = true;
        start_season(&mut seasons, 2).unwrap();
        assert!(!seasons[0].is_current);
        assert!(seasons[1].is_current);
        assert_eq!(seasons[1].status, SeasonStatus::Active);
        assert!(select_current(&mut seasons, 9).is_err());
        assert!(seasons[1].is_current);
    }

    #[test]
    fn test_update_result_validates_without_mutation() {
        let mut s = season();
        assert!(matches!(s.update_result(1, -1, 0), Err(LeagueError::NegativeGoals { .. })));
        assert!(matches!(s.update_result(1, 3, 21), Err(LeagueError::GoalsOutOfRange { .. })));
        assert!(s.games[0].is_scheduled());

        s.update_result(1, 2, 1).unwrap();
        s.update_result(1, 0, 0).unwrap();
        assert_eq!(s.games[0].score(), Some((0, 0)));
    }

    #[test]
    fn test_apply_completion_rejects_completed_game() {
        let mut s = season();
        s.apply_completion(&GameCompletion::now(1, 1, 0)).unwrap();
        assert!(matches!(
            s.apply_completion(&GameCompletion::now(1, 2, 2)),
            Err(LeagueError::GameAlreadyCompleted { game_id: 1 })
        ));
        assert_eq!(s.games[0].score(), Some((1, 0)));
    }

    #[test]
    fn test_last_completion_finishes_season() {
        let mut s = season();
        s.start().unwrap();
        s.apply_completions(&[GameCompletion::now(1, 1, 0), GameCompletion::now(2, 0, 0)]).unwrap();
        assert_eq!(s.status, SeasonStatus::Completed);

        s.reset_game(2).unwrap();
        assert_eq!(s.status, SeasonStatus::Active);
        assert_eq!(s.games[1].status, GameStatus::Scheduled);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut s = season();
        let batch = [GameCompletion::now(1, 1, 0), GameCompletion::now(99, 0, 0)];
        assert!(matches!(s.apply_completions(&batch), Err(LeagueError::UnknownGame { game_id: 99 })));
        assert!(s.games.iter().all(|g| g.is_scheduled()));

        let dup = [GameCompletion::now(1, 1, 0), GameCompletion::now(1, 0, 0)];
        assert!(s.apply_completions(&dup).is_err());
        assert!(s.games[0].is_scheduled());
    }

    #[test]
    fn test_reset_season() {
        let mut s = season();
        s.apply_completions(&[GameCompletion::now(1, 1, 0), GameCompletion::now(2, 3, 3)]).unwrap();
        s.reset();
        assert!(s.games.iter().all(|g| g.is_scheduled() && g.home_goals.is_none() && g.played_at.is_none()));
        assert_eq!(s.status, SeasonStatus::Active);
        assert!(matches!(s.reset_game(50), Err(LeagueError::UnknownGame { game_id: 50 })));
    }
}
