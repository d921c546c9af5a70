use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SeasonId, TeamId};
use crate::error::{LeagueError, Result};

pub type GameId = u32;

/// Upper bound accepted for a manually entered score.
pub const MAX_ENTERED_GOALS: u8 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    Completed,
}

/// Result of a game from one team's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl Outcome {
    pub fn from_goals(scored: u8, conceded: u8) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

/// A fixture, and once played, its result.
///
/// Goals are `Some` exactly when `status` is completed. The crate's own
/// transitions keep that in step; records built or deserialized elsewhere
/// are checked with [`Game::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub season_id: SeasonId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub week: u32,
    pub status: GameStatus,
    #[serde(default)]
    pub home_goals: Option<u8>,
    #[serde(default)]
    pub away_goals: Option<u8>,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
}

/// Instruction to the persistence layer: mark one game completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameCompletion {
    pub game_id: GameId,
    pub home_goals: u8,
    pub away_goals: u8,
    pub played_at: DateTime<Utc>,
}

impl Game {
    pub fn scheduled(
        id: GameId,
        season_id: SeasonId,
        home_team_id: TeamId,
        away_team_id: TeamId,
        week: u32,
    ) -> Self {
        Self {
            id,
            season_id,
            home_team_id,
            away_team_id,
            week,
            status: GameStatus::Scheduled,
            home_goals: None,
            away_goals: None,
            played_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == GameStatus::Scheduled
    }

    /// `(home, away)` for completed games.
    pub fn score(&self) -> Option<(u8, u8)> {
        if !self.is_completed() {
            return None;
        }
        Some((self.home_goals?, self.away_goals?))
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn opponent_of(&self, team_id: TeamId) -> Option<TeamId> {
        if self.home_team_id == team_id {
            Some(self.away_team_id)
        } else if self.away_team_id == team_id {
            Some(self.home_team_id)
        } else {
            None
        }
    }

    /// `(scored, conceded)` for `team_id`, whichever side it played.
    pub fn goals_for(&self, team_id: TeamId) -> Option<(u8, u8)> {
        let (home, away) = self.score()?;
        if self.home_team_id == team_id {
            Some((home, away))
        } else if self.away_team_id == team_id {
            Some((away, home))
        } else {
            None
        }
    }

    pub fn outcome_for(&self, team_id: TeamId) -> Option<Outcome> {
        self.goals_for(team_id).map(|(scored, conceded)| Outcome::from_goals(scored, conceded))
    }

    pub fn winner(&self) -> Option<TeamId> {
        let (home, away) = self.score()?;
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(self.home_team_id),
            std::cmp::Ordering::Less => Some(self.away_team_id),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.score(), Some((home, away)) if home == away)
    }

    /// "2-1" once played, "vs" before.
    pub fn result_string(&self) -> String {
        match self.score() {
            Some((home, away)) => format!("{}-{}", home, away),
            None => "vs".to_string(),
        }
    }

    /// Range check for manually entered scores.
    pub fn validate_goals(home: i32, away: i32) -> Result<(u8, u8)> {
        if home < 0 || away < 0 {
            return Err(LeagueError::NegativeGoals { home, away });
        }
        let max = MAX_ENTERED_GOALS as i32;
        if home > max || away > max {
            return Err(LeagueError::GoalsOutOfRange { home, away, max: MAX_ENTERED_GOALS });
        }
        Ok((home as u8, away as u8))
    }

    /// Stored-record consistency: goals recorded exactly when completed,
    /// and within `0..=MAX_ENTERED_GOALS`.
    pub fn validate(&self) -> Result<()> {
        if self.home_team_id == self.away_team_id {
            return Err(LeagueError::SameTeam { team_id: self.home_team_id });
        }
        match (self.status, self.home_goals, self.away_goals) {
            (GameStatus::Completed, Some(home), Some(away)) => {
                if home > MAX_ENTERED_GOALS || away > MAX_ENTERED_GOALS {
                    return Err(LeagueError::GoalsOutOfRange {
                        home: home as i32,
                        away: away as i32,
                        max: MAX_ENTERED_GOALS,
                    });
                }
                Ok(())
            }
            (GameStatus::Scheduled, None, None) => Ok(()),
            _ => Err(LeagueError::InconsistentResult { game_id: self.id }),
        }
    }

    pub(crate) fn complete(&mut self, home_goals: u8, away_goals: u8, played_at: DateTime<Utc>) {
        self.home_goals = Some(home_goals);
        self.away_goals = Some(away_goals);
        self.played_at = Some(played_at);
        self.status = GameStatus::Completed;
    }

    pub(crate) fn apply(&mut self, completion: &GameCompletion) {
        self.complete(completion.home_goals, completion.away_goals, completion.played_at);
    }

    pub(crate) fn reset(&mut self) {
        self.home_goals = None;
        self.away_goals = None;
        self.played_at = None;
        self.status = GameStatus::Scheduled;
    }
}

impl GameCompletion {
    pub fn now(game_id: GameId, home_goals: u8, away_goals: u8) -> Self {
        Self { game_id, home_goals, away_goals, played_at: Utc::now() }
    }
}
