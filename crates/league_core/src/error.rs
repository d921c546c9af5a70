use thiserror::Error;

use crate::models::{GameId, SeasonId, SeasonStatus, TeamId};

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("At least 2 teams are required, found {found}")]
    NotEnoughTeams { found: usize },

    #[error("Team {team_id} is listed more than once")]
    DuplicateTeam { team_id: TeamId },

    #[error("Team {team_id} cannot play against itself")]
    SameTeam { team_id: TeamId },

    #[error("Unknown team: {team_id}")]
    UnknownTeam { team_id: TeamId },

    #[error("Unknown game: {game_id}")]
    UnknownGame { game_id: GameId },

    #[error("Unknown season: {season_id}")]
    UnknownSeason { season_id: SeasonId },

    #[error("Team strength must be within 1..=100, got {strength}")]
    InvalidStrength { strength: i32 },

    #[error("Goals cannot be negative: {home}-{away}")]
    NegativeGoals { home: i32, away: i32 },

    #[error("Goals seem unrealistic (max {max}): {home}-{away}")]
    GoalsOutOfRange { home: i32, away: i32, max: u8 },

    #[error("Game id {game_id} is used more than once")]
    DuplicateGame { game_id: GameId },

    #[error("Game {game_id} must have goals recorded exactly when it is completed")]
    InconsistentResult { game_id: GameId },

    #[error("Game {game_id} is already completed")]
    GameAlreadyCompleted { game_id: GameId },

    #[error("Game {game_id} belongs to season {found}, expected {expected}")]
    ForeignGame { game_id: GameId, found: SeasonId, expected: SeasonId },

    #[error("Season {season_id} cannot {action} while {status}")]
    InvalidSeasonState { season_id: SeasonId, status: SeasonStatus, action: &'static str },

    #[error("Unknown simulation mode: {0}")]
    UnknownMode(String),

    #[error("Unknown play speed: {0}")]
    UnknownSpeed(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl LeagueError {
    /// Every variant except configuration parsing describes a rejected call
    /// whose inputs were left untouched.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, LeagueError::Config(_))
    }
}

impl From<serde_yaml::Error> for LeagueError {
    fn from(err: serde_yaml::Error) -> Self {
        LeagueError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LeagueError {
    fn from(err: serde_json::Error) -> Self {
        LeagueError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
