//! League data model: teams, seasons, games and the snapshot document.

pub mod game;
pub mod season;
pub mod snapshot;
pub mod team;

pub use game::{Game, GameCompletion, GameId, GameStatus, Outcome, MAX_ENTERED_GOALS};
pub use season::{Season, SeasonId, SeasonStatus};
pub use snapshot::LeagueSnapshot;
pub use team::{active_roster, Team, TeamId, MAX_STRENGTH, MIN_STRENGTH};
