//! # league_core - Round-Robin League Simulation Engine
//!
//! Match simulation, standings and season prediction for a double
//! round-robin league.
//!
//! ## Features
//! - Seedable randomness: same seed, same season
//! - Basic (linear) and enhanced (form + random events) match models
//! - Five prediction methods including a parallel Monte Carlo ensemble
//! - Week-by-week auto-play with per-week analytics
//!
//! The engine reads snapshots and returns records; only the [`league`]
//! lifecycle functions modify a season.

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Engine entry points take view, options and rng together
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod engine;
pub mod error;
pub mod league;
pub mod models;
pub mod rng;

pub use config::EngineConfig;
pub use engine::{
    auto_play_season, generate_predictions, league_table, predict_final_table, AutoPlayOptions,
    AutoPlayReport, PlaySpeed, PredictionSet, SeasonView, SimulationMode, Standing,
};
pub use error::{LeagueError, Result};
pub use league::{create_season, generate_fixtures, select_current, start_season, SeasonStats};
pub use models::{
    Game, GameCompletion, GameId, GameStatus, LeagueSnapshot, Season, SeasonId, SeasonStatus, Team,
    TeamId,
};
pub use rng::{RandomSource, RngSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
