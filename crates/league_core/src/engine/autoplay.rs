//! Week-by-week auto-play with a per-call batch cap.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::analytics::{season_progress, week_analytics, SeasonProgress, WeekAnalytics};
use super::enhanced_sim::SimulationMode;
use super::play::{play_week_enhanced, EnhancedPlay};
use super::view::SeasonView;
use crate::config::AutoPlayConfig;
use crate::error::{LeagueError, Result};
use crate::models::{Game, GameCompletion};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaySpeed {
    Slow,
    Normal,
    Fast,
}

impl PlaySpeed {
    /// Games per auto-play call.
    pub fn batch_size(self) -> usize {
        match self {
            PlaySpeed::Slow => 1,
            PlaySpeed::Normal => 3,
            PlaySpeed::Fast => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaySpeed::Slow => "slow",
            PlaySpeed::Normal => "normal",
            PlaySpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for PlaySpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaySpeed {
    type Err = LeagueError;

    fn from_str(s: &str) -> Result<Self> {
        [PlaySpeed::Slow, PlaySpeed::Normal, PlaySpeed::Fast]
            .into_iter()
            .find(|speed| speed.as_str() == s)
            .ok_or_else(|| LeagueError::UnknownSpeed(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPlayOptions {
    pub mode: SimulationMode,
    pub stop_at_week: Option<u32>,
    pub max_games_per_batch: usize,
    pub include_analytics: bool,
}

impl Default for AutoPlayOptions {
    fn default() -> Self {
        Self::from(&AutoPlayConfig::default())
    }
}

impl From<&AutoPlayConfig> for AutoPlayOptions {
    fn from(cfg: &AutoPlayConfig) -> Self {
        Self {
            mode: cfg.mode,
            stop_at_week: cfg.stop_at_week,
            max_games_per_batch: cfg.max_games_per_batch,
            include_analytics: cfg.include_analytics,
        }
    }
}

impl AutoPlayOptions {
    pub fn with_speed(mut self, speed: PlaySpeed) -> Self {
        self.max_games_per_batch = speed.batch_size();
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AutoPlayReport {
    pub games: Vec<EnhancedPlay>,
    pub analytics: BTreeMap<u32, WeekAnalytics>,
    pub season_status: SeasonProgress,
    /// Next week to play, never beyond the stop week.
    pub next_week: u32,
}

impl AutoPlayReport {
    pub fn completions(&self) -> Vec<GameCompletion> {
        self.games.iter().map(|play| play.completion.clone()).collect()
    }
}

/// One past the last week with a completed game; 1 for a fresh season.
pub fn start_week(games: &[Game]) -> u32 {
    games.iter().filter(|g| g.is_completed()).map(|g| g.week).max().map_or(1, |w| w + 1)
}

/// Plays whole weeks from [`start_week`] until the batch cap is reached or
/// the stop week is passed. A week is never split: the cap is checked only
/// after a week finishes, so a call may exceed it.
///
/// The season in `view` is not modified; apply `report.completions()`.
pub fn auto_play_season<R>(
    view: &SeasonView<'_>,
    options: &AutoPlayOptions,
    rng: &mut R,
) -> Result<AutoPlayReport>
where
    R: RandomSource + ?Sized,
{
    let start = start_week(view.games());
    let last_fixture_week = view.max_week();
    let stop = options.stop_at_week.unwrap_or(last_fixture_week);
    if stop > last_fixture_week {
        warn!("stop week {} is past the last fixture week {}", stop, last_fixture_week);
    }

    // Weeks past the last fixture have nothing to play.
    let last_playable = stop.min(last_fixture_week);

    let mut working: Vec<Game> = view.games().to_vec();
    let mut games = Vec::new();
    let mut analytics = BTreeMap::new();
    let mut capped_at = None;

    for week in start..=last_playable {
        let plays = {
            let week_view = SeasonView::new(view.season_id(), view.teams(), &working)?
                .with_prior_games(view.prior_games());
            play_week_enhanced(&week_view, week, options.mode, rng)?
        };

        for play in &plays {
            if let Some(game) = working.iter_mut().find(|g| g.id == play.completion.game_id) {
                game.apply(&play.completion);
            }
        }

        if options.include_analytics {
            let played: Vec<Game> = plays
                .iter()
                .filter_map(|play| working.iter().find(|g| g.id == play.completion.game_id))
                .cloned()
                .collect();
            let week_view = SeasonView::new(view.season_id(), view.teams(), &working)?;
            analytics.insert(week, week_analytics(&week_view, week, &played)?);
        }

        games.extend(plays);
        if games.len() >= options.max_games_per_batch {
            capped_at = Some(week);
            break;
        }
    }

    let season_status = season_progress(&working);
    // Running out of weeks leaves the stop week as the next one.
    let next_week = match capped_at {
        Some(week) => week.saturating_add(1).min(stop),
        None => stop,
    };
    info!(
        "auto-play season {}: {} games from week {}, next week {} ({:.0}% complete)",
        view.season_id(),
        games.len(),
        start,
        next_week,
        season_status.progress * 100.0
    );

    Ok(AutoPlayReport { games, analytics, season_status, next_week })
}
