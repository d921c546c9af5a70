//! Per-week summaries and season progress.

use serde::{Deserialize, Serialize};

use super::view::SeasonView;
use crate::error::Result;
use crate::models::Game;

const MAX_ENTERTAINMENT: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekAnalytics {
    pub week: u32,
    pub games_played: usize,
    pub total_goals: u32,
    pub average_goals: f64,
    /// Games won by the side with the strictly lower base strength.
    pub upsets: u32,
    pub entertainment_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonProgress {
    /// completed / total, 0 without fixtures
    pub progress: f64,
    pub completed_games: usize,
    pub total_games: usize,
    pub is_complete: bool,
}

/// Summary of `games` (one week's completed results). Scheduled games
/// in the slice are ignored.
pub fn week_analytics(view: &SeasonView<'_>, week: u32, games: &[Game]) -> Result<WeekAnalytics> {
    let mut scores = Vec::with_capacity(games.len());
    let mut upsets = 0;

    for game in games {
        let Some((home, away)) = game.score() else { continue };
        let home_strength = view.strength(game.home_team_id)?;
        let away_strength = view.strength(game.away_team_id)?;
        if (home_strength < away_strength && home > away)
            || (away_strength < home_strength && away > home)
        {
            upsets += 1;
        }
        scores.push((home, away));
    }

    let total_goals: u32 = scores.iter().map(|&(h, a)| h as u32 + a as u32).sum();
    let average_goals =
        if scores.is_empty() { 0.0 } else { total_goals as f64 / scores.len() as f64 };

    Ok(WeekAnalytics {
        week,
        games_played: scores.len(),
        total_goals,
        average_goals,
        upsets,
        entertainment_score: entertainment_score(&scores),
    })
}

/// Rewards high-scoring, close games; 0..=10, 0 for no games.
pub fn entertainment_score(scores: &[(u8, u8)]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: f64 = scores
        .iter()
        .map(|&(home, away)| {
            let total = (home as u32 + away as u32) as f64;
            let margin = (home as i32 - away as i32).unsigned_abs().min(4) as f64;
            total * 0.3 + (5.0 - margin) * 0.2
        })
        .sum();
    (sum / scores.len() as f64).min(MAX_ENTERTAINMENT)
}

/// Progress over `games`. A season without fixtures reports 0 progress
/// and counts as complete.
pub fn season_progress(games: &[Game]) -> SeasonProgress {
    let total_games = games.len();
    let completed_games = games.iter().filter(|g| g.is_completed()).count();
    SeasonProgress {
        progress: if total_games > 0 { completed_games as f64 / total_games as f64 } else { 0.0 },
        completed_games,
        total_games,
        is_complete: completed_games == total_games,
    }
}
