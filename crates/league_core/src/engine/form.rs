//! Recent-form calculation over a team's last completed games.

use serde::{Deserialize, Serialize};

use crate::models::{Game, Outcome, TeamId};

/// Games sampled for form.
pub const FORM_WINDOW: usize = 5;
/// Confidence reported when a team has no completed games.
pub const NO_HISTORY_CONFIDENCE: f64 = 0.5;
/// Points-per-game gap between the recent pair and the rest that counts as a trend.
const TREND_MARGIN: f64 = 0.5;
const TREND_RECENT_GAMES: usize = 2;
const TREND_MIN_GAMES: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormTrend {
    Improving,
    Declining,
    Stable,
    Neutral,
}

impl FormTrend {
    /// Effective-strength bonus for the trend.
    pub fn adjustment(self) -> f64 {
        match self {
            FormTrend::Improving => 5.0,
            FormTrend::Declining => -5.0,
            FormTrend::Stable | FormTrend::Neutral => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Form {
    /// Fraction of available points taken, 0.0..=1.0
    pub score: f64,
    pub trend: FormTrend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_for_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_against_avg: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub games_sampled: usize,
}

impl Form {
    /// Form of a team with no completed games.
    pub fn no_history() -> Self {
        Self {
            score: 0.0,
            trend: FormTrend::Neutral,
            goals_for_avg: None,
            goals_against_avg: None,
            confidence: NO_HISTORY_CONFIDENCE,
            games_sampled: 0,
        }
    }

    pub fn goals_for_or_zero(&self) -> f64 {
        self.goals_for_avg.unwrap_or(0.0)
    }

    pub fn goals_against_or_zero(&self) -> f64 {
        self.goals_against_avg.unwrap_or(0.0)
    }

    /// Average goal difference per game; 0 without history.
    pub fn goal_balance(&self) -> f64 {
        self.goals_for_or_zero() - self.goals_against_or_zero()
    }
}

/// Completed games involving `team_id`, most recent first, capped to
/// `limit`. Later seasons come first (season ids follow creation order),
/// then higher week, then higher game id.
pub fn recent_games<'a, I>(team_id: TeamId, history: I, limit: usize) -> Vec<&'a Game>
where
    I: IntoIterator<Item = &'a Game>,
{
    let mut games: Vec<&Game> =
        history.into_iter().filter(|g| g.is_completed() && g.involves(team_id)).collect();
    games.sort_by_key(|g| std::cmp::Reverse((g.season_id, g.week, g.id)));
    games.truncate(limit);
    games
}

pub fn calculate_form<'a, I>(team_id: TeamId, history: I) -> Form
where
    I: IntoIterator<Item = &'a Game>,
{
    let sample = recent_games(team_id, history, FORM_WINDOW);
    form_from_sample(team_id, &sample)
}

/// Form over an already selected sample, most recent game first.
pub fn form_from_sample(team_id: TeamId, sample: &[&Game]) -> Form {
    let mut goals_for = 0u32;
    let mut goals_against = 0u32;
    let mut outcomes = Vec::with_capacity(sample.len());

    for game in sample {
        if let Some((scored, conceded)) = game.goals_for(team_id) {
            goals_for += scored as u32;
            goals_against += conceded as u32;
            outcomes.push(Outcome::from_goals(scored, conceded));
        }
    }

    if outcomes.is_empty() {
        return Form::no_history();
    }

    let n = outcomes.len() as f64;
    let points: u32 = outcomes.iter().map(|o| o.points()).sum();

    Form {
        score: points as f64 / (3.0 * n),
        trend: form_trend(&outcomes),
        goals_for_avg: Some(goals_for as f64 / n),
        goals_against_avg: Some(goals_against as f64 / n),
        confidence: (n / FORM_WINDOW as f64).min(1.0),
        games_sampled: outcomes.len(),
    }
}

/// Trend over outcomes ordered most recent first.
pub fn form_trend(outcomes: &[Outcome]) -> FormTrend {
    if outcomes.len() < TREND_MIN_GAMES {
        return FormTrend::Neutral;
    }

    let (recent, earlier) = outcomes.split_at(TREND_RECENT_GAMES);
    let avg = |xs: &[Outcome]| xs.iter().map(|o| o.points()).sum::<u32>() as f64 / xs.len() as f64;
    let recent_avg = avg(recent);
    let earlier_avg = avg(earlier);

    if recent_avg > earlier_avg + TREND_MARGIN {
        FormTrend::Improving
    } else if recent_avg < earlier_avg - TREND_MARGIN {
        FormTrend::Declining
    } else {
        FormTrend::Stable
    }
}

/// Last `limit` results as W/D/L letters, oldest first.
pub fn form_guide<'a, I>(team_id: TeamId, history: I, limit: usize) -> String
where
    I: IntoIterator<Item = &'a Game>,
{
    recent_games(team_id, history, limit)
        .iter()
        .rev()
        .filter_map(|g| g.outcome_for(team_id))
        .map(Outcome::letter)
        .collect()
}
