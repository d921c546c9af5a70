//! Season outcome predictions.
//!
//! Five independent views of the final table:
//! - `strength_based`: one basic-model playthrough of the remaining games
//! - `form_based`: current points plus a form-driven projection, rounded
//! - `statistical`: the same projection unrounded, with expected goals
//! - `monte_carlo`: many playthroughs tallied into position probabilities
//! - `consensus`: weighted blend of the first three rankings
//!
//! None of them modify the season they read.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::form::calculate_form;
use super::projection::{predict_final_table, project_table, remaining_fixtures};
use super::standings::{league_table, TeamStats};
use super::view::SeasonView;
use crate::config::{ConsensusWeights, PredictionConfig};
use crate::error::Result;
use crate::models::TeamId;
use crate::rng::{RandomSource, RngSource};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    StrengthBased,
    FormBased,
    Statistical,
    MonteCarlo,
    Consensus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrengthPrediction {
    pub position: usize,
    #[serde(flatten)]
    pub stats: TeamStats,
    pub confidence: f64,
    pub method: PredictionMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormPrediction {
    pub position: usize,
    pub team_id: TeamId,
    pub predicted_points: i64,
    pub predicted_goal_difference: i64,
    pub form_score: f64,
    pub confidence: f64,
    pub method: PredictionMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatisticalPrediction {
    pub position: usize,
    pub team_id: TeamId,
    pub predicted_points: f64,
    pub predicted_goal_difference: f64,
    pub xg_for: Option<f64>,
    pub xg_against: Option<f64>,
    pub confidence: f64,
    pub method: PredictionMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonteCarloPrediction {
    pub team_id: TeamId,
    pub most_likely_position: usize,
    /// Final position -> share of trials.
    pub position_probabilities: BTreeMap<usize, f64>,
    pub confidence: f64,
    pub method: PredictionMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsensusPrediction {
    pub position: usize,
    pub team_id: TeamId,
    pub consensus_position: usize,
    pub strength_position: usize,
    pub form_position: usize,
    pub statistical_position: usize,
    pub confidence: f64,
    pub method: PredictionMethod,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionSet {
    pub strength_based: Vec<StrengthPrediction>,
    pub form_based: Vec<FormPrediction>,
    pub statistical: Vec<StatisticalPrediction>,
    pub monte_carlo: Vec<MonteCarloPrediction>,
    pub consensus: Vec<ConsensusPrediction>,
}

pub fn strength_based<R>(
    view: &SeasonView<'_>,
    config: &PredictionConfig,
    rng: &mut R,
) -> Result<Vec<StrengthPrediction>>
where
    R: RandomSource + ?Sized,
{
    Ok(predict_final_table(view, rng)?
        .into_iter()
        .map(|standing| StrengthPrediction {
            position: standing.position,
            stats: standing.stats,
            confidence: config.strength_confidence,
            method: PredictionMethod::StrengthBased,
        })
        .collect())
}

/// Current record and form-driven projection for one roster team.
struct Projection {
    team_id: TeamId,
    points: f64,
    goal_difference: f64,
    form_score: f64,
    xg_for: Option<f64>,
    xg_against: Option<f64>,
    confidence: f64,
}

fn project_roster(view: &SeasonView<'_>) -> Vec<Projection> {
    let current: HashMap<TeamId, TeamStats> =
        league_table(view).into_iter().map(|s| (s.stats.team_id, s.stats)).collect();

    view.roster()
        .into_iter()
        .map(|team| {
            let form = calculate_form(team.id, view.history());
            let remaining = view.remaining_games_for(team.id) as f64;
            let (points, goal_difference) = current
                .get(&team.id)
                .map(|s| (s.points as f64, s.goal_difference as f64))
                .unwrap_or((0.0, 0.0));

            Projection {
                team_id: team.id,
                points: points + remaining * form.score * 2.0,
                goal_difference: goal_difference + form.goal_balance() * remaining,
                form_score: form.score,
                xg_for: form.goals_for_avg,
                xg_against: form.goals_against_avg,
                confidence: form.confidence,
            }
        })
        .collect()
}

pub fn form_based(view: &SeasonView<'_>, config: &PredictionConfig) -> Vec<FormPrediction> {
    let mut predictions: Vec<FormPrediction> = project_roster(view)
        .into_iter()
        .map(|p| FormPrediction {
            position: 0,
            team_id: p.team_id,
            predicted_points: p.points.round() as i64,
            predicted_goal_difference: p.goal_difference.round() as i64,
            form_score: p.form_score,
            confidence: p.confidence * config.form_confidence_scale,
            method: PredictionMethod::FormBased,
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.predicted_points
            .cmp(&a.predicted_points)
            .then_with(|| b.predicted_goal_difference.cmp(&a.predicted_goal_difference))
    });
    for (i, prediction) in predictions.iter_mut().enumerate() {
        prediction.position = i + 1;
    }
    predictions
}

pub fn statistical(view: &SeasonView<'_>) -> Vec<StatisticalPrediction> {
    let mut predictions: Vec<StatisticalPrediction> = project_roster(view)
        .into_iter()
        .map(|p| StatisticalPrediction {
            position: 0,
            team_id: p.team_id,
            predicted_points: p.points,
            predicted_goal_difference: p.goal_difference,
            xg_for: p.xg_for,
            xg_against: p.xg_against,
            confidence: p.confidence,
            method: PredictionMethod::Statistical,
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.predicted_points
            .total_cmp(&a.predicted_points)
            .then_with(|| b.predicted_goal_difference.total_cmp(&a.predicted_goal_difference))
    });
    for (i, prediction) in predictions.iter_mut().enumerate() {
        prediction.position = i + 1;
    }
    predictions
}

/// Per-team position counts, keeping first-seen order of teams and positions.
#[derive(Debug, Default)]
struct PositionTally {
    teams: Vec<(TeamId, Vec<(usize, u32)>)>,
    index: HashMap<TeamId, usize>,
}

impl PositionTally {
    fn add(&mut self, team_id: TeamId, position: usize) {
        let slot = *self.index.entry(team_id).or_insert_with(|| {
            self.teams.push((team_id, Vec::new()));
            self.teams.len() - 1
        });
        let counts = &mut self.teams[slot].1;
        match counts.iter_mut().find(|(p, _)| *p == position) {
            Some((_, count)) => *count += 1,
            None => counts.push((position, 1)),
        }
    }
}

/// Highest count in first-seen order; an equal later count does not
/// replace the earlier position.
fn most_likely(counts: &[(usize, u32)]) -> (usize, u32) {
    counts.iter().fold((0, 0), |best, &(position, count)| if count > best.1 { (position, count) } else { best })
}

fn summarize_positions(team_id: TeamId, counts: &[(usize, u32)], total: f64) -> MonteCarloPrediction {
    let (most_likely_position, max_count) = most_likely(counts);
    MonteCarloPrediction {
        team_id,
        most_likely_position,
        position_probabilities: counts
            .iter()
            .map(|&(position, count)| (position, count as f64 / total))
            .collect(),
        confidence: max_count as f64 / total,
        method: PredictionMethod::MonteCarlo,
    }
}

/// `runs` independent playthroughs, each seeded from `rng` and run in
/// parallel; tallied in trial order so a seed reproduces the output.
pub fn monte_carlo<R>(
    view: &SeasonView<'_>,
    runs: usize,
    rng: &mut R,
) -> Result<Vec<MonteCarloPrediction>>
where
    R: RandomSource + ?Sized,
{
    if runs == 0 {
        return Ok(Vec::new());
    }

    let current = league_table(view);
    let fixtures = remaining_fixtures(view)?;
    let seeds: Vec<u64> = (0..runs).map(|_| rng.next_seed()).collect();

    let trials: Vec<Vec<TeamId>> = seeds
        .into_par_iter()
        .map(|seed| {
            let mut trial_rng = RngSource::seeded(seed);
            project_table(&current, &fixtures, &mut trial_rng)
                .into_iter()
                .map(|s| s.stats.team_id)
                .collect()
        })
        .collect();

    let mut tally = PositionTally::default();
    for order in &trials {
        for (i, &team_id) in order.iter().enumerate() {
            tally.add(team_id, i + 1);
        }
    }

    let total = runs as f64;
    let mut predictions: Vec<MonteCarloPrediction> = tally
        .teams
        .into_iter()
        .map(|(team_id, counts)| summarize_positions(team_id, &counts, total))
        .collect();

    predictions.sort_by_key(|p| p.most_likely_position);
    debug!("monte carlo: {} runs over {} remaining games", runs, fixtures.len());
    Ok(predictions)
}

/// 1-based rank of `team_id`, or the list length when absent.
fn rank_in(order: &[TeamId], team_id: TeamId) -> usize {
    order.iter().position(|&id| id == team_id).map(|i| i + 1).unwrap_or(order.len())
}

pub fn consensus(
    roster: &[TeamId],
    strength: &[StrengthPrediction],
    form: &[FormPrediction],
    statistical: &[StatisticalPrediction],
    weights: ConsensusWeights,
    confidence: f64,
) -> Vec<ConsensusPrediction> {
    let strength_order: Vec<TeamId> = strength.iter().map(|p| p.stats.team_id).collect();
    let form_order: Vec<TeamId> = form.iter().map(|p| p.team_id).collect();
    let statistical_order: Vec<TeamId> = statistical.iter().map(|p| p.team_id).collect();

    let mut predictions: Vec<ConsensusPrediction> = roster
        .iter()
        .map(|&team_id| {
            let strength_position = rank_in(&strength_order, team_id);
            let form_position = rank_in(&form_order, team_id);
            let statistical_position = rank_in(&statistical_order, team_id);
            let blended = strength_position as f64 * weights.strength
                + form_position as f64 * weights.form
                + statistical_position as f64 * weights.statistical;

            ConsensusPrediction {
                position: 0,
                team_id,
                consensus_position: blended.round() as usize,
                strength_position,
                form_position,
                statistical_position,
                confidence,
                method: PredictionMethod::Consensus,
            }
        })
        .collect();

    predictions.sort_by_key(|p| p.consensus_position);
    for (i, prediction) in predictions.iter_mut().enumerate() {
        prediction.position = i + 1;
    }
    predictions
}

/// All five methods. Draws from `rng`: strength-based playthrough first,
/// then one seed per Monte Carlo trial.
pub fn generate_predictions<R>(
    view: &SeasonView<'_>,
    config: &PredictionConfig,
    rng: &mut R,
) -> Result<PredictionSet>
where
    R: RandomSource + ?Sized,
{
    let strength_based = strength_based(view, config, rng)?;
    let form_based = form_based(view, config);
    let statistical = statistical(view);
    let monte_carlo = monte_carlo(view, config.monte_carlo_runs, rng)?;

    let roster: Vec<TeamId> = view.roster().iter().map(|t| t.id).collect();
    let consensus = consensus(
        &roster,
        &strength_based,
        &form_based,
        &statistical,
        config.consensus_weights,
        config.consensus_confidence,
    );

    Ok(PredictionSet { strength_based, form_based, statistical, monte_carlo, consensus })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, Team};
    use chrono::Utc;

    fn league() -> (Vec<Team>, Vec<Game>) {
        let teams = vec![
            Team::new(1, "Lions", 90).unwrap(),
            Team::new(2, "Bears", 70).unwrap(),
            Team::new(3, "Hawks", 55).unwrap(),
            Team::new(4, "Moles", 40).unwrap(),
        ];
        let mut games = Vec::new();
        let mut id = 1;
        for (home, away) in [(1, 2), (3, 4), (1, 3), (2, 4), (4, 1), (3, 2)] {
            games.push(Game::scheduled(id, 1, home, away, id));
            id += 1;
        }
        for (i, (hg, ag)) in [(2, 0), (1, 1), (3, 1), (2, 2)].into_iter().enumerate() {
            games[i].complete(hg, ag, Utc::now());
        }
        (teams, games)
    }

    #[test]
    fn test_form_based_projection() {
        let (teams, games) = league();
        let view = SeasonView::new(1, &teams, &games).unwrap();
        let predictions = form_based(&view, &PredictionConfig::default());

        // Lions: 6 pts, form 1.0, one game left -> 8; gd +4 + 2.0 -> 6
        let lions = predictions.iter().find(|p| p.team_id == 1).unwrap();
        assert_eq!(lions.predicted_points, 8);
        assert_eq!(lions.predicted_goal_difference, 6);
        assert!((lions.confidence - 0.4 * 0.8).abs() < 1e-12);
        assert_eq!(predictions[0].team_id, 1);
        assert_eq!(predictions.iter().map(|p| p.position).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_statistical_keeps_fractions() {
        let (teams, games) = league();
        let view = SeasonView::new(1, &teams, &games).unwrap();
        let predictions = statistical(&view);

        // Hawks: D, L -> score 1/6, 1 pt, one game left -> 1 + 1/3
        let hawks = predictions.iter().find(|p| p.team_id == 3).unwrap();
        assert!((hawks.predicted_points - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(hawks.xg_for, Some(1.0));
        assert_eq!(hawks.confidence, 0.4);
    }

    #[test]
    fn test_monte_carlo_probabilities_sum_to_one() {
        let (teams, games) = league();
        let view = SeasonView::new(1, &teams, &games).unwrap();
        let predictions = monte_carlo(&view, 200, &mut RngSource::seeded(5)).unwrap();

        assert_eq!(predictions.len(), 4);
        for prediction in &predictions {
            let sum: f64 = prediction.position_probabilities.values().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            let best = prediction.position_probabilities[&prediction.most_likely_position];
            assert!((best - prediction.confidence).abs() < 1e-12);
        }
        assert!(predictions.windows(2).all(|w| w[0].most_likely_position <= w[1].most_likely_position));
    }

    #[test]
    fn test_monte_carlo_reproducible() {
        let (teams, games) = league();
        let view = SeasonView::new(1, &teams, &games).unwrap();
        let a = monte_carlo(&view, 100, &mut RngSource::seeded(21)).unwrap();
        let b = monte_carlo(&view, 100, &mut RngSource::seeded(21)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tally_first_maximum_wins() {
        let mut tally = PositionTally::default();
        tally.add(1, 3);
        tally.add(1, 1);
        tally.add(1, 1);
        tally.add(1, 3);
        assert_eq!(tally.teams[0].1, vec![(3, 2), (1, 2)]);

        let prediction = summarize_positions(1, &tally.teams[0].1, 4.0);
        assert_eq!(prediction.most_likely_position, 3);
        assert_eq!(prediction.confidence, 0.5);
        assert_eq!(prediction.position_probabilities.get(&1), Some(&0.5));
        assert_eq!(prediction.position_probabilities.get(&3), Some(&0.5));

        assert_eq!(most_likely(&[(2, 1), (4, 3), (1, 3)]), (4, 3));
    }

    #[test]
    fn test_consensus_weights_and_missing_rank() {
        let stat = |team_id| StatisticalPrediction {
            position: 0,
            team_id,
            predicted_points: 0.0,
            predicted_goal_difference: 0.0,
            xg_for: None,
            xg_against: None,
            confidence: 0.0,
            method: PredictionMethod::Statistical,
        };
        let form = |team_id| FormPrediction {
            position: 0,
            team_id,
            predicted_points: 0,
            predicted_goal_difference: 0,
            form_score: 0.0,
            confidence: 0.0,
            method: PredictionMethod::FormBased,
        };
        let strength = |team_id| StrengthPrediction {
            position: 0,
            stats: TeamStats::new(team_id),
            confidence: 0.7,
            method: PredictionMethod::StrengthBased,
        };

        let result = consensus(
            &[1, 2, 3],
            &[strength(2), strength(1)],
            &[form(1), form(2), form(3)],
            &[stat(1), stat(3), stat(2)],
            ConsensusWeights::default(),
            0.85,
        );

        // team 3 missing from strength -> rank 2; 2*0.4 + 3*0.35 + 2*0.25 = 2.35 -> 2
        let three = result.iter().find(|p| p.team_id == 3).unwrap();
        assert_eq!(three.strength_position, 2);
        assert_eq!(three.consensus_position, 2);
        // team 1: 2*0.4 + 1*0.35 + 1*0.25 = 1.4 -> 1
        assert_eq!(result[0].team_id, 1);
        assert_eq!(result[0].consensus_position, 1);
        assert_eq!(result.iter().map(|p| p.position).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(result.iter().all(|p| p.confidence == 0.85));
    }

    #[test]
    fn test_generate_predictions_is_read_only() {
        let (teams, games) = league();
        let before = games.clone();
        let view = SeasonView::new(1, &teams, &games).unwrap();
        let config = crate::config::EngineConfig::quick().prediction;
        let set = generate_predictions(&view, &config, &mut RngSource::seeded(1)).unwrap();
        assert_eq!(set.consensus.len(), 4);
        assert_eq!(set.strength_based.len(), 4);
        assert_eq!(games, before);
    }
}
