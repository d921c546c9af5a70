//! Single-run final table: play out every remaining fixture once on a
//! scratch copy of the current table.

use std::collections::HashMap;

use super::basic_sim::simulate_basic_match;
use super::standings::{league_table, rank, Standing, TeamStats};
use super::view::SeasonView;
use crate::error::Result;
use crate::models::TeamId;
use crate::rng::RandomSource;

/// A scheduled game with both base strengths resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingFixture {
    pub home_team_id: TeamId,
    pub home_strength: u8,
    pub away_team_id: TeamId,
    pub away_strength: u8,
}

/// Scheduled games of the season, in fixture-list order.
pub fn remaining_fixtures(view: &SeasonView<'_>) -> Result<Vec<RemainingFixture>> {
    view.scheduled_games()
        .map(|game| {
            Ok(RemainingFixture {
                home_team_id: game.home_team_id,
                home_strength: view.strength(game.home_team_id)?,
                away_team_id: game.away_team_id,
                away_strength: view.strength(game.away_team_id)?,
            })
        })
        .collect()
}

/// Plays `fixtures` on top of `current` with the basic model and re-ranks.
/// Teams that only appear in `fixtures` join with an empty record.
pub fn project_table<R>(
    current: &[Standing],
    fixtures: &[RemainingFixture],
    rng: &mut R,
) -> Vec<Standing>
where
    R: RandomSource + ?Sized,
{
    let mut table: Vec<TeamStats> = current.iter().map(|s| s.stats.clone()).collect();
    let mut index: HashMap<TeamId, usize> =
        table.iter().enumerate().map(|(i, s)| (s.team_id, i)).collect();

    for fixture in fixtures {
        let score = simulate_basic_match(fixture.home_strength, fixture.away_strength, rng);
        let home = slot(&mut table, &mut index, fixture.home_team_id);
        table[home].record(score.home_goals, score.away_goals);
        let away = slot(&mut table, &mut index, fixture.away_team_id);
        table[away].record(score.away_goals, score.home_goals);
    }

    rank(table)
}

fn slot(table: &mut Vec<TeamStats>, index: &mut HashMap<TeamId, usize>, team_id: TeamId) -> usize {
    *index.entry(team_id).or_insert_with(|| {
        table.push(TeamStats::new(team_id));
        table.len() - 1
    })
}

/// Projected final table for the season. Inputs are not modified.
pub fn predict_final_table<R>(view: &SeasonView<'_>, rng: &mut R) -> Result<Vec<Standing>>
where
    R: RandomSource + ?Sized,
{
    let current = league_table(view);
    let fixtures = remaining_fixtures(view)?;
    Ok(project_table(&current, &fixtures, rng))
}
