//! Real play: simulate scheduled games and emit completion directives.
//!
//! Nothing here mutates the season. Callers apply the returned
//! [`GameCompletion`]s through the season lifecycle.

use log::debug;
use serde::Serialize;

use super::basic_sim::simulate_basic_match;
use super::enhanced_sim::{simulate_enhanced_match, MatchMetadata, SimulationMode};
use super::view::SeasonView;
use crate::error::{LeagueError, Result};
use crate::models::{Game, GameCompletion, GameId, TeamId};
use crate::rng::RandomSource;

/// One enhanced-model result and how it came about.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnhancedPlay {
    #[serde(flatten)]
    pub completion: GameCompletion,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub week: u32,
    pub metadata: MatchMetadata,
}

impl EnhancedPlay {
    /// The game as it will look once the directive is applied.
    pub fn completed_game(&self, scheduled: &Game) -> Game {
        let mut game = scheduled.clone();
        game.apply(&self.completion);
        game
    }
}

fn basic_completion<R>(view: &SeasonView<'_>, game: &Game, rng: &mut R) -> Result<GameCompletion>
where
    R: RandomSource + ?Sized,
{
    if game.is_completed() {
        return Err(LeagueError::GameAlreadyCompleted { game_id: game.id });
    }
    let home = view.strength(game.home_team_id)?;
    let away = view.strength(game.away_team_id)?;
    let score = simulate_basic_match(home, away, rng);
    debug!(
        "game {} week {}: {} {}-{} {}",
        game.id, game.week, game.home_team_id, score.home_goals, score.away_goals, game.away_team_id
    );
    Ok(GameCompletion::now(game.id, score.home_goals, score.away_goals))
}

/// Basic-model result for one scheduled game.
pub fn simulate_game<R>(view: &SeasonView<'_>, game_id: GameId, rng: &mut R) -> Result<GameCompletion>
where
    R: RandomSource + ?Sized,
{
    let game = view
        .games()
        .iter()
        .find(|g| g.id == game_id)
        .ok_or(LeagueError::UnknownGame { game_id })?;
    basic_completion(view, game, rng)
}

fn scheduled_in_week<'a>(view: &SeasonView<'a>, week: u32) -> Vec<&'a Game> {
    let mut games: Vec<&Game> = view.scheduled_games().filter(|g| g.week == week).collect();
    games.sort_by_key(|g| g.id);
    games
}

/// Basic-model results for every scheduled game of `week`, by game id.
pub fn play_week<R>(view: &SeasonView<'_>, week: u32, rng: &mut R) -> Result<Vec<GameCompletion>>
where
    R: RandomSource + ?Sized,
{
    scheduled_in_week(view, week)
        .into_iter()
        .map(|game| basic_completion(view, game, rng))
        .collect()
}

/// Basic-model results for the rest of the season, by (week, id).
pub fn play_remaining<R>(view: &SeasonView<'_>, rng: &mut R) -> Result<Vec<GameCompletion>>
where
    R: RandomSource + ?Sized,
{
    let mut games: Vec<&Game> = view.scheduled_games().collect();
    games.sort_by_key(|g| (g.week, g.id));
    games.into_iter().map(|game| basic_completion(view, game, rng)).collect()
}

/// Enhanced-model results for every scheduled game of `week`, by game id.
/// Each result counts toward the form of the games after it.
pub fn play_week_enhanced<R>(
    view: &SeasonView<'_>,
    week: u32,
    mode: SimulationMode,
    rng: &mut R,
) -> Result<Vec<EnhancedPlay>>
where
    R: RandomSource + ?Sized,
{
    let fixtures = scheduled_in_week(view, week);
    let mut just_played: Vec<Game> = Vec::with_capacity(fixtures.len());
    let mut plays = Vec::with_capacity(fixtures.len());

    for game in fixtures {
        let home = view.team(game.home_team_id)?;
        let away = view.team(game.away_team_id)?;
        let history = view.history().chain(just_played.iter());
        let result = simulate_enhanced_match(home, away, history, mode, rng);
        debug!(
            "game {} week {} ({}): {} {}-{} {}",
            game.id, week, mode, home.name, result.home_goals, result.away_goals, away.name
        );

        let play = EnhancedPlay {
            completion: GameCompletion::now(game.id, result.home_goals, result.away_goals),
            home_team_id: game.home_team_id,
            away_team_id: game.away_team_id,
            week: game.week,
            metadata: result.metadata,
        };
        just_played.push(play.completed_game(game));
        plays.push(play);
    }

    Ok(plays)
}
