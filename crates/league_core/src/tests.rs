//! End-to-end scenarios across fixtures, simulation, lifecycle and predictions.

use crate::engine::{
    auto_play_season, generate_predictions, league_table, play_week, simulate_basic_match,
    AutoPlayOptions, PlaySpeed, SeasonView,
};
use crate::league::{create_season, start_season};
use crate::models::{LeagueSnapshot, SeasonStatus, Team};
use crate::rng::RngSource;
use crate::EngineConfig;

fn four_team_league() -> LeagueSnapshot {
    let teams = vec![
        Team::new(1, "Harbour City", 88).unwrap(),
        Team::new(2, "Northfield", 76).unwrap(),
        Team::new(3, "Riverside", 64).unwrap(),
        Team::new(4, "Old Quarry", 52).unwrap(),
    ];
    let season = create_season(1, "2026", &teams, None, 1).unwrap();
    LeagueSnapshot { teams, seasons: vec![season] }
}

#[test]
fn test_strong_team_outscores_weak_team() {
    let mut rng = RngSource::seeded(2024);
    let (mut a_goals, mut b_goals) = (0u32, 0u32);
    for _ in 0..1000 {
        let score = simulate_basic_match(90, 50, &mut rng);
        a_goals += score.home_goals as u32;
        b_goals += score.away_goals as u32;
    }
    assert!(a_goals > b_goals, "A scored {} vs B {}", a_goals, b_goals);
}

#[test]
fn test_reset_after_partial_completion() {
    let mut league = four_team_league();
    start_season(&mut league.seasons, 1).unwrap();

    let completions = {
        let season = league.season(1).unwrap();
        let view = SeasonView::of_season(season, &league.teams).unwrap();
        let mut rng = RngSource::seeded(5);
        let mut results = play_week(&view, 1, &mut rng).unwrap();
        results.extend(play_week(&view, 2, &mut rng).unwrap());
        results
    };
    let season = league.season_mut(1).unwrap();
    season.apply_completions(&completions).unwrap();
    assert_eq!(season.progress().completed_games, 2);

    season.reset();
    assert!(season
        .games
        .iter()
        .all(|g| g.is_scheduled() && g.home_goals.is_none() && g.away_goals.is_none() && g.played_at.is_none()));
    assert_eq!(season.progress().progress, 0.0);
    assert_eq!(season.stats().completion_percentage, 0.0);
    assert_eq!(season.status, SeasonStatus::Active);
}

#[test]
fn test_autoplay_then_predict() {
    let mut league = four_team_league();
    start_season(&mut league.seasons, 1).unwrap();
    let config = EngineConfig::quick();
    let mut rng = RngSource::seeded(77);

    // Two fast batches: 7 games, then the remaining 5.
    for expected in [7, 5] {
        let report = {
            let season = league.season(1).unwrap();
            let view = SeasonView::of_season(season, &league.teams).unwrap();
            let options = AutoPlayOptions::from(&config.autoplay).with_speed(PlaySpeed::Fast);
            auto_play_season(&view, &options, &mut rng).unwrap()
        };
        assert_eq!(report.games.len(), expected);
        league.season_mut(1).unwrap().apply_completions(&report.completions()).unwrap();
    }

    let season = league.season(1).unwrap();
    assert_eq!(season.status, SeasonStatus::Completed);

    let view = SeasonView::of_season(season, &league.teams).unwrap();
    let table = league_table(&view);
    let predictions = generate_predictions(&view, &config.prediction, &mut rng).unwrap();

    // Nothing left to play: every method agrees with the final table.
    let final_order: Vec<u32> = table.iter().map(|s| s.stats.team_id).collect();
    let strength_order: Vec<u32> = predictions.strength_based.iter().map(|p| p.stats.team_id).collect();
    assert_eq!(strength_order, final_order);
    for prediction in &predictions.monte_carlo {
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.position_probabilities.len(), 1);
    }
    let total_played: u32 = table.iter().map(|s| s.stats.played).sum();
    assert_eq!(total_played, 24);
}

#[test]
fn test_predictions_leave_season_untouched() {
    let league = four_team_league();
    let before = league.clone();
    let season = league.season(1).unwrap();
    let view = SeasonView::of_season(season, &league.teams).unwrap();

    let set = generate_predictions(&view, &EngineConfig::quick().prediction, &mut RngSource::seeded(3))
        .unwrap();
    for prediction in &set.monte_carlo {
        let sum: f64 = prediction.position_probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
    assert_eq!(league, before);
}

#[test]
fn test_prior_season_feeds_form() {
    let mut league = four_team_league();
    let completions: Vec<_> = {
        let season = league.season(1).unwrap();
        let view = SeasonView::of_season(season, &league.teams).unwrap();
        crate::engine::play_remaining(&view, &mut RngSource::seeded(12)).unwrap()
    };
    league.season_mut(1).unwrap().apply_completions(&completions).unwrap();

    let next_id = league.next_game_id();
    let next = create_season(2, "2027", &league.teams, None, next_id).unwrap();
    league.seasons.push(next);

    let prior = league.prior_games(2);
    assert_eq!(prior.len(), 12);
    let season = league.season(2).unwrap();
    let view = SeasonView::of_season(season, &league.teams).unwrap().with_prior_games(&prior);
    let form = crate::engine::calculate_form(1, view.history());
    assert_eq!(form.games_sampled, 5);
    assert_eq!(form.confidence, 1.0);
}
