//! # Simulation and prediction engine
//!
//! Pure functions over a [`SeasonView`]. Randomness is always injected
//! through [`RandomSource`](crate::rng::RandomSource); nothing in here
//! writes to a season. Real play returns completion directives, while
//! predictions work on scratch copies.

pub mod analytics;
pub mod autoplay;
pub mod basic_sim;
pub mod enhanced_sim;
pub mod form;
pub mod play;
pub mod predictions;
pub mod projection;
pub mod standings;
pub mod strength;
pub mod view;

pub use analytics::{entertainment_score, season_progress, week_analytics, SeasonProgress, WeekAnalytics};
pub use autoplay::{auto_play_season, start_week, AutoPlayOptions, AutoPlayReport, PlaySpeed};
pub use basic_sim::{simulate_basic_match, Score};
pub use enhanced_sim::{
    enhanced_goals, roll_random_events, simulate_enhanced_match, EnhancedResult, MatchMetadata,
    RandomEvent, SimulationMode,
};
pub use form::{calculate_form, form_guide, Form, FormTrend};
pub use play::{play_remaining, play_week, play_week_enhanced, simulate_game, EnhancedPlay};
pub use predictions::{generate_predictions, PredictionMethod, PredictionSet};
pub use projection::predict_final_table;
pub use standings::{head_to_head, league_table, team_stats, HeadToHead, Standing, TeamStats};
pub use strength::effective_strength;
pub use view::SeasonView;
