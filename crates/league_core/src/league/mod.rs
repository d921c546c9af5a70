//! # Season lifecycle
//!
//! What the surrounding application does with engine output: building
//! fixture lists, entering and applying results, resets, current-season
//! selection and progress queries. These are the only operations that
//! mutate a [`Season`](crate::models::Season).

pub mod fixtures;
pub mod lifecycle;
pub mod queries;

pub use fixtures::{create_season, generate_fixtures};
pub use lifecycle::{select_current, start_season};
pub use queries::SeasonStats;
