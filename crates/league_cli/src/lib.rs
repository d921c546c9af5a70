//! Command-line driver for `league_core`.
//!
//! Loads a league snapshot (JSON), runs one engine operation against the
//! selected season, prints the resulting records as JSON and writes the
//! snapshot back when the operation produced results.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use serde::Serialize;

use league_core::engine::form::FORM_WINDOW;
use league_core::engine::{
    auto_play_season, calculate_form, form_guide, generate_predictions, league_table, play_week,
    play_week_enhanced, predict_final_table, week_analytics, AutoPlayOptions, Form, PlaySpeed,
    SeasonView, SimulationMode,
};
use league_core::{
    create_season, start_season, EngineConfig, Game, GameCompletion, GameId, LeagueSnapshot,
    RandomSource, RngSource, Season, SeasonId, SeasonStats, SeasonStatus, Team, TeamId,
};

#[derive(Parser, Debug)]
#[command(name = "league", version, about = "Round-robin league simulation and season prediction")]
pub struct Cli {
    /// League snapshot file (JSON); created on first write
    #[arg(long, global = true, default_value = "league.json")]
    pub league: PathBuf,

    /// Engine configuration (YAML, or JSON with a .json extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible simulations
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Season to operate on; defaults to the current season
    #[arg(long, global = true)]
    pub season: Option<SeasonId>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a team to the roster
    AddTeam {
        #[arg(long)]
        name: String,
        /// Base strength, 1-100
        #[arg(long)]
        strength: i32,
    },

    /// Create a season with a double round-robin fixture list
    NewSeason {
        #[arg(long)]
        name: String,
        /// Comma-separated team ids; every active team when omitted
        #[arg(long, value_delimiter = ',')]
        teams: Option<Vec<TeamId>>,
        /// Start the season and make it current
        #[arg(long)]
        start: bool,
    },

    /// Start an upcoming season and make it current
    Start { id: SeasonId },

    /// List seasons with their progress
    Seasons,

    /// Current league table
    Table,

    /// Recent form of one team
    Form {
        #[arg(long)]
        team: TeamId,
    },

    /// Play one week (the next unplayed week by default)
    SimulateWeek {
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        mode: Option<SimulationMode>,
        /// Use the linear strength model instead of the enhanced one
        #[arg(long)]
        basic: bool,
    },

    /// Enter a result by hand
    SetResult {
        #[arg(long)]
        game: GameId,
        #[arg(long)]
        home: i32,
        #[arg(long)]
        away: i32,
    },

    /// Play whole weeks until the batch cap or stop week is reached
    Autoplay {
        /// slow, normal or fast
        #[arg(long)]
        speed: Option<PlaySpeed>,
        #[arg(long)]
        mode: Option<SimulationMode>,
        #[arg(long)]
        stop_at_week: Option<u32>,
        #[arg(long)]
        no_analytics: bool,
    },

    /// Predict the final table
    Predict {
        /// Monte Carlo trials, overrides the config
        #[arg(long)]
        runs: Option<usize>,
        /// Only project the final table from one simulated run
        #[arg(long)]
        final_table: bool,
    },

    /// Week summary, or season statistics without --week
    Analytics {
        #[arg(long)]
        week: Option<u32>,
    },

    /// Reset one game, or the whole season without --game
    Reset {
        #[arg(long)]
        game: Option<GameId>,
    },
}

#[derive(Debug, Serialize)]
struct SeasonSummary<'a> {
    id: SeasonId,
    name: &'a str,
    is_current: bool,
    #[serde(flatten)]
    stats: SeasonStats,
}

impl<'a> From<&'a Season> for SeasonSummary<'a> {
    fn from(season: &'a Season) -> Self {
        Self { id: season.id, name: &season.name, is_current: season.is_current, stats: season.stats() }
    }
}

#[derive(Debug, Serialize)]
struct FormReport<'a> {
    team_id: TeamId,
    name: &'a str,
    #[serde(flatten)]
    form: Form,
    guide: String,
}

/// Executes one command, writing JSON records to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut snapshot = load_snapshot(&cli.league)?;
    let mut rng = match cli.seed.or(config.seed) {
        Some(seed) => {
            debug!("seeded rng: {}", seed);
            RngSource::seeded(seed)
        }
        None => RngSource::from_entropy(),
    };

    let mut session = Session { snapshot: &mut snapshot, config: &config, season: cli.season, out };
    let modified = session.dispatch(cli.command, &mut rng)?;

    if modified {
        save_snapshot(&snapshot, &cli.league)?;
    }
    Ok(())
}

fn emit<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Missing file means an empty league.
pub fn load_snapshot(path: &Path) -> Result<LeagueSnapshot> {
    if !path.exists() {
        info!("{} not found, starting an empty league", path.display());
        return Ok(LeagueSnapshot::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    LeagueSnapshot::from_json_str(&json).with_context(|| format!("invalid league snapshot {}", path.display()))
}

pub fn save_snapshot(snapshot: &LeagueSnapshot, path: &Path) -> Result<()> {
    let json = snapshot.to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("saved {}", path.display());
    Ok(())
}

struct Session<'s> {
    snapshot: &'s mut LeagueSnapshot,
    config: &'s EngineConfig,
    season: Option<SeasonId>,
    out: &'s mut dyn Write,
}

impl Session<'_> {
    /// Returns true when the snapshot changed.
    fn dispatch(&mut self, command: Commands, rng: &mut dyn RandomSource) -> Result<bool> {
        match command {
            Commands::AddTeam { name, strength } => self.add_team(name, strength),
            Commands::NewSeason { name, teams, start } => self.new_season(name, teams, start),
            Commands::Start { id } => {
                start_season(&mut self.snapshot.seasons, id)?;
                emit(self.out, &SeasonSummary::from(self.snapshot.season(id)?))?;
                Ok(true)
            }
            Commands::Seasons => {
                let summaries: Vec<SeasonSummary> = self.snapshot.seasons.iter().map(SeasonSummary::from).collect();
                emit(self.out, &summaries)?;
                Ok(false)
            }
            Commands::Table => self.table(),
            Commands::Form { team } => self.form(team),
            Commands::SimulateWeek { week, mode, basic } => self.simulate_week(week, mode, basic, rng),
            Commands::SetResult { game, home, away } => {
                let id = self.season_id()?;
                let game = self.snapshot.season_mut(id)?.update_result(game, home, away)?.clone();
                emit(self.out, &game)?;
                Ok(true)
            }
            Commands::Autoplay { speed, mode, stop_at_week, no_analytics } => {
                self.autoplay(speed, mode, stop_at_week, no_analytics, rng)
            }
            Commands::Predict { runs, final_table } => self.predict(runs, final_table, rng),
            Commands::Analytics { week } => self.analytics(week),
            Commands::Reset { game } => {
                let id = self.season_id()?;
                let season = self.snapshot.season_mut(id)?;
                match game {
                    Some(game_id) => season.reset_game(game_id)?,
                    None => season.reset(),
                }
                emit(self.out, &SeasonSummary::from(self.snapshot.season(id)?))?;
                Ok(true)
            }
        }
    }

    fn season_id(&self) -> Result<SeasonId> {
        match self.season {
            Some(id) => Ok(id),
            None => self
                .snapshot
                .current_season()
                .map(|s| s.id)
                .ok_or_else(|| anyhow!("no current season; pass --season or run `league start <id>`")),
        }
    }

    fn playable_season(&self) -> Result<&Season> {
        let season = self.snapshot.season(self.season_id()?)?;
        if season.status == SeasonStatus::Upcoming {
            bail!("season {} has not started; run `league start {}`", season.id, season.id);
        }
        Ok(season)
    }

    fn add_team(&mut self, name: String, strength: i32) -> Result<bool> {
        let id = self.snapshot.teams.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let team = Team::new(id, name, strength)?;
        info!("added team {} ({}), strength {}", team.id, team.name, team.strength);
        emit(self.out, &team)?;
        self.snapshot.teams.push(team);
        Ok(true)
    }

    fn new_season(&mut self, name: String, teams: Option<Vec<TeamId>>, start: bool) -> Result<bool> {
        let id = self.snapshot.next_season_id();
        let first_game_id = self.snapshot.next_game_id();
        let season = create_season(id, name, &self.snapshot.teams, teams.as_deref(), first_game_id)?;
        self.snapshot.seasons.push(season);
        if start {
            start_season(&mut self.snapshot.seasons, id)?;
        }
        emit(self.out, &SeasonSummary::from(self.snapshot.season(id)?))?;
        Ok(true)
    }

    fn table(&mut self) -> Result<bool> {
        let id = self.season_id()?;
        let table = {
            let view = SeasonView::of_season(self.snapshot.season(id)?, &self.snapshot.teams)?;
            league_table(&view)
        };
        emit(self.out, &table)?;
        Ok(false)
    }

    fn form(&mut self, team_id: TeamId) -> Result<bool> {
        let id = self.season_id()?;
        let prior = self.snapshot.prior_games(id);
        let view = SeasonView::of_season(self.snapshot.season(id)?, &self.snapshot.teams)?.with_prior_games(&prior);
        let team = view.team(team_id)?;
        let report = FormReport {
            team_id,
            name: &team.name,
            form: calculate_form(team_id, view.history()),
            guide: form_guide(team_id, view.history(), FORM_WINDOW),
        };
        emit(self.out, &report)?;
        Ok(false)
    }

    fn simulate_week(
        &mut self,
        week: Option<u32>,
        mode: Option<SimulationMode>,
        basic: bool,
        rng: &mut dyn RandomSource,
    ) -> Result<bool> {
        let season = self.playable_season()?;
        let id = season.id;
        let Some(week) = week.or_else(|| season.next_week()) else {
            warn!("season {} has no games left to play", id);
            return Ok(false);
        };
        if !season.week_exists(week) {
            bail!("season {} has no week {}", id, week);
        }

        let prior = self.snapshot.prior_games(id);
        let (completions, json) = {
            let view = SeasonView::of_season(season, &self.snapshot.teams)?.with_prior_games(&prior);
            if basic {
                let completions = play_week(&view, week, rng)?;
                let json = serde_json::to_string_pretty(&completions)?;
                (completions, json)
            } else {
                let mode = mode.unwrap_or(self.config.autoplay.mode);
                let plays = play_week_enhanced(&view, week, mode, rng)?;
                let json = serde_json::to_string_pretty(&plays)?;
                let completions: Vec<GameCompletion> = plays.into_iter().map(|play| play.completion).collect();
                (completions, json)
            }
        };

        if completions.is_empty() {
            warn!("season {} week {} has no scheduled games", id, week);
        }
        self.snapshot.season_mut(id)?.apply_completions(&completions)?;
        writeln!(self.out, "{}", json)?;
        Ok(!completions.is_empty())
    }

    fn autoplay(
        &mut self,
        speed: Option<PlaySpeed>,
        mode: Option<SimulationMode>,
        stop_at_week: Option<u32>,
        no_analytics: bool,
        rng: &mut dyn RandomSource,
    ) -> Result<bool> {
        let mut options = AutoPlayOptions::from(&self.config.autoplay);
        if let Some(speed) = speed {
            options = options.with_speed(speed);
        }
        if let Some(mode) = mode {
            options.mode = mode;
        }
        if stop_at_week.is_some() {
            options.stop_at_week = stop_at_week;
        }
        if no_analytics {
            options.include_analytics = false;
        }

        let season = self.playable_season()?;
        let id = season.id;
        let prior = self.snapshot.prior_games(id);
        let report = {
            let view = SeasonView::of_season(season, &self.snapshot.teams)?.with_prior_games(&prior);
            auto_play_season(&view, &options, rng)?
        };

        self.snapshot.season_mut(id)?.apply_completions(&report.completions())?;
        emit(self.out, &report)?;
        Ok(!report.games.is_empty())
    }

    fn predict(&mut self, runs: Option<usize>, final_table: bool, rng: &mut dyn RandomSource) -> Result<bool> {
        let mut prediction = self.config.prediction.clone();
        if let Some(runs) = runs {
            if runs == 0 {
                bail!("--runs must be at least 1");
            }
            prediction.monte_carlo_runs = runs;
        }

        let id = self.season_id()?;
        let prior = self.snapshot.prior_games(id);
        let view = SeasonView::of_season(self.snapshot.season(id)?, &self.snapshot.teams)?.with_prior_games(&prior);
        let json = if final_table {
            serde_json::to_string_pretty(&predict_final_table(&view, rng)?)?
        } else {
            serde_json::to_string_pretty(&generate_predictions(&view, &prediction, rng)?)?
        };
        writeln!(self.out, "{}", json)?;
        Ok(false)
    }

    fn analytics(&mut self, week: Option<u32>) -> Result<bool> {
        let id = self.season_id()?;
        let season = self.snapshot.season(id)?;
        let json = match week {
            Some(week) => {
                let games: Vec<Game> = season.week_games(week).into_iter().cloned().collect();
                let view = SeasonView::of_season(season, &self.snapshot.teams)?;
                serde_json::to_string_pretty(&week_analytics(&view, week, &games)?)?
            }
            None => serde_json::to_string_pretty(&SeasonSummary::from(season))?,
        };
        writeln!(self.out, "{}", json)?;
        Ok(false)
    }
}
