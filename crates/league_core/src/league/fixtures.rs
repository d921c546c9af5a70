use std::collections::HashSet;

use log::info;

use crate::error::{LeagueError, Result};
use crate::models::{Game, GameId, Season, SeasonId, Team, TeamId};

/// Double round-robin by nested loop: first every pair `(i, j > i)` with
/// `i` at home, then the same pairs reversed. Every fixture gets its own
/// week, counting up from 1, and ids count up from `first_game_id`.
pub fn generate_fixtures(
    season_id: SeasonId,
    team_ids: &[TeamId],
    first_game_id: GameId,
) -> Result<Vec<Game>> {
    if team_ids.len() < 2 {
        return Err(LeagueError::NotEnoughTeams { found: team_ids.len() });
    }
    let mut seen = HashSet::with_capacity(team_ids.len());
    for &team_id in team_ids {
        if !seen.insert(team_id) {
            return Err(LeagueError::DuplicateTeam { team_id });
        }
    }

    let n = team_ids.len();
    let mut games = Vec::with_capacity(n * (n - 1));
    let mut week = 1;
    let mut id = first_game_id;

    for second_round in [false, true] {
        for i in 0..n {
            for j in (i + 1)..n {
                let (home, away) = if second_round {
                    (team_ids[j], team_ids[i])
                } else {
                    (team_ids[i], team_ids[j])
                };
                games.push(Game::scheduled(id, season_id, home, away, week));
                id += 1;
                week += 1;
            }
        }
    }

    info!("season {}: generated {} fixtures for {} teams", season_id, games.len(), n);
    Ok(games)
}

/// New upcoming season with its fixture list. Without `team_ids` every
/// active team in `roster` takes part.
pub fn create_season(
    id: SeasonId,
    name: impl Into<String>,
    roster: &[Team],
    team_ids: Option<&[TeamId]>,
    first_game_id: GameId,
) -> Result<Season> {
    let ids: Vec<TeamId> = match team_ids {
        Some(ids) => {
            for &team_id in ids {
                if !roster.iter().any(|t| t.id == team_id) {
                    return Err(LeagueError::UnknownTeam { team_id });
                }
            }
            ids.to_vec()
        }
        None => roster.iter().filter(|t| t.is_active).map(|t| t.id).collect(),
    };

    let mut season = Season::new(id, name);
    season.games = generate_fixtures(id, &ids, first_game_id)?;
    Ok(season)
}
