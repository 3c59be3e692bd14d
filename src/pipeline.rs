use thiserror::Error;
use tracing::info;

use crate::assembly::{self, Assembly, DEFAULT_WIN_ODDS};
use crate::diagnostics::Diagnostics;
use crate::game;
use crate::grouper;
use crate::players::PlayerLedger;
use crate::row::RawRow;
use crate::teams::TeamLedger;

pub const DEFAULT_GAME_MINUTES: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Game length used for career CS per minute.
    pub assumed_game_minutes: f64,
    /// Blue-side odds when neither team has a win on record.
    pub default_odds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            assumed_game_minutes: DEFAULT_GAME_MINUTES,
            default_odds: DEFAULT_WIN_ODDS,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no rows to assemble")]
    EmptyBatch,
}

/// Runs every stage over one batch of rows.
///
/// Row and match level problems never fail the run; they end up in
/// `Assembly::diagnostics`. The only fatal case is an empty batch.
pub fn run(rows: Vec<RawRow>, config: &PipelineConfig) -> Result<Assembly, PipelineError> {
    if rows.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }
    let row_count = rows.len();

    let mut diagnostics = Diagnostics::new();
    let groups = grouper::group_rows(rows, &mut diagnostics);
    let games = game::build_games(groups, &mut diagnostics);

    let mut team_ledger = TeamLedger::new();
    let mut player_ledger = PlayerLedger::new();
    for record in &games {
        team_ledger.observe(record);
        team_ledger.record_result(record);
        player_ledger.record_game(&record.id, &record.rows, &mut diagnostics);
    }

    let players = player_ledger.finish(config.assumed_game_minutes);
    let teams = team_ledger.finish(&players);

    let breakdowns = games
        .iter()
        .filter(|record| record.is_resolved())
        .filter_map(|record| assembly::break_down(record, &mut diagnostics))
        .collect();

    let output = assembly::assemble(teams, players, breakdowns, config.default_odds, diagnostics);

    info!(
        rows = row_count,
        games = games.len(),
        matches = output.matches.len(),
        teams = output.teams.len(),
        players = output.players.len(),
        diagnostics = output.diagnostics.len(),
        "assembled batch"
    );

    Ok(output)
}
