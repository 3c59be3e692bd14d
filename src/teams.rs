use std::collections::HashMap;

use serde::Serialize;

use crate::fields;
use crate::game::{GameRecord, Side};
use crate::players::PlayerAggregate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAggregate {
    pub id: String,
    pub name: String,
    pub region: String,
    pub logo: String,
    pub win_rate: f64,
    pub blue_win_rate: f64,
    pub red_win_rate: f64,
    /// Seconds.
    pub average_game_duration: f64,
    pub games: u32,
    pub wins: u32,
    pub players: Vec<String>,
}

#[derive(Debug, Default)]
struct TeamTally {
    name: String,
    region: String,
    logo: String,
    games: u32,
    wins: u32,
    blue_games: u32,
    blue_wins: u32,
    red_games: u32,
    red_wins: u32,
    duration_total: f64,
    duration_games: u32,
}

#[derive(Debug, Default)]
pub struct TeamLedger {
    order: Vec<String>,
    tallies: HashMap<String, TeamTally>,
}

/// wins / games, 0 when no games were played.
pub fn rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    }
}

impl TeamLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every team seen on the game's rows and picks up descriptive
    /// columns the first time they appear.
    pub fn observe(&mut self, game: &GameRecord) {
        for row in &game.rows {
            let Some(team_id) = row.text(&fields::TEAM_ID) else {
                continue;
            };
            if !self.tallies.contains_key(team_id) {
                self.order.push(team_id.to_string());
            }
            let tally = self.tallies.entry(team_id.to_string()).or_default();

            if tally.name.is_empty() {
                if let Some(name) = row.text(&fields::TEAM_NAME) {
                    tally.name = name.to_string();
                }
            }
            if tally.logo.is_empty() {
                if let Some(logo) = row.text(&fields::LOGO) {
                    tally.logo = logo.to_string();
                }
            }
            if tally.region.is_empty() {
                if let Some(region) = row.text(&fields::REGION) {
                    tally.region = region.to_string();
                } else if !game.metadata.league.is_empty() {
                    tally.region = game.metadata.league.clone();
                }
            }
        }
    }

    /// Counts a finished game toward both teams' records. Games without both
    /// sides or without a winner are not counted.
    pub fn record_result(&mut self, game: &GameRecord) {
        let Some(winner) = game.winner() else {
            return;
        };
        if !game.is_resolved() {
            return;
        }
        let duration = game.duration_seconds();

        for side in Side::BOTH {
            let Some(team_id) = game.team_id(side) else {
                continue;
            };
            let won = team_id == winner;
            let tally = self.tallies.entry(team_id.to_string()).or_default();

            tally.games += 1;
            tally.wins += won as u32;
            match side {
                Side::Blue => {
                    tally.blue_games += 1;
                    tally.blue_wins += won as u32;
                }
                Side::Red => {
                    tally.red_games += 1;
                    tally.red_wins += won as u32;
                }
            }
            if let Some(seconds) = duration {
                tally.duration_total += seconds;
                tally.duration_games += 1;
            }
        }
    }

    /// Final aggregates in first-seen order, each listing the players whose
    /// current team it is.
    pub fn finish(mut self, players: &[PlayerAggregate]) -> Vec<TeamAggregate> {
        let mut teams = Vec::with_capacity(self.order.len());

        for id in self.order {
            let Some(tally) = self.tallies.remove(&id) else {
                continue;
            };
            let roster = players
                .iter()
                .filter(|player| player.team_id == id)
                .map(|player| player.id.clone())
                .collect();
            let average_game_duration = if tally.duration_games == 0 {
                0.0
            } else {
                tally.duration_total / tally.duration_games as f64
            };

            teams.push(TeamAggregate {
                name: if tally.name.is_empty() { id.clone() } else { tally.name },
                region: tally.region,
                logo: tally.logo,
                win_rate: rate(tally.wins, tally.games),
                blue_win_rate: rate(tally.blue_wins, tally.blue_games),
                red_win_rate: rate(tally.red_wins, tally.red_games),
                average_game_duration,
                games: tally.games,
                wins: tally.wins,
                players: roster,
                id,
            });
        }

        teams
    }
}
