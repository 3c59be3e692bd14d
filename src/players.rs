use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::coerce;
use crate::diagnostics::{Component, Diagnostics};
use crate::fields;
use crate::objectives::is_team_row;
use crate::role::Role;
use crate::row::RawRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAggregate {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub team_id: String,
    pub kda: f64,
    pub cs_per_minute: f64,
    pub damage_share: f64,
    pub champion_pool: Vec<String>,
    pub games: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

#[derive(Debug, Default)]
struct PlayerTally {
    name: String,
    role: Option<Role>,
    role_is_fallback: bool,
    team_id: String,
    kills: f64,
    deaths: f64,
    assists: f64,
    cs: f64,
    damage: f64,
    games: u32,
    champions: Vec<String>,
    damage_shares: Vec<f64>,
    seen_games: HashSet<String>,
}

/// Running per-player totals across every game of one run.
#[derive(Debug, Default)]
pub struct PlayerLedger {
    order: Vec<String>,
    tallies: HashMap<String, PlayerTally>,
}

/// KDA ratio; with no deaths the ratio is just kills plus assists.
pub fn kda(kills: f64, deaths: f64, assists: f64) -> f64 {
    if deaths <= 0.0 {
        kills + assists
    } else {
        (kills + assists) / deaths
    }
}

/// Rows describing an individual player (not a team summary line).
pub fn player_rows(rows: &[RawRow]) -> impl Iterator<Item = &RawRow> {
    rows.iter().filter(|row| !is_team_row(row))
}

/// Total champion damage per team id over the player rows of one game. Teams
/// where no player reported damage are left out.
pub fn team_damage_totals(rows: &[RawRow]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in player_rows(rows) {
        let (Some(team_id), Some(damage)) = (
            row.text(&fields::TEAM_ID),
            coerce::optional_number(row, &fields::DAMAGE),
        ) else {
            continue;
        };
        *totals.entry(team_id.to_string()).or_insert(0.0) += damage;
    }
    totals
}

/// Player damage over team damage for one game, `None` when the team total is
/// zero or unknown.
pub fn damage_share(row: &RawRow, team_totals: &HashMap<String, f64>) -> Option<f64> {
    let team_id = row.text(&fields::TEAM_ID)?;
    let total = team_totals.get(team_id).copied().filter(|total| *total > 0.0)?;
    let damage = coerce::optional_number(row, &fields::DAMAGE)?;
    Some(damage / total)
}

/// Canonical role of a row, reporting when the position could not be read.
pub fn row_role(
    row: &RawRow,
    game_id: &str,
    component: Component,
    diagnostics: &mut Diagnostics,
) -> (Role, bool) {
    let raw = row.text(&fields::POSITION).unwrap_or_default();
    let (role, fallback) = Role::normalize(raw);
    if fallback {
        diagnostics.advisory(
            component,
            Some(game_id),
            fields::POSITION.name,
            format!(
                "unrecognized position '{}' for player {}, using Mid",
                raw,
                row.text(&fields::PLAYER_ID).unwrap_or("-")
            ),
        );
    }
    (role, fallback)
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game_id: &str, rows: &[RawRow], diagnostics: &mut Diagnostics) {
        let team_totals = team_damage_totals(rows);

        for row in player_rows(rows) {
            let Some(player_id) = row.text(&fields::PLAYER_ID) else {
                if row.text(&fields::PLAYER_NAME).is_some() || row.text(&fields::CHAMPION).is_some()
                {
                    diagnostics.omission(
                        Component::Players,
                        Some(game_id),
                        fields::PLAYER_ID.name,
                        format!(
                            "skipped player row without id (name '{}')",
                            row.text(&fields::PLAYER_NAME).unwrap_or("-")
                        ),
                    );
                }
                continue;
            };

            if !self.tallies.contains_key(player_id) {
                self.order.push(player_id.to_string());
            }
            let tally = self.tallies.entry(player_id.to_string()).or_default();

            if !tally.seen_games.insert(game_id.to_string()) {
                continue;
            }

            if let Some(name) = row.text(&fields::PLAYER_NAME) {
                if tally.name.is_empty() {
                    tally.name = name.to_string();
                }
            }
            if let Some(team_id) = row.text(&fields::TEAM_ID) {
                tally.team_id = team_id.to_string();
            }
            if tally.role.is_none() || tally.role_is_fallback {
                match row.text(&fields::POSITION).and_then(Role::parse) {
                    Some(role) => {
                        tally.role = Some(role);
                        tally.role_is_fallback = false;
                    }
                    None if tally.role.is_none() => {
                        let (role, _) = row_role(row, game_id, Component::Players, diagnostics);
                        tally.role = Some(role);
                        tally.role_is_fallback = true;
                    }
                    None => {}
                }
            }

            tally.kills += coerce::number(row, &fields::KILLS);
            tally.deaths += coerce::number(row, &fields::DEATHS);
            tally.assists += coerce::number(row, &fields::ASSISTS);
            tally.cs += coerce::number(row, &fields::MINION_KILLS)
                + coerce::number(row, &fields::MONSTER_KILLS);
            tally.damage += coerce::number(row, &fields::DAMAGE);
            tally.games += 1;

            if let Some(champion) = row.text(&fields::CHAMPION) {
                if !tally.champions.iter().any(|known| known == champion) {
                    tally.champions.push(champion.to_string());
                }
            }
            if let Some(share) = damage_share(row, &team_totals) {
                tally.damage_shares.push(share);
            }
        }
    }

    /// Final aggregates in first-seen order. CS per minute assumes every game
    /// lasted `assumed_game_minutes`.
    pub fn finish(mut self, assumed_game_minutes: f64) -> Vec<PlayerAggregate> {
        let mut players = Vec::with_capacity(self.order.len());

        for id in self.order {
            let Some(tally) = self.tallies.remove(&id) else {
                continue;
            };

            let games = tally.games.max(1) as f64;
            let cs_per_minute = if tally.games == 0 || assumed_game_minutes <= 0.0 {
                0.0
            } else {
                tally.cs / games / assumed_game_minutes
            };
            let damage_share = if tally.damage_shares.is_empty() {
                0.0
            } else {
                tally.damage_shares.iter().sum::<f64>() / tally.damage_shares.len() as f64
            };

            players.push(PlayerAggregate {
                name: if tally.name.is_empty() { id.clone() } else { tally.name },
                id,
                role: tally.role.unwrap_or(Role::Mid),
                team_id: tally.team_id,
                kda: kda(tally.kills, tally.deaths, tally.assists),
                cs_per_minute,
                damage_share,
                champion_pool: tally.champions,
                games: tally.games,
                kills: tally.kills.round() as u32,
                deaths: tally.deaths.round() as u32,
                assists: tally.assists.round() as u32,
            });
        }

        players
    }
}
