use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::coerce;
use crate::diagnostics::{Component, Diagnostics};
use crate::fields::{self, Field};
use crate::game::{GameRecord, Side};
use crate::players::{self, kda};
use crate::role::Role;
use crate::row::RawRow;

pub const SNAPSHOT_MINUTES: [u32; 4] = [10, 15, 20, 25];

/// Laning-phase numbers at one fixed game minute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub minute: u32,
    pub gold: Option<f64>,
    pub xp: Option<f64>,
    pub cs: Option<f64>,
    pub kills: Option<f64>,
    pub assists: Option<f64>,
    pub deaths: Option<f64>,
    pub opp_gold: Option<f64>,
    pub opp_xp: Option<f64>,
    pub opp_cs: Option<f64>,
    pub opp_kills: Option<f64>,
    pub opp_assists: Option<f64>,
    pub opp_deaths: Option<f64>,
    pub gold_diff: Option<f64>,
    pub xp_diff: Option<f64>,
    pub cs_diff: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchStats {
    pub participant_id: String,
    pub player_id: String,
    pub team_id: String,
    pub match_id: String,
    pub side: Side,
    pub role: Role,
    pub champion: String,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub kill_participation: f64,
    pub damage_to_champions: f64,
    pub dpm: f64,
    pub damage_share: f64,
    pub damage_taken_per_minute: f64,
    pub wards_placed: f64,
    pub wpm: f64,
    pub wards_killed: f64,
    pub wcpm: f64,
    pub control_wards_bought: f64,
    pub vision_score: f64,
    pub vspm: f64,
    pub total_gold: f64,
    pub earned_gold: f64,
    pub earned_gpm: f64,
    pub gold_spent: f64,
    pub minion_kills: f64,
    pub monster_kills: f64,
    pub total_cs: f64,
    pub cspm: f64,
    pub snapshots: Vec<Snapshot>,
}

impl PlayerMatchStats {
    pub fn snapshot(&self, minute: u32) -> Option<&Snapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.minute == minute)
    }
}

/// One fact row per player of a resolved game. `team_kills` feeds kill
/// participation.
pub fn build(
    game: &GameRecord,
    team_kills: &BTreeMap<Side, u32>,
    diagnostics: &mut Diagnostics,
) -> Vec<PlayerMatchStats> {
    let team_damage = players::team_damage_totals(&game.rows);
    let minutes = game.duration_seconds().map(|seconds| seconds / 60.0);
    let mut stats = Vec::new();
    let mut written: HashSet<&str> = HashSet::new();

    for row in players::player_rows(&game.rows) {
        let Some(player_id) = row.text(&fields::PLAYER_ID) else {
            continue;
        };
        if written.contains(player_id) {
            diagnostics.omission(
                Component::Assembly,
                Some(&game.id),
                fields::PLAYER_ID.name,
                format!("duplicate row for player {}, stats row skipped", player_id),
            );
            continue;
        }
        let Some(side) = game.side_of_row(row) else {
            diagnostics.omission(
                Component::Assembly,
                Some(&game.id),
                fields::SIDE.name,
                format!("no side for player {}, stats row skipped", player_id),
            );
            continue;
        };
        written.insert(player_id);
        let (role, _) = players::row_role(row, &game.id, Component::Assembly, diagnostics);
        let team_id = row
            .text(&fields::TEAM_ID)
            .or_else(|| game.team_id(side))
            .unwrap_or_default()
            .to_string();

        let kills = coerce::number(row, &fields::KILLS);
        let deaths = coerce::number(row, &fields::DEATHS);
        let assists = coerce::number(row, &fields::ASSISTS);
        let side_kills = team_kills.get(&side).copied().unwrap_or_default() as f64;
        let kill_participation = if side_kills > 0.0 {
            (kills + assists) / side_kills
        } else {
            0.0
        };

        let damage = coerce::number(row, &fields::DAMAGE);
        let minion_kills = coerce::number(row, &fields::MINION_KILLS);
        let monster_kills = coerce::number(row, &fields::MONSTER_KILLS);
        let total_cs = minion_kills + monster_kills;
        let wards_placed = coerce::number(row, &fields::WARDS_PLACED);
        let wards_killed = coerce::number(row, &fields::WARDS_KILLED);
        let vision_score = coerce::number(row, &fields::VISION_SCORE);
        let earned_gold = coerce::number(row, &fields::EARNED_GOLD);

        let win = match game.winner() {
            Some(winner) => winner == team_id,
            None => coerce::flag(row, &fields::RESULT),
        };

        stats.push(PlayerMatchStats {
            participant_id: row
                .text(&fields::PARTICIPANT_ID)
                .map(|id| id.to_string())
                .unwrap_or_else(|| format!("{}_{}", player_id, game.id)),
            player_id: player_id.to_string(),
            team_id,
            match_id: game.id.clone(),
            side,
            role,
            champion: row.text_or_default(&fields::CHAMPION),
            win,
            kills: kills.round() as u32,
            deaths: deaths.round() as u32,
            assists: assists.round() as u32,
            kda: kda(kills, deaths, assists),
            kill_participation,
            damage_to_champions: damage,
            dpm: per_minute(row, &fields::DPM, damage, minutes),
            damage_share: coerce::optional_number(row, &fields::DAMAGE_SHARE)
                .or_else(|| players::damage_share(row, &team_damage))
                .unwrap_or_default(),
            damage_taken_per_minute: coerce::number(row, &fields::DAMAGE_TAKEN_PM),
            wards_placed,
            wpm: per_minute(row, &fields::WPM, wards_placed, minutes),
            wards_killed,
            wcpm: per_minute(row, &fields::WCPM, wards_killed, minutes),
            control_wards_bought: coerce::number(row, &fields::CONTROL_WARDS),
            vision_score,
            vspm: per_minute(row, &fields::VSPM, vision_score, minutes),
            total_gold: coerce::number(row, &fields::TOTAL_GOLD),
            earned_gold,
            earned_gpm: per_minute(row, &fields::EARNED_GPM, earned_gold, minutes),
            gold_spent: coerce::number(row, &fields::GOLD_SPENT),
            minion_kills,
            monster_kills,
            total_cs,
            cspm: per_minute(row, &fields::CSPM, total_cs, minutes),
            snapshots: SNAPSHOT_MINUTES
                .iter()
                .map(|minute| snapshot(row, *minute))
                .collect(),
        });
    }

    stats
}

/// Reported per-minute value, else derived from the raw total and the game
/// length when that is known.
fn per_minute(row: &RawRow, field: &Field, total: f64, minutes: Option<f64>) -> f64 {
    coerce::optional_number(row, field)
        .or_else(|| minutes.filter(|m| *m > 0.0).map(|m| total / m))
        .unwrap_or_default()
}

fn stat_at(row: &RawRow, prefix: &str, stat: &str, minute: u32) -> Option<f64> {
    [
        format!("{}{}at{}", prefix, stat, minute),
        format!("{}{}_at_{}", prefix, stat, minute),
    ]
    .iter()
    .find_map(|column| row.get(column))
    .map(coerce::to_number)
}

fn diff_at(row: &RawRow, stat: &str, minute: u32, own: Option<f64>, opp: Option<f64>) -> Option<f64> {
    [
        format!("{}diffat{}", stat, minute),
        format!("{}_diff_at_{}", stat, minute),
    ]
    .iter()
    .find_map(|column| row.get(column))
    .map(coerce::to_number)
    .or_else(|| Some(own? - opp?))
}

fn snapshot(row: &RawRow, minute: u32) -> Snapshot {
    let own = |stat: &str| stat_at(row, "", stat, minute);
    let opp = |stat: &str| stat_at(row, "opp_", stat, minute);

    let gold = own("gold");
    let xp = own("xp");
    let cs = own("cs");
    let opp_gold = opp("gold");
    let opp_xp = opp("xp");
    let opp_cs = opp("cs");

    Snapshot {
        minute,
        gold,
        xp,
        cs,
        kills: own("kills"),
        assists: own("assists"),
        deaths: own("deaths"),
        opp_gold,
        opp_xp,
        opp_cs,
        opp_kills: opp("kills"),
        opp_assists: opp("assists"),
        opp_deaths: opp("deaths"),
        gold_diff: diff_at(row, "gold", minute, gold, opp_gold),
        xp_diff: diff_at(row, "xp", minute, xp, opp_xp),
        cs_diff: diff_at(row, "cs", minute, cs, opp_cs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::RowGroup;

    fn game(rows: Vec<Vec<(&str, &str)>>) -> GameRecord {
        GameRecord::build(
            RowGroup {
                game_id: "G1".to_string(),
                rows: rows
                    .into_iter()
                    .map(|pairs| pairs.into_iter().collect())
                    .collect(),
            },
            &mut Diagnostics::new(),
        )
    }

    #[test]
    fn builds_rows_with_snapshots() {
        let game = game(vec![
            vec![
                ("side", "Blue"), ("teamid", "A"), ("playerid", "p1"), ("position", "jng"),
                ("champion", "Vi"), ("result", "1"), ("gamelength", "1800"), ("kills", "2"),
                ("deaths", "0"), ("assists", "8"), ("damagetochampions", "9000"),
                ("minionkills", "40"), ("monsterkills", "140"), ("goldat10", "3200"),
                ("opp_goldat10", "3000"), ("csat15", "110"), ("csdiffat15", "-4"),
            ],
            vec![
                ("side", "Red"), ("teamid", "B"), ("playerid", "p2"), ("position", "jng"),
                ("champion", "Sejuani"), ("participant_uid", "custom-7"),
            ],
        ]);

        let team_kills = BTreeMap::from([(Side::Blue, 20), (Side::Red, 5)]);
        let rows = build(&game, &team_kills, &mut Diagnostics::new());
        assert_eq!(rows.len(), 2);

        let vi = &rows[0];
        assert_eq!(vi.participant_id, "p1_G1");
        assert_eq!(vi.role, Role::Jungle);
        assert!(vi.win);
        assert_eq!(vi.kda, 10.0);
        assert_eq!(vi.kill_participation, 0.5);
        assert_eq!(vi.total_cs, 180.0);
        assert_eq!(vi.cspm, 6.0);
        assert_eq!(vi.dpm, 300.0);
        assert_eq!(vi.damage_share, 1.0);

        let at10 = vi.snapshot(10).cloned().unwrap_or_default();
        assert_eq!(at10.gold, Some(3200.0));
        assert_eq!(at10.gold_diff, Some(200.0));
        assert_eq!(at10.xp_diff, None);
        let at15 = vi.snapshot(15).cloned().unwrap_or_default();
        assert_eq!(at15.cs_diff, Some(-4.0));

        let sejuani = &rows[1];
        assert_eq!(sejuani.participant_id, "custom-7");
        assert!(!sejuani.win);
        assert_eq!(sejuani.side, Side::Red);
        assert_eq!(sejuani.snapshots.len(), 4);
    }

    #[test]
    fn repeated_player_row_is_written_once() {
        let p1 = vec![
            ("side", "Blue"), ("teamid", "A"), ("playerid", "p1"), ("position", "top"),
            ("kills", "4"),
        ];
        let game = game(vec![
            p1.clone(),
            p1,
            vec![("side", "Red"), ("teamid", "B"), ("playerid", "p2"), ("position", "top")],
        ]);

        let mut diagnostics = Diagnostics::new();
        let rows = build(&game, &BTreeMap::new(), &mut diagnostics);
        let ids: Vec<&str> = rows.iter().map(|r| r.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["p1_G1", "p2_G1"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].field, fields::PLAYER_ID.name);
    }

    #[test]
    fn unknown_position_falls_back_with_advisory() {
        let game = game(vec![
            vec![("side", "Blue"), ("teamid", "A"), ("playerid", "p1"), ("position", "coach")],
            vec![("side", "Red"), ("teamid", "B"), ("playerid", "p2"), ("position", "sup")],
        ]);

        let mut diagnostics = Diagnostics::new();
        let rows = build(&game, &BTreeMap::new(), &mut diagnostics);
        assert_eq!(rows[0].role, Role::Mid);
        assert_eq!(rows[1].role, Role::Support);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].field, fields::POSITION.name);
    }
}
