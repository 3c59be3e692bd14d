use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::diagnostics::{Component, Diagnostic, Diagnostics};
use crate::draft::{self, Draft};
use crate::dragons;
use crate::game::{GameRecord, Side};
use crate::model::{
    Match, MatchExtras, MatchResult, MatchStatus, SideBreakdown, TeamMatchStats, TeamRef,
};
use crate::objectives::{self, FirstObjectives};
use crate::player_stats::{self, PlayerMatchStats};
use crate::players::PlayerAggregate;
use crate::series::{self, SeriesInfo};
use crate::teams::TeamAggregate;

pub const DEFAULT_WIN_ODDS: f64 = 0.5;

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assembly {
    pub teams: Vec<TeamAggregate>,
    pub players: Vec<PlayerAggregate>,
    pub matches: Vec<Match>,
    pub team_match_stats: Vec<TeamMatchStats>,
    pub player_match_stats: Vec<PlayerMatchStats>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-game statistics of a resolved game, before it becomes a match.
#[derive(Debug, Clone)]
pub struct GameBreakdown<'a> {
    pub game: &'a GameRecord,
    pub blue: SideBreakdown,
    pub red: SideBreakdown,
    pub draft: Draft,
    pub players: Vec<PlayerMatchStats>,
}

impl GameBreakdown<'_> {
    pub fn side(&self, side: Side) -> &SideBreakdown {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }
}

/// Resolves objectives, dragons, draft and player fact rows for one game.
/// Returns `None` for games whose sides are not both known.
pub fn break_down<'a>(
    game: &'a GameRecord,
    diagnostics: &mut Diagnostics,
) -> Option<GameBreakdown<'a>> {
    let blue = side_breakdown(game, Side::Blue, diagnostics)?;
    let red = side_breakdown(game, Side::Red, diagnostics)?;
    let draft = draft::extract(game, diagnostics);

    let team_kills = BTreeMap::from([
        (Side::Blue, blue.objectives.kills),
        (Side::Red, red.objectives.kills),
    ]);
    let players = player_stats::build(game, &team_kills, diagnostics);

    Some(GameBreakdown {
        game,
        blue,
        red,
        draft,
        players,
    })
}

fn side_breakdown(
    game: &GameRecord,
    side: Side,
    diagnostics: &mut Diagnostics,
) -> Option<SideBreakdown> {
    let team_id = game.team_id(side)?;
    let view = objectives::merged_view(game, side);

    Some(SideBreakdown {
        team_id: team_id.to_string(),
        objectives: objectives::resolve_side(game, side, &view, diagnostics),
        dragons: dragons::normalize(&view, &game.id, side, diagnostics),
    })
}

/// Turns per-game breakdowns into matches and flat fact rows. Matches that
/// reference a team missing from `teams` are dropped together with their
/// fact rows.
pub fn assemble(
    teams: Vec<TeamAggregate>,
    players: Vec<PlayerAggregate>,
    breakdowns: Vec<GameBreakdown<'_>>,
    default_odds: f64,
    mut diagnostics: Diagnostics,
) -> Assembly {
    let team_index: HashMap<&str, &TeamAggregate> =
        teams.iter().map(|team| (team.id.as_str(), team)).collect();
    let games: Vec<&GameRecord> = breakdowns.iter().map(|b| b.game).collect();

    let mut matches = Vec::with_capacity(breakdowns.len());
    let mut team_match_stats = Vec::with_capacity(breakdowns.len() * 2);
    let mut player_match_stats = Vec::new();

    for breakdown in breakdowns {
        let game = breakdown.game;
        let (Some(blue), Some(red)) = (
            team_index.get(breakdown.blue.team_id.as_str()),
            team_index.get(breakdown.red.team_id.as_str()),
        ) else {
            diagnostics.omission(
                Component::Assembly,
                Some(&game.id),
                "team_id",
                format!(
                    "match dropped, unknown team among {} / {}",
                    breakdown.blue.team_id, breakdown.red.team_id
                ),
            );
            continue;
        };

        let series = series::resolve(&games, &game.id, game.series_format);
        let built = build_match(&breakdown, blue, red, series, default_odds, &mut diagnostics);

        for side in Side::BOTH {
            team_match_stats.push(team_fact_row(&breakdown, side));
        }
        player_match_stats.extend(breakdown.players);
        matches.push(built);
    }

    Assembly {
        teams,
        players,
        matches,
        team_match_stats,
        player_match_stats,
        diagnostics: diagnostics.into_entries(),
    }
}

pub fn tournament_label(game: &GameRecord) -> String {
    let metadata = &game.metadata;
    let year = metadata.year.map(|year| year.to_string()).unwrap_or_default();
    let mut label = [metadata.league.as_str(), year.as_str(), metadata.split.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if metadata.playoffs {
        if !label.is_empty() {
            label.push(' ');
        }
        label.push_str("Playoffs");
    }
    label
}

/// Blue and red odds from the teams' overall win rates. `fallback` is the
/// blue odds used when neither team has won a game.
pub fn win_odds(blue: &TeamAggregate, red: &TeamAggregate, fallback: f64) -> (f64, f64) {
    let total = blue.win_rate + red.win_rate;
    if total <= 0.0 {
        let blue_odds = fallback.clamp(0.0, 1.0);
        return (blue_odds, 1.0 - blue_odds);
    }
    let blue_odds = blue.win_rate / total;
    (blue_odds, 1.0 - blue_odds)
}

fn build_match(
    breakdown: &GameBreakdown<'_>,
    blue: &TeamAggregate,
    red: &TeamAggregate,
    series: Option<SeriesInfo>,
    default_odds: f64,
    diagnostics: &mut Diagnostics,
) -> Match {
    let game = breakdown.game;
    let (blue_win_odds, red_win_odds) = win_odds(blue, red, default_odds);
    let predicted_winner = if blue_win_odds >= red_win_odds {
        blue.id.clone()
    } else {
        red.id.clone()
    };

    let winning_side = game.winning_side();
    if game.winner().is_some() && winning_side.is_none() {
        diagnostics.advisory(
            Component::Assembly,
            Some(&game.id),
            "result",
            format!(
                "winner {} plays neither side, match left without result",
                game.winner().unwrap_or_default()
            ),
        );
    }

    let result = winning_side.map(|side| match_result(breakdown, side, series.as_ref()));
    let status = if result.is_some() {
        MatchStatus::Completed
    } else {
        MatchStatus::Upcoming
    };

    Match {
        id: game.id.clone(),
        tournament: tournament_label(game),
        date: game.metadata.date.clone(),
        team_blue: TeamRef {
            id: blue.id.clone(),
            name: blue.name.clone(),
        },
        team_red: TeamRef {
            id: red.id.clone(),
            name: red.name.clone(),
        },
        predicted_winner,
        blue_win_odds,
        red_win_odds,
        status,
        result,
        extra_stats: MatchExtras {
            blue: breakdown.blue.clone(),
            red: breakdown.red.clone(),
            picks: breakdown.draft.picks.clone(),
            bans: breakdown.draft.bans.clone(),
            series,
        },
    }
}

fn match_result(
    breakdown: &GameBreakdown<'_>,
    winning_side: Side,
    series: Option<&SeriesInfo>,
) -> MatchResult {
    let game = breakdown.game;
    let winner = breakdown.side(winning_side).team_id.clone();

    let mut score = [0u32; 2];
    for (slot, side) in Side::BOTH.into_iter().enumerate() {
        let team_id = &breakdown.side(side).team_id;
        let earlier = series
            .and_then(|info| info.score_before.get(team_id).copied())
            .unwrap_or_default();
        score[slot] = earlier + (side == winning_side) as u32;
    }

    MatchResult {
        winner,
        score,
        duration: game
            .result
            .as_ref()
            .and_then(|result| result.duration.clone())
            .unwrap_or_default(),
        mvp: mvp(&breakdown.players, winning_side),
        first_blood: first_taker(breakdown, |first| first.blood),
        first_dragon: first_taker(breakdown, |first| first.dragon),
        first_baron: first_taker(breakdown, |first| first.baron),
        first_herald: first_taker(breakdown, |first| first.herald),
        first_tower: first_taker(breakdown, |first| first.tower),
    }
}

/// Team that took a first objective, if either side did.
fn first_taker(
    breakdown: &GameBreakdown<'_>,
    taken: impl Fn(&FirstObjectives) -> bool,
) -> Option<String> {
    Side::BOTH
        .into_iter()
        .map(|side| breakdown.side(side))
        .find(|side| taken(&side.objectives.first))
        .map(|side| side.team_id.clone())
}

/// Best KDA on the winning side, kills breaking ties.
fn mvp(players: &[PlayerMatchStats], winning_side: Side) -> Option<String> {
    players
        .iter()
        .filter(|player| player.side == winning_side)
        .max_by(|a, b| {
            a.kda
                .partial_cmp(&b.kda)
                .unwrap_or(Ordering::Equal)
                .then(a.kills.cmp(&b.kills))
        })
        .map(|player| player.player_id.clone())
}

fn team_fact_row(breakdown: &GameBreakdown<'_>, side: Side) -> TeamMatchStats {
    let game = breakdown.game;
    let stats = breakdown.side(side);
    let objectives = &stats.objectives;
    let dragons = &stats.dragons;
    let side_draft = breakdown.draft.for_side(side);

    TeamMatchStats {
        team_id: stats.team_id.clone(),
        match_id: game.id.clone(),
        side,
        win: game.winner() == Some(stats.team_id.as_str()),
        kills: objectives.kills,
        deaths: objectives.deaths,
        kpm: objectives.kpm,
        ckpm: objectives.ckpm,
        dragons: dragons.total,
        infernals: dragons.infernal,
        mountains: dragons.mountain,
        clouds: dragons.cloud,
        oceans: dragons.ocean,
        chemtechs: dragons.chemtech,
        hextechs: dragons.hextech,
        unknown_dragons: dragons.unknown,
        elders: dragons.elder,
        heralds: objectives.heralds,
        barons: objectives.barons,
        towers: objectives.towers,
        plates: objectives.plates,
        inhibitors: objectives.inhibitors,
        void_grubs: objectives.void_grubs,
        first_blood: objectives.first.blood,
        first_dragon: objectives.first.dragon,
        first_herald: objectives.first.herald,
        first_baron: objectives.first.baron,
        first_tower: objectives.first.tower,
        first_mid_tower: objectives.first.mid_tower,
        first_three_towers: objectives.first.three_towers,
        picks: side_draft
            .picks
            .as_ref()
            .and_then(|picks| serde_json::to_string(picks).ok()),
        bans: side_draft
            .bans
            .as_ref()
            .and_then(|bans| serde_json::to_string(bans).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::RowGroup;

    fn game(id: &str, rows: Vec<Vec<(&str, &str)>>) -> GameRecord {
        GameRecord::build(
            RowGroup {
                game_id: id.to_string(),
                rows: rows
                    .into_iter()
                    .map(|pairs| pairs.into_iter().collect())
                    .collect(),
            },
            &mut Diagnostics::new(),
        )
    }

    fn team(id: &str, win_rate: f64) -> TeamAggregate {
        TeamAggregate {
            id: id.to_string(),
            name: id.to_string(),
            region: String::new(),
            logo: String::new(),
            win_rate,
            blue_win_rate: 0.0,
            red_win_rate: 0.0,
            average_game_duration: 0.0,
            games: 0,
            wins: 0,
            players: Vec::new(),
        }
    }

    #[test]
    fn label_joins_present_parts() {
        let record = game(
            "G1",
            vec![vec![("league", "LCK"), ("year", "2024"), ("split", "Spring"), ("playoffs", "1")]],
        );
        assert_eq!(tournament_label(&record), "LCK 2024 Spring Playoffs");

        let bare = game("G2", vec![vec![("league", "LPL")]]);
        assert_eq!(tournament_label(&bare), "LPL");
    }

    #[test]
    fn odds_follow_win_rates() {
        assert_eq!(win_odds(&team("A", 0.0), &team("B", 0.0), DEFAULT_WIN_ODDS), (0.5, 0.5));
        let (blue, red) = win_odds(&team("A", 0.75), &team("B", 0.25), DEFAULT_WIN_ODDS);
        assert_eq!(blue, 0.75);
        assert_eq!(red, 0.25);
    }

    #[test]
    fn unknown_team_drops_match_and_facts() {
        let record = game(
            "G1",
            vec![
                vec![("side", "Blue"), ("teamid", "A"), ("result", "1"), ("playerid", "p1")],
                vec![("side", "Red"), ("teamid", "B"), ("playerid", "p2")],
            ],
        );
        let mut diagnostics = Diagnostics::new();
        let breakdown = break_down(&record, &mut diagnostics);
        let assembly = assemble(
            vec![team("A", 1.0)],
            Vec::new(),
            breakdown.into_iter().collect(),
            DEFAULT_WIN_ODDS,
            diagnostics,
        );

        assert!(assembly.matches.is_empty());
        assert!(assembly.team_match_stats.is_empty());
        assert!(assembly.player_match_stats.is_empty());
        assert_eq!(
            assembly
                .diagnostics
                .iter()
                .filter(|d| d.component == Component::Assembly)
                .count(),
            1
        );
    }

    #[test]
    fn result_attributes_objectives_and_mvp() {
        let record = game(
            "LCK_77_2",
            vec![
                vec![("side", "Blue"), ("teamid", "A"), ("position", "team"), ("result", "0"),
                    ("firstblood", "1"), ("firsttower", "0"), ("gamelength", "2000"),
                    ("ban1", "Ahri")],
                vec![("side", "Red"), ("teamid", "B"), ("position", "team"), ("result", "1"),
                    ("firstblood", "0"), ("firsttower", "1"), ("firstbaron", "B"),
                    ("gamelength", "2000")],
                vec![("side", "Red"), ("teamid", "B"), ("playerid", "r1"), ("position", "mid"),
                    ("kills", "5"), ("deaths", "1"), ("assists", "5")],
                vec![("side", "Red"), ("teamid", "B"), ("playerid", "r2"), ("position", "top"),
                    ("kills", "0"), ("deaths", "0"), ("assists", "12")],
            ],
        );
        let mut diagnostics = Diagnostics::new();
        let breakdown = break_down(&record, &mut diagnostics);
        let assembly = assemble(
            vec![team("A", 0.5), team("B", 0.5)],
            Vec::new(),
            breakdown.into_iter().collect(),
            DEFAULT_WIN_ODDS,
            diagnostics,
        );

        assert_eq!(assembly.matches.len(), 1);
        let played = &assembly.matches[0];
        assert_eq!(played.status, MatchStatus::Completed);
        assert_eq!(played.predicted_winner, "A");

        let result = played.result.clone().expect("completed match has a result");
        assert_eq!(result.winner, "B");
        assert_eq!(result.score, [0, 1]);
        assert_eq!(result.duration, "2000");
        assert_eq!(result.mvp.as_deref(), Some("r2"));
        assert_eq!(result.first_blood.as_deref(), Some("A"));
        assert_eq!(result.first_tower.as_deref(), Some("B"));
        assert_eq!(result.first_baron.as_deref(), Some("B"));
        assert_eq!(result.first_dragon, None);

        let series = played.extra_stats.series.clone().expect("series id");
        assert_eq!(series.base_id, "LCK_77");
        assert_eq!(series.game_number, 2);

        assert_eq!(assembly.team_match_stats.len(), 2);
        let blue_facts = &assembly.team_match_stats[0];
        assert_eq!(blue_facts.side, Side::Blue);
        assert!(!blue_facts.win);
        assert!(blue_facts.bans.as_deref().unwrap_or_default().contains("Ahri"));
        assert!(blue_facts.picks.is_none());
        assert_eq!(assembly.player_match_stats.len(), 2);
    }
}
