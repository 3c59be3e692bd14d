use serde::Serialize;

use crate::draft::{Bans, Picks};
use crate::dragons::DragonBreakdown;
use crate::game::Side;
use crate::objectives::SideObjectives;
use crate::series::SeriesInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub winner: String,
    /// `[blue, red]` series wins including this game.
    pub score: [u32; 2],
    pub duration: String,
    pub mvp: Option<String>,
    pub first_blood: Option<String>,
    pub first_dragon: Option<String>,
    pub first_baron: Option<String>,
    pub first_herald: Option<String>,
    pub first_tower: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideBreakdown {
    pub team_id: String,
    pub objectives: SideObjectives,
    pub dragons: DragonBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchExtras {
    pub blue: SideBreakdown,
    pub red: SideBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picks: Option<Picks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bans: Option<Bans>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub tournament: String,
    pub date: Option<String>,
    pub team_blue: TeamRef,
    pub team_red: TeamRef,
    pub predicted_winner: String,
    pub blue_win_odds: f64,
    pub red_win_odds: f64,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    pub extra_stats: MatchExtras,
}

/// Per-team-per-match fact row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMatchStats {
    pub team_id: String,
    pub match_id: String,
    pub side: Side,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub kpm: f64,
    pub ckpm: f64,
    pub dragons: u32,
    pub infernals: u32,
    pub mountains: u32,
    pub clouds: u32,
    pub oceans: u32,
    pub chemtechs: u32,
    pub hextechs: u32,
    pub unknown_dragons: u32,
    pub elders: u32,
    pub heralds: u32,
    pub barons: u32,
    pub towers: u32,
    pub plates: u32,
    pub inhibitors: u32,
    pub void_grubs: u32,
    pub first_blood: bool,
    pub first_dragon: bool,
    pub first_herald: bool,
    pub first_baron: bool,
    pub first_tower: bool,
    pub first_mid_tower: bool,
    pub first_three_towers: bool,
    /// JSON of this side's picks, absent when there were none.
    pub picks: Option<String>,
    /// JSON of this side's bans, absent when there were none.
    pub bans: Option<String>,
}
