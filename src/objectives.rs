use serde::Serialize;

use crate::coerce::{self, Resolved};
use crate::diagnostics::{Component, Diagnostics};
use crate::fields::{self, Field};
use crate::game::{GameRecord, Side};
use crate::row::RawRow;

const TEAM_POSITION: &str = "team";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstObjectives {
    pub blood: bool,
    pub dragon: bool,
    pub herald: bool,
    pub baron: bool,
    pub tower: bool,
    pub mid_tower: bool,
    pub three_towers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideObjectives {
    pub kills: u32,
    pub deaths: u32,
    pub kpm: f64,
    pub ckpm: f64,
    pub heralds: u32,
    pub barons: u32,
    pub towers: u32,
    pub plates: u32,
    pub inhibitors: u32,
    pub void_grubs: u32,
    pub first: FirstObjectives,
}

/// True for the per-team summary rows some exports add next to player rows.
pub fn is_team_row(row: &RawRow) -> bool {
    row.text(&fields::POSITION)
        .map(|position| position.eq_ignore_ascii_case(TEAM_POSITION))
        .unwrap_or(false)
}

/// Collapses every row of one side into a single view, first non-empty value
/// per column. Team summary rows are read before player rows.
pub fn merged_view(game: &GameRecord, side: Side) -> RawRow {
    let rows = game.side_rows(side);
    let (team_rows, player_rows): (Vec<&RawRow>, Vec<&RawRow>) =
        rows.into_iter().partition(|row| is_team_row(row));

    let mut view = RawRow::new();
    for row in team_rows.into_iter().chain(player_rows) {
        view.fill_missing_from(row);
    }
    view
}

pub fn resolve_side(
    game: &GameRecord,
    side: Side,
    view: &RawRow,
    diagnostics: &mut Diagnostics,
) -> SideObjectives {
    let team_id = game.team_id(side).unwrap_or_default();
    let mut first_flag =
        |field: &Field| resolve_first_objective(view, field, team_id, &game.id, diagnostics);

    let first = FirstObjectives {
        blood: first_flag(&fields::FIRST_BLOOD),
        dragon: first_flag(&fields::FIRST_DRAGON),
        herald: first_flag(&fields::FIRST_HERALD),
        baron: first_flag(&fields::FIRST_BARON),
        tower: first_flag(&fields::FIRST_TOWER),
        mid_tower: first_flag(&fields::FIRST_MID_TOWER),
        three_towers: first_flag(&fields::FIRST_THREE_TOWERS),
    };

    let mut count =
        |field: &Field| coerce::checked_count(view, field, Component::Objectives, &game.id, diagnostics);
    let heralds = count(&fields::HERALDS);
    let barons = count(&fields::BARONS);
    let towers = count(&fields::TOWERS);
    let plates = count(&fields::PLATES);
    let inhibitors = count(&fields::INHIBITORS);
    let void_grubs = count(&fields::VOID_GRUBS);

    SideObjectives {
        kills: side_total(game, side, view, &fields::TEAM_KILLS, &fields::KILLS, diagnostics),
        deaths: side_total(game, side, view, &fields::TEAM_DEATHS, &fields::DEATHS, diagnostics),
        kpm: coerce::checked_number(view, &fields::TEAM_KPM, Component::Objectives, &game.id, diagnostics)
            .unwrap_or_default(),
        ckpm: coerce::checked_number(view, &fields::CKPM, Component::Objectives, &game.id, diagnostics)
            .unwrap_or_default(),
        heralds,
        barons,
        towers,
        plates,
        inhibitors,
        void_grubs,
        first,
    }
}

/// Team kills or deaths. An explicit team column wins; otherwise the bare
/// player column is read from a team summary row, else summed over the
/// side's player rows.
fn side_total(
    game: &GameRecord,
    side: Side,
    view: &RawRow,
    team_field: &Field,
    player_field: &Field,
    diagnostics: &mut Diagnostics,
) -> u32 {
    if let Some(total) =
        coerce::checked_number(view, team_field, Component::Objectives, &game.id, diagnostics)
    {
        return coerce::to_count(total);
    }

    let rows = game.side_rows(side);
    let total = rows
        .iter()
        .filter(|row| is_team_row(row))
        .find_map(|row| coerce::optional_number(row, player_field))
        .unwrap_or_else(|| {
            rows.iter()
                .filter(|row| !is_team_row(row))
                .map(|row| coerce::number(row, player_field))
                .sum()
        });
    coerce::to_count(total)
}

/// Resolves one first-objective flag for a team through the field's alias
/// chain. The first decisive alias wins; later aliases that disagree are
/// reported but do not change the answer.
pub fn resolve_first_objective(
    view: &RawRow,
    field: &Field,
    team_id: &str,
    game_id: &str,
    diagnostics: &mut Diagnostics,
) -> bool {
    let answers: Vec<Resolved<'_, bool>> =
        coerce::resolve_all(view, field, |raw| coerce::objective_flag(raw, team_id));

    let Some(winner) = answers.first() else {
        return false;
    };

    if let Some(conflict) = answers.iter().find(|answer| answer.value != winner.value) {
        diagnostics.advisory(
            Component::Objectives,
            Some(game_id),
            field.name,
            format!(
                "{}={} kept over {}={} for team {}",
                winner.alias, winner.raw, conflict.alias, conflict.raw, team_id
            ),
        );
    }

    winner.value
}
