use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::diagnostics::{Component, Diagnostics};
use crate::fields;
use crate::grouper::RowGroup;
use crate::row::RawRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Blue, Side::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn parse(raw: &str) -> Option<Side> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("blue") {
            Some(Side::Blue)
        } else if trimmed.eq_ignore_ascii_case("red") {
            Some(Side::Red)
        } else {
            None
        }
    }

    /// Side marker written on the row itself, if any.
    pub fn of_row(row: &RawRow) -> Option<Side> {
        fields::SIDE
            .aliases
            .iter()
            .find_map(|alias| row.get(alias).and_then(Side::parse))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameMetadata {
    pub date: Option<String>,
    pub league: String,
    pub year: Option<i32>,
    pub split: String,
    pub patch: String,
    pub playoffs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub winner: String,
    /// Duration exactly as the export reported it.
    pub duration: Option<String>,
}

/// One game, with its side assignment and every row that belongs to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: String,
    pub metadata: GameMetadata,
    pub blue: Option<String>,
    pub red: Option<String>,
    pub result: Option<GameResult>,
    pub series_format: Option<u32>,
    pub rows: Vec<RawRow>,
}

impl GameRecord {
    pub fn build(group: RowGroup, diagnostics: &mut Diagnostics) -> GameRecord {
        let RowGroup { game_id, rows } = group;

        let metadata = rows
            .first()
            .map(read_metadata)
            .unwrap_or_default();
        let (blue, red) = assign_sides(&game_id, &rows, diagnostics);
        let result = find_result(&rows);
        let series_format = rows
            .iter()
            .find_map(|row| row.text(&fields::SERIES_FORMAT))
            .and_then(parse_series_format);

        let record = GameRecord {
            id: game_id,
            metadata,
            blue,
            red,
            result,
            series_format,
            rows,
        };

        if !record.is_resolved() {
            diagnostics.omission(
                Component::GameRecord,
                Some(&record.id),
                fields::SIDE.name,
                format!(
                    "excluded from matches: blue={} red={}",
                    record.blue.as_deref().unwrap_or("unresolved"),
                    record.red.as_deref().unwrap_or("unresolved")
                ),
            );
        }

        record
    }

    pub fn team_id(&self, side: Side) -> Option<&str> {
        match side {
            Side::Blue => self.blue.as_deref(),
            Side::Red => self.red.as_deref(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.blue.is_some() && self.red.is_some()
    }

    /// Side a row belongs to: its own marker, else whichever slot holds its team.
    pub fn side_of_row(&self, row: &RawRow) -> Option<Side> {
        if let Some(side) = Side::of_row(row) {
            return Some(side);
        }
        let team_id = row.text(&fields::TEAM_ID)?;
        Side::BOTH
            .into_iter()
            .find(|side| self.team_id(*side) == Some(team_id))
    }

    pub fn side_rows(&self, side: Side) -> Vec<&RawRow> {
        self.rows
            .iter()
            .filter(|row| self.side_of_row(row) == Some(side))
            .collect()
    }

    pub fn winner(&self) -> Option<&str> {
        self.result.as_ref().map(|result| result.winner.as_str())
    }

    pub fn winning_side(&self) -> Option<Side> {
        let winner = self.winner()?;
        Side::BOTH
            .into_iter()
            .find(|side| self.team_id(*side) == Some(winner))
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.result
            .as_ref()
            .and_then(|result| result.duration.as_deref())
            .map(coerce::to_number)
            .filter(|seconds| *seconds > 0.0)
    }
}

pub fn build_games(groups: Vec<RowGroup>, diagnostics: &mut Diagnostics) -> Vec<GameRecord> {
    groups
        .into_iter()
        .map(|group| GameRecord::build(group, diagnostics))
        .collect()
}

fn read_metadata(row: &RawRow) -> GameMetadata {
    let date = row.text(&fields::DATE).map(|value| value.to_string());
    let year = row
        .text(&fields::YEAR)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .map(|value| value as i32)
        .or_else(|| date.as_deref().and_then(parse_date).map(|d| d.year()));

    GameMetadata {
        date,
        league: row.text_or_default(&fields::LEAGUE),
        year,
        split: row.text_or_default(&fields::SPLIT),
        patch: row.text_or_default(&fields::PATCH),
        playoffs: coerce::flag(row, &fields::PLAYOFFS),
    }
}

fn assign_sides(
    game_id: &str,
    rows: &[RawRow],
    diagnostics: &mut Diagnostics,
) -> (Option<String>, Option<String>) {
    let mut blue: Option<String> = None;
    let mut red: Option<String> = None;
    let mut saw_marker = false;

    for row in rows {
        let Some(side) = Side::of_row(row) else {
            continue;
        };
        saw_marker = true;

        let Some(team_id) = row.text(&fields::TEAM_ID) else {
            continue;
        };

        let slot = match side {
            Side::Blue => &mut blue,
            Side::Red => &mut red,
        };
        if let Some(held) = slot.as_deref() {
            if held != team_id {
                diagnostics.advisory(
                    Component::GameRecord,
                    Some(game_id),
                    fields::SIDE.name,
                    format!(
                        "{} side already held by {}, ignored claim from {}",
                        side, held, team_id
                    ),
                );
            }
            continue;
        }
        *slot = Some(team_id.to_string());
    }

    if saw_marker {
        return (blue, red);
    }

    let mut distinct: Vec<&str> = Vec::new();
    for team_id in rows.iter().filter_map(|row| row.text(&fields::TEAM_ID)) {
        if !distinct.contains(&team_id) {
            distinct.push(team_id);
        }
    }

    if distinct.len() >= 2 {
        diagnostics.advisory(
            Component::GameRecord,
            Some(game_id),
            fields::SIDE.name,
            format!(
                "no side markers, assumed blue={} red={} from row order",
                distinct[0], distinct[1]
            ),
        );
        (Some(distinct[0].to_string()), Some(distinct[1].to_string()))
    } else {
        (None, None)
    }
}

fn find_result(rows: &[RawRow]) -> Option<GameResult> {
    let winning_row = rows.iter().find(|row| {
        row.text(&fields::TEAM_ID).is_some()
            && row.text(&fields::RESULT).map(coerce::is_truthy).unwrap_or(false)
    })?;

    let duration = winning_row
        .text(&fields::GAME_LENGTH)
        .or_else(|| rows.iter().find_map(|row| row.text(&fields::GAME_LENGTH)))
        .map(|value| value.to_string());

    Some(GameResult {
        winner: winning_row.text_or_default(&fields::TEAM_ID),
        duration,
    })
}

fn parse_series_format(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u32>()
        .ok()
        .filter(|best_of| *best_of >= 1 && best_of % 2 == 1)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(rows: Vec<Vec<(&str, &str)>>) -> RowGroup {
        RowGroup {
            game_id: "G1".to_string(),
            rows: rows
                .into_iter()
                .map(|pairs| pairs.into_iter().collect())
                .collect(),
        }
    }

    #[test]
    fn sides_come_from_markers() {
        let mut diagnostics = Diagnostics::new();
        let game = GameRecord::build(
            group(vec![
                vec![("side", "Red"), ("teamid", "B")],
                vec![("side", "BLUE"), ("teamid", "A"), ("result", "1"), ("gamelength", "1800")],
            ]),
            &mut diagnostics,
        );

        assert_eq!(game.blue.as_deref(), Some("A"));
        assert_eq!(game.red.as_deref(), Some("B"));
        assert_eq!(game.winner(), Some("A"));
        assert_eq!(game.winning_side(), Some(Side::Blue));
        assert_eq!(game.duration_seconds(), Some(1800.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn sides_fall_back_to_first_two_teams() {
        let mut diagnostics = Diagnostics::new();
        let game = GameRecord::build(
            group(vec![
                vec![("teamid", "X")],
                vec![("teamid", "X")],
                vec![("teamid", "Y")],
            ]),
            &mut diagnostics,
        );

        assert_eq!(game.blue.as_deref(), Some("X"));
        assert_eq!(game.red.as_deref(), Some("Y"));
        assert!(game.result.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn single_team_without_sides_is_unresolved() {
        let mut diagnostics = Diagnostics::new();
        let game = GameRecord::build(
            group(vec![vec![("teamid", "X")], vec![("teamid", "X")]]),
            &mut diagnostics,
        );

        assert!(!game.is_resolved());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn year_falls_back_to_date() {
        let mut diagnostics = Diagnostics::new();
        let game = GameRecord::build(
            group(vec![vec![
                ("date", "2024-03-09 14:05:11"),
                ("league", "LCK"),
                ("playoffs", "0"),
                ("side", "blue"),
                ("teamid", "A"),
            ]]),
            &mut diagnostics,
        );

        assert_eq!(game.metadata.year, Some(2024));
        assert_eq!(game.metadata.league, "LCK");
        assert!(!game.metadata.playoffs);
    }

    #[test]
    fn series_format_accepts_odd_best_of() {
        assert_eq!(parse_series_format("Bo5"), Some(5));
        assert_eq!(parse_series_format("3"), Some(3));
        assert_eq!(parse_series_format("bo4"), None);
        assert_eq!(parse_series_format("n/a"), None);
    }
}
