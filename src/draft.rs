use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Component, Diagnostics};
use crate::fields;
use crate::game::{GameRecord, Side};
use crate::objectives::is_team_row;
use crate::players;
use crate::role::Role;
use crate::row::RawRow;

const DRAFT_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickEntry {
    pub champion: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanEntry {
    pub champion: String,
    #[serde(default)]
    pub order: u8,
}

/// Picks keyed `{side}_{role}`, e.g. `blue_adc`.
pub type Picks = BTreeMap<String, PickEntry>;
/// Bans keyed `{side}_ban{n}`, e.g. `red_ban3`.
pub type Bans = BTreeMap<String, BanEntry>;

/// Draft of one game. Either half is `None` when the export carried no data
/// for it at all, which is different from an empty draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picks: Option<Picks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bans: Option<Bans>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.picks.is_none() && self.bans.is_none()
    }

    /// The part of the draft that belongs to one side.
    pub fn for_side(&self, side: Side) -> Draft {
        let prefix = format!("{}_", side.as_str());
        let picks = self.picks.as_ref().map(|picks| {
            picks
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect::<Picks>()
        });
        let bans = self.bans.as_ref().map(|bans| {
            bans.iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect::<Bans>()
        });

        Draft {
            picks: picks.filter(|picks| !picks.is_empty()),
            bans: bans.filter(|bans| !bans.is_empty()),
        }
    }
}

pub fn pick_key(side: Side, role: Role) -> String {
    format!("{}_{}", side.as_str(), role.as_str().to_lowercase())
}

pub fn ban_key(side: Side, order: usize) -> String {
    format!("{}_ban{}", side.as_str(), order)
}

/// Reads the draft of a game. A pre-serialized payload on any row is used as
/// is; otherwise the draft is rebuilt from player rows and the indexed
/// `pickN` / `banN` columns.
pub fn extract(game: &GameRecord, diagnostics: &mut Diagnostics) -> Draft {
    if let Some(draft) = from_payload(game, diagnostics) {
        return draft;
    }

    let mut picks = Picks::new();
    let mut bans = Bans::new();

    for side in Side::BOTH {
        let rows = game.side_rows(side);
        picks_from_players(game, side, &rows, &mut picks, diagnostics);
        picks_from_columns(side, &rows, &mut picks);
        bans_from_columns(side, &rows, &mut bans);
    }

    Draft {
        picks: (!picks.is_empty()).then_some(picks),
        bans: (!bans.is_empty()).then_some(bans),
    }
}

fn from_payload(game: &GameRecord, diagnostics: &mut Diagnostics) -> Option<Draft> {
    let raw = game
        .rows
        .iter()
        .find_map(|row| row.text(&fields::DRAFT_PAYLOAD))?;

    match serde_json::from_str::<Draft>(raw) {
        Ok(draft) => Some(Draft {
            picks: draft.picks.filter(|picks| !picks.is_empty()),
            bans: draft.bans.filter(|bans| !bans.is_empty()),
        }),
        Err(err) => {
            diagnostics.advisory(
                Component::Draft,
                Some(&game.id),
                fields::DRAFT_PAYLOAD.name,
                format!("unparseable draft payload ({}), rebuilding from rows", err),
            );
            None
        }
    }
}

/// Picks from player rows. Rows with a recognized position go first; a row
/// whose position falls back to Mid only fills that slot if it is still open.
fn picks_from_players(
    game: &GameRecord,
    side: Side,
    rows: &[&RawRow],
    picks: &mut Picks,
    diagnostics: &mut Diagnostics,
) {
    let (known, fallback): (Vec<&RawRow>, Vec<&RawRow>) = rows
        .iter()
        .copied()
        .filter(|row| !is_team_row(row) && row.text(&fields::CHAMPION).is_some())
        .partition(|row| row.text(&fields::POSITION).and_then(Role::parse).is_some());

    for row in known {
        let Some(role) = row.text(&fields::POSITION).and_then(Role::parse) else {
            continue;
        };
        insert_pick(picks, side, role, row);
    }

    for row in fallback {
        let (role, _) = players::row_role(row, &game.id, Component::Draft, diagnostics);
        if !insert_pick(picks, side, role, row) {
            diagnostics.omission(
                Component::Draft,
                Some(&game.id),
                fields::POSITION.name,
                format!(
                    "{} already filled, pick {} dropped",
                    pick_key(side, role),
                    row.text(&fields::CHAMPION).unwrap_or_default()
                ),
            );
        }
    }
}

/// Fills an empty pick slot; false when the slot was already taken.
fn insert_pick(picks: &mut Picks, side: Side, role: Role, row: &RawRow) -> bool {
    let key = pick_key(side, role);
    if picks.contains_key(&key) {
        return false;
    }
    picks.insert(
        key,
        PickEntry {
            champion: row.text_or_default(&fields::CHAMPION),
            role,
            player: row.text(&fields::PLAYER_NAME).map(|name| name.to_string()),
        },
    );
    true
}

fn picks_from_columns(side: Side, rows: &[&RawRow], picks: &mut Picks) {
    let Some(row) = first_with_indexed(rows, "pick") else {
        return;
    };

    for (slot, role) in Role::CANONICAL.into_iter().enumerate() {
        let Some(champion) = row.get(&format!("pick{}", slot + 1)) else {
            continue;
        };
        picks.entry(pick_key(side, role)).or_insert_with(|| PickEntry {
            champion: champion.to_string(),
            role,
            player: None,
        });
    }
}

fn bans_from_columns(side: Side, rows: &[&RawRow], bans: &mut Bans) {
    let Some(row) = first_with_indexed(rows, "ban") else {
        return;
    };

    for order in 1..=DRAFT_SLOTS {
        let Some(champion) = row.get(&format!("ban{}", order)) else {
            continue;
        };
        bans.insert(
            ban_key(side, order),
            BanEntry {
                champion: champion.to_string(),
                order: order as u8,
            },
        );
    }
}

fn first_with_indexed<'a>(rows: &[&'a RawRow], prefix: &str) -> Option<&'a RawRow> {
    rows.iter().copied().find(|row| {
        (1..=DRAFT_SLOTS).any(|slot| row.get(&format!("{}{}", prefix, slot)).is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
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
    fn indexed_picks_fill_canonical_roles() {
        let game = game(vec![
            vec![
                ("side", "Blue"),
                ("teamid", "A"),
                ("position", "team"),
                ("pick1", "Aatrox"),
                ("pick2", "Vi"),
                ("pick3", "Azir"),
                ("pick4", "Jinx"),
                ("pick5", "Nautilus"),
            ],
            vec![("side", "Red"), ("teamid", "B")],
        ]);

        let draft = extract(&game, &mut Diagnostics::new());
        let picks = draft.picks.unwrap_or_default();
        assert_eq!(picks.len(), 5);
        assert_eq!(picks["blue_top"].champion, "Aatrox");
        assert_eq!(picks["blue_jungle"].champion, "Vi");
        assert_eq!(picks["blue_mid"].champion, "Azir");
        assert_eq!(picks["blue_adc"].champion, "Jinx");
        assert_eq!(picks["blue_support"].role, Role::Support);
        assert!(draft.bans.is_none());
    }

    #[test]
    fn player_rows_are_not_overwritten_by_columns() {
        let game = game(vec![
            vec![
                ("side", "Red"),
                ("teamid", "B"),
                ("position", "bot"),
                ("champion", "Kai'Sa"),
                ("playername", "Ruler"),
            ],
            vec![
                ("side", "Red"),
                ("teamid", "B"),
                ("position", "team"),
                ("pick1", "Gnar"),
                ("pick4", "Varus"),
                ("ban1", "Yone"),
                ("ban3", "Rell"),
            ],
            vec![("side", "Blue"), ("teamid", "A")],
        ]);

        let draft = extract(&game, &mut Diagnostics::new());
        let picks = draft.picks.clone().unwrap_or_default();
        assert_eq!(picks["red_adc"].champion, "Kai'Sa");
        assert_eq!(picks["red_adc"].player.as_deref(), Some("Ruler"));
        assert_eq!(picks["red_top"].champion, "Gnar");
        assert_eq!(picks.len(), 2);

        let bans = draft.bans.unwrap_or_default();
        assert_eq!(bans.len(), 2);
        assert_eq!(bans["red_ban1"].champion, "Yone");
        assert_eq!(bans["red_ban3"].order, 3);
    }

    #[test]
    fn unknown_position_takes_open_mid_slot() {
        let game = game(vec![
            vec![("side", "Blue"), ("teamid", "A"), ("position", "flex"), ("champion", "Sylas")],
            vec![("side", "Blue"), ("teamid", "A"), ("position", "top"), ("champion", "Jax")],
            vec![("side", "Red"), ("teamid", "B"), ("position", "??"), ("champion", "Taliyah")],
            vec![("side", "Red"), ("teamid", "B"), ("position", "mid"), ("champion", "Azir")],
        ]);

        let mut diagnostics = Diagnostics::new();
        let draft = extract(&game, &mut diagnostics);
        let picks = draft.picks.unwrap_or_default();
        assert_eq!(picks["blue_mid"].champion, "Sylas");
        assert_eq!(picks["blue_top"].champion, "Jax");
        assert_eq!(picks["red_mid"].champion, "Azir");
        assert_eq!(picks.len(), 3);

        let severities: Vec<Severity> = diagnostics.entries().iter().map(|d| d.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Advisory, Severity::Advisory, Severity::Omission]
        );
        assert!(diagnostics.entries().iter().all(|d| d.component == Component::Draft));
    }

    #[test]
    fn no_draft_data_is_absent() {
        let game = game(vec![
            vec![("side", "Blue"), ("teamid", "A")],
            vec![("side", "Red"), ("teamid", "B")],
        ]);
        let draft = extract(&game, &mut Diagnostics::new());
        assert!(draft.is_empty());
    }

    #[test]
    fn payload_is_used_directly() {
        let payload = r#"{"picks":{"blue_mid":{"champion":"Orianna","role":"Mid"}},"bans":{"red_ban1":{"champion":"Ahri","order":1}}}"#;
        let game = game(vec![
            vec![("side", "Blue"), ("teamid", "A"), ("picks_bans", payload), ("pick1", "Gwen")],
            vec![("side", "Red"), ("teamid", "B")],
        ]);

        let draft = extract(&game, &mut Diagnostics::new());
        let picks = draft.picks.clone().unwrap_or_default();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks["blue_mid"].champion, "Orianna");
        assert_eq!(draft.for_side(Side::Red).bans.map(|b| b.len()), Some(1));
        assert!(draft.for_side(Side::Red).picks.is_none());
    }

    #[test]
    fn broken_payload_falls_back_to_rows() {
        let game = game(vec![
            vec![("side", "Blue"), ("teamid", "A"), ("draft", "{not json"), ("ban2", "Sylas")],
            vec![("side", "Red"), ("teamid", "B")],
        ]);

        let mut diagnostics = Diagnostics::new();
        let draft = extract(&game, &mut diagnostics);
        assert!(draft.picks.is_none());
        assert_eq!(draft.bans.map(|b| b.len()), Some(1));
        assert_eq!(diagnostics.len(), 1);
    }
}
