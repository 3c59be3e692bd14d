use std::collections::HashMap;

use crate::diagnostics::{Component, Diagnostics};
use crate::fields;
use crate::row::RawRow;

/// All rows that share one game id, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub game_id: String,
    pub rows: Vec<RawRow>,
}

/// Partitions rows by game id. Groups come out in first-seen order; rows
/// without a game id are dropped.
pub fn group_rows<I>(rows: I, diagnostics: &mut Diagnostics) -> Vec<RowGroup>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut groups: Vec<RowGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, row) in rows.into_iter().enumerate() {
        let Some(game_id) = row.text(&fields::GAME_ID).map(|id| id.to_string()) else {
            diagnostics.omission(
                Component::RowGrouper,
                None,
                fields::GAME_ID.name,
                format!("dropped row {} without a game id", position),
            );
            continue;
        };

        match index.get(&game_id) {
            Some(&slot) => groups[slot].rows.push(row),
            None => {
                index.insert(game_id.clone(), groups.len());
                groups.push(RowGroup {
                    game_id,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(game: &str, player: &str) -> RawRow {
        [("gameid", game), ("playerid", player)].into_iter().collect()
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut diagnostics = Diagnostics::new();
        let groups = group_rows(
            vec![row("G2", "a"), row("G1", "b"), row("G2", "c")],
            &mut diagnostics,
        );

        let ids: Vec<&str> = groups.iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["G2", "G1"]);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[0].rows[1].get("playerid"), Some("c"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn rows_without_game_id_are_dropped() {
        let mut diagnostics = Diagnostics::new();
        let orphan: RawRow = [("playerid", "x"), ("gameid", " ")].into_iter().collect();
        let groups = group_rows(vec![orphan, row("G1", "a")], &mut diagnostics);

        assert_eq!(groups.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].component, Component::RowGrouper);
    }

    #[test]
    fn grouping_is_idempotent() {
        let rows = vec![row("G1", "a"), row("G2", "b"), row("G1", "c")];
        let first = group_rows(rows.clone(), &mut Diagnostics::new());
        let second = group_rows(rows, &mut Diagnostics::new());
        assert_eq!(first, second);
    }
}
