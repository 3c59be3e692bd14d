use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fields::Field;

/// Values that exports use to mean "no data" for a cell.
const MISSING_TOKENS: [&str; 6] = ["na", "n/a", "nan", "null", "none", "undefined"];

/// One source record: a single player's (or a team summary's) line for one game.
///
/// Column names are stored trimmed and lower-cased so lookups are
/// case-insensitive. Values are kept verbatim except for surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl AsRef<str>, value: impl Into<String>) {
        let value: String = value.into();
        self.fields
            .insert(normalize_column(column.as_ref()), value.trim().to_string());
    }

    /// Raw value of a column, or `None` when the column is absent, blank, or
    /// holds a missing-value token.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&normalize_column(column))
            .map(|value| value.as_str())
            .filter(|value| is_present(value))
    }

    /// First present value among a field's aliases, in alias order.
    pub fn text(&self, field: &Field) -> Option<&str> {
        field.aliases.iter().find_map(|alias| self.get(alias))
    }

    pub fn text_or_default(&self, field: &Field) -> String {
        self.text(field).unwrap_or_default().to_string()
    }

    /// Present (non-empty) values only.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, value)| is_present(value))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Copies every present value of `other` whose column is still absent here.
    pub fn fill_missing_from(&mut self, other: &RawRow) {
        for (column, value) in other.present() {
            if self.get(column).is_none() {
                self.fields.insert(column.to_string(), value.to_string());
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

fn normalize_column(column: &str) -> String {
    column.trim().to_lowercase()
}

fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && !MISSING_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_column_case() {
        let row: RawRow = [("GameID", "G1"), (" Side ", "Blue")].into_iter().collect();
        assert_eq!(row.get("gameid"), Some("G1"));
        assert_eq!(row.get("SIDE"), Some("Blue"));
    }

    #[test]
    fn missing_tokens_read_as_absent() {
        let row: RawRow = [("dragons", "NA"), ("barons", ""), ("towers", "null")]
            .into_iter()
            .collect();
        assert_eq!(row.get("dragons"), None);
        assert_eq!(row.get("barons"), None);
        assert_eq!(row.get("towers"), None);
        assert!(row.is_empty());
    }

    #[test]
    fn fill_missing_keeps_first_value() {
        let mut merged: RawRow = [("kills", "12"), ("dragons", "")].into_iter().collect();
        let later: RawRow = [("kills", "3"), ("dragons", "2")].into_iter().collect();
        merged.fill_missing_from(&later);
        assert_eq!(merged.get("kills"), Some("12"));
        assert_eq!(merged.get("dragons"), Some("2"));
    }
}
