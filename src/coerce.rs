//! Permissive value coercion shared by every field family.
//!
//! Exports disagree on how they spell numbers and booleans, so each field is
//! looked up through its alias chain and the raw string is coerced by a rule.
//! Unparseable values never fail: numbers fall back to 0, flags to false.

use crate::diagnostics::{Component, Diagnostics};
use crate::fields::Field;
use crate::row::RawRow;

const TRUTHY_TOKENS: [&str; 6] = ["true", "yes", "y", "t", "win", "w"];
const FALSY_TOKENS: [&str; 6] = ["false", "no", "n", "f", "loss", "l"];

/// A value found under one of a field's aliases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a, T> {
    pub alias: &'static str,
    pub raw: &'a str,
    pub value: T,
}

/// Walks the alias chain in order and returns the first alias whose raw value
/// the rule accepts.
pub fn resolve<'a, T>(
    row: &'a RawRow,
    field: &Field,
    rule: impl Fn(&str) -> Option<T>,
) -> Option<Resolved<'a, T>> {
    field.aliases.iter().find_map(|&alias| {
        let raw = row.get(alias)?;
        rule(raw).map(|value| Resolved { alias, raw, value })
    })
}

/// Every alias the rule accepts, in alias order.
pub fn resolve_all<'a, T>(
    row: &'a RawRow,
    field: &Field,
    rule: impl Fn(&str) -> Option<T>,
) -> Vec<Resolved<'a, T>> {
    field
        .aliases
        .iter()
        .filter_map(|&alias| {
            let raw = row.get(alias)?;
            rule(raw).map(|value| Resolved { alias, raw, value })
        })
        .collect()
}

/// Numeric rule: plain numbers parse, `true`/`1`/`yes` are 1, anything else 0.
pub fn to_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return value;
        }
    }

    match trimmed.to_lowercase().as_str() {
        "true" | "yes" => 1.0,
        _ => 0.0,
    }
}

pub fn number(row: &RawRow, field: &Field) -> f64 {
    resolve(row, field, |raw| Some(to_number(raw)))
        .map(|resolved| resolved.value)
        .unwrap_or_default()
}

/// Like [`number`] but keeps "not reported" distinct from zero.
pub fn optional_number(row: &RawRow, field: &Field) -> Option<f64> {
    resolve(row, field, |raw| Some(to_number(raw))).map(|resolved| resolved.value)
}

/// Rounds to the nearest whole count; negatives clamp to 0.
pub fn to_count(value: f64) -> u32 {
    if value <= 0.0 { 0 } else { value.round() as u32 }
}

/// Numeric value of the first alias present. Later aliases holding a
/// different number are reported as advisories and ignored.
pub fn checked_number(
    row: &RawRow,
    field: &Field,
    component: Component,
    game_id: &str,
    diagnostics: &mut Diagnostics,
) -> Option<f64> {
    let found = resolve_all(row, field, |raw| Some(to_number(raw)));
    let kept = found.first()?;

    for other in found.iter().skip(1).filter(|other| other.value != kept.value) {
        diagnostics.advisory(
            component,
            Some(game_id),
            field.name,
            format!(
                "{}={} kept over {}={}",
                kept.alias, kept.raw, other.alias, other.raw
            ),
        );
    }

    Some(kept.value)
}

pub fn checked_count(
    row: &RawRow,
    field: &Field,
    component: Component,
    game_id: &str,
    diagnostics: &mut Diagnostics,
) -> u32 {
    checked_number(row, field, component, game_id, diagnostics)
        .map(to_count)
        .unwrap_or_default()
}

/// Generic truthiness used for result and playoff columns.
pub fn is_truthy(raw: &str) -> bool {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value == 1.0;
    }
    TRUTHY_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

pub fn flag(row: &RawRow, field: &Field) -> bool {
    row.text(field).map(is_truthy).unwrap_or(false)
}

/// Flag rule for objectives attributed to a team.
///
/// The raw value may name the team that took the objective, or be a boolean
/// in one of several encodings. A non-empty value that is neither is taken as
/// another team's id.
pub fn objective_flag(raw: &str, team_id: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !team_id.is_empty() && trimmed == team_id {
        return Some(true);
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value == 1.0);
    }
    if TRUTHY_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return Some(true);
    }
    if FALSY_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return Some(false);
    }
    Some(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    const FB: Field = Field {
        name: "first_blood",
        aliases: &["firstblood", "first_blood"],
    };

    #[test]
    fn numbers_coerce_permissively() {
        assert_eq!(to_number("12"), 12.0);
        assert_eq!(to_number(" 0.75 "), 0.75);
        assert_eq!(to_number("TRUE"), 1.0);
        assert_eq!(to_number("yes"), 1.0);
        assert_eq!(to_number("garbage"), 0.0);
        assert_eq!(to_number("inf"), 0.0);
    }

    #[test]
    fn objective_flag_matches_team_id_first() {
        assert_eq!(objective_flag("T1", "T1"), Some(true));
        assert_eq!(objective_flag("T1", "GEN"), Some(false));
        assert_eq!(objective_flag("1", "GEN"), Some(true));
        assert_eq!(objective_flag("1.0", "GEN"), Some(true));
        assert_eq!(objective_flag("0", "GEN"), Some(false));
        assert_eq!(objective_flag("Yes", "GEN"), Some(true));
        assert_eq!(objective_flag("false", "GEN"), Some(false));
        assert_eq!(objective_flag("", "GEN"), None);
    }

    #[test]
    fn first_decisive_alias_wins() {
        let row: RawRow = [("firstblood", "T1"), ("first_blood", "")]
            .into_iter()
            .collect();
        let own = resolve(&row, &FB, |raw| objective_flag(raw, "T1"));
        assert_eq!(own.map(|r| (r.alias, r.value)), Some(("firstblood", true)));

        let other = resolve(&row, &FB, |raw| objective_flag(raw, "GEN"));
        assert_eq!(other.map(|r| r.value), Some(false));
    }

    #[test]
    fn alias_order_breaks_ties() {
        let row: RawRow = [("firstblood", "0"), ("first_blood", "1")]
            .into_iter()
            .collect();
        let resolved = resolve(&row, &FB, |raw| objective_flag(raw, "T1"));
        assert_eq!(resolved.map(|r| r.value), Some(false));
        assert_eq!(resolve_all(&row, &FB, |raw| objective_flag(raw, "T1")).len(), 2);
    }

    #[test]
    fn disagreeing_numeric_aliases_keep_first_and_report() {
        let kills = Field {
            name: "team_kills",
            aliases: &["teamkills", "team_kills"],
        };
        let row: RawRow = [("teamkills", "14"), ("team_kills", "9")]
            .into_iter()
            .collect();

        let mut diagnostics = Diagnostics::new();
        let value = checked_count(&row, &kills, Component::Objectives, "G1", &mut diagnostics);
        assert_eq!(value, 14);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].field, "team_kills");
        assert_eq!(diagnostics.entries()[0].component, Component::Objectives);
    }

    #[test]
    fn agreeing_numeric_aliases_stay_quiet() {
        let kills = Field {
            name: "team_kills",
            aliases: &["teamkills", "team_kills"],
        };
        let row: RawRow = [("teamkills", "14"), ("team_kills", "14.0")]
            .into_iter()
            .collect();

        let mut diagnostics = Diagnostics::new();
        assert_eq!(
            checked_number(&row, &kills, Component::Objectives, "G1", &mut diagnostics),
            Some(14.0)
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            checked_number(&RawRow::new(), &kills, Component::Objectives, "G1", &mut diagnostics),
            None
        );
    }

    #[test]
    fn truthy_accepts_common_encodings() {
        assert!(is_truthy("1"));
        assert!(is_truthy("True"));
        assert!(is_truthy("win"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("2"));
        assert!(!is_truthy("maybe"));
    }
}
