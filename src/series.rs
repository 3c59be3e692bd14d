//! Best-of-N series reconstruction from match-id naming.
//!
//! Ids look like `LOLTMNT02_215152` for the first game of a series and
//! `LOLTMNT02_215152_2` for later games: the game number is a trailing
//! numeric segment that follows at least two other segments.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesFormat {
    #[serde(rename = "Bo3")]
    BestOf3,
    #[serde(rename = "Bo5")]
    BestOf5,
    #[serde(rename = "Bo7")]
    BestOf7,
}

impl SeriesFormat {
    /// Infers the format from how many games of the series are known.
    pub fn from_game_count(count: usize) -> SeriesFormat {
        match count {
            0..=3 => SeriesFormat::BestOf3,
            4..=5 => SeriesFormat::BestOf5,
            _ => SeriesFormat::BestOf7,
        }
    }

    pub fn from_best_of(best_of: u32) -> Option<SeriesFormat> {
        match best_of {
            3 => Some(SeriesFormat::BestOf3),
            5 => Some(SeriesFormat::BestOf5),
            7 => Some(SeriesFormat::BestOf7),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub base_id: String,
    pub game_number: u32,
    pub format: SeriesFormat,
    /// Wins per team id in the games before this one.
    pub score_before: BTreeMap<String, u32>,
}

/// Anything that has a match id and possibly a winner.
pub trait SeriesMember {
    fn match_id(&self) -> &str;
    fn winner_id(&self) -> Option<&str>;
}

impl SeriesMember for GameRecord {
    fn match_id(&self) -> &str {
        &self.id
    }

    fn winner_id(&self) -> Option<&str> {
        self.winner()
    }
}

impl<M: SeriesMember + ?Sized> SeriesMember for &M {
    fn match_id(&self) -> &str {
        (**self).match_id()
    }

    fn winner_id(&self) -> Option<&str> {
        (**self).winner_id()
    }
}

pub fn is_series_id(match_id: &str) -> bool {
    match_id.contains('_')
}

fn split_game_suffix(match_id: &str) -> Option<(&str, u32)> {
    let (base, suffix) = match_id.rsplit_once('_')?;
    if !base.contains('_') || suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse::<u32>().ok().map(|number| (base, number))
}

pub fn base_match_id(match_id: &str) -> &str {
    split_game_suffix(match_id)
        .map(|(base, _)| base)
        .unwrap_or(match_id)
}

pub fn game_number(match_id: &str) -> u32 {
    split_game_suffix(match_id)
        .map(|(_, number)| number)
        .unwrap_or(1)
}

/// Every known match of the series with this base id.
pub fn series_matches<'a, M: SeriesMember>(matches: &'a [M], base_id: &str) -> Vec<&'a M> {
    matches
        .iter()
        .filter(|member| {
            let id = member.match_id();
            is_series_id(id) && base_match_id(id) == base_id
        })
        .collect()
}

/// Wins per team in the series games numbered strictly below `before_game`.
pub fn score_before<M: SeriesMember>(
    matches: &[M],
    base_id: &str,
    before_game: u32,
) -> BTreeMap<String, u32> {
    let mut score = BTreeMap::new();
    for member in series_matches(matches, base_id) {
        if game_number(member.match_id()) >= before_game {
            continue;
        }
        if let Some(winner) = member.winner_id() {
            *score.entry(winner.to_string()).or_insert(0) += 1;
        }
    }
    score
}

/// Series context for one match, or `None` when the id is not a series id.
/// A declared best-of takes precedence over the count-based guess.
pub fn resolve<M: SeriesMember>(
    matches: &[M],
    match_id: &str,
    declared_best_of: Option<u32>,
) -> Option<SeriesInfo> {
    if !is_series_id(match_id) {
        return None;
    }

    let base_id = base_match_id(match_id);
    let number = game_number(match_id);
    let known_games = series_matches(matches, base_id).len();
    let format = declared_best_of
        .and_then(SeriesFormat::from_best_of)
        .unwrap_or_else(|| SeriesFormat::from_game_count(known_games));

    Some(SeriesInfo {
        base_id: base_id.to_string(),
        game_number: number,
        format,
        score_before: score_before(matches, base_id, number),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Played(&'static str, Option<&'static str>);

    impl SeriesMember for Played {
        fn match_id(&self) -> &str {
            self.0
        }

        fn winner_id(&self) -> Option<&str> {
            self.1
        }
    }

    #[test]
    fn parses_game_suffix() {
        assert_eq!(base_match_id("LOLTMNT02_215152_2"), "LOLTMNT02_215152");
        assert_eq!(game_number("LOLTMNT02_215152_2"), 2);
        assert_eq!(base_match_id("LOLTMNT02_215152"), "LOLTMNT02_215152");
        assert_eq!(game_number("LOLTMNT02_215152"), 1);
        assert_eq!(game_number("ESPORTS_MATCH_GAME"), 1);
        assert_eq!(base_match_id("8401-7711"), "8401-7711");
        assert!(!is_series_id("8401-7711"));
    }

    #[test]
    fn score_counts_only_earlier_games() {
        let matches = [
            Played("LCK_100", Some("T1")),
            Played("LCK_100_2", Some("GEN")),
            Played("LCK_100_3", Some("T1")),
            Played("LCK_200", Some("T1")),
        ];

        let score = score_before(&matches, "LCK_100", 3);
        assert_eq!(score.get("T1"), Some(&1));
        assert_eq!(score.get("GEN"), Some(&1));

        let info = resolve(&matches, "LCK_100_3", None);
        let info = info.as_ref();
        assert_eq!(info.map(|i| i.game_number), Some(3));
        assert_eq!(info.map(|i| i.format), Some(SeriesFormat::BestOf3));
    }

    #[test]
    fn format_follows_game_count_unless_declared() {
        assert_eq!(SeriesFormat::from_game_count(1), SeriesFormat::BestOf3);
        assert_eq!(SeriesFormat::from_game_count(4), SeriesFormat::BestOf5);
        assert_eq!(SeriesFormat::from_game_count(6), SeriesFormat::BestOf7);

        let matches = [Played("MSI_9", None)];
        let info = resolve(&matches, "MSI_9", Some(5));
        assert_eq!(info.map(|i| i.format), Some(SeriesFormat::BestOf5));
        assert!(resolve(&matches, "single", None).is_none());
    }
}
