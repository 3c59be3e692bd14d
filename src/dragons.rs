use serde::Serialize;

use crate::coerce;
use crate::diagnostics::{Component, Diagnostics};
use crate::fields::{self, Field};
use crate::game::Side;
use crate::row::RawRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragonBreakdown {
    /// Reported total. Kept as the authoritative count even when the
    /// sub-types do not add up to it.
    pub total: u32,
    pub infernal: u32,
    pub mountain: u32,
    pub cloud: u32,
    pub ocean: u32,
    pub chemtech: u32,
    pub hextech: u32,
    pub unknown: u32,
    pub elder: u32,
}

impl DragonBreakdown {
    pub fn subtype_sum(&self) -> u32 {
        self.infernal
            + self.mountain
            + self.cloud
            + self.ocean
            + self.chemtech
            + self.hextech
            + self.unknown
    }
}

pub fn normalize(
    view: &RawRow,
    game_id: &str,
    side: Side,
    diagnostics: &mut Diagnostics,
) -> DragonBreakdown {
    let mut count =
        |field: &Field| coerce::checked_count(view, field, Component::Dragons, game_id, diagnostics);
    let breakdown = DragonBreakdown {
        total: count(&fields::DRAGONS),
        infernal: count(&fields::INFERNALS),
        mountain: count(&fields::MOUNTAINS),
        cloud: count(&fields::CLOUDS),
        ocean: count(&fields::OCEANS),
        chemtech: count(&fields::CHEMTECHS),
        hextech: count(&fields::HEXTECHS),
        unknown: count(&fields::UNKNOWN_DRAGONS),
        elder: count(&fields::ELDERS),
    };

    let sum = breakdown.subtype_sum();
    if sum != breakdown.total {
        diagnostics.advisory(
            Component::Dragons,
            Some(game_id),
            fields::DRAGONS.name,
            format!(
                "{} side sub-types sum to {} but total is {}, keeping total",
                side, sum, breakdown.total
            ),
        );
    }

    breakdown
}
